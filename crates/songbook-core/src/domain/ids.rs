use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage-assigned identifier of a [`Song`](crate::domain::song::Song).
///
/// Valid identifiers are strictly positive; anything below 1 is treated as
/// "not found" before storage is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(i64);

impl SongId {
  pub fn new(raw: i64) -> Self {
    SongId(raw)
  }

  pub fn get(&self) -> i64 {
    self.0
  }

  pub fn is_valid(&self) -> bool {
    self.0 >= 1
  }
}

impl From<i64> for SongId {
  fn from(raw: i64) -> Self {
    SongId(raw)
  }
}

impl From<SongId> for i64 {
  fn from(id: SongId) -> Self {
    id.0
  }
}

impl fmt::Display for SongId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

use crate::domain::ids::SongId;
use crate::validator::Validator;
use serde::{Deserialize, Serialize};

/// A catalog entry as stored, with its server-assigned fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
  pub id: SongId,
  /// Song title.
  #[serde(rename = "song")]
  pub title: String,
  /// Performing group.
  pub group: String,
  /// Free-text release date, kept exactly as provided.
  #[serde(rename = "releaseDate")]
  pub release_date: String,
  /// Lyrics; verses are separated by blank lines.
  pub text: String,
  pub link: String,
  /// Optimistic-concurrency token, bumped by every update.
  pub version: i32,
  pub created_at: String,
  pub updated_at: String,
}

/// Fields the caller supplies when adding a song.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSong {
  #[serde(rename = "song")]
  pub title: String,
  pub group: String,
  #[serde(rename = "releaseDate", default)]
  pub release_date: String,
  #[serde(default)]
  pub text: String,
  #[serde(default)]
  pub link: String,
}

/// Partial replacement of the mutable fields; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongPatch {
  #[serde(rename = "song")]
  pub title: Option<String>,
  pub group: Option<String>,
}

impl SongPatch {
  pub fn apply_to(self, song: &mut Song) {
    if let Some(title) = self.title {
      song.title = title;
    }
    if let Some(group) = self.group {
      song.group = group;
    }
  }
}

/// Free-text filters of a catalog search. An empty string places no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongSearch {
  pub song: String,
  pub group: String,
  #[serde(rename = "releaseDate")]
  pub release_date: String,
  pub text: String,
  pub link: String,
}

pub fn validate_song(v: &mut Validator, title: &str, group: &str) {
  v.check(!title.is_empty(), "song", "must be provided");
  v.check(!group.is_empty(), "group", "must be provided");
}

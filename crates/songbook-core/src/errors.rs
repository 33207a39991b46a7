use thiserror::Error;

use crate::validator::ValidationErrors;

/// Error type shared by every catalog operation.
///
/// Storage adapters classify their failures into these variants at the point
/// they occur; anything they cannot classify travels as [`CoreError::Repository`]
/// with the original message untouched.
#[derive(Debug, Error)]
pub enum CoreError {
  #[error("the requested resource could not be found")]
  NotFound,

  #[error("a song of this group already exists")]
  AlreadyExists,

  #[error("unable to update the record due to an edit conflict, please try again")]
  EditConflict,

  #[error("validation failed: {0}")]
  Validation(ValidationErrors),

  #[error("storage operation timed out: {0}")]
  Timeout(String),

  #[error("repository error: {0}")]
  Repository(String),
}

impl CoreError {
  /// Storage-side failures the caller cannot fix by changing its input.
  pub fn is_server_error(&self) -> bool {
    matches!(self, CoreError::Timeout(_) | CoreError::Repository(_))
  }
}

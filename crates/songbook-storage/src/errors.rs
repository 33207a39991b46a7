use diesel::r2d2::PoolError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use songbook_core::CoreError;

/// Maps a diesel failure onto the catalog taxonomy.
///
/// Only the `(song_name, group_name)` constraint can raise a uniqueness
/// violation, so every one of them is an `AlreadyExists`. Lock waits that ran
/// past `busy_timeout` surface as timeouts; the rest keeps its message.
pub(crate) fn classify(err: DieselError) -> CoreError {
  match err {
    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => CoreError::AlreadyExists,
    DieselError::DatabaseError(_, info) if is_lock_timeout(info.message()) => {
      CoreError::Timeout(info.message().to_owned())
    }
    other => CoreError::Repository(other.to_string()),
  }
}

/// r2d2 only fails a checkout once `connection_timeout` has elapsed.
pub(crate) fn classify_pool(err: PoolError) -> CoreError {
  CoreError::Timeout(format!("connection pool: {err}"))
}

fn is_lock_timeout(message: &str) -> bool {
  message.contains("database is locked") || message.contains("database table is locked")
}

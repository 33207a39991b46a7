use crate::domain::{NewSong, Song, SongId, SongSearch};
use crate::errors::CoreError;
use crate::query::PageRequest;

/// One page of a catalog search together with the size of the full match set.
///
/// Both values must come from the same view of storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
  pub songs: Vec<Song>,
  pub total_records: i64,
}

/// Values storage assigns when a row is rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongRevision {
  pub updated_at: String,
  pub version: i32,
}

/// Persistence port of the catalog.
///
/// Implementations classify their failures: uniqueness violations on
/// `(title, group)` become [`CoreError::AlreadyExists`], timeouts become
/// [`CoreError::Timeout`], anything else [`CoreError::Repository`].
pub trait SongRepository {
  /// Stores a new song and returns it with id, timestamps and version filled in.
  fn insert(&self, song: &NewSong) -> Result<Song, CoreError>;

  fn find(&self, id: SongId) -> Result<Option<Song>, CoreError>;

  fn find_lyrics(&self, id: SongId) -> Result<Option<String>, CoreError>;

  /// Replaces title and group of `song.id` if its stored version is still
  /// `song.version`. A row that vanished or moved on yields
  /// [`CoreError::EditConflict`].
  fn update(&self, song: &Song) -> Result<SongRevision, CoreError>;

  /// Returns whether a row was removed.
  fn delete(&self, id: SongId) -> Result<bool, CoreError>;

  fn search(&self, criteria: &SongSearch, page: &PageRequest) -> Result<SearchPage, CoreError>;
}

impl<R: SongRepository + ?Sized> SongRepository for &R {
  fn insert(&self, song: &NewSong) -> Result<Song, CoreError> {
    (**self).insert(song)
  }

  fn find(&self, id: SongId) -> Result<Option<Song>, CoreError> {
    (**self).find(id)
  }

  fn find_lyrics(&self, id: SongId) -> Result<Option<String>, CoreError> {
    (**self).find_lyrics(id)
  }

  fn update(&self, song: &Song) -> Result<SongRevision, CoreError> {
    (**self).update(song)
  }

  fn delete(&self, id: SongId) -> Result<bool, CoreError> {
    (**self).delete(id)
  }

  fn search(&self, criteria: &SongSearch, page: &PageRequest) -> Result<SearchPage, CoreError> {
    (**self).search(criteria, page)
  }
}

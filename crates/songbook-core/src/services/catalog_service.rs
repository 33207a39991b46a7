use crate::context::OpContext;
use crate::domain::song::validate_song;
use crate::domain::{NewSong, Song, SongId, SongPatch, SongSearch};
use crate::errors::CoreError;
use crate::ports::SongRepository;
use crate::query::{Filters, Metadata, paginate, split_verses};
use crate::validator::Validator;

/// Entry point of the catalog: search, lyrics by verse, and single-row writes.
///
/// Holds no state besides the repository; every call is independent.
pub struct CatalogService<R>
where
  R: SongRepository,
{
  repo: R,
}

impl<R> CatalogService<R>
where
  R: SongRepository,
{
  pub fn new(repo: R) -> Self {
    Self { repo }
  }

  pub fn repository(&self) -> &R {
    &self.repo
  }

  // -------- QUERY (read) --------

  /// Filtered, sorted, paginated listing.
  ///
  /// `filters` is validated in full before storage is touched; an empty
  /// match set is a successful, empty result with zeroed metadata.
  pub fn search(
    &self,
    ctx: &OpContext,
    criteria: &SongSearch,
    filters: &Filters,
  ) -> Result<(Vec<Song>, Metadata), CoreError> {
    let _span = ctx.span().enter();

    let page = filters.page_request().inspect_err(|e| trace_failure(e, "invalid listing filters"))?;

    tracing::info!(
      song_filter = %criteria.song,
      group_filter = %criteria.group,
      page = page.page,
      page_size = page.page_size,
      sort = %filters.sort,
      "listing songs"
    );

    let found = self.repo.search(criteria, &page).inspect_err(|e| trace_failure(e, "error listing songs"))?;
    let metadata = Metadata::calculate(found.total_records, page.page, page.page_size);

    tracing::info!(returned = found.songs.len(), total_records = metadata.total_records, "listed successfully");
    Ok((found.songs, metadata))
  }

  pub fn get(&self, ctx: &OpContext, id: SongId) -> Result<Song, CoreError> {
    let _span = ctx.span().enter();
    tracing::info!(song_id = %id, "getting song");

    let song = self.find_existing(id)?;

    tracing::info!(song_id = %id, "song retrieved");
    Ok(song)
  }

  /// One page of a song's lyrics, counted in verses.
  pub fn lyrics(&self, ctx: &OpContext, id: SongId, filters: &Filters) -> Result<(Vec<String>, Metadata), CoreError> {
    let _span = ctx.span().enter();
    tracing::info!(song_id = %id, page = filters.page, page_size = filters.page_size, "getting song lyrics");

    if !id.is_valid() {
      tracing::warn!(song_id = %id, "song not found");
      return Err(CoreError::NotFound);
    }

    let mut v = Validator::new();
    filters.validate_pagination(&mut v);
    v.into_result().inspect_err(|e| trace_failure(e, "invalid lyrics pagination"))?;

    let text = self
      .repo
      .find_lyrics(id)
      .and_then(|found| found.ok_or(CoreError::NotFound))
      .inspect_err(|e| trace_failure(e, "failed to get lyrics"))?;

    let (verses, metadata) = paginate(split_verses(&text), filters);

    tracing::info!(song_id = %id, returned = verses.len(), total_verses = metadata.total_records, "lyrics retrieved");
    Ok((verses, metadata))
  }

  // -------- COMMAND (write) --------

  pub fn insert(&self, ctx: &OpContext, song: NewSong) -> Result<Song, CoreError> {
    let _span = ctx.span().enter();
    tracing::info!(song = %song.title, group = %song.group, "attempting to add a new song");

    let mut v = Validator::new();
    validate_song(&mut v, &song.title, &song.group);
    v.into_result().inspect_err(|e| trace_failure(e, "validation has not passed"))?;

    let stored = self.repo.insert(&song).inspect_err(|e| trace_failure(e, "failed to add song"))?;

    tracing::info!(song_id = %stored.id, "song added successfully");
    Ok(stored)
  }

  /// Replaces title and/or group of an existing song.
  ///
  /// The write only lands if nobody changed or removed the row since it was
  /// read; otherwise the call fails with [`CoreError::EditConflict`].
  pub fn update(&self, ctx: &OpContext, id: SongId, patch: SongPatch) -> Result<Song, CoreError> {
    let _span = ctx.span().enter();
    tracing::info!(song_id = %id, "attempting to edit a song");

    let mut song = self.find_existing(id)?;
    patch.apply_to(&mut song);

    let mut v = Validator::new();
    validate_song(&mut v, &song.title, &song.group);
    v.into_result().inspect_err(|e| trace_failure(e, "validation has not passed"))?;

    let revision = self.repo.update(&song).inspect_err(|e| trace_failure(e, "error updating song"))?;
    song.updated_at = revision.updated_at;
    song.version = revision.version;

    tracing::info!(song_id = %id, version = song.version, "song was edited successfully");
    Ok(song)
  }

  pub fn delete(&self, ctx: &OpContext, id: SongId) -> Result<(), CoreError> {
    let _span = ctx.span().enter();
    tracing::info!(song_id = %id, "trying to delete the song");

    if !id.is_valid() {
      tracing::warn!(song_id = %id, "song not found");
      return Err(CoreError::NotFound);
    }

    let removed = self.repo.delete(id).inspect_err(|e| trace_failure(e, "error deleting song"))?;
    if !removed {
      tracing::warn!(song_id = %id, "song not found");
      return Err(CoreError::NotFound);
    }

    tracing::info!(song_id = %id, "song successfully deleted");
    Ok(())
  }

  fn find_existing(&self, id: SongId) -> Result<Song, CoreError> {
    if !id.is_valid() {
      tracing::warn!(song_id = %id, "song not found");
      return Err(CoreError::NotFound);
    }

    self
      .repo
      .find(id)
      .and_then(|found| found.ok_or(CoreError::NotFound))
      .inspect_err(|e| trace_failure(e, "failed to get song"))
  }
}

fn trace_failure(err: &CoreError, what: &str) {
  if err.is_server_error() {
    tracing::error!(error = %err, "{what}");
  } else {
    tracing::warn!(error = %err, "{what}");
  }
}

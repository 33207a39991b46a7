pub mod bootstrap;
pub mod config;
mod errors;
pub mod models;
pub mod schema;
mod search;

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;

use songbook_core::domain::{NewSong, Song, SongId, SongSearch};
use songbook_core::errors::CoreError;
use songbook_core::ports::{SearchPage, SongRepository, SongRevision};
use songbook_core::query::PageRequest;

use crate::errors::{classify, classify_pool};
use crate::models::{NewSongRow, SongRow};
use crate::schema::songs;

pub use crate::config::StorageConfig;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

/// Pragmas applied to every connection the pool hands out.
#[derive(Debug, Clone)]
struct SqlitePragmas {
  busy_timeout_ms: u64,
  journal_mode: Option<String>,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
  fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
    let mut pragmas = format!("PRAGMA busy_timeout = {};", self.busy_timeout_ms);
    if let Some(mode) = &self.journal_mode {
      pragmas.push_str(&format!(" PRAGMA journal_mode = {mode};"));
    }
    conn.batch_execute(&pragmas).map_err(diesel::r2d2::Error::QueryError)
  }
}

/// SQLite implementation of [`SongRepository`].
///
/// Cloning is cheap and shares the pool.
#[derive(Clone)]
pub struct SqliteSongRepository {
  pool: DbPool,
}

impl SqliteSongRepository {
  /// Opens (creating if needed) the database at `database_url` with default settings.
  pub fn new(database_url: &str) -> Result<Self, CoreError> {
    Self::open(&StorageConfig::at(database_url))
  }

  pub fn open(cfg: &StorageConfig) -> Result<Self, CoreError> {
    let journal_mode = cfg.journal_mode().map_err(|e| CoreError::Repository(e.to_string()))?;
    let pragmas = SqlitePragmas { busy_timeout_ms: cfg.busy_timeout_ms, journal_mode };

    if let Some(parent) = cfg.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
      std::fs::create_dir_all(parent).map_err(|e| CoreError::Repository(e.to_string()))?;
    }

    let url = cfg.db_path.to_string_lossy().into_owned();
    let manager = ConnectionManager::<SqliteConnection>::new(url.as_str());
    let pool = Pool::builder()
      .max_size(cfg.pool_size.max(1))
      .connection_timeout(Duration::from_millis(cfg.busy_timeout_ms))
      .connection_customizer(Box::new(pragmas))
      .build(manager)
      .map_err(|e| CoreError::Repository(format!("open {url}: {e}")))?;

    let repo = Self { pool };
    let mut conn = repo.conn()?;
    bootstrap::ensure_schema(&mut conn).map_err(classify)?;

    tracing::info!(db = %url, "song storage ready");
    Ok(repo)
  }

  fn conn(&self) -> Result<DbConn, CoreError> {
    self.pool.get().map_err(classify_pool)
  }
}

fn row_to_song(row: SongRow) -> Song {
  Song {
    id: SongId::new(row.id),
    title: row.song_name,
    group: row.group_name,
    release_date: row.release_date,
    text: row.lyrics,
    link: row.link,
    version: row.version,
    created_at: row.created_at,
    updated_at: row.updated_at,
  }
}

fn song_to_new_row(song: &NewSong) -> NewSongRow<'_> {
  NewSongRow {
    song_name: &song.title,
    group_name: &song.group,
    release_date: &song.release_date,
    lyrics: &song.text,
    link: &song.link,
  }
}

impl SongRepository for SqliteSongRepository {
  fn insert(&self, song: &NewSong) -> Result<Song, CoreError> {
    let mut conn = self.conn()?;

    let row = diesel::insert_into(songs::table)
      .values(&song_to_new_row(song))
      .returning(SongRow::as_returning())
      .get_result(&mut *conn)
      .map_err(classify)?;

    tracing::debug!(song_id = row.id, "song row inserted");
    Ok(row_to_song(row))
  }

  fn find(&self, id: SongId) -> Result<Option<Song>, CoreError> {
    let mut conn = self.conn()?;

    let row_opt = songs::table
      .filter(songs::id.eq(id.get()))
      .select(SongRow::as_select())
      .first(&mut *conn)
      .optional()
      .map_err(classify)?;

    Ok(row_opt.map(row_to_song))
  }

  fn find_lyrics(&self, id: SongId) -> Result<Option<String>, CoreError> {
    let mut conn = self.conn()?;

    songs::table
      .filter(songs::id.eq(id.get()))
      .select(songs::lyrics)
      .first::<String>(&mut *conn)
      .optional()
      .map_err(classify)
  }

  fn update(&self, song: &Song) -> Result<SongRevision, CoreError> {
    let mut conn = self.conn()?;

    let target = songs::table.filter(songs::id.eq(song.id.get())).filter(songs::version.eq(song.version));

    let revision = diesel::update(target)
      .set((
        songs::song_name.eq(&song.title),
        songs::group_name.eq(&song.group),
        songs::version.eq(songs::version + 1),
        songs::updated_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(NOW)),
      ))
      .returning((songs::updated_at, songs::version))
      .get_result::<(String, i32)>(&mut *conn)
      .optional()
      .map_err(classify)?;

    match revision {
      Some((updated_at, version)) => Ok(SongRevision { updated_at, version }),
      None => {
        tracing::debug!(song_id = %song.id, version = song.version, "no row at expected version");
        Err(CoreError::EditConflict)
      }
    }
  }

  fn delete(&self, id: SongId) -> Result<bool, CoreError> {
    let mut conn = self.conn()?;

    let affected =
      diesel::delete(songs::table.filter(songs::id.eq(id.get()))).execute(&mut *conn).map_err(classify)?;

    Ok(affected > 0)
  }

  fn search(&self, criteria: &SongSearch, page: &PageRequest) -> Result<SearchPage, CoreError> {
    let mut conn = self.conn()?;

    let rows = search::load_page(&mut conn, criteria, page).map_err(classify)?;

    // Every row carries the same windowed count.
    let total_records = rows.first().map_or(0, |row| row.total_records);
    let songs = rows.into_iter().map(|row| row_to_song(row.song)).collect();

    Ok(SearchPage { songs, total_records })
  }
}

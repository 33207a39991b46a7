use crate::schema::songs;

use diesel::prelude::*;
use diesel::sql_types::BigInt;

#[derive(Debug, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = songs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SongRow {
  pub id: i64,
  pub song_name: String,
  pub group_name: String,
  pub release_date: String,
  pub lyrics: String,
  pub link: String,
  pub version: i32,
  pub created_at: String,
  pub updated_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = songs)]
pub struct NewSongRow<'a> {
  pub song_name: &'a str,
  pub group_name: &'a str,
  pub release_date: &'a str,
  pub lyrics: &'a str,
  pub link: &'a str,
}

/// One row of the search statement: a song plus the windowed match count.
#[derive(Debug, QueryableByName)]
pub struct SongPageRow {
  #[diesel(sql_type = BigInt)]
  pub total_records: i64,
  #[diesel(embed)]
  pub song: SongRow,
}

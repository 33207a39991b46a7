//! Catalog search: five optional full-text filters, safelisted ordering,
//! limit/offset, and the match count, all in one statement.

use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};
use diesel::sqlite::{Sqlite, SqliteConnection};

use songbook_core::domain::SongSearch;
use songbook_core::query::{PageRequest, SortColumn, SortDirection};
use unicode_general_category::{GeneralCategory, get_general_category};

use crate::models::SongPageRow;

/// Full-text constraint derived from the search filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FtsQuery {
  /// Every filter is empty.
  Unconstrained,
  /// A filter holds text but not a single word, so nothing can match.
  Impossible,
  /// FTS5 expression requiring every word of every filter in its column.
  Match(String),
}

const SELECT_PAGE: &str = "SELECT COUNT(*) OVER () AS total_records, \
s.id AS id, s.song_name AS song_name, s.group_name AS group_name, s.release_date AS release_date, \
s.lyrics AS lyrics, s.link AS link, s.version AS version, s.created_at AS created_at, s.updated_at AS updated_at \
FROM songs AS s";

const WHERE_MATCHES: &str = " WHERE s.id IN (SELECT rowid FROM songs_fts WHERE songs_fts MATCH ?)";

fn order_column(column: SortColumn) -> &'static str {
  match column {
    SortColumn::Id => "s.id",
    SortColumn::Song => "s.song_name",
    SortColumn::Group => "s.group_name",
    SortColumn::Release => "s.release_date",
    SortColumn::Text => "s.lyrics",
    SortColumn::Link => "s.link",
  }
}

fn order_direction(direction: SortDirection) -> &'static str {
  match direction {
    SortDirection::Asc => "ASC",
    SortDirection::Desc => "DESC",
  }
}

/// Token characters of the `unicode61` tokenizer: letters, numbers and
/// private-use code points. Marks and everything else separate tokens.
fn is_token_char(c: char) -> bool {
  use GeneralCategory::*;
  matches!(
    get_general_category(c),
    UppercaseLetter
      | LowercaseLetter
      | TitlecaseLetter
      | ModifierLetter
      | OtherLetter
      | DecimalNumber
      | LetterNumber
      | OtherNumber
      | PrivateUse
  )
}

/// Lower-cased runs of token characters; everything else separates words.
fn words(filter: &str) -> impl Iterator<Item = String> + '_ {
  filter.split(|c: char| !is_token_char(c)).filter(|w| !w.is_empty()).map(str::to_lowercase)
}

pub(crate) fn fts_query(criteria: &SongSearch) -> FtsQuery {
  let fields = [
    ("song_name", criteria.song.as_str()),
    ("group_name", criteria.group.as_str()),
    ("release_date", criteria.release_date.as_str()),
    ("lyrics", criteria.text.as_str()),
    ("link", criteria.link.as_str()),
  ];

  let mut terms = Vec::new();
  for (column, filter) in fields {
    if filter.is_empty() {
      continue;
    }

    let before = terms.len();
    // Words only contain alphanumerics, so quoting them cannot break out of the phrase.
    terms.extend(words(filter).map(|word| format!("{column} : \"{word}\"")));

    if terms.len() == before {
      return FtsQuery::Impossible;
    }
  }

  if terms.is_empty() { FtsQuery::Unconstrained } else { FtsQuery::Match(terms.join(" AND ")) }
}

pub(crate) fn page_sql(fts: &FtsQuery, page: &PageRequest) -> String {
  let mut sql = String::from(SELECT_PAGE);
  if matches!(fts, FtsQuery::Match(_)) {
    sql.push_str(WHERE_MATCHES);
  }
  sql.push_str(&format!(
    " ORDER BY {} {}, s.id ASC LIMIT ? OFFSET ?",
    order_column(page.column),
    order_direction(page.direction)
  ));
  sql
}

/// Runs the search statement. Returns no rows for [`FtsQuery::Impossible`]
/// without touching the database.
pub(crate) fn load_page(
  conn: &mut SqliteConnection,
  criteria: &SongSearch,
  page: &PageRequest,
) -> QueryResult<Vec<SongPageRow>> {
  let fts = fts_query(criteria);
  if fts == FtsQuery::Impossible {
    tracing::debug!("search filter holds no words, skipping query");
    return Ok(Vec::new());
  }

  let sql = page_sql(&fts, page);
  tracing::debug!(sql = %sql, fts = ?fts, limit = page.limit, offset = page.offset, "running catalog search");

  let mut query = diesel::sql_query(sql).into_boxed::<Sqlite>();
  if let FtsQuery::Match(expression) = fts {
    query = query.bind::<Text, _>(expression);
  }

  query.bind::<BigInt, _>(page.limit).bind::<BigInt, _>(page.offset).load::<SongPageRow>(conn)
}

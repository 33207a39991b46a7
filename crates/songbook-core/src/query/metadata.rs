use serde::{Deserialize, Serialize};

/// Pagination summary returned next to every page of results.
///
/// Works the same whether the records are catalog rows or lyric verses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
  pub current_page: i64,
  pub page_size: i64,
  pub first_page: i64,
  pub last_page: i64,
  pub total_records: i64,
}

impl Metadata {
  /// Summarizes `total_records` split into pages of `page_size`.
  ///
  /// No records means no pages: every field is zero.
  pub fn calculate(total_records: i64, page: i64, page_size: i64) -> Self {
    if total_records <= 0 || page_size <= 0 {
      return Metadata::default();
    }

    Metadata {
      current_page: page,
      page_size,
      first_page: 1,
      last_page: (total_records - 1) / page_size + 1,
      total_records,
    }
  }
}

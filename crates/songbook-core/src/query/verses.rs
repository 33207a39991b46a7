//! Lyric pagination by verse.
//!
//! A verse is a run of non-blank lines. A line that is empty or holds only
//! whitespace is blank, and any number of consecutive blank lines (two or more
//! line breaks in a row) separate two verses. Blank lines before the first
//! verse or after the last one never produce empty verses. Inside a verse the
//! single line breaks are kept; each line loses its trailing whitespace.

use crate::query::filters::Filters;
use crate::query::metadata::Metadata;

pub fn split_verses(text: &str) -> Vec<String> {
  let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

  let mut verses = Vec::new();
  let mut current: Vec<&str> = Vec::new();

  for line in normalized.split('\n') {
    if line.trim().is_empty() {
      if !current.is_empty() {
        verses.push(current.join("\n"));
        current.clear();
      }
      continue;
    }
    current.push(line.trim_end());
  }

  if !current.is_empty() {
    verses.push(current.join("\n"));
  }

  verses
}

/// Cuts the page described by `filters` out of `items`.
///
/// Uses the same offset/limit arithmetic as the catalog listing. A page past
/// the end is empty; the metadata still describes the whole sequence.
pub fn paginate<T>(items: Vec<T>, filters: &Filters) -> (Vec<T>, Metadata) {
  let total = items.len() as i64;
  let metadata = Metadata::calculate(total, filters.page, filters.page_size);

  let start = filters.offset().max(0);
  if start >= total {
    return (Vec::new(), metadata);
  }

  let end = start.saturating_add(filters.limit()).min(total);
  if start >= end {
    return (Vec::new(), metadata);
  }

  let page = items.into_iter().skip(start as usize).take((end - start) as usize).collect();
  (page, metadata)
}

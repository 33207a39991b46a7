use crate::errors::CoreError;
use crate::validator::{ValidationErrors, Validator};

pub const MAX_PAGE: i64 = 10_000_000;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Columns a catalog listing may be ordered by.
///
/// Storage adapters translate these into identifiers through their own fixed
/// table, so no caller-provided text ever reaches the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
  Id,
  Song,
  Group,
  Release,
  Text,
  Link,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
  Asc,
  Desc,
}

/// One permitted value of the `sort` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOption {
  pub key: &'static str,
  pub column: SortColumn,
  pub direction: SortDirection,
}

const fn asc(key: &'static str, column: SortColumn) -> SortOption {
  SortOption { key, column, direction: SortDirection::Asc }
}

const fn desc(key: &'static str, column: SortColumn) -> SortOption {
  SortOption { key, column, direction: SortDirection::Desc }
}

/// Sort keys accepted by the song listing. A leading `-` means descending.
pub static SONG_SORT_SAFELIST: &[SortOption] = &[
  asc("id", SortColumn::Id),
  asc("song", SortColumn::Song),
  asc("group", SortColumn::Group),
  asc("release", SortColumn::Release),
  asc("text", SortColumn::Text),
  asc("link", SortColumn::Link),
  desc("-id", SortColumn::Id),
  desc("-song", SortColumn::Song),
  desc("-group", SortColumn::Group),
  desc("-release", SortColumn::Release),
  desc("-text", SortColumn::Text),
  desc("-link", SortColumn::Link),
];

/// Values used when a request omits a pagination parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDefaults {
  pub page_size: i64,
  pub sort: String,
}

/// Requested page, page size and ordering, plus the orderings this caller permits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
  pub page: i64,
  pub page_size: i64,
  pub sort: String,
  pub sort_safelist: &'static [SortOption],
}

/// The validated slice of a listing handed to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  pub page: i64,
  pub page_size: i64,
  pub limit: i64,
  pub offset: i64,
  pub column: SortColumn,
  pub direction: SortDirection,
}

impl Filters {
  pub fn new(page: i64, page_size: i64, sort: impl Into<String>, sort_safelist: &'static [SortOption]) -> Self {
    Self { page, page_size, sort: sort.into(), sort_safelist }
  }

  /// Page and size only; every sort key is rejected.
  pub fn paging(page: i64, page_size: i64) -> Self {
    Self::new(page, page_size, "", &[])
  }

  /// Builds filters from raw query-string values.
  ///
  /// Missing values take the defaults. Values that are not integers are
  /// reported to `v` as `"must be an integer value"` and replaced by the default
  /// so that the remaining checks still run.
  pub fn from_raw(
    page: Option<&str>,
    page_size: Option<&str>,
    sort: Option<&str>,
    defaults: &PageDefaults,
    sort_safelist: &'static [SortOption],
    v: &mut Validator,
  ) -> Self {
    Self {
      page: read_int(page, "page", 1, v),
      page_size: read_int(page_size, "page_size", defaults.page_size, v),
      sort: sort.unwrap_or(&defaults.sort).to_owned(),
      sort_safelist,
    }
  }

  pub fn validate_pagination(&self, v: &mut Validator) {
    v.check(self.page > 0, "page", "must be greater than zero");
    v.check(self.page <= MAX_PAGE, "page", "must be a maximum of 10 million");
    v.check(self.page_size > 0, "page_size", "must be greater than zero");
    v.check(self.page_size <= MAX_PAGE_SIZE, "page_size", "must be a maximum of 100");
  }

  pub fn validate(&self, v: &mut Validator) {
    self.validate_pagination(v);
    v.check(self.sort_option().is_some(), "sort", "invalid sort value");
  }

  /// Looks the sort key up in the safelist. Unknown keys resolve to nothing.
  pub fn sort_option(&self) -> Option<&'static SortOption> {
    self.sort_safelist.iter().find(|option| option.key == self.sort)
  }

  pub fn sort_column(&self) -> Option<SortColumn> {
    self.sort_option().map(|option| option.column)
  }

  pub fn sort_direction(&self) -> Option<SortDirection> {
    self.sort_option().map(|option| option.direction)
  }

  pub fn limit(&self) -> i64 {
    self.page_size
  }

  pub fn offset(&self) -> i64 {
    self.page.saturating_sub(1).max(0).saturating_mul(self.page_size)
  }

  /// Validates and resolves the filters into what a storage adapter needs.
  ///
  /// Runs the full validation itself, so a caller that skipped
  /// [`Filters::validate`] still cannot push an unknown ordering or an
  /// out-of-range page into a query.
  pub fn page_request(&self) -> Result<PageRequest, CoreError> {
    let mut v = Validator::new();
    self.validate(&mut v);
    v.into_result()?;

    let option = self
      .sort_option()
      .ok_or_else(|| CoreError::Validation(ValidationErrors::single("sort", "invalid sort value")))?;

    Ok(PageRequest {
      page: self.page,
      page_size: self.page_size,
      limit: self.limit(),
      offset: self.offset(),
      column: option.column,
      direction: option.direction,
    })
  }
}

fn read_int(raw: Option<&str>, field: &str, default: i64, v: &mut Validator) -> i64 {
  match raw {
    None | Some("") => default,
    Some(s) => match s.parse::<i64>() {
      Ok(n) => n,
      Err(_) => {
        v.add_error(field, "must be an integer value");
        default
      }
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn listing(page: i64, page_size: i64, sort: &str) -> Filters {
    Filters::new(page, page_size, sort, SONG_SORT_SAFELIST)
  }

  fn defaults() -> PageDefaults {
    PageDefaults { page_size: 5, sort: "id".into() }
  }

  #[test]
  fn limit_and_offset_follow_page_and_size() {
    for (page, size) in [(1, 1), (1, 100), (3, 5), (10_000_000, 100)] {
      let f = listing(page, size, "id");
      assert_eq!(f.limit(), size);
      assert_eq!(f.offset(), (page - 1) * size);
    }
  }

  #[test]
  fn bounds_are_inclusive() {
    let mut v = Validator::new();
    listing(1, 1, "id").validate(&mut v);
    listing(MAX_PAGE, MAX_PAGE_SIZE, "-link").validate(&mut v);
    assert!(v.valid());
  }

  #[test]
  fn every_violation_is_reported_at_once() {
    let mut v = Validator::new();
    listing(0, 101, "title").validate(&mut v);

    let errors = v.errors();
    assert_eq!(errors.get("page"), Some("must be greater than zero"));
    assert_eq!(errors.get("page_size"), Some("must be a maximum of 100"));
    assert_eq!(errors.get("sort"), Some("invalid sort value"));
  }

  #[test]
  fn upper_bounds_have_their_own_messages() {
    let mut v = Validator::new();
    listing(MAX_PAGE + 1, 0, "id").validate(&mut v);

    assert_eq!(v.errors().get("page"), Some("must be a maximum of 10 million"));
    assert_eq!(v.errors().get("page_size"), Some("must be greater than zero"));
  }

  #[test]
  fn sort_resolves_through_the_safelist() {
    let f = listing(1, 5, "-group");
    assert_eq!(f.sort_column(), Some(SortColumn::Group));
    assert_eq!(f.sort_direction(), Some(SortDirection::Desc));

    let f = listing(1, 5, "release");
    assert_eq!(f.sort_column(), Some(SortColumn::Release));
    assert_eq!(f.sort_direction(), Some(SortDirection::Asc));
  }

  #[test]
  fn unknown_sort_keys_fail_closed() {
    for key in ["song_name; DROP TABLE songs", "--id", "ID", "", "created_at"] {
      let f = listing(1, 5, key);
      assert_eq!(f.sort_column(), None, "{key}");
      assert_eq!(f.sort_direction(), None, "{key}");
      assert!(matches!(f.page_request(), Err(CoreError::Validation(e)) if e.contains("sort")));
    }
  }

  #[test]
  fn paging_filters_reject_any_sort() {
    let f = Filters::paging(1, 1);
    assert_eq!(f.sort_option(), None);

    let mut v = Validator::new();
    f.validate_pagination(&mut v);
    assert!(v.valid());
  }

  #[test]
  fn page_request_carries_resolved_values() {
    let req = listing(3, 20, "-song").page_request().unwrap();
    assert_eq!(
      req,
      PageRequest {
        page: 3,
        page_size: 20,
        limit: 20,
        offset: 40,
        column: SortColumn::Song,
        direction: SortDirection::Desc,
      }
    );
  }

  #[test]
  fn page_request_rejects_out_of_range_pages() {
    assert!(matches!(listing(0, 5, "id").page_request(), Err(CoreError::Validation(_))));
    assert!(matches!(listing(1, 500, "id").page_request(), Err(CoreError::Validation(_))));
  }

  #[test]
  fn raw_values_fall_back_to_defaults() {
    let mut v = Validator::new();
    let f = Filters::from_raw(None, None, None, &defaults(), SONG_SORT_SAFELIST, &mut v);

    assert!(v.valid());
    assert_eq!((f.page, f.page_size, f.sort.as_str()), (1, 5, "id"));
  }

  #[test]
  fn raw_values_that_are_not_integers_are_reported() {
    let mut v = Validator::new();
    let f = Filters::from_raw(Some("two"), Some("1.5"), Some("-song"), &defaults(), SONG_SORT_SAFELIST, &mut v);

    assert_eq!(v.errors().get("page"), Some("must be an integer value"));
    assert_eq!(v.errors().get("page_size"), Some("must be an integer value"));
    assert_eq!((f.page, f.page_size, f.sort.as_str()), (1, 5, "-song"));
  }

  #[test]
  fn raw_values_are_parsed() {
    let mut v = Validator::new();
    let f = Filters::from_raw(Some("4"), Some("25"), Some("link"), &defaults(), SONG_SORT_SAFELIST, &mut v);

    f.validate(&mut v);
    assert!(v.valid());
    assert_eq!((f.page, f.page_size), (4, 25));
  }
}

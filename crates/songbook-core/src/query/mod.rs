pub mod filters;
pub mod metadata;
pub mod verses;

pub use filters::{
  Filters, MAX_PAGE, MAX_PAGE_SIZE, PageDefaults, PageRequest, SONG_SORT_SAFELIST, SortColumn, SortDirection,
  SortOption,
};
pub use metadata::Metadata;
pub use verses::{paginate, split_verses};

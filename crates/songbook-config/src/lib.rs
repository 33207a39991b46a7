mod backend;
mod io;
mod paths;

pub use backend::{ConfigBackend, TomlConfigBackend};
pub use io::atomic_write_str;
pub use paths::{BASE_DIR_ENV, ConfigError, SongbookPaths};

use once_cell::sync::Lazy;

// Process-wide paths (portable via SONGBOOK_BASE_DIR, otherwise platform dirs)
pub static PATHS: Lazy<SongbookPaths> =
  Lazy::new(|| SongbookPaths::detect().expect("failed to init SongbookPaths"));

// Process-wide config backend over PATHS
pub static CONFIG_BACKEND: Lazy<TomlConfigBackend> = Lazy::new(|| TomlConfigBackend::new(PATHS.clone()));

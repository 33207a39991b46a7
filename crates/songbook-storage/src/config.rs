use serde::{Deserialize, Serialize};
use songbook_config::{CONFIG_BACKEND, ConfigBackend, ConfigError, PATHS};
use std::path::PathBuf;

const JOURNAL_MODES: &[&str] = &["DELETE", "TRUNCATE", "PERSIST", "MEMORY", "WAL", "OFF"];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
  pub db_path: PathBuf,
  pub journal_mode: Option<String>,
  /// Upper bound for lock waits and for pool checkouts, in milliseconds.
  pub busy_timeout_ms: u64,
  pub pool_size: u32,
}

impl Default for StorageConfig {
  fn default() -> Self {
    let db_path = PATHS.data_dir.join("songbook.db");
    StorageConfig::at(db_path)
  }
}

impl StorageConfig {
  /// Default settings for a database at `db_path`.
  pub fn at(db_path: impl Into<PathBuf>) -> Self {
    StorageConfig { db_path: db_path.into(), journal_mode: Some("WAL".to_string()), busy_timeout_ms: 3_000, pool_size: 8 }
  }

  pub fn load() -> Result<Self, ConfigError> {
    let cfg = CONFIG_BACKEND.load_section_with_default("storage")?;
    CONFIG_BACKEND.save_section("storage", &cfg)?;
    Ok(cfg)
  }

  /// Journal mode in upper case, if it is one SQLite accepts.
  pub fn journal_mode(&self) -> Result<Option<String>, ConfigError> {
    let Some(mode) = &self.journal_mode else {
      return Ok(None);
    };

    let upper = mode.to_ascii_uppercase();
    if JOURNAL_MODES.contains(&upper.as_str()) {
      Ok(Some(upper))
    } else {
      Err(ConfigError::Other(format!("unsupported journal_mode {mode:?}")))
    }
  }
}

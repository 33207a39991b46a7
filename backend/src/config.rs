use serde::{Deserialize, Serialize};
use songbook_config::{CONFIG_BACKEND, ConfigBackend, ConfigError};
use songbook_core::query::PageDefaults;

/// `[catalog]` section: defaults applied when a request leaves pagination out.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CatalogConfig {
  pub default_page_size: i64,
  pub default_lyrics_page_size: i64,
  pub default_sort: String,
}

impl Default for CatalogConfig {
  fn default() -> Self {
    CatalogConfig { default_page_size: 5, default_lyrics_page_size: 1, default_sort: "id".to_string() }
  }
}

impl CatalogConfig {
  pub fn load() -> Result<Self, ConfigError> {
    let cfg = CONFIG_BACKEND.load_section_with_default("catalog")?;
    CONFIG_BACKEND.save_section("catalog", &cfg)?;
    Ok(cfg)
  }

  pub fn listing_defaults(&self) -> PageDefaults {
    PageDefaults { page_size: self.default_page_size, sort: self.default_sort.clone() }
  }

  /// Lyrics are not sortable, so the default sort is empty.
  pub fn lyrics_defaults(&self) -> PageDefaults {
    PageDefaults { page_size: self.default_lyrics_page_size, sort: String::new() }
  }
}

/// `[logging]` section. `RUST_LOG` wins over `filter` when set.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
  pub filter: String,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    LoggingConfig { filter: "info".to_string() }
  }
}

impl LoggingConfig {
  pub fn load() -> Result<Self, ConfigError> {
    let cfg = CONFIG_BACKEND.load_section_with_default("logging")?;
    CONFIG_BACKEND.save_section("logging", &cfg)?;
    Ok(cfg)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lyrics_defaults_carry_no_sort() {
    let cfg = CatalogConfig::default();

    assert_eq!(cfg.listing_defaults(), PageDefaults { page_size: 5, sort: "id".into() });
    assert_eq!(cfg.lyrics_defaults(), PageDefaults { page_size: 1, sort: String::new() });
  }

  #[test]
  fn partial_sections_keep_defaults() {
    let cfg: CatalogConfig = serde_json::from_str(r#"{ "default_page_size": 20 }"#).unwrap();

    assert_eq!(cfg.default_page_size, 20);
    assert_eq!(cfg.default_sort, "id");
  }
}

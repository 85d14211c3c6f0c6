use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::query::QueryOptions;

pub const DEFAULT_TITLE: &str = "Who doesn't love some of them dad jokes, huh?";
pub const DEFAULT_BASE_URL: &str = "https://icanhazdadjoke.com";
pub const DEFAULT_USER_AGENT: &str = "dadjokes (https://github.com/dadjokes-tui/dadjokes)";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Header banner text
  pub title: Option<String>,
  pub api: ApiConfig,
  pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  pub base_url: String,
  pub user_agent: String,
  /// Page size forwarded as `limit=` (the API caps it at 30)
  pub limit: Option<u32>,
  /// Search term forwarded as `term=`
  pub term: Option<String>,
  /// Treat non-2xx responses and non-200 payload statuses as errors
  pub strict_status: bool,
  pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_string(),
      user_agent: DEFAULT_USER_AGENT.to_string(),
      limit: None,
      term: None,
      strict_status: false,
      timeout_secs: None,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  /// How long a fetched page stays fresh
  pub stale_time_secs: u64,
  /// Keep showing the last page while the next one loads
  pub keep_previous_data: bool,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      stale_time_secs: 3600,
      keep_previous_data: true,
    }
  }
}

impl CacheConfig {
  pub fn query_options(&self) -> QueryOptions {
    QueryOptions {
      stale_time: Duration::from_secs(self.stale_time_secs),
      keep_previous_data: self.keep_previous_data,
    }
  }
}

impl Config {
  /// Load configuration from file, falling back to defaults.
  ///
  /// Search order:
  /// 1. Explicit path if provided (must exist)
  /// 2. ./dadjokes.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/dadjokes/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("dadjokes.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("dadjokes").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self, serde_yaml::Error> {
    // An empty file deserializes to unit, not to an empty map
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    serde_yaml::from_str(contents)
  }

  pub fn title(&self) -> &str {
    self.title.as_deref().unwrap_or(DEFAULT_TITLE)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.title(), DEFAULT_TITLE);
    assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    assert!(!config.api.strict_status);

    let options = config.cache.query_options();
    assert_eq!(options.stale_time, Duration::from_secs(3600));
    assert!(options.keep_previous_data);
  }

  #[test]
  fn test_empty_file_uses_defaults() {
    let config = Config::parse("").unwrap();
    assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
  }

  #[test]
  fn test_partial_config() {
    let yaml = r#"
title: Groan zone
api:
  term: cat
  strict_status: true
cache:
  stale_time_secs: 60
"#;
    let config = Config::parse(yaml).unwrap();
    assert_eq!(config.title(), "Groan zone");
    assert_eq!(config.api.term.as_deref(), Some("cat"));
    assert!(config.api.strict_status);
    assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.cache.stale_time_secs, 60);
    assert!(config.cache.keep_previous_data);
  }

  #[test]
  fn test_missing_explicit_path_is_error() {
    let result = Config::load(Some(Path::new("/definitely/not/here.yaml")));
    assert!(result.is_err());
  }
}

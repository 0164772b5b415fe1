//! Runtime configuration.
//!
//! Read from a TOML file (optional) and then `INMO_*` environment variables,
//! e.g. `INMO_PORT=8080`. Every key has a default.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  /// SQLite database file.
  pub store_path:        PathBuf,
  /// Directory uploaded images are written to and served from.
  pub media_dir:         PathBuf,
  /// Public URL prefix of `media_dir`.
  pub media_base_url:    String,
  pub session_ttl_hours: i64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:              "127.0.0.1".to_owned(),
      port:              3000,
      store_path:        PathBuf::from("inmo.db"),
      media_dir:         PathBuf::from("media"),
      media_base_url:    "/media".to_owned(),
      session_ttl_hours: 24 * 7,
    }
  }
}

impl ServerConfig {
  /// Load `path` (if it exists) overlaid with the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    ::config::Config::builder()
      .add_source(::config::File::from(path).required(false))
      .add_source(::config::Environment::with_prefix("INMO"))
      .build()
      .context("failed to read config file")?
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn session_ttl(&self) -> chrono::Duration { chrono::Duration::hours(self.session_ttl_hours) }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("{}-{name}", uuid::Uuid::new_v4()));
    std::fs::write(&path, contents).unwrap();
    path
  }

  #[test]
  fn missing_file_yields_defaults() {
    let path = std::env::temp_dir().join(format!("{}-absent.toml", uuid::Uuid::new_v4()));
    assert_eq!(ServerConfig::load(&path).unwrap(), ServerConfig::default());
  }

  #[test]
  fn file_overrides_some_keys() {
    let path = temp_file(
      "inmo.toml",
      "port = 8080\nmedia_base_url = \"https://cdn.inmo.example\"\n",
    );
    let cfg = ServerConfig::load(&path).unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.media_base_url, "https://cdn.inmo.example");
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.address(), "127.0.0.1:8080");
    std::fs::remove_file(path).ok();
  }
}

//! HTTP server for the TAPP matching engine.
//!
//! Serves [`tapp_api`] under `/api`, backed by an in-memory store seeded from
//! a JSON fixture.

use std::path::{Path, PathBuf};

use axum::Router;
use serde::Deserialize;
use tapp_api::AppState;
use tapp_core::vocabulary::Vocabulary;
use tapp_store_memory::MemoryStore;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `TAPP_`-prefixed environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:         String,
  #[serde(default = "default_port")]
  pub port:         u16,
  /// JSON snapshot the in-memory store is seeded from.
  pub fixture_path: PathBuf,
  /// Known programs and departments for filtering and sorting.
  #[serde(default)]
  pub vocabulary:   Vocabulary,
}

fn default_host() -> String { "127.0.0.1".into() }

fn default_port() -> u16 { 8080 }

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router(state: AppState<MemoryStore>) -> Router {
  Router::new().nest("/api", tapp_api::api_router(state))
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use config::{Config, File, FileFormat};

  use super::*;

  fn parse(toml: &str) -> ServerConfig {
    Config::builder()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn minimal_config_uses_defaults() {
    let cfg = parse(r#"fixture_path = "demos/fixture.json""#);
    assert_eq!(cfg.address(), "127.0.0.1:8080");
    assert_eq!(cfg.fixture_path, PathBuf::from("demos/fixture.json"));
    assert_eq!(cfg.vocabulary, Vocabulary::default());
  }

  #[test]
  fn vocabulary_is_configurable() {
    let cfg = parse(
      r#"
      host = "0.0.0.0"
      port = 3000
      fixture_path = "fixture.json"

      [vocabulary]
      known_programs = ["U", "PD", "MScAC", "M", "P", "MEng"]
      "#,
    );
    assert_eq!(cfg.address(), "0.0.0.0:3000");
    assert_eq!(cfg.vocabulary.program_rank("MEng"), Some(5));
    assert!(cfg.vocabulary.is_known_department("cs"));
  }

  #[test]
  fn tilde_expands_to_home() {
    let path = Path::new("relative/fixture.json");
    assert_eq!(expand_tilde(path), path.to_path_buf());
  }
}

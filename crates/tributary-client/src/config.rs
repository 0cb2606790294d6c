use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::ConfigError;

/// Where and how to submit runs.
///
/// Stored as JSON, e.g. `~/.tributary/config.json`:
///
/// ```json
/// { "host": "http://localhost:8888", "default_experiment": "Default" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
  /// Base URL of the orchestration service API.
  #[serde(default = "default_host")]
  pub host: String,

  /// Base URL of the UI, if different from `host`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub ui_host: Option<String>,

  /// Experiment used when none is given.
  #[serde(default = "default_experiment")]
  pub default_experiment: String,
}

fn default_host() -> String {
  "http://localhost:8888".to_string()
}

fn default_experiment() -> String {
  "Default".to_string()
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      host: default_host(),
      ui_host: None,
      default_experiment: default_experiment(),
    }
  }
}

impl ClientConfig {
  /// Load from `path`, falling back to defaults when the file is absent.
  pub async fn load(path: &Path) -> Result<Self, ConfigError> {
    if !fs::try_exists(path).await? {
      return Ok(Self::default());
    }
    let content = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = ClientConfig::load(&dir.path().join("config.json"))
      .await
      .unwrap();
    assert_eq!(config, ClientConfig::default());
  }

  #[tokio::test]
  async fn test_partial_file_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    tokio::fs::write(&path, r#"{ "host": "http://pipelines.internal:8080" }"#)
      .await
      .unwrap();

    let config = ClientConfig::load(&path).await.unwrap();
    assert_eq!(config.host, "http://pipelines.internal:8080");
    assert_eq!(config.default_experiment, "Default");
    assert_eq!(config.ui_host, None);
  }

  #[tokio::test]
  async fn test_invalid_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    tokio::fs::write(&path, "not json").await.unwrap();

    assert!(matches!(
      ClientConfig::load(&path).await,
      Err(ConfigError::Parse(_))
    ));
  }
}

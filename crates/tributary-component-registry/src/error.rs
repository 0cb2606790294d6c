use thiserror::Error;

/// Errors that can occur when working with the component registry.
#[derive(Debug, Error)]
pub enum RegistryError {
  /// Component version not found.
  #[error("component version not found: {name}@{version}")]
  VersionNotFound { name: String, version: String },

  /// Component already exists in the registry.
  #[error("component already exists: {name}@{version}")]
  AlreadyExists { name: String, version: String },

  /// Name or version cannot be stored.
  #[error("invalid component id '{name}@{version}': {message}")]
  InvalidId {
    name: String,
    version: String,
    message: String,
  },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("invalid manifest: {0}")]
  InvalidManifest(#[from] serde_json::Error),
}

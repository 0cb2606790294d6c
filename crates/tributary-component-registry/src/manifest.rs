use serde::{Deserialize, Serialize};
use tributary_component::Operation;

use crate::error::RegistryError;

/// A stored operation and its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentManifest {
  /// Component name, e.g. "arith/add"
  pub name: String,

  /// Version, e.g. "1.0.0"
  pub version: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,

  pub operation: Operation,
}

impl ComponentManifest {
  /// Manifest for `operation`, taking its description.
  pub fn new(name: impl Into<String>, version: impl Into<String>, operation: Operation) -> Self {
    Self {
      name: name.into(),
      version: version.into(),
      description: operation.description.clone(),
      operation,
    }
  }

  /// Returns the directory name for this component: "name--version"
  /// with slashes replaced by double dashes.
  ///
  /// Example: "arith/add" version "1.0.0" becomes "arith--add--1.0.0"
  pub fn dir_name(&self) -> String {
    let sanitized_name = self.name.replace('/', "--");
    format!("{}--{}", sanitized_name, self.version)
  }

  /// Reject ids that would not map back from their directory name.
  pub(crate) fn check_id(&self) -> Result<(), RegistryError> {
    let invalid = |message: &str| RegistryError::InvalidId {
      name: self.name.clone(),
      version: self.version.clone(),
      message: message.to_string(),
    };

    if self.name.is_empty() || self.version.is_empty() {
      return Err(invalid("name and version must be non-empty"));
    }
    if self.version.contains("--") || self.version.contains('/') {
      return Err(invalid("version may not contain '--' or '/'"));
    }
    if self.name.contains("--") || self.name.matches('/').count() > 1 {
      return Err(invalid("name may not contain '--' or more than one '/'"));
    }
    if self.name.starts_with('/') || self.name.ends_with('/') || self.name.contains('\\') {
      return Err(invalid("name is not a valid path segment"));
    }
    Ok(())
  }
}

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::RegistryError;
use crate::manifest::ComponentManifest;

/// A component loaded from the registry.
#[derive(Debug, Clone)]
pub struct StoredComponent {
  pub manifest: ComponentManifest,

  /// Directory holding the manifest.
  pub component_dir: PathBuf,
}

/// Registry for saved operations.
#[async_trait]
pub trait ComponentRegistry: Send + Sync {
  /// Get a component by name, optionally at a specific version.
  /// If version is None, returns the latest saved version.
  async fn get(
    &self,
    name: &str,
    version: Option<&str>,
  ) -> Result<Option<StoredComponent>, RegistryError>;

  /// Save a component. Fails if that name and version already exist.
  async fn save(&self, manifest: ComponentManifest) -> Result<StoredComponent, RegistryError>;

  /// List all saved components.
  async fn list(&self) -> Result<Vec<ComponentManifest>, RegistryError>;

  /// Remove a saved component.
  async fn remove(&self, name: &str, version: &str) -> Result<(), RegistryError>;
}

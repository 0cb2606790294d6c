use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use crate::error::RegistryError;
use crate::manifest::ComponentManifest;
use crate::registry::{ComponentRegistry, StoredComponent};

const MANIFEST_FILE: &str = "manifest.json";

/// Filesystem-based component registry.
///
/// Components are stored in a directory structure:
/// ```text
/// {root}/
/// └── arith--add--1.0.0/
///     └── manifest.json
/// ```
pub struct FsComponentRegistry {
  root: PathBuf,
}

impl FsComponentRegistry {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Parse a directory name into (name, version).
  /// Example: "arith--add--1.0.0" -> ("arith/add", "1.0.0")
  fn parse_dir_name(dir_name: &str) -> Option<(String, String)> {
    let last_sep = dir_name.rfind("--")?;
    let name_part = &dir_name[..last_sep];
    let version = &dir_name[last_sep + 2..];
    if name_part.is_empty() || version.is_empty() {
      return None;
    }

    // Only the first "--" came from a "/"
    let name = match name_part.find("--") {
      Some(first_sep) => format!("{}/{}", &name_part[..first_sep], &name_part[first_sep + 2..]),
      None => name_part.to_string(),
    };

    Some((name, version.to_string()))
  }

  async fn read_manifest(&self, component_dir: &Path) -> Result<ComponentManifest, RegistryError> {
    let content = fs::read_to_string(component_dir.join(MANIFEST_FILE)).await?;
    Ok(serde_json::from_str(&content)?)
  }

  async fn load_component(&self, component_dir: PathBuf) -> Result<StoredComponent, RegistryError> {
    let manifest = self.read_manifest(&component_dir).await?;
    Ok(StoredComponent {
      manifest,
      component_dir,
    })
  }
}

#[async_trait]
impl ComponentRegistry for FsComponentRegistry {
  async fn get(
    &self,
    name: &str,
    version: Option<&str>,
  ) -> Result<Option<StoredComponent>, RegistryError> {
    if !fs::try_exists(&self.root).await? {
      return Ok(None);
    }

    let mut entries = fs::read_dir(&self.root).await?;
    let mut matching_components: Vec<StoredComponent> = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
      let path = entry.path();
      if !path.is_dir() {
        continue;
      }

      let Some(dir_name) = path.file_name().and_then(|n| n.to_str()) else {
        continue;
      };

      if let Some((parsed_name, parsed_version)) = Self::parse_dir_name(dir_name)
        && parsed_name == name
      {
        if let Some(v) = version {
          if parsed_version == v {
            return Ok(Some(self.load_component(path).await?));
          }
        } else {
          matching_components.push(self.load_component(path).await?);
        }
      }
    }

    matching_components.sort_by(|a, b| compare_versions(&b.manifest.version, &a.manifest.version));
    Ok(matching_components.into_iter().next())
  }

  async fn save(&self, manifest: ComponentManifest) -> Result<StoredComponent, RegistryError> {
    manifest.check_id()?;
    let target_dir = self.root.join(manifest.dir_name());

    if fs::try_exists(&target_dir).await? {
      return Err(RegistryError::AlreadyExists {
        name: manifest.name.clone(),
        version: manifest.version.clone(),
      });
    }

    fs::create_dir_all(&target_dir).await?;
    let content = serde_json::to_string_pretty(&manifest)?;
    fs::write(target_dir.join(MANIFEST_FILE), content).await?;
    debug!(name = %manifest.name, version = %manifest.version, "component saved");

    Ok(StoredComponent {
      manifest,
      component_dir: target_dir,
    })
  }

  async fn list(&self) -> Result<Vec<ComponentManifest>, RegistryError> {
    let mut manifests = Vec::new();

    if !fs::try_exists(&self.root).await? {
      return Ok(manifests);
    }

    let mut entries = fs::read_dir(&self.root).await?;
    while let Some(entry) = entries.next_entry().await? {
      let path = entry.path();
      if !path.is_dir() {
        continue;
      }
      match self.read_manifest(&path).await {
        Ok(manifest) => manifests.push(manifest),
        Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable component"),
      }
    }

    manifests.sort_by(|a, b| {
      a.name
        .cmp(&b.name)
        .then_with(|| compare_versions(&a.version, &b.version))
    });
    Ok(manifests)
  }

  async fn remove(&self, name: &str, version: &str) -> Result<(), RegistryError> {
    match self.get(name, Some(version)).await? {
      Some(c) => {
        fs::remove_dir_all(&c.component_dir).await?;
        Ok(())
      }
      None => Err(RegistryError::VersionNotFound {
        name: name.to_string(),
        version: version.to_string(),
      }),
    }
  }
}

/// Compare dot-separated versions, numerically where both segments are numbers.
fn compare_versions(a: &str, b: &str) -> Ordering {
  let mut left = a.split('.');
  let mut right = b.split('.');

  loop {
    match (left.next(), right.next()) {
      (None, None) => return Ordering::Equal,
      (None, Some(_)) => return Ordering::Less,
      (Some(_), None) => return Ordering::Greater,
      (Some(l), Some(r)) => {
        let ordering = match (l.parse::<u64>(), r.parse::<u64>()) {
          (Ok(l), Ok(r)) => l.cmp(&r),
          _ => l.cmp(r),
        };
        if ordering != Ordering::Equal {
          return ordering;
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_dir_name_with_org() {
    let result = FsComponentRegistry::parse_dir_name("arith--add--1.0.0");
    assert_eq!(result, Some(("arith/add".to_string(), "1.0.0".to_string())));
  }

  #[test]
  fn test_parse_dir_name_without_org() {
    let result = FsComponentRegistry::parse_dir_name("my-divmod--2.1.0");
    assert_eq!(result, Some(("my-divmod".to_string(), "2.1.0".to_string())));
  }

  #[test]
  fn test_parse_dir_name_invalid() {
    assert_eq!(FsComponentRegistry::parse_dir_name("no-version-here"), None);
    assert_eq!(FsComponentRegistry::parse_dir_name("add--"), None);
  }

  #[test]
  fn test_compare_versions() {
    assert_eq!(compare_versions("1.10.0", "1.9.0"), Ordering::Greater);
    assert_eq!(compare_versions("1.0", "1.0.1"), Ordering::Less);
    assert_eq!(compare_versions("2.0.0", "2.0.0"), Ordering::Equal);
    assert_eq!(compare_versions("1.0.0-beta", "1.0.0-alpha"), Ordering::Greater);
  }
}

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tributary_component::{Operation, ParameterType};

use crate::error::PackageError;
use crate::graph::Graph;

/// Version written into every package.
pub const FORMAT_VERSION: u32 = 1;

/// A compiled pipeline, ready to submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelinePackage {
  pub format_version: u32,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default)]
  pub parameters: Vec<ParameterDecl>,
  pub tasks: Vec<PackagedTask>,
  #[serde(default)]
  pub edges: Vec<(String, String)>,
}

/// A top-level parameter in a package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDecl {
  pub name: String,
  #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
  pub param_type: Option<ParameterType>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub default: Option<String>,
}

/// One task of a package: the operation plus its bound arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackagedTask {
  pub id: String,
  pub component: Operation,
  /// Argument per input name.
  pub arguments: BTreeMap<String, ArgumentValue>,
  /// Upstream task ids, data and control dependencies combined.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub dependencies: Vec<String>,
}

/// A bound argument, resolved by the orchestrator at run time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArgumentValue {
  Constant { value: String },
  Parameter { name: String },
  TaskOutput { task: String, output: String },
}

impl PipelinePackage {
  /// Build the graph structure for traversal, from the listed edges and each
  /// task's dependencies.
  pub fn graph(&self) -> Graph {
    let mut edges = self.edges.clone();
    for task in &self.tasks {
      for upstream in &task.dependencies {
        edges.push((upstream.clone(), task.id.clone()));
      }
    }
    Graph::new(self.tasks.iter().map(|t| t.id.as_str()), &edges)
  }

  pub fn get_task(&self, task_id: &str) -> Option<&PackagedTask> {
    self.tasks.iter().find(|t| t.id == task_id)
  }

  pub fn get_parameter(&self, name: &str) -> Option<&ParameterDecl> {
    self.parameters.iter().find(|p| p.name == name)
  }

  pub fn to_json(&self) -> Result<String, PackageError> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  /// Parse a package, rejecting unknown format versions.
  pub fn from_json(content: &str) -> Result<Self, PackageError> {
    let package: Self = serde_json::from_str(content)?;
    if package.format_version != FORMAT_VERSION {
      return Err(PackageError::UnsupportedFormat {
        found: package.format_version,
        expected: FORMAT_VERSION,
      });
    }
    Ok(package)
  }

  pub async fn write_to(&self, path: &Path) -> Result<(), PackageError> {
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      fs::create_dir_all(parent).await?;
    }
    fs::write(path, self.to_json()?).await?;
    Ok(())
  }

  pub async fn read_from(path: &Path) -> Result<Self, PackageError> {
    let content = fs::read_to_string(path).await?;
    Self::from_json(&content)
  }
}

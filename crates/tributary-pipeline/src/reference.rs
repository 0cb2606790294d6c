use std::fmt;

use tributary_component::{OutputType, ParameterType};
use uuid::Uuid;

/// Identity of one graph under construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphId(Uuid);

impl GraphId {
  pub fn new() -> Self {
    Self(Uuid::new_v4())
  }
}

impl Default for GraphId {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Display for GraphId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// Wiring token for one named output of one task.
///
/// Carries identity only: the graph and task that produce the value, the
/// output name, and its declared type. The value itself exists only once the
/// orchestrator runs the producing task.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutputReference {
  graph_id: GraphId,
  task_id: String,
  output: String,
  output_type: OutputType,
}

impl OutputReference {
  pub fn new(
    graph_id: GraphId,
    task_id: impl Into<String>,
    output: impl Into<String>,
    output_type: OutputType,
  ) -> Self {
    Self {
      graph_id,
      task_id: task_id.into(),
      output: output.into(),
      output_type,
    }
  }

  pub fn graph_id(&self) -> GraphId {
    self.graph_id
  }

  pub fn task_id(&self) -> &str {
    &self.task_id
  }

  pub fn output(&self) -> &str {
    &self.output
  }

  pub fn output_type(&self) -> &OutputType {
    &self.output_type
  }
}

impl fmt::Display for OutputReference {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}", self.task_id, self.output)
  }
}

/// Reference to a declared top-level pipeline parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PipelineParam {
  name: String,
  param_type: Option<ParameterType>,
}

impl PipelineParam {
  pub(crate) fn new(name: impl Into<String>, param_type: Option<ParameterType>) -> Self {
    Self {
      name: name.into(),
      param_type,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn param_type(&self) -> Option<ParameterType> {
    self.param_type
  }
}

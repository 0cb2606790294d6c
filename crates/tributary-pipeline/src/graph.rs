use std::collections::HashSet;

use tributary_component::{Operation, ParameterType};

use crate::argument::Argument;
use crate::reference::GraphId;

/// A declared top-level parameter of a pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineParameter {
  pub name: String,
  pub param_type: Option<ParameterType>,
  /// Default in text form. Parameters without one must be supplied at
  /// submission.
  pub default: Option<String>,
}

/// One task in a finished graph.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskNode {
  pub id: String,
  pub operation: Operation,
  /// Arguments keyed by input name, in the operation's input order.
  pub arguments: Vec<(String, Argument)>,
  /// Explicit control dependencies, by task id.
  pub after: Vec<String>,
}

impl TaskNode {
  /// Upstream task ids, data dependencies first, without duplicates.
  pub fn dependencies(&self) -> Vec<&str> {
    let mut seen = HashSet::new();
    self
      .arguments
      .iter()
      .filter_map(|(_, arg)| arg.as_output().map(|r| r.task_id()))
      .chain(self.after.iter().map(String::as_str))
      .filter(|id| seen.insert(*id))
      .collect()
  }
}

/// A finished pipeline graph. Immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineGraph {
  pub(crate) id: GraphId,
  pub(crate) name: String,
  pub(crate) description: Option<String>,
  pub(crate) parameters: Vec<PipelineParameter>,
  pub(crate) tasks: Vec<TaskNode>,
}

impl PipelineGraph {
  pub fn id(&self) -> GraphId {
    self.id
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn description(&self) -> Option<&str> {
    self.description.as_deref()
  }

  pub fn parameters(&self) -> &[PipelineParameter] {
    &self.parameters
  }

  /// Tasks in the order they were added.
  pub fn tasks(&self) -> &[TaskNode] {
    &self.tasks
  }

  pub fn get_task(&self, task_id: &str) -> Option<&TaskNode> {
    self.tasks.iter().find(|t| t.id == task_id)
  }

  pub fn get_parameter(&self, name: &str) -> Option<&PipelineParameter> {
    self.parameters.iter().find(|p| p.name == name)
  }

  /// Edges `(upstream, downstream)` induced by output references and
  /// explicit dependencies.
  pub fn edges(&self) -> Vec<(String, String)> {
    self
      .tasks
      .iter()
      .flat_map(|task| {
        task
          .dependencies()
          .into_iter()
          .map(move |upstream| (upstream.to_string(), task.id.clone()))
      })
      .collect()
  }
}

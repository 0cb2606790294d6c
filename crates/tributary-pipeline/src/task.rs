use crate::error::PipelineError;
use crate::reference::{GraphId, OutputReference};

/// Handle for one bound invocation of an operation.
///
/// Returned by [`GraphBuilder::add_task`](crate::GraphBuilder::add_task) so
/// later tasks can consume its outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
  graph_id: GraphId,
  id: String,
  operation: String,
  outputs: TaskOutputs,
}

/// The output references of a task, in declaration order.
///
/// The first declared output is the primary one, reachable through
/// [`Task::output`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskOutputs {
  entries: Vec<OutputReference>,
}

impl Task {
  pub(crate) fn new(
    graph_id: GraphId,
    id: String,
    operation: String,
    outputs: TaskOutputs,
  ) -> Self {
    Self {
      graph_id,
      id,
      operation,
      outputs,
    }
  }

  pub fn graph_id(&self) -> GraphId {
    self.graph_id
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  /// Name of the operation this task invokes.
  pub fn operation(&self) -> &str {
    &self.operation
  }

  pub fn outputs(&self) -> &TaskOutputs {
    &self.outputs
  }

  /// The default output.
  pub fn output(&self) -> Result<OutputReference, PipelineError> {
    self
      .outputs
      .primary()
      .cloned()
      .ok_or_else(|| PipelineError::NoDefaultOutput(self.id.clone()))
  }

  /// The output declared under `name`.
  pub fn output_named(&self, name: &str) -> Result<OutputReference, PipelineError> {
    self
      .outputs
      .get(name)
      .cloned()
      .ok_or_else(|| PipelineError::UnknownOutput {
        task_id: self.id.clone(),
        output: name.to_string(),
      })
  }
}

impl TaskOutputs {
  pub(crate) fn new(entries: Vec<OutputReference>) -> Self {
    Self { entries }
  }

  pub fn get(&self, name: &str) -> Option<&OutputReference> {
    self.entries.iter().find(|r| r.output() == name)
  }

  pub fn primary(&self) -> Option<&OutputReference> {
    self.entries.first()
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.entries.iter().map(|r| r.output())
  }

  pub fn iter(&self) -> impl Iterator<Item = &OutputReference> {
    self.entries.iter()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

use thiserror::Error;
use tributary_component::ComponentError;

/// Errors raised while a pipeline definition populates its graph.
#[derive(Debug, Error)]
pub enum PipelineError {
  /// Wrapping or coercion failed.
  #[error(transparent)]
  Component(#[from] ComponentError),

  /// A pipeline parameter was declared twice.
  #[error("pipeline parameter '{0}' declared more than once")]
  DuplicateParameter(String),

  /// A task argument names a parameter the pipeline never declared.
  #[error("unknown pipeline parameter: {0}")]
  UnknownParameter(String),

  /// More arguments than the operation has inputs.
  #[error("'{operation}' takes {expected} arguments, got {actual}")]
  TooManyArguments {
    operation: String,
    expected: usize,
    actual: usize,
  },

  /// A required input received no argument.
  #[error("'{operation}' is missing a value for input '{input}'")]
  MissingArgument { operation: String, input: String },

  /// A task has no output under the requested name.
  #[error("task '{task_id}' has no output named '{output}'")]
  UnknownOutput { task_id: String, output: String },

  /// A task has no outputs at all, so there is no default output.
  #[error("task '{0}' has no default output")]
  NoDefaultOutput(String),

  /// An explicit dependency points at a task created later.
  #[error("task '{task_id}' cannot run after '{upstream}', which is declared later")]
  InvalidDependency { task_id: String, upstream: String },

  /// A task handle does not belong to this graph.
  #[error("task '{0}' does not belong to this pipeline")]
  UnknownTask(String),
}

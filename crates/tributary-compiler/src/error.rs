use thiserror::Error;
use tributary_pipeline::PipelineError;

/// Structural problems found while compiling or validating a pipeline.
#[derive(Debug, Error)]
pub enum GraphValidationError {
  /// An argument references a task that is not part of this graph.
  #[error("task '{task_id}' references output of '{producer}', which is not in this pipeline")]
  DanglingReference { task_id: String, producer: String },

  /// An argument names an output its producer never declared.
  #[error("task '{task_id}' references undeclared output '{output}' of '{producer}'")]
  UndeclaredOutput {
    task_id: String,
    producer: String,
    output: String,
  },

  /// An argument names a parameter the pipeline never declared.
  #[error("task '{task_id}' references unknown pipeline parameter '{name}'")]
  UnknownParameter { task_id: String, name: String },

  /// An explicit dependency or edge names a task that does not exist.
  #[error("task '{task_id}' depends on unknown task '{upstream}'")]
  UnknownDependency { task_id: String, upstream: String },

  /// An input has no bound argument.
  #[error("task '{task_id}' has no argument for input '{input}'")]
  MissingArgument { task_id: String, input: String },

  /// An argument is bound to an input the operation does not declare.
  #[error("task '{task_id}' binds unknown input '{input}'")]
  UnknownInput { task_id: String, input: String },

  #[error("duplicate task id: {0}")]
  DuplicateTaskId(String),

  #[error("duplicate pipeline parameter: {0}")]
  DuplicateParameter(String),

  #[error("cycle detected in pipeline graph")]
  CycleDetected,

  #[error("pipeline has no entry points")]
  NoEntryPoints,
}

/// Errors from building and compiling a pipeline definition in one step.
#[derive(Debug, Error)]
pub enum CompileError {
  #[error("pipeline definition failed: {0}")]
  Definition(#[from] PipelineError),

  #[error("pipeline validation failed: {0}")]
  Validation(#[from] GraphValidationError),
}

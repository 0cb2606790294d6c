use thiserror::Error;
use tributary_component::ComponentError;

/// Errors that can occur while launching a component function.
#[derive(Debug, Error)]
pub enum TaskError {
  #[error(transparent)]
  Component(#[from] ComponentError),

  #[error("unknown function: {0}")]
  UnknownFunction(String),

  #[error("function '{0}' is already registered")]
  DuplicateFunction(String),

  #[error("invalid launcher arguments: {0}")]
  InvalidArguments(String),

  #[error("missing required input: {0}")]
  MissingInput(String),

  #[error("unknown input: {0}")]
  UnknownInput(String),

  #[error("unknown output: {0}")]
  UnknownOutput(String),

  #[error("function did not produce output '{0}'")]
  MissingOutput(String),

  #[error("function produced undeclared output '{0}'")]
  UnexpectedOutput(String),

  /// The function itself reported a failure.
  #[error("function failed: {message}")]
  Failed { message: String },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

impl TaskError {
  pub fn failed(message: impl Into<String>) -> Self {
    Self::Failed {
      message: message.into(),
    }
  }
}

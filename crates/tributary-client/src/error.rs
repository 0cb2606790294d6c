use thiserror::Error;
use tributary_compiler::{CompileError, GraphValidationError};

/// Errors raised while submitting a run.
#[derive(Debug, Error)]
pub enum SubmissionError {
  /// A parameter without a default received no value.
  #[error("missing value for required pipeline parameter '{0}'")]
  MissingParameter(String),

  /// A value was given for a parameter the pipeline does not declare.
  #[error("unknown pipeline parameter '{0}'")]
  UnknownParameter(String),

  /// A value does not coerce to its parameter's type.
  #[error("invalid value for pipeline parameter '{name}': {message}")]
  InvalidArgument { name: String, message: String },

  #[error(transparent)]
  Compile(#[from] CompileError),

  #[error("invalid package: {0}")]
  Validation(#[from] GraphValidationError),

  #[error("failed to encode package: {0}")]
  Encoding(#[from] serde_json::Error),

  /// Transport failure talking to the service.
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// The service answered with an error status.
  #[error("orchestration service returned {status}: {message}")]
  Api { status: u16, message: String },

  /// The service answered with something we cannot read.
  #[error("unexpected response from orchestration service: {0}")]
  InvalidResponse(String),
}

/// Errors loading the client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("invalid config: {0}")]
  Parse(#[from] serde_json::Error),
}

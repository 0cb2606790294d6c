use thiserror::Error;

/// Errors raised while wrapping a function or coercing its values.
#[derive(Debug, Error)]
pub enum ComponentError {
  /// The function declaration cannot be turned into an operation.
  #[error("invalid specification for '{function}': {message}")]
  Specification { function: String, message: String },

  /// A type outside the supported coercion set was required.
  #[error("unsupported type '{type_name}' for '{name}' in '{function}'")]
  UnsupportedType {
    function: String,
    name: String,
    type_name: String,
  },

  /// A textual value could not be parsed as its declared type.
  #[error("value for '{name}' expected {expected}, got '{value}'")]
  Coercion {
    name: String,
    expected: String,
    value: String,
  },
}

impl ComponentError {
  pub(crate) fn specification(function: &str, message: impl Into<String>) -> Self {
    Self::Specification {
      function: function.to_string(),
      message: message.into(),
    }
  }
}

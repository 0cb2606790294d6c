//! Semantic types and text coercion.
//!
//! Values cross task boundaries as text. The declared [`ParameterType`] of an
//! input decides how that text is parsed back into a typed value:
//!
//! - `"42"` (integer) → `42`
//! - `"19.5"` (float) → `19.5`
//! - `"TRUE"` (boolean) → `true`
//! - anything (string) → unchanged

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ComponentError;

/// The supported coercion set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
  Integer,
  Float,
  Boolean,
  String,
}

impl ParameterType {
  /// Parse a declared type name. Returns `None` for names outside the set.
  pub fn parse(type_name: &str) -> Option<Self> {
    match type_name.trim().to_ascii_lowercase().as_str() {
      "int" | "integer" => Some(Self::Integer),
      "float" | "number" => Some(Self::Float),
      "bool" | "boolean" => Some(Self::Boolean),
      "str" | "string" | "text" => Some(Self::String),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Integer => "integer",
      Self::Float => "float",
      Self::Boolean => "boolean",
      Self::String => "string",
    }
  }

  /// Whether a value declared as `source` can be bound to an input declared
  /// as `input`. `None` on either side means untyped text.
  pub fn feeds(source: Option<Self>, input: Option<Self>) -> bool {
    match (source, input) {
      (_, None) | (_, Some(Self::String)) => true,
      (Some(source), Some(input)) => source == input || (source, input) == (Self::Integer, Self::Float),
      (None, Some(_)) => false,
    }
  }

  /// Whether values of this type are parsed rather than passed through.
  pub fn is_coerced(&self) -> bool {
    !matches!(self, Self::String)
  }

  /// Coerce a textual value to a typed JSON value.
  ///
  /// `name` is only used for error messages.
  pub fn coerce(&self, name: &str, value: &str) -> Result<serde_json::Value, ComponentError> {
    let mismatch = || ComponentError::Coercion {
      name: name.to_string(),
      expected: self.as_str().to_string(),
      value: value.to_string(),
    };

    match self {
      Self::String => Ok(serde_json::Value::String(value.to_string())),

      Self::Integer => value
        .trim()
        .parse::<i64>()
        .map(|n| serde_json::Value::Number(n.into()))
        .map_err(|_| mismatch()),

      Self::Float => value
        .trim()
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(serde_json::Value::Number)
        .ok_or_else(mismatch),

      Self::Boolean => match value.trim().to_lowercase().as_str() {
        "true" => Ok(serde_json::Value::Bool(true)),
        "false" => Ok(serde_json::Value::Bool(false)),
        _ => Err(mismatch()),
      },
    }
  }
}

impl fmt::Display for ParameterType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Type of a declared output.
///
/// Output type names outside the coercion set (`"UI_metadata"`, `"Metrics"`,
/// ...) are kept verbatim and passed through to the platform untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OutputType {
  Parameter(ParameterType),
  Opaque(String),
}

impl OutputType {
  pub fn parse(type_name: &str) -> Self {
    match ParameterType::parse(type_name) {
      Some(parameter_type) => Self::Parameter(parameter_type),
      None => Self::Opaque(type_name.to_string()),
    }
  }

  pub fn parameter_type(&self) -> Option<ParameterType> {
    match self {
      Self::Parameter(parameter_type) => Some(*parameter_type),
      Self::Opaque(_) => None,
    }
  }

  /// Whether a value of this type can feed an input declared as `input`.
  ///
  /// Opaque values only flow into untyped or string inputs, since nothing
  /// is known about how to parse them.
  pub fn can_feed(&self, input: Option<ParameterType>) -> bool {
    ParameterType::feeds(self.parameter_type(), input)
  }

  pub fn name(&self) -> &str {
    match self {
      Self::Parameter(parameter_type) => parameter_type.as_str(),
      Self::Opaque(name) => name,
    }
  }
}

impl From<String> for OutputType {
  fn from(type_name: String) -> Self {
    Self::parse(&type_name)
  }
}

impl From<OutputType> for String {
  fn from(output_type: OutputType) -> Self {
    output_type.name().to_string()
  }
}

impl fmt::Display for OutputType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Render a typed value as the text form that crosses task boundaries.
pub fn render_value(value: &serde_json::Value) -> String {
  match value {
    serde_json::Value::String(s) => s.clone(),
    serde_json::Value::Null => String::new(),
    other => other.to_string(),
  }
}

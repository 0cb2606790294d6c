use crate::reference::{OutputReference, PipelineParam};

/// A value bound to one task input.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
  /// A literal, already in the text form it travels in.
  Constant(String),
  /// A top-level pipeline parameter, substituted at submission.
  Parameter(PipelineParam),
  /// The output of an earlier task.
  Output(OutputReference),
}

impl Argument {
  pub fn as_output(&self) -> Option<&OutputReference> {
    match self {
      Self::Output(reference) => Some(reference),
      _ => None,
    }
  }
}

impl From<&str> for Argument {
  fn from(value: &str) -> Self {
    Self::Constant(value.to_string())
  }
}

impl From<String> for Argument {
  fn from(value: String) -> Self {
    Self::Constant(value)
  }
}

impl From<i64> for Argument {
  fn from(value: i64) -> Self {
    Self::Constant(value.to_string())
  }
}

impl From<i32> for Argument {
  fn from(value: i32) -> Self {
    Self::Constant(value.to_string())
  }
}

impl From<f64> for Argument {
  fn from(value: f64) -> Self {
    Self::Constant(value.to_string())
  }
}

impl From<bool> for Argument {
  fn from(value: bool) -> Self {
    Self::Constant(value.to_string())
  }
}

impl From<PipelineParam> for Argument {
  fn from(param: PipelineParam) -> Self {
    Self::Parameter(param)
  }
}

impl From<&PipelineParam> for Argument {
  fn from(param: &PipelineParam) -> Self {
    Self::Parameter(param.clone())
  }
}

impl From<OutputReference> for Argument {
  fn from(reference: OutputReference) -> Self {
    Self::Output(reference)
  }
}

impl From<&OutputReference> for Argument {
  fn from(reference: &OutputReference) -> Self {
    Self::Output(reference.clone())
  }
}

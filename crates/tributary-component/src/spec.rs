use serde::{Deserialize, Serialize};

/// A typed function declaration, as written by the pipeline author.
///
/// Type names are kept as written; they are checked when the declaration is
/// wrapped into an [`Operation`](crate::Operation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(default)]
  pub parameters: Vec<ParameterSpec>,
  #[serde(default)]
  pub returns: ReturnShape,
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
  pub name: String,
  /// Declared type name; `None` means opaque text.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub type_name: Option<String>,
  /// Default value in text form.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub default: Option<String>,
}

/// One field of a multi-output return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub type_name: Option<String>,
}

/// What a function returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "spec", rename_all = "snake_case")]
pub enum ReturnShape {
  #[default]
  None,
  /// A single value, optionally typed.
  Single(Option<String>),
  /// A named sequence of fields.
  Named(Vec<FieldSpec>),
}

impl FunctionSpec {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      description: None,
      parameters: Vec::new(),
      returns: ReturnShape::None,
    }
  }

  pub fn description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  /// Add a typed parameter.
  pub fn param(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
    self.parameters.push(ParameterSpec {
      name: name.into(),
      type_name: Some(type_name.into()),
      default: None,
    });
    self
  }

  /// Add a parameter without a type annotation.
  pub fn untyped_param(mut self, name: impl Into<String>) -> Self {
    self.parameters.push(ParameterSpec {
      name: name.into(),
      type_name: None,
      default: None,
    });
    self
  }

  /// Add a typed parameter with a default value.
  pub fn param_with_default(
    mut self,
    name: impl Into<String>,
    type_name: impl Into<String>,
    default: impl Into<String>,
  ) -> Self {
    self.parameters.push(ParameterSpec {
      name: name.into(),
      type_name: Some(type_name.into()),
      default: Some(default.into()),
    });
    self
  }

  pub fn returns(mut self, type_name: impl Into<String>) -> Self {
    self.returns = ReturnShape::Single(Some(type_name.into()));
    self
  }

  pub fn returns_untyped(mut self) -> Self {
    self.returns = ReturnShape::Single(None);
    self
  }

  /// Declare named outputs, in order.
  pub fn returns_named<I, N, T>(mut self, fields: I) -> Self
  where
    I: IntoIterator<Item = (N, T)>,
    N: Into<String>,
    T: Into<String>,
  {
    self.returns = ReturnShape::Named(
      fields
        .into_iter()
        .map(|(name, type_name)| FieldSpec {
          name: name.into(),
          type_name: Some(type_name.into()),
        })
        .collect(),
    );
    self
  }

  pub fn get_parameter(&self, name: &str) -> Option<&ParameterSpec> {
    self.parameters.iter().find(|p| p.name == name)
  }
}

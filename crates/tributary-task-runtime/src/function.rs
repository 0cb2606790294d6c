use std::collections::BTreeMap;

use serde_json::Value;
use tributary_component::FunctionSpec;

use crate::error::TaskError;

/// A function that can run as a pipeline step.
pub trait ComponentFunction: Send + Sync {
  /// The declaration the function is wrapped from.
  fn spec(&self) -> &FunctionSpec;

  /// Run the function on coerced inputs.
  fn invoke(&self, inputs: &FunctionInputs) -> Result<FunctionOutputs, TaskError>;
}

/// Adapts a closure into a [`ComponentFunction`].
pub struct FnComponent<F> {
  spec: FunctionSpec,
  f: F,
}

impl<F> FnComponent<F>
where
  F: Fn(&FunctionInputs) -> Result<FunctionOutputs, TaskError> + Send + Sync,
{
  pub fn new(spec: FunctionSpec, f: F) -> Self {
    Self { spec, f }
  }
}

impl<F> ComponentFunction for FnComponent<F>
where
  F: Fn(&FunctionInputs) -> Result<FunctionOutputs, TaskError> + Send + Sync,
{
  fn spec(&self) -> &FunctionSpec {
    &self.spec
  }

  fn invoke(&self, inputs: &FunctionInputs) -> Result<FunctionOutputs, TaskError> {
    (self.f)(inputs)
  }
}

/// Coerced input values, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionInputs {
  values: BTreeMap<String, Value>,
}

impl FunctionInputs {
  pub fn new(values: BTreeMap<String, Value>) -> Self {
    Self { values }
  }

  pub fn get(&self, name: &str) -> Option<&Value> {
    self.values.get(name)
  }

  fn require(&self, name: &str) -> Result<&Value, TaskError> {
    self
      .values
      .get(name)
      .ok_or_else(|| TaskError::MissingInput(name.to_string()))
  }

  pub fn f64(&self, name: &str) -> Result<f64, TaskError> {
    self
      .require(name)?
      .as_f64()
      .ok_or_else(|| TaskError::failed(format!("input '{}' is not a number", name)))
  }

  pub fn i64(&self, name: &str) -> Result<i64, TaskError> {
    self
      .require(name)?
      .as_i64()
      .ok_or_else(|| TaskError::failed(format!("input '{}' is not an integer", name)))
  }

  pub fn bool(&self, name: &str) -> Result<bool, TaskError> {
    self
      .require(name)?
      .as_bool()
      .ok_or_else(|| TaskError::failed(format!("input '{}' is not a boolean", name)))
  }

  pub fn str(&self, name: &str) -> Result<&str, TaskError> {
    self
      .require(name)?
      .as_str()
      .ok_or_else(|| TaskError::failed(format!("input '{}' is not text", name)))
  }
}

/// Values produced by a function, in the order they were set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionOutputs {
  values: Vec<(String, Value)>,
}

impl FunctionOutputs {
  pub fn new() -> Self {
    Self::default()
  }

  /// Outputs of a single-return function.
  pub fn single(value: impl Into<Value>) -> Self {
    Self::new().with(tributary_component::SINGLE_OUTPUT_NAME, value)
  }

  pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
    self.values.push((name.into(), value.into()));
    self
  }

  pub fn get(&self, name: &str) -> Option<&Value> {
    self
      .values
      .iter()
      .find(|(n, _)| n == name)
      .map(|(_, v)| v)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
    self.values.iter().map(|(n, v)| (n.as_str(), v))
  }
}

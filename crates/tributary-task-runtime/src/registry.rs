use std::collections::BTreeMap;
use std::sync::Arc;

use tributary_component::Operation;

use crate::error::TaskError;
use crate::function::ComponentFunction;

/// Functions available to the launcher, by name.
#[derive(Default, Clone)]
pub struct FunctionRegistry {
  functions: BTreeMap<String, Arc<dyn ComponentFunction>>,
}

impl FunctionRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a function. Its spec must wrap cleanly.
  pub fn register(&mut self, function: impl ComponentFunction + 'static) -> Result<(), TaskError> {
    Operation::wrap(function.spec(), None)?;

    let name = function.spec().name.clone();
    if self.functions.contains_key(&name) {
      return Err(TaskError::DuplicateFunction(name));
    }
    self.functions.insert(name, Arc::new(function));
    Ok(())
  }

  pub fn get(&self, name: &str) -> Option<Arc<dyn ComponentFunction>> {
    self.functions.get(name).cloned()
  }

  /// Wrap a registered function into an operation running in `image`.
  pub fn operation(&self, name: &str, image: Option<&str>) -> Result<Operation, TaskError> {
    let function = self
      .functions
      .get(name)
      .ok_or_else(|| TaskError::UnknownFunction(name.to_string()))?;
    Ok(Operation::wrap(function.spec(), image)?)
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.functions.keys().map(String::as_str)
  }
}

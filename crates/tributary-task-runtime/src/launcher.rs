use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Args;
use tokio::fs;
use tracing::{error, info, instrument};
use tributary_component::{Operation, render_value};

use crate::error::TaskError;
use crate::function::FunctionInputs;
use crate::registry::FunctionRegistry;

/// Runs registered functions from launcher command lines.
pub struct Launcher {
  registry: FunctionRegistry,
}

/// What a launch produced: each output in declaration order, as text.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchOutcome {
  pub function: String,
  pub outputs: Vec<(String, String)>,
}

/// Launcher arguments following the function name.
///
/// Each `--input` and `--output` takes exactly two values; they are kept flat
/// as given and paired up by [`Launcher::run`].
#[derive(Debug, Clone, Default, PartialEq, Args)]
pub struct LaunchArgs {
  /// Value for a function input, as text
  #[arg(
    long = "input",
    num_args = 2,
    value_names = ["NAME", "VALUE"],
    allow_hyphen_values = true
  )]
  pub inputs: Vec<String>,

  /// File a function output is written to
  #[arg(long = "output", num_args = 2, value_names = ["NAME", "PATH"])]
  pub outputs: Vec<String>,
}

impl LaunchArgs {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn input(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.inputs.push(name.into());
    self.inputs.push(value.into());
    self
  }

  pub fn output(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
    self.outputs.push(name.into());
    self.outputs.push(path.into());
    self
  }

  fn input_values(&self) -> Result<BTreeMap<String, String>, TaskError> {
    pairs("--input", &self.inputs)
  }

  fn output_paths(&self) -> Result<BTreeMap<String, PathBuf>, TaskError> {
    Ok(
      pairs("--output", &self.outputs)?
        .into_iter()
        .map(|(name, path)| (name, PathBuf::from(path)))
        .collect(),
    )
  }
}

/// Pair up flat `NAME VALUE` values, rejecting repeated names.
fn pairs(flag: &str, values: &[String]) -> Result<BTreeMap<String, String>, TaskError> {
  let mut map = BTreeMap::new();

  for pair in values.chunks(2) {
    let [name, value] = pair else {
      return Err(TaskError::InvalidArguments(format!(
        "'{}' expects a name and a value",
        flag
      )));
    };
    if map.insert(name.clone(), value.clone()).is_some() {
      return Err(TaskError::InvalidArguments(format!(
        "'{} {}' given more than once",
        flag, name
      )));
    }
  }

  Ok(map)
}

impl Launcher {
  pub fn new(registry: FunctionRegistry) -> Self {
    Self { registry }
  }

  pub fn registry(&self) -> &FunctionRegistry {
    &self.registry
  }

  /// Run `function` with the launcher arguments that follow its name.
  #[instrument(name = "launch", skip_all, fields(function = %function))]
  pub async fn run(&self, function: &str, args: &LaunchArgs) -> Result<LaunchOutcome, TaskError> {
    info!("task started");

    let result = self.run_inner(function, args).await;

    match &result {
      Ok(outcome) => info!(outputs = outcome.outputs.len(), "task completed"),
      Err(e) => error!(error = %e, "task failed"),
    }

    result
  }

  async fn run_inner(&self, function: &str, args: &LaunchArgs) -> Result<LaunchOutcome, TaskError> {
    let component = self
      .registry
      .get(function)
      .ok_or_else(|| TaskError::UnknownFunction(function.to_string()))?;
    let operation = Operation::wrap(component.spec(), None)?;
    let inputs = args.input_values()?;
    let output_paths = args.output_paths()?;

    if let Some(name) = inputs
      .keys()
      .find(|name| operation.get_input(name).is_none())
    {
      return Err(TaskError::UnknownInput(name.clone()));
    }
    if let Some(name) = output_paths
      .keys()
      .find(|name| operation.get_output(name).is_none())
    {
      return Err(TaskError::UnknownOutput(name.clone()));
    }

    let mut values = BTreeMap::new();
    for input in &operation.inputs {
      let raw = inputs
        .get(&input.name)
        .or(input.default.as_ref())
        .ok_or_else(|| TaskError::MissingInput(input.name.clone()))?;
      values.insert(input.name.clone(), input.coerce(raw)?);
    }

    let produced = component.invoke(&FunctionInputs::new(values))?;

    if let Some((name, _)) = produced
      .iter()
      .find(|(name, _)| operation.get_output(name).is_none())
    {
      return Err(TaskError::UnexpectedOutput(name.to_string()));
    }

    let mut outputs = Vec::with_capacity(operation.outputs.len());
    for output in &operation.outputs {
      let value = produced
        .get(&output.name)
        .ok_or_else(|| TaskError::MissingOutput(output.name.clone()))?;
      let text = render_value(value);

      // Typed outputs must parse back on the consuming side.
      if let Some(param_type) = output.output_type.parameter_type() {
        param_type.coerce(&output.name, &text)?;
      }

      if let Some(path) = output_paths.get(&output.name) {
        if let Some(parent) = path.parent()
          && !parent.as_os_str().is_empty()
        {
          fs::create_dir_all(parent).await?;
        }
        fs::write(path, &text).await?;
      }

      outputs.push((output.name.clone(), text));
    }

    Ok(LaunchOutcome {
      function: function.to_string(),
      outputs,
    })
  }
}

use std::collections::BTreeMap;

use tracing::{error, info, instrument};
use tributary_compiler::Compiler;
use tributary_package::{ArgumentValue, PipelinePackage};
use tributary_pipeline::PipelineDefinition;

use crate::client::{RunClient, RunHandle, RunRequest};
use crate::error::SubmissionError;

/// Resolve run arguments against a package's declared parameters.
///
/// Every declared parameter ends up with a value, either given or taken from
/// its default. Values must coerce to the parameter's type and to the type of
/// every task input the parameter is bound to. Names the package does not
/// declare are rejected.
pub fn resolve_arguments(
  package: &PipelinePackage,
  arguments: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, String>, SubmissionError> {
  if let Some(name) = arguments
    .keys()
    .find(|name| package.get_parameter(name).is_none())
  {
    return Err(SubmissionError::UnknownParameter(name.clone()));
  }

  let mut resolved = BTreeMap::new();
  for param in &package.parameters {
    let value = arguments
      .get(&param.name)
      .or(param.default.as_ref())
      .ok_or_else(|| SubmissionError::MissingParameter(param.name.clone()))?;

    if let Some(param_type) = param.param_type {
      param_type
        .coerce(&param.name, value)
        .map_err(|e| SubmissionError::InvalidArgument {
          name: param.name.clone(),
          message: e.to_string(),
        })?;
    }

    for task in &package.tasks {
      for (input_name, argument) in &task.arguments {
        let ArgumentValue::Parameter { name } = argument else {
          continue;
        };
        if name != &param.name {
          continue;
        }
        if let Some(input) = task.component.get_input(input_name) {
          input
            .coerce(value)
            .map_err(|e| SubmissionError::InvalidArgument {
              name: param.name.clone(),
              message: format!("task '{}': {}", task.id, e),
            })?;
        }
      }
    }

    resolved.insert(param.name.clone(), value.clone());
  }

  Ok(resolved)
}

/// Validates packages and hands them to a [`RunClient`].
pub struct Submitter<C> {
  client: C,
  compiler: Compiler,
}

impl<C: RunClient> Submitter<C> {
  pub fn new(client: C) -> Self {
    Self {
      client,
      compiler: Compiler::new(),
    }
  }

  pub fn client(&self) -> &C {
    &self.client
  }

  /// Submit a compiled package as a new run.
  ///
  /// The package is re-validated and the arguments resolved before the
  /// client is called at all.
  #[instrument(
    name = "submit",
    skip_all,
    fields(pipeline = %package.name, experiment = %experiment, run = %run_name)
  )]
  pub async fn submit(
    &self,
    package: &PipelinePackage,
    experiment: &str,
    run_name: &str,
    arguments: &BTreeMap<String, String>,
  ) -> Result<RunHandle, SubmissionError> {
    self.compiler.validate(package)?;
    let arguments = resolve_arguments(package, arguments)?;

    let result = self
      .create(package, experiment, run_name, arguments)
      .await;

    match &result {
      Ok(handle) => info!(run_id = %handle.run_id, "run submitted"),
      Err(e) => error!(error = %e, "run submission failed"),
    }

    result
  }

  /// Compile a pipeline definition and submit it.
  pub async fn submit_pipeline(
    &self,
    pipeline: &dyn PipelineDefinition,
    experiment: &str,
    run_name: &str,
    arguments: &BTreeMap<String, String>,
  ) -> Result<RunHandle, SubmissionError> {
    let package = self.compiler.compile_pipeline(pipeline)?;
    self.submit(&package, experiment, run_name, arguments).await
  }

  async fn create(
    &self,
    package: &PipelinePackage,
    experiment: &str,
    run_name: &str,
    arguments: BTreeMap<String, String>,
  ) -> Result<RunHandle, SubmissionError> {
    let experiment = self.client.get_or_create_experiment(experiment).await?;

    self
      .client
      .create_run(RunRequest {
        run_name: run_name.to_string(),
        experiment,
        package: package.clone(),
        arguments,
      })
      .await
  }
}

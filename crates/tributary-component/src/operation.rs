use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ComponentError;
use crate::spec::{FunctionSpec, ReturnShape};
use crate::types::{OutputType, ParameterType};

/// Image used when a function is wrapped without an explicit image.
pub const DEFAULT_BASE_IMAGE: &str = "tributary/runtime:latest";

/// Command prefix of the in-image launcher. The function name follows it.
pub const LAUNCHER_COMMAND: &[&str] = &["tributary", "exec"];

/// Name given to the output of a function with a single return value.
pub const SINGLE_OUTPUT_NAME: &str = "Output";

/// A validated, invocable unit of work derived from a [`FunctionSpec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub inputs: Vec<InputSpec>,
  pub outputs: Vec<OutputSpec>,
  pub implementation: ContainerSpec,
}

/// A declared input of an operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSpec {
  pub name: String,
  /// `None` means opaque text.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub param_type: Option<ParameterType>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub default: Option<String>,
}

/// A declared output of an operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpec {
  pub name: String,
  pub output_type: OutputType,
}

/// How the operation runs inside its container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSpec {
  pub image: String,
  pub command: Vec<String>,
  pub args: Vec<ArgTemplate>,
}

/// One command-line argument, resolved by the orchestrator at run time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ArgTemplate {
  Literal(String),
  /// Replaced by the text value bound to the named input.
  InputValue(String),
  /// Replaced by a file path the named output must be written to.
  OutputPath(String),
}

impl InputSpec {
  /// Whether the task must be given a value for this input.
  pub fn is_required(&self) -> bool {
    self.default.is_none()
  }

  /// Coerce a textual value according to this input's type.
  pub fn coerce(&self, value: &str) -> Result<serde_json::Value, ComponentError> {
    self
      .param_type
      .unwrap_or(ParameterType::String)
      .coerce(&self.name, value)
  }
}

impl Operation {
  /// Wrap a function declaration into an operation running in `image`.
  ///
  /// Fails with [`ComponentError::Specification`] when the declaration is
  /// malformed, and with [`ComponentError::UnsupportedType`] when a parameter
  /// is typed outside the coercion set.
  pub fn wrap(spec: &FunctionSpec, image: Option<&str>) -> Result<Self, ComponentError> {
    let function = spec.name.as_str();
    if function.trim().is_empty() || function.chars().any(char::is_whitespace) {
      return Err(ComponentError::specification(
        function,
        "function name must be non-empty and contain no whitespace",
      ));
    }

    let inputs = wrap_parameters(spec)?;
    let outputs = wrap_returns(spec)?;

    let image = image.unwrap_or(DEFAULT_BASE_IMAGE).to_string();
    let implementation = ContainerSpec {
      image,
      command: LAUNCHER_COMMAND
        .iter()
        .map(|s| s.to_string())
        .chain(std::iter::once(function.to_string()))
        .collect(),
      args: launcher_args(&inputs, &outputs),
    };

    debug!(
      operation = %function,
      image = %implementation.image,
      inputs = inputs.len(),
      outputs = outputs.len(),
      "operation wrapped"
    );

    Ok(Self {
      name: function.to_string(),
      description: spec.description.clone(),
      inputs,
      outputs,
      implementation,
    })
  }

  /// Replace the launcher command, for images with their own entrypoint.
  pub fn with_command<I, S>(mut self, command: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.implementation.command = command.into_iter().map(Into::into).collect();
    self
  }

  pub fn image(&self) -> &str {
    &self.implementation.image
  }

  pub fn get_input(&self, name: &str) -> Option<&InputSpec> {
    self.inputs.iter().find(|i| i.name == name)
  }

  pub fn get_output(&self, name: &str) -> Option<&OutputSpec> {
    self.outputs.iter().find(|o| o.name == name)
  }

  /// The output reachable through the default accessor: the first declared.
  pub fn primary_output(&self) -> Option<&OutputSpec> {
    self.outputs.first()
  }
}

fn wrap_parameters(spec: &FunctionSpec) -> Result<Vec<InputSpec>, ComponentError> {
  let function = spec.name.as_str();
  let mut seen = HashSet::new();
  let mut inputs = Vec::with_capacity(spec.parameters.len());

  for param in &spec.parameters {
    if param.name.trim().is_empty() {
      return Err(ComponentError::specification(
        function,
        "parameter names must be non-empty",
      ));
    }
    if !seen.insert(param.name.as_str()) {
      return Err(ComponentError::specification(
        function,
        format!("duplicate parameter '{}'", param.name),
      ));
    }

    let param_type = match &param.type_name {
      None => None,
      Some(type_name) => Some(ParameterType::parse(type_name).ok_or_else(|| {
        ComponentError::UnsupportedType {
          function: function.to_string(),
          name: param.name.clone(),
          type_name: type_name.clone(),
        }
      })?),
    };

    let input = InputSpec {
      name: param.name.clone(),
      param_type,
      default: param.default.clone(),
    };

    if let Some(default) = &input.default {
      input.coerce(default).map_err(|e| {
        ComponentError::specification(function, format!("invalid default: {}", e))
      })?;
    }

    inputs.push(input);
  }

  Ok(inputs)
}

fn wrap_returns(spec: &FunctionSpec) -> Result<Vec<OutputSpec>, ComponentError> {
  let function = spec.name.as_str();

  match &spec.returns {
    ReturnShape::None => Ok(Vec::new()),

    ReturnShape::Single(type_name) => Ok(vec![OutputSpec {
      name: SINGLE_OUTPUT_NAME.to_string(),
      output_type: type_name
        .as_deref()
        .map(OutputType::parse)
        .unwrap_or(OutputType::Parameter(ParameterType::String)),
    }]),

    ReturnShape::Named(fields) => {
      if fields.is_empty() {
        return Err(ComponentError::specification(
          function,
          "named return declares no fields",
        ));
      }

      let mut seen = HashSet::new();
      let mut outputs = Vec::with_capacity(fields.len());
      for field in fields {
        if field.name.trim().is_empty() {
          return Err(ComponentError::specification(
            function,
            "named return fields must have a name",
          ));
        }
        if !seen.insert(field.name.as_str()) {
          return Err(ComponentError::specification(
            function,
            format!("duplicate return field '{}'", field.name),
          ));
        }
        let type_name = field
          .type_name
          .as_deref()
          .filter(|t| !t.trim().is_empty())
          .ok_or_else(|| {
            ComponentError::specification(
              function,
              format!("return field '{}' has no type", field.name),
            )
          })?;

        outputs.push(OutputSpec {
          name: field.name.clone(),
          output_type: OutputType::parse(type_name),
        });
      }

      Ok(outputs)
    }
  }
}

fn launcher_args(inputs: &[InputSpec], outputs: &[OutputSpec]) -> Vec<ArgTemplate> {
  let mut args = Vec::with_capacity((inputs.len() + outputs.len()) * 3);
  for input in inputs {
    args.push(ArgTemplate::Literal("--input".to_string()));
    args.push(ArgTemplate::Literal(input.name.clone()));
    args.push(ArgTemplate::InputValue(input.name.clone()));
  }
  for output in outputs {
    args.push(ArgTemplate::Literal("--output".to_string()));
    args.push(ArgTemplate::Literal(output.name.clone()));
    args.push(ArgTemplate::OutputPath(output.name.clone()));
  }
  args
}

use std::collections::{HashMap, HashSet};

use tracing::debug;
use tributary_component::{ComponentError, InputSpec, Operation, ParameterType};

use crate::argument::Argument;
use crate::error::PipelineError;
use crate::graph::{PipelineGraph, PipelineParameter, TaskNode};
use crate::reference::{GraphId, OutputReference, PipelineParam};
use crate::task::{Task, TaskOutputs};

/// Mutable construction context handed to a pipeline definition.
#[derive(Debug)]
pub struct GraphBuilder {
  id: GraphId,
  name: String,
  description: Option<String>,
  parameters: Vec<PipelineParameter>,
  tasks: Vec<TaskNode>,
  /// Uses per sanitized operation name, for unique task ids.
  name_counts: HashMap<String, usize>,
  issued_ids: HashSet<String>,
}

/// A named pipeline whose body populates a [`GraphBuilder`].
pub trait PipelineDefinition {
  fn name(&self) -> &str;

  fn description(&self) -> Option<&str> {
    None
  }

  /// Declare parameters and tasks.
  fn define(&self, builder: &mut GraphBuilder) -> Result<(), PipelineError>;

  /// Run the definition against a fresh builder.
  fn build(&self) -> Result<PipelineGraph, PipelineError> {
    let mut builder = GraphBuilder::new(self.name());
    if let Some(description) = self.description() {
      builder.set_description(description);
    }
    self.define(&mut builder)?;
    Ok(builder.finish())
  }
}

/// Build a graph from a closure.
pub fn build_pipeline<F>(name: &str, define: F) -> Result<PipelineGraph, PipelineError>
where
  F: FnOnce(&mut GraphBuilder) -> Result<(), PipelineError>,
{
  let mut builder = GraphBuilder::new(name);
  define(&mut builder)?;
  Ok(builder.finish())
}

impl GraphBuilder {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      id: GraphId::new(),
      name: name.into(),
      description: None,
      parameters: Vec::new(),
      tasks: Vec::new(),
      name_counts: HashMap::new(),
      issued_ids: HashSet::new(),
    }
  }

  pub fn id(&self) -> GraphId {
    self.id
  }

  pub fn set_description(&mut self, description: impl Into<String>) {
    self.description = Some(description.into());
  }

  /// Declare a top-level parameter.
  ///
  /// A typed parameter's default must coerce to its type.
  pub fn parameter(
    &mut self,
    name: &str,
    param_type: Option<ParameterType>,
    default: Option<&str>,
  ) -> Result<PipelineParam, PipelineError> {
    if self.parameters.iter().any(|p| p.name == name) {
      return Err(PipelineError::DuplicateParameter(name.to_string()));
    }

    if let (Some(param_type), Some(default)) = (param_type, default) {
      param_type.coerce(name, default)?;
    }

    self.parameters.push(PipelineParameter {
      name: name.to_string(),
      param_type,
      default: default.map(str::to_string),
    });

    Ok(PipelineParam::new(name, param_type))
  }

  /// Look up a declared parameter.
  pub fn param(&self, name: &str) -> Result<PipelineParam, PipelineError> {
    self
      .parameters
      .iter()
      .find(|p| p.name == name)
      .map(|p| PipelineParam::new(&p.name, p.param_type))
      .ok_or_else(|| PipelineError::UnknownParameter(name.to_string()))
  }

  /// Invoke `operation` with positional arguments, appending one task.
  ///
  /// Inputs past the end of `args` take their declared defaults.
  pub fn add_task(
    &mut self,
    operation: &Operation,
    args: Vec<Argument>,
  ) -> Result<Task, PipelineError> {
    if args.len() > operation.inputs.len() {
      return Err(PipelineError::TooManyArguments {
        operation: operation.name.clone(),
        expected: operation.inputs.len(),
        actual: args.len(),
      });
    }

    let mut args = args.into_iter();
    let mut arguments = Vec::with_capacity(operation.inputs.len());
    for input in &operation.inputs {
      let argument = match args.next() {
        Some(argument) => {
          self.check_argument(operation, input, &argument)?;
          argument
        }
        None => match &input.default {
          Some(default) => Argument::Constant(default.clone()),
          None => {
            return Err(PipelineError::MissingArgument {
              operation: operation.name.clone(),
              input: input.name.clone(),
            });
          }
        },
      };
      arguments.push((input.name.clone(), argument));
    }

    let task_id = self.next_task_id(&operation.name);
    let outputs = TaskOutputs::new(
      operation
        .outputs
        .iter()
        .map(|o| OutputReference::new(self.id, &task_id, &o.name, o.output_type.clone()))
        .collect(),
    );

    debug!(
      pipeline = %self.name,
      task_id = %task_id,
      operation = %operation.name,
      "task added"
    );

    self.tasks.push(TaskNode {
      id: task_id.clone(),
      operation: operation.clone(),
      arguments,
      after: Vec::new(),
    });

    Ok(Task::new(self.id, task_id, operation.name.clone(), outputs))
  }

  /// Make `task` wait for `upstream` without consuming any of its outputs.
  pub fn after(&mut self, task: &Task, upstream: &Task) -> Result<(), PipelineError> {
    let task_index = self.position(task)?;
    let upstream_index = self.position(upstream)?;

    if upstream_index >= task_index {
      return Err(PipelineError::InvalidDependency {
        task_id: task.id().to_string(),
        upstream: upstream.id().to_string(),
      });
    }

    let node = &mut self.tasks[task_index];
    if !node.after.iter().any(|id| id == upstream.id()) {
      node.after.push(upstream.id().to_string());
    }
    Ok(())
  }

  /// Finalize the graph. No tasks can be added afterwards.
  pub fn finish(self) -> PipelineGraph {
    PipelineGraph {
      id: self.id,
      name: self.name,
      description: self.description,
      parameters: self.parameters,
      tasks: self.tasks,
    }
  }

  fn check_argument(
    &self,
    operation: &Operation,
    input: &InputSpec,
    argument: &Argument,
  ) -> Result<(), PipelineError> {
    match argument {
      Argument::Constant(value) => {
        input.coerce(value)?;
      }
      Argument::Parameter(param) => {
        let declared = self
          .parameters
          .iter()
          .find(|p| p.name == param.name())
          .ok_or_else(|| PipelineError::UnknownParameter(param.name().to_string()))?;
        if !ParameterType::feeds(declared.param_type, input.param_type) {
          return Err(
            ComponentError::UnsupportedType {
              function: operation.name.clone(),
              name: input.name.clone(),
              type_name: declared
                .param_type
                .map_or("untyped", |t| t.as_str())
                .to_string(),
            }
            .into(),
          );
        }
        if let Some(default) = &declared.default {
          input.coerce(default)?;
        }
      }
      Argument::Output(reference) => {
        if !reference.output_type().can_feed(input.param_type) {
          return Err(
            ComponentError::UnsupportedType {
              function: operation.name.clone(),
              name: input.name.clone(),
              type_name: reference.output_type().to_string(),
            }
            .into(),
          );
        }
      }
    }
    Ok(())
  }

  fn position(&self, task: &Task) -> Result<usize, PipelineError> {
    if task.graph_id() != self.id {
      return Err(PipelineError::UnknownTask(task.id().to_string()));
    }
    self
      .tasks
      .iter()
      .position(|t| t.id == task.id())
      .ok_or_else(|| PipelineError::UnknownTask(task.id().to_string()))
  }

  fn next_task_id(&mut self, operation: &str) -> String {
    let base: String = operation
      .chars()
      .map(|c| {
        if c.is_ascii_alphanumeric() {
          c.to_ascii_lowercase()
        } else {
          '-'
        }
      })
      .collect();
    let count = self.name_counts.entry(base.clone()).or_insert(0);
    // Another operation's base name may already hold the suffixed id.
    let id = loop {
      *count += 1;
      let candidate = if *count == 1 {
        base.clone()
      } else {
        format!("{}-{}", base, count)
      };
      if !self.issued_ids.contains(&candidate) {
        break candidate;
      }
    };
    self.issued_ids.insert(id.clone());
    id
  }
}

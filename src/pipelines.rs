//! Demo pipelines built from the built-in functions.

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use tributary_component::{Operation, ParameterType};
use tributary_pipeline::{GraphBuilder, PipelineDefinition, PipelineError};

pub const PIPELINE_NAMES: &[&str] = &["add", "calc"];

/// Operations the demo pipelines are assembled from.
pub const PIPELINE_OPERATIONS: &[&str] = &["add", "my_divmod"];

/// Two independent additions.
pub struct AddPipeline {
  add: Operation,
}

impl PipelineDefinition for AddPipeline {
  fn name(&self) -> &str {
    "add"
  }

  fn description(&self) -> Option<&str> {
    Some("Adds two pairs of numbers independently.")
  }

  fn define(&self, b: &mut GraphBuilder) -> Result<(), PipelineError> {
    b.add_task(&self.add, vec![3.into(), 4.into()])?;
    b.add_task(&self.add, vec![7.into(), 0.into()])?;
    Ok(())
  }
}

/// add -> my_divmod -> add.
pub struct CalcPipeline {
  add: Operation,
  divmod: Operation,
}

impl PipelineDefinition for CalcPipeline {
  fn name(&self) -> &str {
    "calc"
  }

  fn description(&self) -> Option<&str> {
    Some("A toy pipeline that performs arithmetic calculations.")
  }

  fn define(&self, b: &mut GraphBuilder) -> Result<(), PipelineError> {
    let a = b.parameter("a", Some(ParameterType::Float), None)?;
    let divisor = b.parameter("b", Some(ParameterType::Float), Some("7"))?;
    let c = b.parameter("c", Some(ParameterType::Float), Some("17"))?;

    let add_task = b.add_task(&self.add, vec![a.into(), 4.into()])?;
    let divmod_task = b.add_task(
      &self.divmod,
      vec![add_task.output()?.into(), divisor.into()],
    )?;
    b.add_task(
      &self.add,
      vec![divmod_task.output_named("quotient")?.into(), c.into()],
    )?;
    Ok(())
  }
}

/// Look up a demo pipeline, assembling it from `operations`.
pub fn builtin_pipeline(
  name: &str,
  operations: &BTreeMap<String, Operation>,
) -> Result<Option<Box<dyn PipelineDefinition>>> {
  let pipeline: Box<dyn PipelineDefinition> = match name {
    "add" => Box::new(AddPipeline {
      add: lookup(operations, "add")?,
    }),
    "calc" => Box::new(CalcPipeline {
      add: lookup(operations, "add")?,
      divmod: lookup(operations, "my_divmod")?,
    }),
    _ => return Ok(None),
  };
  Ok(Some(pipeline))
}

fn lookup(operations: &BTreeMap<String, Operation>, name: &str) -> Result<Operation> {
  match operations.get(name) {
    Some(op) => Ok(op.clone()),
    None => bail!("operation '{}' is not available", name),
  }
}

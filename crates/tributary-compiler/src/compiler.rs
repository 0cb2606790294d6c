use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{error, info, instrument};
use tributary_package::{
  ArgumentValue, FORMAT_VERSION, Graph, PackagedTask, ParameterDecl, PipelinePackage,
};
use tributary_pipeline::{Argument, PipelineDefinition, PipelineGraph, TaskNode};

use crate::error::{CompileError, GraphValidationError};

/// Compiler turns a finished [`PipelineGraph`] into a [`PipelinePackage`].
///
/// Compilation serializes only; nothing is executed.
#[derive(Debug, Clone, Default)]
pub struct Compiler;

impl Compiler {
  pub fn new() -> Self {
    Self
  }

  /// Compile a graph.
  ///
  /// This process:
  /// 1. Resolves every output reference against the graph's own tasks
  /// 2. Flattens arguments into package values
  /// 3. Validates the resulting package (see [`Compiler::validate`])
  #[instrument(name = "compile", skip(self, graph), fields(pipeline = %graph.name()))]
  pub fn compile(&self, graph: &PipelineGraph) -> Result<PipelinePackage, GraphValidationError> {
    let result = self.compile_inner(graph);

    match &result {
      Ok(package) => info!(
        tasks = package.tasks.len(),
        edges = package.edges.len(),
        "pipeline compiled"
      ),
      Err(e) => error!(error = %e, "pipeline compilation failed"),
    }

    result
  }

  /// Build a pipeline definition against a fresh builder and compile it.
  pub fn compile_pipeline(
    &self,
    pipeline: &dyn PipelineDefinition,
  ) -> Result<PipelinePackage, CompileError> {
    let graph = pipeline.build()?;
    Ok(self.compile(&graph)?)
  }

  /// Validate a package, compiled here or loaded from elsewhere.
  pub fn validate(&self, package: &PipelinePackage) -> Result<(), GraphValidationError> {
    let mut parameter_names = HashSet::new();
    for param in &package.parameters {
      if !parameter_names.insert(param.name.as_str()) {
        return Err(GraphValidationError::DuplicateParameter(param.name.clone()));
      }
    }

    let mut tasks = HashMap::new();
    for task in &package.tasks {
      if tasks.insert(task.id.as_str(), task).is_some() {
        return Err(GraphValidationError::DuplicateTaskId(task.id.clone()));
      }
    }

    for task in &package.tasks {
      self.validate_task(task, &tasks, &parameter_names)?;
    }

    self.validate_edges(&tasks, &package.edges)?;

    let graph = package.graph();
    self.detect_cycle(&package.tasks, &graph)?;

    if graph.entry_points().is_empty() {
      return Err(GraphValidationError::NoEntryPoints);
    }

    Ok(())
  }

  fn compile_inner(&self, graph: &PipelineGraph) -> Result<PipelinePackage, GraphValidationError> {
    let tasks = graph
      .tasks()
      .iter()
      .map(|node| self.compile_task(graph, node))
      .collect::<Result<Vec<_>, _>>()?;

    let package = PipelinePackage {
      format_version: FORMAT_VERSION,
      name: graph.name().to_string(),
      description: graph.description().map(str::to_string),
      parameters: graph
        .parameters()
        .iter()
        .map(|p| ParameterDecl {
          name: p.name.clone(),
          param_type: p.param_type,
          default: p.default.clone(),
        })
        .collect(),
      tasks,
      edges: graph.edges(),
    };

    self.validate(&package)?;
    Ok(package)
  }

  fn compile_task(
    &self,
    graph: &PipelineGraph,
    node: &TaskNode,
  ) -> Result<PackagedTask, GraphValidationError> {
    let mut arguments = BTreeMap::new();

    for (input, argument) in &node.arguments {
      let value = match argument {
        Argument::Constant(value) => ArgumentValue::Constant {
          value: value.clone(),
        },
        Argument::Parameter(param) => ArgumentValue::Parameter {
          name: param.name().to_string(),
        },
        Argument::Output(reference) => {
          let producer = graph
            .get_task(reference.task_id())
            .filter(|_| reference.graph_id() == graph.id())
            .ok_or_else(|| GraphValidationError::DanglingReference {
              task_id: node.id.clone(),
              producer: reference.task_id().to_string(),
            })?;

          if producer.operation.get_output(reference.output()).is_none() {
            return Err(GraphValidationError::UndeclaredOutput {
              task_id: node.id.clone(),
              producer: producer.id.clone(),
              output: reference.output().to_string(),
            });
          }

          ArgumentValue::TaskOutput {
            task: producer.id.clone(),
            output: reference.output().to_string(),
          }
        }
      };
      arguments.insert(input.clone(), value);
    }

    Ok(PackagedTask {
      id: node.id.clone(),
      component: node.operation.clone(),
      arguments,
      dependencies: node.dependencies().into_iter().map(str::to_string).collect(),
    })
  }

  fn validate_task(
    &self,
    task: &PackagedTask,
    tasks: &HashMap<&str, &PackagedTask>,
    parameter_names: &HashSet<&str>,
  ) -> Result<(), GraphValidationError> {
    for input in &task.component.inputs {
      if !task.arguments.contains_key(&input.name) {
        return Err(GraphValidationError::MissingArgument {
          task_id: task.id.clone(),
          input: input.name.clone(),
        });
      }
    }

    for (input, value) in &task.arguments {
      if task.component.get_input(input).is_none() {
        return Err(GraphValidationError::UnknownInput {
          task_id: task.id.clone(),
          input: input.clone(),
        });
      }

      match value {
        ArgumentValue::Constant { .. } => {}
        ArgumentValue::Parameter { name } => {
          if !parameter_names.contains(name.as_str()) {
            return Err(GraphValidationError::UnknownParameter {
              task_id: task.id.clone(),
              name: name.clone(),
            });
          }
        }
        ArgumentValue::TaskOutput {
          task: producer,
          output,
        } => {
          let producer_task = tasks.get(producer.as_str()).ok_or_else(|| {
            GraphValidationError::DanglingReference {
              task_id: task.id.clone(),
              producer: producer.clone(),
            }
          })?;
          if producer_task.component.get_output(output).is_none() {
            return Err(GraphValidationError::UndeclaredOutput {
              task_id: task.id.clone(),
              producer: producer.clone(),
              output: output.clone(),
            });
          }
        }
      }
    }

    for upstream in &task.dependencies {
      if !tasks.contains_key(upstream.as_str()) {
        return Err(GraphValidationError::UnknownDependency {
          task_id: task.id.clone(),
          upstream: upstream.clone(),
        });
      }
    }

    Ok(())
  }

  /// Validate that all edges reference existing tasks.
  fn validate_edges(
    &self,
    tasks: &HashMap<&str, &PackagedTask>,
    edges: &[(String, String)],
  ) -> Result<(), GraphValidationError> {
    for (from, to) in edges {
      for (task_id, upstream) in [(to, from), (from, to)] {
        if !tasks.contains_key(upstream.as_str()) {
          return Err(GraphValidationError::UnknownDependency {
            task_id: task_id.clone(),
            upstream: upstream.clone(),
          });
        }
      }
    }
    Ok(())
  }

  /// Check for cycles using DFS.
  fn detect_cycle(&self, tasks: &[PackagedTask], graph: &Graph) -> Result<(), GraphValidationError> {
    // DFS with coloring: 0 = white (unvisited), 1 = gray (in progress), 2 = black (done)
    let mut color: HashMap<&str, u8> = tasks.iter().map(|t| (t.id.as_str(), 0u8)).collect();

    fn dfs<'a>(node: &'a str, graph: &'a Graph, color: &mut HashMap<&'a str, u8>) -> bool {
      color.insert(node, 1);

      for neighbor in graph.downstream(node) {
        match color.get(neighbor.as_str()) {
          Some(1) => return true,
          Some(0) => {
            if dfs(neighbor, graph, color) {
              return true;
            }
          }
          _ => {}
        }
      }

      color.insert(node, 2);
      false
    }

    for task in tasks {
      if color.get(task.id.as_str()) == Some(&0) && dfs(task.id.as_str(), graph, &mut color) {
        return Err(GraphValidationError::CycleDetected);
      }
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tributary_component::{FunctionSpec, Operation};
  use tributary_pipeline::build_pipeline;

  fn add_op() -> Operation {
    let spec = FunctionSpec::new("add")
      .param("a", "float")
      .param("b", "float")
      .returns("float");
    Operation::wrap(&spec, None).unwrap()
  }

  fn chain_package() -> PipelinePackage {
    let op = add_op();
    let graph = build_pipeline("chain", |b| {
      let first = b.add_task(&op, vec![1.into(), 2.into()])?;
      b.add_task(&op, vec![first.output()?.into(), 3.into()])?;
      Ok(())
    })
    .unwrap();
    Compiler::new().compile(&graph).unwrap()
  }

  #[test]
  fn test_validate_detects_cycle() {
    let mut package = chain_package();
    package.tasks[0].dependencies.push("add-2".to_string());

    assert!(matches!(
      Compiler::new().validate(&package),
      Err(GraphValidationError::CycleDetected)
    ));
  }

  #[test]
  fn test_validate_detects_unknown_edge() {
    let mut package = chain_package();
    package
      .edges
      .push(("add".to_string(), "nonexistent".to_string()));

    assert!(matches!(
      Compiler::new().validate(&package),
      Err(GraphValidationError::UnknownDependency { .. })
    ));
  }

  #[test]
  fn test_validate_detects_duplicate_task() {
    let mut package = chain_package();
    package.tasks[1].id = "add".to_string();

    assert!(matches!(
      Compiler::new().validate(&package),
      Err(GraphValidationError::DuplicateTaskId(_))
    ));
  }

  #[test]
  fn test_validate_detects_missing_argument() {
    let mut package = chain_package();
    package.tasks[0].arguments.remove("b");

    assert!(matches!(
      Compiler::new().validate(&package),
      Err(GraphValidationError::MissingArgument { .. })
    ));
  }

  #[test]
  fn test_validate_detects_unknown_input() {
    let mut package = chain_package();
    package.tasks[0].arguments.insert(
      "c".to_string(),
      ArgumentValue::Constant {
        value: "1".to_string(),
      },
    );

    assert!(matches!(
      Compiler::new().validate(&package),
      Err(GraphValidationError::UnknownInput { .. })
    ));
  }

  #[test]
  fn test_validate_rejects_empty_pipeline() {
    let graph = build_pipeline("empty", |_| Ok(())).unwrap();
    assert!(matches!(
      Compiler::new().compile(&graph),
      Err(GraphValidationError::NoEntryPoints)
    ));
  }
}

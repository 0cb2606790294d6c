//! Graph construction scenarios through the public API.

use tributary_component::{ComponentError, FunctionSpec, Operation, ParameterType};
use tributary_pipeline::{
  Argument, GraphBuilder, PipelineDefinition, PipelineError, PipelineGraph, build_pipeline,
};

fn add_op() -> Operation {
  let spec = FunctionSpec::new("add")
    .description("Calculates sum of two arguments")
    .param("a", "float")
    .param("b", "float")
    .returns("float");
  Operation::wrap(&spec, None).expect("add should wrap")
}

fn divmod_op() -> Operation {
  let spec = FunctionSpec::new("divmod")
    .param("dividend", "float")
    .param("divisor", "float")
    .returns_named([("quotient", "float"), ("remainder", "float")]);
  Operation::wrap(&spec, None).expect("divmod should wrap")
}

fn metrics_op() -> Operation {
  let spec = FunctionSpec::new("my_divmod")
    .param("dividend", "float")
    .param("divisor", "float")
    .returns_named([
      ("quotient", "float"),
      ("remainder", "float"),
      ("mlpipeline_ui_metadata", "UI_metadata"),
      ("mlpipeline_metrics", "Metrics"),
    ]);
  Operation::wrap(&spec, None).expect("my_divmod should wrap")
}

#[test]
fn test_independent_add_tasks() {
  let op = add_op();
  let mut builder = GraphBuilder::new("add-pipeline");

  let first = builder.add_task(&op, vec![3.into(), 4.into()]).unwrap();
  let second = builder.add_task(&op, vec![7.into(), 0.into()]).unwrap();

  assert_ne!(first.id(), second.id());
  assert_eq!(first.outputs().len(), 1);
  assert_eq!(second.outputs().len(), 1);
  assert_eq!(first.output().unwrap().task_id(), first.id());
  assert_eq!(second.output().unwrap().task_id(), second.id());

  let graph = builder.finish();
  assert_eq!(graph.tasks().len(), 2);
  assert!(graph.edges().is_empty());
}

#[test]
fn test_divmod_outputs_are_addressable_by_name() {
  let mut builder = GraphBuilder::new("divmod-pipeline");
  let task = builder
    .add_task(&divmod_op(), vec![100.into(), 7.into()])
    .unwrap();

  let quotient = task.output_named("quotient").unwrap();
  let remainder = task.output_named("remainder").unwrap();

  assert_ne!(quotient, remainder);
  assert_eq!(quotient.output(), "quotient");
  assert_eq!(remainder.output(), "remainder");
  assert_eq!(task.outputs().len(), 2);
  assert_eq!(task.output().unwrap(), quotient);

  assert!(matches!(
    task.output_named("Output"),
    Err(PipelineError::UnknownOutput { .. })
  ));
}

#[test]
fn test_chained_tasks_produce_one_edge() {
  let op = add_op();
  let graph = build_pipeline("chain", |b| {
    let a = b.add_task(&op, vec![1.into(), 2.into()])?;
    b.add_task(&op, vec![a.output()?.into(), 3.into()])?;
    Ok(())
  })
  .unwrap();

  assert_eq!(graph.edges(), vec![("add".to_string(), "add-2".to_string())]);
}

#[test]
fn test_repeated_reference_is_a_single_edge() {
  let op = add_op();
  let graph = build_pipeline("square", |b| {
    let a = b.add_task(&op, vec![1.into(), 2.into()])?;
    let out = a.output()?;
    b.add_task(&op, vec![(&out).into(), (&out).into()])?;
    Ok(())
  })
  .unwrap();

  assert_eq!(graph.edges().len(), 1);
}

#[test]
fn test_opaque_output_cannot_feed_float_input() {
  let mut builder = GraphBuilder::new("p");
  let task = builder
    .add_task(&metrics_op(), vec![100.into(), 7.into()])
    .unwrap();
  assert_eq!(task.outputs().len(), 4);

  let metrics = task.output_named("mlpipeline_metrics").unwrap();
  let result = builder.add_task(&add_op(), vec![metrics.into(), 1.into()]);

  assert!(matches!(
    result,
    Err(PipelineError::Component(ComponentError::UnsupportedType { .. }))
  ));
}

#[test]
fn test_task_without_outputs_has_no_default() {
  let spec = FunctionSpec::new("log").untyped_param("message");
  let op = Operation::wrap(&spec, None).unwrap();
  let mut builder = GraphBuilder::new("p");

  let task = builder.add_task(&op, vec!["hello".into()]).unwrap();
  assert!(task.outputs().is_empty());
  assert!(matches!(task.output(), Err(PipelineError::NoDefaultOutput(_))));
}

struct CalcPipeline {
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
    let divmod_task = b.add_task(&self.divmod, vec![add_task.output()?.into(), divisor.into()])?;
    b.add_task(
      &self.add,
      vec![divmod_task.output_named("quotient")?.into(), c.into()],
    )?;
    Ok(())
  }
}

#[test]
fn test_pipeline_definition_builds_graph() {
  let pipeline = CalcPipeline {
    add: add_op(),
    divmod: divmod_op(),
  };

  let graph: PipelineGraph = pipeline.build().unwrap();

  assert_eq!(graph.name(), "calc");
  assert!(graph.description().is_some());
  assert_eq!(graph.parameters().len(), 3);
  assert_eq!(graph.get_parameter("a").unwrap().default, None);
  assert_eq!(
    graph.edges(),
    vec![
      ("add".to_string(), "divmod".to_string()),
      ("divmod".to_string(), "add-2".to_string()),
    ]
  );

  let last = graph.get_task("add-2").unwrap();
  assert!(matches!(last.arguments[1].1, Argument::Parameter(ref p) if p.name() == "c"));
}

#[test]
fn test_each_build_is_independent() {
  let pipeline = CalcPipeline {
    add: add_op(),
    divmod: divmod_op(),
  };

  let first = pipeline.build().unwrap();
  let second = pipeline.build().unwrap();

  assert_ne!(first.id(), second.id());
  assert_eq!(first.tasks().len(), second.tasks().len());
}

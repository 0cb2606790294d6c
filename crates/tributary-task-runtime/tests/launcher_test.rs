//! Launcher runs against in-process functions, writing outputs to a temp dir.

use clap::Parser;
use tributary_component::{ComponentError, FunctionSpec};
use tributary_task_runtime::{
  FnComponent, FunctionOutputs, FunctionRegistry, LaunchArgs, Launcher, TaskError,
};

fn registry() -> FunctionRegistry {
  let mut registry = FunctionRegistry::new();

  let add = FunctionSpec::new("add")
    .param("a", "float")
    .param("b", "float")
    .returns("float");
  registry
    .register(FnComponent::new(add, |inputs| {
      Ok(FunctionOutputs::single(inputs.f64("a")? + inputs.f64("b")?))
    }))
    .expect("add should register");

  let divmod = FunctionSpec::new("divmod")
    .param("dividend", "float")
    .param("divisor", "float")
    .returns_named([("quotient", "float"), ("remainder", "float")]);
  registry
    .register(FnComponent::new(divmod, |inputs| {
      let dividend = inputs.f64("dividend")?;
      let divisor = inputs.f64("divisor")?;
      if divisor == 0.0 {
        return Err(TaskError::failed("division by zero"));
      }
      Ok(
        FunctionOutputs::new()
          .with("quotient", (dividend / divisor).floor())
          .with("remainder", dividend % divisor),
      )
    }))
    .expect("divmod should register");

  let greet = FunctionSpec::new("greet")
    .untyped_param("name")
    .param_with_default("excited", "bool", "false")
    .returns("str");
  registry
    .register(FnComponent::new(greet, |inputs| {
      let mark = if inputs.bool("excited")? { "!" } else { "." };
      Ok(FunctionOutputs::single(format!(
        "Hello {}{}",
        inputs.str("name")?,
        mark
      )))
    }))
    .expect("greet should register");

  let broken = FunctionSpec::new("broken").returns("int");
  registry
    .register(FnComponent::new(broken, |_| {
      Ok(FunctionOutputs::single("not a number"))
    }))
    .expect("broken should register");

  registry
}

#[derive(Parser)]
struct Exec {
  #[command(flatten)]
  args: LaunchArgs,
}

fn args(values: &[&str]) -> LaunchArgs {
  Exec::try_parse_from(std::iter::once("exec").chain(values.iter().copied()))
    .expect("launcher arguments should parse")
    .args
}

#[tokio::test]
async fn test_launch_writes_single_output() {
  let dir = tempfile::tempdir().unwrap();
  let out = dir.path().join("outputs").join("Output");
  let launcher = Launcher::new(registry());

  let outcome = launcher
    .run(
      "add",
      &args(&[
        "--input",
        "a",
        "3",
        "--input",
        "b",
        "4",
        "--output",
        "Output",
        out.to_str().unwrap(),
      ]),
    )
    .await
    .expect("add should run");

  assert_eq!(outcome.outputs, vec![("Output".to_string(), "7.0".to_string())]);
  assert_eq!(tokio::fs::read_to_string(&out).await.unwrap(), "7.0");
}

#[tokio::test]
async fn test_launch_writes_named_outputs() {
  let dir = tempfile::tempdir().unwrap();
  let quotient = dir.path().join("quotient");
  let remainder = dir.path().join("remainder");
  let launcher = Launcher::new(registry());

  launcher
    .run(
      "divmod",
      &args(&[
        "--input",
        "dividend",
        "100",
        "--input",
        "divisor",
        "7",
        "--output",
        "quotient",
        quotient.to_str().unwrap(),
        "--output",
        "remainder",
        remainder.to_str().unwrap(),
      ]),
    )
    .await
    .expect("divmod should run");

  assert_eq!(tokio::fs::read_to_string(&quotient).await.unwrap(), "14.0");
  assert_eq!(tokio::fs::read_to_string(&remainder).await.unwrap(), "2.0");
}

#[tokio::test]
async fn test_launch_applies_defaults_and_untyped_text() {
  let launcher = Launcher::new(registry());

  let outcome = launcher
    .run("greet", &args(&["--input", "name", "42"]))
    .await
    .unwrap();
  assert_eq!(outcome.outputs[0].1, "Hello 42.");

  let outcome = launcher
    .run(
      "greet",
      &args(&["--input", "name", "Ada", "--input", "excited", "TRUE"]),
    )
    .await
    .unwrap();
  assert_eq!(outcome.outputs[0].1, "Hello Ada!");
}

#[tokio::test]
async fn test_launch_rejects_uncoercible_input() {
  let launcher = Launcher::new(registry());
  let result = launcher
    .run("add", &args(&["--input", "a", "three", "--input", "b", "4"]))
    .await;

  assert!(matches!(
    result,
    Err(TaskError::Component(ComponentError::Coercion { .. }))
  ));
}

#[tokio::test]
async fn test_launch_missing_and_unknown_names() {
  let launcher = Launcher::new(registry());

  assert!(matches!(
    launcher.run("add", &args(&["--input", "a", "1"])).await,
    Err(TaskError::MissingInput(ref name)) if name == "b"
  ));
  assert!(matches!(
    launcher
      .run("add", &args(&["--input", "a", "1", "--input", "c", "2"]))
      .await,
    Err(TaskError::UnknownInput(_))
  ));
  assert!(matches!(
    launcher
      .run(
        "add",
        &args(&["--input", "a", "1", "--input", "b", "2", "--output", "sum", "/tmp/x"]),
      )
      .await,
    Err(TaskError::UnknownOutput(_))
  ));
  assert!(matches!(
    launcher.run("multiply", &LaunchArgs::new()).await,
    Err(TaskError::UnknownFunction(_))
  ));
}

#[tokio::test]
async fn test_launch_surfaces_function_failure() {
  let launcher = Launcher::new(registry());
  let result = launcher
    .run(
      "divmod",
      &args(&["--input", "dividend", "7", "--input", "divisor", "0"]),
    )
    .await;

  assert!(matches!(result, Err(TaskError::Failed { .. })));
}

#[tokio::test]
async fn test_launch_checks_output_types() {
  let launcher = Launcher::new(registry());
  let result = launcher.run("broken", &LaunchArgs::new()).await;

  assert!(matches!(
    result,
    Err(TaskError::Component(ComponentError::Coercion { .. }))
  ));
}

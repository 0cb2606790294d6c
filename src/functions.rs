//! Functions shipped in the default runtime image.

use serde_json::json;
use tributary_component::FunctionSpec;
use tributary_task_runtime::{FnComponent, FunctionOutputs, FunctionRegistry, TaskError};

/// Registry holding every built-in function.
pub fn builtin_registry() -> Result<FunctionRegistry, TaskError> {
  let mut registry = FunctionRegistry::new();

  let add = FunctionSpec::new("add")
    .description("Calculates sum of two arguments")
    .param("a", "float")
    .param("b", "float")
    .returns("float");
  registry.register(FnComponent::new(add, |inputs| {
    Ok(FunctionOutputs::single(inputs.f64("a")? + inputs.f64("b")?))
  }))?;

  let divmod_spec = FunctionSpec::new("my_divmod")
    .description("Divides two numbers and reports the result as metrics")
    .param("dividend", "float")
    .param("divisor", "float")
    .returns_named([
      ("quotient", "float"),
      ("remainder", "float"),
      ("mlpipeline_ui_metadata", "UI_metadata"),
      ("mlpipeline_metrics", "Metrics"),
    ]);
  registry.register(FnComponent::new(divmod_spec, |inputs| {
    let (quotient, remainder) = divmod(inputs.f64("dividend")?, inputs.f64("divisor")?)?;

    let metadata = json!({
      "outputs": [{
        "type": "web-app",
        "storage": "inline",
        "source": format!("<h1>{} remainder {}</h1>", quotient, remainder),
      }]
    });
    let metrics = json!({
      "metrics": [
        { "name": "quotient-metric", "numberValue": quotient, "format": "RAW" },
        { "name": "remainder-metric", "numberValue": remainder, "format": "RAW" },
      ]
    });

    Ok(
      FunctionOutputs::new()
        .with("quotient", quotient)
        .with("remainder", remainder)
        .with("mlpipeline_ui_metadata", metadata)
        .with("mlpipeline_metrics", metrics),
    )
  }))?;

  Ok(registry)
}

/// Floored division: the remainder takes the divisor's sign.
fn divmod(dividend: f64, divisor: f64) -> Result<(f64, f64), TaskError> {
  if divisor == 0.0 {
    return Err(TaskError::failed("division by zero"));
  }
  let quotient = (dividend / divisor).floor();
  Ok((quotient, dividend - quotient * divisor))
}

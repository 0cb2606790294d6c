//! HttpRunClient against a local stand-in for the orchestration service.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tributary_client::{
  ClientConfig, Experiment, HttpRunClient, RunClient, RunRequest, SubmissionError, Submitter,
};
use tributary_component::{FunctionSpec, Operation, ParameterType};
use tributary_package::{FORMAT_VERSION, PipelinePackage};
use tributary_pipeline::{GraphBuilder, PipelineDefinition, PipelineError};

#[derive(Clone, Default)]
struct ServiceState {
  experiments: Arc<Mutex<Vec<(String, String)>>>,
  runs: Arc<Mutex<Vec<Value>>>,
}

impl ServiceState {
  fn with_experiment(id: &str, name: &str) -> Self {
    let state = Self::default();
    state
      .experiments
      .lock()
      .unwrap()
      .push((id.to_string(), name.to_string()));
    state
  }

  fn experiment_names(&self) -> Vec<String> {
    let experiments = self.experiments.lock().unwrap();
    experiments.iter().map(|(_, name)| name.clone()).collect()
  }
}

async fn list_experiments(
  State(state): State<ServiceState>,
  Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
  let filter: Value = serde_json::from_str(&query["filter"]).unwrap();
  let name = filter["predicates"][0]["string_value"].as_str().unwrap();

  let experiments: Vec<Value> = state
    .experiments
    .lock()
    .unwrap()
    .iter()
    .filter(|(_, n)| n == name)
    .map(|(id, n)| json!({ "id": id, "name": n }))
    .collect();

  // The service omits the list entirely when nothing matches.
  if experiments.is_empty() {
    Json(json!({}))
  } else {
    Json(json!({ "experiments": experiments }))
  }
}

async fn create_experiment(
  State(state): State<ServiceState>,
  Json(body): Json<Value>,
) -> Json<Value> {
  let mut experiments = state.experiments.lock().unwrap();
  let id = format!("exp-{}", experiments.len() + 1);
  let name = body["name"].as_str().unwrap().to_string();
  experiments.push((id.clone(), name.clone()));
  Json(json!({ "id": id, "name": name }))
}

async fn create_run(State(state): State<ServiceState>, Json(body): Json<Value>) -> Response {
  if body["name"] == "over quota" {
    return (StatusCode::TOO_MANY_REQUESTS, "run quota exceeded").into_response();
  }

  let name = body["name"].clone();
  state.runs.lock().unwrap().push(body);
  Json(json!({ "run": { "id": "run-1", "name": name, "status": "Pending" } })).into_response()
}

async fn get_run(Path(id): Path<String>) -> Response {
  match id.as_str() {
    "missing" => (StatusCode::NOT_FOUND, "run missing not found").into_response(),
    "garbled" => "this is not json".into_response(),
    _ => Json(json!({
      "run": {
        "id": id,
        "name": "calc run",
        "status": "Succeeded",
        "created_at": "2026-01-01T00:00:00Z",
      }
    }))
    .into_response(),
  }
}

/// Serve the stand-in on an ephemeral port and return a client for it.
async fn serve(state: ServiceState) -> HttpRunClient {
  let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
  let addr = listener.local_addr().unwrap();

  let app = Router::new()
    .route(
      "/apis/v1beta1/experiments",
      get(list_experiments).post(create_experiment),
    )
    .route("/apis/v1beta1/runs", post(create_run))
    .route("/apis/v1beta1/runs/{id}", get(get_run))
    .with_state(state);

  tokio::spawn(async move {
    axum::serve(listener, app).await.unwrap();
  });

  HttpRunClient::new(&ClientConfig {
    host: format!("http://{}/", addr),
    ui_host: Some("https://ui.example.com".to_string()),
    default_experiment: "Default".to_string(),
  })
}

fn package() -> PipelinePackage {
  PipelinePackage {
    format_version: FORMAT_VERSION,
    name: "calc".to_string(),
    description: Some("arithmetic".to_string()),
    parameters: vec![],
    tasks: vec![],
    edges: vec![],
  }
}

fn request(run_name: &str) -> RunRequest {
  RunRequest {
    run_name: run_name.to_string(),
    experiment: Experiment {
      id: "exp-7".to_string(),
      name: "nightly".to_string(),
    },
    package: package(),
    arguments: BTreeMap::from([("a".to_string(), "7".to_string())]),
  }
}

#[tokio::test]
async fn test_existing_experiment_is_reused() {
  let state = ServiceState::with_experiment("exp-7", "nightly");
  let client = serve(state.clone()).await;

  let experiment = client.get_or_create_experiment("nightly").await.unwrap();

  assert_eq!(
    experiment,
    Experiment {
      id: "exp-7".to_string(),
      name: "nightly".to_string(),
    }
  );
  assert_eq!(state.experiment_names(), vec!["nightly"]);
}

#[tokio::test]
async fn test_missing_experiment_is_created() {
  let state = ServiceState::with_experiment("exp-7", "nightly");
  let client = serve(state.clone()).await;

  let experiment = client.get_or_create_experiment("adhoc").await.unwrap();

  assert_eq!(experiment.id, "exp-2");
  assert_eq!(experiment.name, "adhoc");
  assert_eq!(state.experiment_names(), vec!["nightly", "adhoc"]);
}

#[tokio::test]
async fn test_create_run() {
  let state = ServiceState::default();
  let client = serve(state.clone()).await;

  let handle = client.create_run(request("calc run")).await.unwrap();

  assert_eq!(handle.run_id, "run-1");
  assert_eq!(handle.name, "calc run");
  assert_eq!(handle.experiment_id, "exp-7");
  assert_eq!(
    handle.url.as_deref(),
    Some("https://ui.example.com/#/runs/details/run-1")
  );

  let runs = state.runs.lock().unwrap();
  assert_eq!(runs.len(), 1);
  assert_eq!(
    runs[0]["pipeline_spec"]["parameters"],
    json!([{ "name": "a", "value": "7" }])
  );
  assert_eq!(runs[0]["resource_references"][0]["key"]["id"], "exp-7");
}

#[tokio::test]
async fn test_error_status_maps_to_api_error() {
  let client = serve(ServiceState::default()).await;

  let err = client.create_run(request("over quota")).await.unwrap_err();
  match err {
    SubmissionError::Api { status, message } => {
      assert_eq!(status, 429);
      assert_eq!(message, "run quota exceeded");
    }
    other => panic!("expected api error, got {:?}", other),
  }

  let err = client.get_run("missing").await.unwrap_err();
  assert!(matches!(err, SubmissionError::Api { status: 404, .. }));
}

#[tokio::test]
async fn test_get_run() {
  let client = serve(ServiceState::default()).await;

  let detail = client.get_run("run-9").await.unwrap();

  assert_eq!(detail.run_id, "run-9");
  assert_eq!(detail.name, "calc run");
  assert_eq!(detail.status.as_deref(), Some("Succeeded"));
  assert_eq!(detail.created_at.as_deref(), Some("2026-01-01T00:00:00Z"));
}

#[tokio::test]
async fn test_unreadable_body_is_invalid_response() {
  let client = serve(ServiceState::default()).await;

  let err = client.get_run("garbled").await.unwrap_err();
  assert!(matches!(err, SubmissionError::InvalidResponse(_)));
}

struct AddPipeline;

impl PipelineDefinition for AddPipeline {
  fn name(&self) -> &str {
    "add"
  }

  fn define(&self, b: &mut GraphBuilder) -> Result<(), PipelineError> {
    let spec = FunctionSpec::new("add")
      .param("a", "float")
      .param("b", "float")
      .returns("float");
    let add = Operation::wrap(&spec, None)?;

    let a = b.parameter("a", Some(ParameterType::Float), None)?;
    b.add_task(&add, vec![a.into(), 4.into()])?;
    Ok(())
  }
}

#[tokio::test]
async fn test_submit_over_http() {
  let state = ServiceState::default();
  let submitter = Submitter::new(serve(state.clone()).await);
  let arguments = BTreeMap::from([("a".to_string(), "3".to_string())]);

  let handle = submitter
    .submit_pipeline(&AddPipeline, "Default", "first", &arguments)
    .await
    .unwrap();

  assert_eq!(handle.experiment_id, "exp-1");
  assert_eq!(state.experiment_names(), vec!["Default"]);

  let runs = state.runs.lock().unwrap();
  assert_eq!(runs[0]["name"], "first");
  assert_eq!(
    runs[0]["pipeline_spec"]["parameters"],
    json!([{ "name": "a", "value": "3" }])
  );
  let manifest = runs[0]["pipeline_spec"]["workflow_manifest"].as_str().unwrap();
  let package = PipelinePackage::from_json(manifest).unwrap();
  assert_eq!(package.tasks.len(), 1);
}

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::client::{Experiment, RunClient, RunDetail, RunHandle, RunRequest};
use crate::config::ClientConfig;
use crate::error::SubmissionError;

const API_PREFIX: &str = "apis/v1beta1";

/// [`RunClient`] over the orchestration service's REST API.
pub struct HttpRunClient {
  client: Client,
  host: String,
  ui_host: String,
}

#[derive(Debug, Deserialize)]
struct ApiExperiment {
  id: String,
  name: String,
}

#[derive(Debug, Default, Deserialize)]
struct ListExperimentsResponse {
  #[serde(default)]
  experiments: Vec<ApiExperiment>,
}

#[derive(Debug, Deserialize)]
struct ApiRun {
  id: String,
  name: String,
  #[serde(default)]
  status: Option<String>,
  #[serde(default)]
  created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RunResponse {
  run: ApiRun,
}

impl HttpRunClient {
  pub fn new(config: &ClientConfig) -> Self {
    let host = config.host.trim_end_matches('/').to_string();
    let ui_host = config
      .ui_host
      .as_deref()
      .map(|h| h.trim_end_matches('/').to_string())
      .unwrap_or_else(|| host.clone());

    Self {
      client: Client::new(),
      host,
      ui_host,
    }
  }

  fn url(&self, path: &str) -> String {
    format!("{}/{}/{}", self.host, API_PREFIX, path)
  }

  /// Link to a run in the UI.
  pub fn run_url(&self, run_id: &str) -> String {
    format!("{}/#/runs/details/{}", self.ui_host, run_id)
  }

  async fn find_experiment(&self, name: &str) -> Result<Option<Experiment>, SubmissionError> {
    let filter = json!({
      "predicates": [{ "key": "name", "op": "EQUALS", "string_value": name }]
    })
    .to_string();

    let response = self
      .client
      .get(self.url("experiments"))
      .query(&[("filter", filter.as_str()), ("page_size", "1")])
      .send()
      .await?;
    let list: ListExperimentsResponse = parse(check_status(response).await?).await?;

    Ok(
      list
        .experiments
        .into_iter()
        .find(|e| e.name == name)
        .map(|e| Experiment {
          id: e.id,
          name: e.name,
        }),
    )
  }
}

#[async_trait]
impl RunClient for HttpRunClient {
  async fn get_or_create_experiment(&self, name: &str) -> Result<Experiment, SubmissionError> {
    if let Some(experiment) = self.find_experiment(name).await? {
      return Ok(experiment);
    }

    debug!(experiment = %name, "creating experiment");
    let response = self
      .client
      .post(self.url("experiments"))
      .json(&json!({ "name": name }))
      .send()
      .await?;
    let created: ApiExperiment = parse(check_status(response).await?).await?;

    Ok(Experiment {
      id: created.id,
      name: created.name,
    })
  }

  async fn create_run(&self, request: RunRequest) -> Result<RunHandle, SubmissionError> {
    let body = run_body(&request)?;
    let response = self
      .client
      .post(self.url("runs"))
      .json(&body)
      .send()
      .await?;
    let created: RunResponse = parse(check_status(response).await?).await?;

    Ok(RunHandle {
      url: Some(self.run_url(&created.run.id)),
      run_id: created.run.id,
      name: created.run.name,
      experiment_id: request.experiment.id,
    })
  }

  async fn get_run(&self, run_id: &str) -> Result<RunDetail, SubmissionError> {
    let response = self
      .client
      .get(self.url(&format!("runs/{}", run_id)))
      .send()
      .await?;
    let detail: RunResponse = parse(check_status(response).await?).await?;

    Ok(RunDetail {
      run_id: detail.run.id,
      name: detail.run.name,
      status: detail.run.status,
      created_at: detail.run.created_at,
    })
  }
}

/// Request body for run creation.
fn run_body(request: &RunRequest) -> Result<serde_json::Value, SubmissionError> {
  let parameters: Vec<serde_json::Value> = request
    .arguments
    .iter()
    .map(|(name, value)| json!({ "name": name, "value": value }))
    .collect();

  Ok(json!({
    "name": request.run_name,
    "description": request.package.description,
    "pipeline_spec": {
      "workflow_manifest": serde_json::to_string(&request.package)?,
      "parameters": parameters,
    },
    "resource_references": [{
      "key": { "type": "EXPERIMENT", "id": request.experiment.id },
      "relationship": "OWNER",
    }],
  }))
}

async fn check_status(response: Response) -> Result<Response, SubmissionError> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }
  let message = match response.text().await {
    Ok(body) => body,
    Err(e) => format!("<failed to read response body: {}>", e),
  };
  Err(SubmissionError::Api {
    status: status.as_u16(),
    message,
  })
}

async fn parse<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, SubmissionError> {
  let body = response.text().await?;
  serde_json::from_str(&body).map_err(|e| SubmissionError::InvalidResponse(e.to_string()))
}

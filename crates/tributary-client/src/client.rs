use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tributary_package::PipelinePackage;

use crate::error::SubmissionError;

/// An experiment groups runs on the orchestration service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
  pub id: String,
  pub name: String,
}

/// Everything needed to create one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
  pub run_name: String,
  pub experiment: Experiment,
  pub package: PipelinePackage,
  /// Fully resolved parameter values, one per declared parameter.
  pub arguments: BTreeMap<String, String>,
}

/// Handle to a submitted run. The service owns the run from here on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunHandle {
  pub run_id: String,
  pub name: String,
  pub experiment_id: String,
  /// Link to the run in the service UI.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,
}

/// Current state of a run as reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunDetail {
  pub run_id: String,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at: Option<String>,
}

/// Client for the remote orchestration service.
#[async_trait]
pub trait RunClient: Send + Sync {
  /// Find an experiment by name, creating it if it does not exist.
  async fn get_or_create_experiment(&self, name: &str) -> Result<Experiment, SubmissionError>;

  /// Create and launch a run.
  async fn create_run(&self, request: RunRequest) -> Result<RunHandle, SubmissionError>;

  /// Fetch a run's current state.
  async fn get_run(&self, run_id: &str) -> Result<RunDetail, SubmissionError>;
}

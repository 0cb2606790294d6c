//! Tributary Client
//!
//! This crate hands compiled pipelines to the remote orchestration service.
//!
//! The [`RunClient`] trait is the seam to the service; [`HttpRunClient`]
//! implements it over the service's REST API. The [`Submitter`] sits in front
//! of any client: it validates the package and resolves run arguments against
//! the declared parameters before the first remote call, so argument mistakes
//! never reach the service.
//!
//! Failures coming back from the service are surfaced as they are. Nothing is
//! retried here.

mod client;
mod config;
mod error;
mod http;
mod submit;

pub use client::{Experiment, RunClient, RunDetail, RunHandle, RunRequest};
pub use config::ClientConfig;
pub use error::{ConfigError, SubmissionError};
pub use http::HttpRunClient;
pub use submit::{Submitter, resolve_arguments};

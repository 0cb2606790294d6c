//! Tributary Pipeline
//!
//! This crate builds pipeline graphs out of wrapped operations.
//!
//! A pipeline definition receives an explicit [`GraphBuilder`]. Each call to
//! [`GraphBuilder::add_task`] binds arguments to an operation's inputs and
//! appends one [`Task`]; arguments are constants, pipeline parameters, or
//! [`OutputReference`]s taken from earlier tasks. When the definition returns,
//! the builder is consumed into an immutable [`PipelineGraph`].
//!
//! ```ignore
//! let graph = build_pipeline("calc", |b| {
//!   let a = b.parameter("a", Some(ParameterType::Float), None)?;
//!   let first = b.add_task(&add_op, vec![a.into(), 4.into()])?;
//!   b.add_task(&add_op, vec![first.output()?.into(), 7.into()])?;
//!   Ok(())
//! })?;
//! ```

mod argument;
mod builder;
mod error;
mod graph;
mod reference;
mod task;

pub use argument::Argument;
pub use builder::{GraphBuilder, PipelineDefinition, build_pipeline};
pub use error::PipelineError;
pub use graph::{PipelineGraph, PipelineParameter, TaskNode};
pub use reference::{GraphId, OutputReference, PipelineParam};
pub use task::{Task, TaskOutputs};

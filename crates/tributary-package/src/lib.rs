//! Tributary Package
//!
//! This crate provides the compiled form of a pipeline. A package is the
//! validated, serializable output of the compiler and the unit handed to the
//! orchestration client.
//!
//! Key differences from `tributary-pipeline`'s graph:
//! - Output references are flattened to `(task id, output name)` pairs
//! - Every input of every task carries a bound argument value
//! - Edges are listed explicitly
//! - The whole package round-trips through JSON

mod error;
mod graph;
mod package;

pub use error::PackageError;
pub use graph::Graph;
pub use package::{ArgumentValue, FORMAT_VERSION, PackagedTask, ParameterDecl, PipelinePackage};

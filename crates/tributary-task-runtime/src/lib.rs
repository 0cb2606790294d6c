//! Tributary Task Runtime
//!
//! This crate runs inside a component's container. The orchestrator starts
//! the image with the command produced by
//! [`Operation::wrap`](tributary_component::Operation::wrap):
//!
//! ```text
//! tributary exec add --input a 3 --input b 4 --output Output /tmp/outputs/Output
//! ```
//!
//! The [`Launcher`] looks the function up in a [`FunctionRegistry`], coerces
//! each textual input by its declared type, invokes the function, and writes
//! every output as text to the path the orchestrator asked for.

mod error;
mod function;
mod launcher;
mod registry;

pub use error::TaskError;
pub use function::{ComponentFunction, FnComponent, FunctionInputs, FunctionOutputs};
pub use launcher::{LaunchArgs, LaunchOutcome, Launcher};
pub use registry::FunctionRegistry;

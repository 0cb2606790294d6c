//! Tributary Component
//!
//! This crate turns typed function declarations into container operations
//! that a pipeline can invoke as DAG nodes.
//!
//! A [`FunctionSpec`] describes what a function accepts and returns. Wrapping
//! it with [`Operation::wrap`] validates the declaration, maps every type name
//! onto a [`ParameterType`] (or an opaque output type), and produces the
//! container implementation that runs the function inside its image.
//!
//! Wrapping never performs I/O. The resulting [`Operation`] is a plain,
//! serializable descriptor.

mod error;
mod operation;
mod spec;
mod types;

pub use error::ComponentError;
pub use operation::{
  ArgTemplate, ContainerSpec, DEFAULT_BASE_IMAGE, InputSpec, LAUNCHER_COMMAND, Operation,
  OutputSpec, SINGLE_OUTPUT_NAME,
};
pub use spec::{FieldSpec, FunctionSpec, ParameterSpec, ReturnShape};
pub use types::{OutputType, ParameterType, render_value};

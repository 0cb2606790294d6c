mod compiler;
mod error;

pub use compiler::Compiler;
pub use error::{CompileError, GraphValidationError};

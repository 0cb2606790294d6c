//! Tributary Component Registry
//!
//! Stores wrapped operations so they can be saved once and loaded into other
//! pipelines without the original function at hand.

mod error;
mod fs_registry;
mod manifest;
mod registry;

pub use error::RegistryError;
pub use fs_registry::FsComponentRegistry;
pub use manifest::ComponentManifest;
pub use registry::{ComponentRegistry, StoredComponent};

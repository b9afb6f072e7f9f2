//! Infrastructure layer - HTTP and in-memory registry access, logging

pub mod logging;
pub mod registry;

pub use registry::{HttpModelRegistryClient, InMemoryModelRegistry};

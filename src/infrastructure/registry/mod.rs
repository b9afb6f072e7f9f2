//! Registry client implementations

mod http_client;
mod in_memory;

pub use http_client::HttpModelRegistryClient;
pub use in_memory::InMemoryModelRegistry;

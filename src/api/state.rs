//! Application state for the stub registry server

use std::sync::Arc;

use crate::infrastructure::InMemoryModelRegistry;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<InMemoryModelRegistry>,
}

impl AppState {
    pub fn new(registry: Arc<InMemoryModelRegistry>) -> Self {
        Self { registry }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryModelRegistry::new()))
    }
}

//! API layer - a stub of the registry REST backend for local development

pub mod health;
pub mod models;
pub mod router;
pub mod state;
pub mod types;

pub use router::create_router;
pub use state::AppState;

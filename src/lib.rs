//! Model Registry
//!
//! Front-end core for registering and browsing risk models held by a
//! model registry REST service:
//! - Registration form with required-field validation
//! - Inventory list with server-side search and sort
//! - Inline editing of a single record at a time
//! - An in-memory registry API for local development

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

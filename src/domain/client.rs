//! Remote collection client trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::error::RemoteError;
use super::model::{ModelFields, ModelId, ModelRecord};
use super::options::EnumeratedOptionSet;
use super::query::QueryState;

/// Access to the model registry collection.
///
/// Every call is a single request with no retry. Any failure, whatever its
/// cause, comes back as a [`RemoteError`].
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ModelRegistryClient: Send + Sync {
    /// Register a new model; the registry assigns id and timestamps
    async fn create(&self, fields: &ModelFields) -> Result<ModelRecord, RemoteError>;

    /// List models. An empty query returns the whole collection in the
    /// registry's default order; otherwise the registry filters and sorts.
    async fn list_all(&self, query: &QueryState) -> Result<Vec<ModelRecord>, RemoteError>;

    /// Get a model by ID
    async fn get_by_id(&self, id: ModelId) -> Result<ModelRecord, RemoteError>;

    /// Allowed values and labels for the classification fields
    async fn get_enumerated_options(&self) -> Result<EnumeratedOptionSet, RemoteError>;

    /// Replace every editable field of an existing model
    async fn update(&self, id: ModelId, fields: &ModelFields) -> Result<ModelRecord, RemoteError>;
}

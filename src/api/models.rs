//! Model registry endpoints under `/api/models`

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::{debug, info};
use validator::Validate;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{
    EnumeratedOptionSet, FormDraft, FormField, ModelFields, ModelId, ModelRecord,
    ModelRegistryClient, QueryState, SortDirection, SortField,
};

/// Body of create and update requests
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelRequest {
    #[validate(custom(function = "not_blank", message = "Model Name is required"))]
    pub model_name: String,
    #[validate(custom(function = "not_blank", message = "Model Version is required"))]
    pub model_version: String,
    #[validate(custom(function = "not_blank", message = "Model Sponsor is required"))]
    pub model_sponsor: String,
    #[validate(custom(function = "not_blank", message = "Business Line is required"))]
    pub business_line: String,
    #[validate(custom(function = "not_blank", message = "Model Type is required"))]
    pub model_type: String,
    #[validate(custom(function = "not_blank", message = "Risk Rating is required"))]
    pub risk_rating: String,
    #[validate(custom(function = "not_blank", message = "Status is required"))]
    pub status: String,
}

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("required"));
    }
    Ok(())
}

impl ModelRequest {
    /// Check required fields, then reject codes outside the option sets
    pub fn into_fields(self) -> Result<ModelFields, ApiError> {
        self.validate()?;

        let draft = FormDraft::new()
            .with(FormField::Name, self.model_name)
            .with(FormField::Version, self.model_version)
            .with(FormField::Sponsor, self.model_sponsor)
            .with(FormField::BusinessLine, self.business_line)
            .with(FormField::ModelType, self.model_type)
            .with(FormField::RiskRating, self.risk_rating)
            .with(FormField::Status, self.status);

        let fields = draft.validate()?;
        fields.ensure_known()?;
        Ok(fields)
    }
}

/// Query string of `GET /api/models`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub search: Option<String>,
    pub sort_by: Option<SortField>,
    pub sort_dir: Option<SortDirection>,
}

impl ListParams {
    pub fn to_query(&self) -> QueryState {
        let query = QueryState::new().with_search_term(self.search.clone().unwrap_or_default());

        match self.sort_by {
            Some(field) => query.with_sort(field, self.sort_dir.unwrap_or_default()),
            None => query,
        }
    }
}

fn parse_id(raw: u64) -> Result<ModelId, ApiError> {
    ModelId::new(raw).map_err(|e| ApiError::bad_request(e.to_string()))
}

/// POST /api/models
pub async fn create_model(
    State(state): State<AppState>,
    Json(request): Json<ModelRequest>,
) -> Result<(StatusCode, Json<ModelRecord>), ApiError> {
    debug!(name = %request.model_name, "Creating model");

    let fields = request.into_fields()?;
    let record = state.registry.create(&fields).await?;

    info!(id = %record.id(), name = %record.name(), "Created model");
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/models
pub async fn list_models(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ModelRecord>>, ApiError> {
    debug!(?params, "Listing models");

    let models = state.registry.list_all(&params.to_query()).await?;

    Ok(Json(models))
}

/// GET /api/models/{id}
pub async fn get_model(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ModelRecord>, ApiError> {
    debug!(id, "Getting model");

    let id = parse_id(id)?;
    let record = state
        .registry
        .find(id)?
        .ok_or_else(|| ApiError::not_found(format!("Model {} not found", id)))?;

    Ok(Json(record))
}

/// PUT /api/models/{id}
pub async fn update_model(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<ModelRequest>,
) -> Result<Json<ModelRecord>, ApiError> {
    debug!(id, "Updating model");

    let id = parse_id(id)?;
    let fields = request.into_fields()?;
    let record = state
        .registry
        .replace(id, fields)?
        .ok_or_else(|| ApiError::not_found(format!("Model {} not found", id)))?;

    info!(id = %record.id(), "Updated model");
    Ok(Json(record))
}

/// GET /api/models/enums
pub async fn list_enums(
    State(state): State<AppState>,
) -> Result<Json<EnumeratedOptionSet>, ApiError> {
    Ok(Json(state.registry.get_enumerated_options().await?))
}

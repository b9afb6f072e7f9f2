//! In-memory registry used by the stub backend and in tests

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::{
    DisplayLabels, EnumeratedOptionSet, ModelFields, ModelId, ModelRecord, ModelRegistryClient,
    OptionCategory, QueryState, RemoteError, SortDirection, SortField,
};

#[derive(Debug, Default)]
struct Inner {
    models: BTreeMap<ModelId, ModelRecord>,
    last_id: u64,
}

/// Model registry held in memory.
///
/// Ids are handed out sequentially from 1. Search and sort follow the
/// registry backend: case-insensitive substring over name, version, sponsor,
/// the classification labels and the id, ordered by id unless a sort is given.
#[derive(Debug)]
pub struct InMemoryModelRegistry {
    inner: Mutex<Inner>,
    options: EnumeratedOptionSet,
}

impl Default for InMemoryModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryModelRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            options: EnumeratedOptionSet::standard(),
        }
    }

    pub fn with_options(mut self, options: EnumeratedOptionSet) -> Self {
        self.options = options;
        self
    }

    /// Seed a model, assigning the next id
    pub fn with_model(self, fields: ModelFields) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            let _ = Self::insert(&mut inner, &self.options, fields);
        }
        self
    }

    pub fn with_models(self, models: Vec<ModelFields>) -> Self {
        models
            .into_iter()
            .fold(self, |registry, fields| registry.with_model(fields))
    }

    /// Look up a record, `None` when the id is unknown
    pub fn find(&self, id: ModelId) -> Result<Option<ModelRecord>, RemoteError> {
        Ok(self.lock()?.models.get(&id).cloned())
    }

    /// Replace a record's editable fields, `None` when the id is unknown
    pub fn replace(
        &self,
        id: ModelId,
        fields: ModelFields,
    ) -> Result<Option<ModelRecord>, RemoteError> {
        let mut inner = self.lock()?;
        let Some(record) = inner.models.get_mut(&id) else {
            return Ok(None);
        };

        let labels = labels_for(&self.options, &fields);
        record.replace_fields(fields);
        *record = record.clone().with_labels(labels);

        Ok(Some(record.clone()))
    }

    pub fn options(&self) -> &EnumeratedOptionSet {
        &self.options
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, RemoteError> {
        self.inner
            .lock()
            .map_err(|_| RemoteError::new("Registry storage is unavailable"))
    }

    fn insert(
        inner: &mut Inner,
        options: &EnumeratedOptionSet,
        fields: ModelFields,
    ) -> Result<ModelRecord, RemoteError> {
        let id = ModelId::new(inner.last_id + 1).map_err(|e| RemoteError::new(e.to_string()))?;
        inner.last_id = id.value();

        let labels = labels_for(options, &fields);
        let record = ModelRecord::new(id, fields).with_labels(labels);
        inner.models.insert(id, record.clone());
        Ok(record)
    }

    fn matches(&self, record: &ModelRecord, term: &str) -> bool {
        let labels = record.labels();
        let label_hit = |label: &Option<String>| {
            label
                .as_deref()
                .is_some_and(|l| l.to_lowercase().contains(term))
        };

        record.name().to_lowercase().contains(term)
            || record.version().to_lowercase().contains(term)
            || record.sponsor().to_lowercase().contains(term)
            || label_hit(&labels.business_line_display_name)
            || label_hit(&labels.model_type_display_name)
            || label_hit(&labels.risk_rating_display_name)
            || label_hit(&labels.status_display_name)
            || record.id().to_string().contains(term)
    }
}

fn labels_for(options: &EnumeratedOptionSet, fields: &ModelFields) -> DisplayLabels {
    let label = |category, code: &str, fallback: &str| {
        options
            .display_name(category, code)
            .unwrap_or(fallback)
            .to_string()
    };

    DisplayLabels {
        business_line_display_name: Some(label(
            OptionCategory::BusinessLines,
            fields.business_line.code(),
            fields.business_line.display_name(),
        )),
        model_type_display_name: Some(label(
            OptionCategory::ModelTypes,
            fields.model_type.code(),
            fields.model_type.display_name(),
        )),
        risk_rating_display_name: Some(label(
            OptionCategory::RiskRatings,
            fields.risk_rating.code(),
            fields.risk_rating.display_name(),
        )),
        status_display_name: Some(label(
            OptionCategory::Statuses,
            fields.status.code(),
            fields.status.display_name(),
        )),
    }
}

fn compare(a: &ModelRecord, b: &ModelRecord, field: SortField) -> Ordering {
    match field {
        SortField::Id => a.id().cmp(&b.id()),
        SortField::Name => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
        SortField::Version => a.version().cmp(b.version()),
        SortField::Sponsor => a.sponsor().to_lowercase().cmp(&b.sponsor().to_lowercase()),
        SortField::BusinessLine => a.business_line().code().cmp(b.business_line().code()),
        SortField::ModelType => a.model_type().code().cmp(b.model_type().code()),
        SortField::RiskRating => a.risk_rating().code().cmp(b.risk_rating().code()),
        SortField::Status => a.status().code().cmp(b.status().code()),
        SortField::CreatedAt => a.created_at().cmp(&b.created_at()),
        SortField::UpdatedAt => a.updated_at().cmp(&b.updated_at()),
    }
}

#[async_trait]
impl ModelRegistryClient for InMemoryModelRegistry {
    async fn create(&self, fields: &ModelFields) -> Result<ModelRecord, RemoteError> {
        let mut inner = self.lock()?;
        Self::insert(&mut inner, &self.options, fields.clone())
    }

    async fn list_all(&self, query: &QueryState) -> Result<Vec<ModelRecord>, RemoteError> {
        let inner = self.lock()?;
        let term = query.search_term().trim().to_lowercase();

        let mut models: Vec<ModelRecord> = inner
            .models
            .values()
            .filter(|record| term.is_empty() || self.matches(record, &term))
            .cloned()
            .collect();

        if let Some(sort) = query.sort() {
            models.sort_by(|a, b| {
                let ordering = compare(a, b, sort.field);
                match sort.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        Ok(models)
    }

    async fn get_by_id(&self, id: ModelId) -> Result<ModelRecord, RemoteError> {
        self.find(id)?
            .ok_or_else(|| RemoteError::new(format!("Model {} not found", id)))
    }

    async fn get_enumerated_options(&self) -> Result<EnumeratedOptionSet, RemoteError> {
        Ok(self.options.clone())
    }

    async fn update(&self, id: ModelId, fields: &ModelFields) -> Result<ModelRecord, RemoteError> {
        self.replace(id, fields.clone())?
            .ok_or_else(|| RemoteError::new(format!("Model {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::fixtures::{market_model_fields, pd_model_fields};
    use crate::domain::{RiskRating, Status};

    #[tokio::test]
    async fn test_create_then_list_contains_record() {
        let registry = InMemoryModelRegistry::new().with_model(market_model_fields());

        let created = registry.create(&pd_model_fields()).await.unwrap();
        let all = registry.list_all(&QueryState::new()).await.unwrap();

        assert_eq!(created.id().value(), 2);
        let listed = all.iter().find(|r| r.id() == created.id()).unwrap();
        assert_eq!(listed.fields(), &pd_model_fields());
    }

    #[tokio::test]
    async fn test_update_then_get_by_id() {
        let registry = InMemoryModelRegistry::new().with_model(pd_model_fields());
        let id = ModelId::new(1).unwrap();
        let before = registry.get_by_id(id).await.unwrap();

        let mut fields = pd_model_fields();
        fields.status = Status::Production;
        fields.risk_rating = RiskRating::Low;
        registry.update(id, &fields).await.unwrap();

        let after = registry.get_by_id(id).await.unwrap();
        assert_eq!(after.id(), id);
        assert_eq!(after.fields(), &fields);
        assert_eq!(after.created_at(), before.created_at());
        assert!(after.updated_at() > before.updated_at());
        assert_eq!(
            after.labels().status_display_name.as_deref(),
            Some("Production")
        );
    }

    #[tokio::test]
    async fn test_unknown_id_is_remote_error() {
        let registry = InMemoryModelRegistry::new();
        let id = ModelId::new(5).unwrap();

        let err = registry.get_by_id(id).await.unwrap_err();
        assert_eq!(err.message(), "Model 5 not found");
        let err = registry.update(id, &pd_model_fields()).await.unwrap_err();
        assert_eq!(err.message(), "Model 5 not found");
    }

    #[tokio::test]
    async fn test_search_matches_labels_case_insensitively() {
        let registry = InMemoryModelRegistry::new()
            .with_models(vec![pd_model_fields(), market_model_fields()]);

        let mut query = QueryState::new();
        query.set_search_term("RISK");
        let hits = registry.list_all(&query).await.unwrap();
        // "Risk Team" sponsor and "Market Risk" label
        assert_eq!(hits.len(), 2);

        query.set_search_term("investment");
        let hits = registry.list_all(&query).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name(), "VaR Engine");

        query.set_search_term("1");
        let hits = registry.list_all(&query).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id().value(), 1);
    }

    #[tokio::test]
    async fn test_sort_by_name_both_directions() {
        let registry = InMemoryModelRegistry::new()
            .with_models(vec![market_model_fields(), pd_model_fields()]);

        let mut query = QueryState::new();
        query.toggle_sort(SortField::Name);
        let names: Vec<_> = registry
            .list_all(&query)
            .await
            .unwrap()
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        assert_eq!(names, vec!["PD Model", "VaR Engine"]);

        query.toggle_sort(SortField::Name);
        let names: Vec<_> = registry
            .list_all(&query)
            .await
            .unwrap()
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        assert_eq!(names, vec!["VaR Engine", "PD Model"]);
    }

    #[tokio::test]
    async fn test_default_order_is_by_id() {
        let registry = InMemoryModelRegistry::new()
            .with_models(vec![market_model_fields(), pd_model_fields()]);

        let ids: Vec<_> = registry
            .list_all(&QueryState::new())
            .await
            .unwrap()
            .iter()
            .map(|r| r.id().value())
            .collect();

        assert_eq!(ids, vec![1, 2]);
    }
}

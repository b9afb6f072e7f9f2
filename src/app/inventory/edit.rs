//! Inline edit of a single model record

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::domain::{
    FormDraft, FormField, ModelFields, ModelId, ModelRecord, ModelRegistryClient, RemoteError,
    ValidationError,
};

pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update model. Please try again.";

#[derive(Debug, Error)]
pub enum EditError {
    #[error("No model is being edited")]
    NoSession,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to update model. Please try again.")]
    Remote(#[source] RemoteError),
}

/// Working copy of one record's editable fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    target: ModelId,
    draft: FormDraft,
    touched: BTreeSet<FormField>,
    errors: BTreeMap<FormField, String>,
    error_message: Option<String>,
}

impl EditSession {
    pub fn start(record: &ModelRecord) -> Self {
        Self {
            target: record.id(),
            draft: FormDraft::from_fields(record.fields()),
            touched: BTreeSet::new(),
            errors: BTreeMap::new(),
            error_message: None,
        }
    }

    pub fn target(&self) -> ModelId {
        self.target
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        self.draft.set(field, value);
        self.touched.insert(field);

        if self.draft.get(field).trim().is_empty() {
            self.errors.insert(field, field.required_message());
        } else {
            self.errors.remove(&field);
        }
    }

    pub fn is_touched(&self, field: FormField) -> bool {
        self.touched.contains(&field)
    }

    pub fn field_error(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Message from the last failed save, if any
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Check every field, marking all of them touched
    pub fn validate(&mut self) -> Result<ModelFields, ValidationError> {
        self.touched.extend(FormField::ALL);
        self.errors.clear();

        self.draft.validate().inspect_err(|err| {
            self.errors.extend(err.field_messages());
        })
    }

    pub(crate) fn record_failure(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    pub(crate) fn clear_failure(&mut self) {
        self.error_message = None;
    }
}

/// A validated update waiting to be sent
#[derive(Debug, Clone)]
pub struct SaveRequest {
    id: ModelId,
    fields: ModelFields,
}

impl SaveRequest {
    pub(crate) fn new(id: ModelId, fields: ModelFields) -> Self {
        Self { id, fields }
    }

    pub fn id(&self) -> ModelId {
        self.id
    }

    pub fn fields(&self) -> &ModelFields {
        &self.fields
    }

    pub async fn execute(self, client: &dyn ModelRegistryClient) -> SaveOutcome {
        let result = client.update(self.id, &self.fields).await;
        SaveOutcome {
            id: self.id,
            result,
        }
    }
}

/// Completion of a [`SaveRequest`]
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub id: ModelId,
    pub result: Result<ModelRecord, RemoteError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::fixtures::{pd_model_fields, record};

    #[test]
    fn test_start_copies_record_fields() {
        let session = EditSession::start(&record(3, pd_model_fields()));

        assert_eq!(session.target().value(), 3);
        assert_eq!(session.draft(), &FormDraft::from_fields(&pd_model_fields()));
        assert!(!session.is_touched(FormField::Name));
        assert!(session.error_message().is_none());
    }

    #[test]
    fn test_clearing_a_field_flags_it() {
        let mut session = EditSession::start(&record(3, pd_model_fields()));

        session.set(FormField::Sponsor, "");
        assert!(session.is_touched(FormField::Sponsor));
        assert_eq!(
            session.field_error(FormField::Sponsor),
            Some("Model Sponsor is required")
        );

        session.set(FormField::Sponsor, "Model Risk");
        assert_eq!(session.field_error(FormField::Sponsor), None);
    }

    #[test]
    fn test_validate_marks_everything_touched() {
        let mut session = EditSession::start(&record(3, pd_model_fields()));
        session.set(FormField::Version, " ");

        let err = session.validate().unwrap_err();

        assert!(matches!(err, ValidationError::MissingFields { .. }));
        assert!(FormField::ALL.iter().all(|f| session.is_touched(*f)));
        assert_eq!(
            session.field_error(FormField::Version),
            Some("Model Version is required")
        );
        assert_eq!(session.field_error(FormField::Name), None);
    }
}

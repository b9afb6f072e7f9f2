//! Registration form - builds and submits one new model record

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{error, info};

use super::options_cache::OptionsCache;
use super::route::Route;
use crate::domain::{
    FormDraft, FormField, ModelRecord, ModelRegistryClient, RemoteError, ValidationError,
};

pub const REGISTER_FAILED_MESSAGE: &str =
    "Failed to register model. Please check your input and try again.";
pub const OPTIONS_FAILED_MESSAGE: &str = "Failed to load form options. Please try again.";

pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to register model. Please check your input and try again.")]
    Remote(#[source] RemoteError),
}

/// Pending navigation after a successful registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub to: Route,
    pub after: Duration,
}

impl Redirect {
    /// Sleep out the delay and hand back the destination
    pub async fn wait(self) -> Route {
        tokio::time::sleep(self.after).await;
        self.to
    }
}

#[derive(Debug, Clone)]
pub struct Registered {
    pub record: ModelRecord,
    pub message: String,
    pub redirect: Redirect,
}

pub struct RegistrationForm {
    client: Arc<dyn ModelRegistryClient>,
    draft: FormDraft,
    touched: BTreeSet<FormField>,
    errors: BTreeMap<FormField, String>,
    options: OptionsCache,
    submitting: bool,
    success_message: Option<String>,
    error_message: Option<String>,
    redirect_delay: Duration,
}

impl RegistrationForm {
    pub fn new(client: Arc<dyn ModelRegistryClient>) -> Self {
        Self {
            client,
            draft: FormDraft::new(),
            touched: BTreeSet::new(),
            errors: BTreeMap::new(),
            options: OptionsCache::new(),
            submitting: false,
            success_message: None,
            error_message: None,
            redirect_delay: DEFAULT_REDIRECT_DELAY,
        }
    }

    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    /// Load the select options. The form stays usable when this fails.
    pub async fn activate(&mut self) -> bool {
        let result = self.client.get_enumerated_options().await;
        let loaded = self.options.absorb(result);

        if !loaded {
            self.error_message = Some(OPTIONS_FAILED_MESSAGE.to_string());
        }
        loaded
    }

    pub fn options(&self) -> &OptionsCache {
        &self.options
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

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Validate and create the record.
    ///
    /// On success the inputs are cleared and a redirect to the inventory is
    /// returned. On failure the inputs are left as typed.
    pub async fn submit(&mut self) -> Result<Registered, RegistrationError> {
        self.success_message = None;
        self.error_message = None;
        self.touched.extend(FormField::ALL);
        self.errors.clear();

        let fields = self.draft.validate().inspect_err(|err| {
            self.errors.extend(err.field_messages());
        })?;

        self.submitting = true;
        let result = self.client.create(&fields).await;
        self.submitting = false;

        match result {
            Ok(record) => {
                info!(id = %record.id(), name = %record.name(), "Registered model");
                let message = format!(
                    "Model '{} {}' successfully registered with ID: {}",
                    record.name(),
                    record.version(),
                    record.id()
                );

                self.draft.clear();
                self.touched.clear();
                self.success_message = Some(message.clone());

                Ok(Registered {
                    record,
                    message,
                    redirect: Redirect {
                        to: Route::Inventory,
                        after: self.redirect_delay,
                    },
                })
            }
            Err(e) => {
                error!(error = %e, "Error registering model");
                self.error_message = Some(REGISTER_FAILED_MESSAGE.to_string());
                Err(RegistrationError::Remote(e))
            }
        }
    }
}

//! List controller - the inventory's records, query state and edit session

use std::sync::Arc;

use tracing::{debug, error, info};

use super::edit::{EditError, EditSession, SaveOutcome, SaveRequest, UPDATE_FAILED_MESSAGE};
use crate::app::options_cache::OptionsCache;
use crate::domain::{
    EnumeratedOptionSet, ModelId, ModelRecord, ModelRegistryClient, QueryState, RemoteError,
    SortField,
};

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load models. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    Loading,
    Ready,
    Error(String),
}

/// A list query stamped with its issue order
#[derive(Debug, Clone)]
pub struct QueryRequest {
    seq: u64,
    query: QueryState,
}

impl QueryRequest {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub async fn execute(self, client: &dyn ModelRegistryClient) -> QueryOutcome {
        let result = client.list_all(&self.query).await;
        QueryOutcome {
            seq: self.seq,
            result,
        }
    }
}

/// Completion of a [`QueryRequest`]
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub seq: u64,
    pub result: Result<Vec<ModelRecord>, RemoteError>,
}

/// Owns the inventory list.
///
/// Every change to the query goes back to the registry. Requests are
/// numbered as they are issued and only the completion of the newest one is
/// applied, so a slow, superseded response can never overwrite a newer list.
pub struct ListController {
    client: Arc<dyn ModelRegistryClient>,
    state: ListState,
    models: Vec<ModelRecord>,
    query: QueryState,
    options: OptionsCache,
    edit: Option<EditSession>,
    issued: u64,
}

impl ListController {
    pub fn new(client: Arc<dyn ModelRegistryClient>) -> Self {
        Self {
            client,
            state: ListState::Loading,
            models: Vec::new(),
            query: QueryState::new(),
            options: OptionsCache::new(),
            edit: None,
            issued: 0,
        }
    }

    pub fn client(&self) -> Arc<dyn ModelRegistryClient> {
        Arc::clone(&self.client)
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == ListState::Loading
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            ListState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn models(&self) -> &[ModelRecord] {
        &self.models
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn options(&self) -> &OptionsCache {
        &self.options
    }

    /// Fetch records and options concurrently, then apply both.
    ///
    /// The options result never affects the list state.
    pub async fn activate(&mut self) -> bool {
        let request = self.issue();
        let client = self.client();

        let (outcome, options) = tokio::join!(
            request.execute(client.as_ref()),
            client.get_enumerated_options()
        );

        self.apply_options(options);
        self.apply(outcome)
    }

    pub fn change_search_term(&mut self, term: impl Into<String>) -> QueryRequest {
        self.query.set_search_term(term);
        self.issue()
    }

    pub fn change_sort(&mut self, field: SortField) -> QueryRequest {
        self.query.toggle_sort(field);
        self.issue()
    }

    pub fn refresh(&mut self) -> QueryRequest {
        self.issue()
    }

    /// Execute a request against this controller's client and apply it
    pub async fn run(&mut self, request: QueryRequest) -> bool {
        let client = self.client();
        let outcome = request.execute(client.as_ref()).await;
        self.apply(outcome)
    }

    /// Start a new query: enter `Loading` and stamp the current query state
    pub fn issue(&mut self) -> QueryRequest {
        self.issued += 1;
        self.state = ListState::Loading;

        QueryRequest {
            seq: self.issued,
            query: self.query.clone(),
        }
    }

    /// Apply a completed query. Returns false when it was superseded.
    pub fn apply(&mut self, outcome: QueryOutcome) -> bool {
        if outcome.seq != self.issued {
            debug!(
                seq = outcome.seq,
                latest = self.issued,
                "Discarding stale model list response"
            );
            return false;
        }

        match outcome.result {
            Ok(models) => {
                info!(count = models.len(), "Loaded models");
                self.models = models;
                self.state = ListState::Ready;
            }
            Err(e) => {
                error!(error = %e, "Error loading models");
                self.models.clear();
                self.state = ListState::Error(LOAD_FAILED_MESSAGE.to_string());
            }
        }

        true
    }

    pub fn apply_options(&mut self, result: Result<EnumeratedOptionSet, RemoteError>) {
        self.options.absorb(result);
    }

    pub fn find(&self, id: ModelId) -> Option<&ModelRecord> {
        self.models.iter().find(|record| record.id() == id)
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    pub fn edit_session_mut(&mut self) -> Option<&mut EditSession> {
        self.edit.as_mut()
    }

    /// Open an edit on `record`, replacing any session already open.
    ///
    /// Unsaved edits of the previous session are dropped without asking.
    pub fn start_edit(&mut self, record: &ModelRecord) -> &mut EditSession {
        if let Some(previous) = &self.edit {
            debug!(
                previous = %previous.target(),
                next = %record.id(),
                "Discarding open edit session"
            );
        }

        self.edit.insert(EditSession::start(record))
    }

    /// Open an edit on a record currently in the list
    pub fn start_edit_by_id(&mut self, id: ModelId) -> Option<&mut EditSession> {
        let record = self.find(id)?.clone();
        Some(self.start_edit(&record))
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Validate the open session and build the update to send.
    ///
    /// Nothing reaches the registry when validation fails. A message left by
    /// an earlier failed save is cleared either way.
    pub fn begin_save(&mut self) -> Result<SaveRequest, EditError> {
        let session = self.edit.as_mut().ok_or(EditError::NoSession)?;
        session.clear_failure();
        let fields = session.validate()?;

        Ok(SaveRequest::new(session.target(), fields))
    }

    /// Apply a finished save.
    ///
    /// Success closes the session and returns the refresh to run. Failure
    /// keeps the session and its edits for another attempt.
    pub fn apply_save(
        &mut self,
        outcome: SaveOutcome,
    ) -> Result<(ModelRecord, QueryRequest), EditError> {
        match outcome.result {
            Ok(record) => {
                info!(id = %record.id(), name = %record.name(), "Updated model");
                if self.edit.as_ref().map(EditSession::target) == Some(outcome.id) {
                    self.edit = None;
                }
                Ok((record, self.refresh()))
            }
            Err(e) => {
                error!(id = %outcome.id, error = %e, "Error updating model");
                if let Some(session) = self
                    .edit
                    .as_mut()
                    .filter(|session| session.target() == outcome.id)
                {
                    session.record_failure(UPDATE_FAILED_MESSAGE);
                }
                Err(EditError::Remote(e))
            }
        }
    }

    /// Validate, send the update, and on success refresh the list
    pub async fn save_edit(&mut self) -> Result<ModelRecord, EditError> {
        let request = self.begin_save()?;
        let client = self.client();
        let outcome = request.execute(client.as_ref()).await;

        let (record, refresh) = self.apply_save(outcome)?;
        self.run(refresh).await;

        Ok(record)
    }
}

//! Inventory view event loop
//!
//! Remote calls run as spawned tasks and report back over a channel, so user
//! input keeps flowing while requests are in flight.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use super::controller::{ListController, QueryOutcome, QueryRequest};
use super::edit::{EditError, SaveOutcome};
use crate::domain::{EnumeratedOptionSet, ModelRecord, ModelRegistryClient, RemoteError, SortField};

/// A finished remote call
#[derive(Debug)]
pub enum Completion {
    Query(QueryOutcome),
    Options(Result<EnumeratedOptionSet, RemoteError>),
    Save(SaveOutcome),
}

/// What handling a completion changed
#[derive(Debug)]
pub enum ViewUpdate {
    List { applied: bool },
    Options { loaded: bool },
    Saved(Result<ModelRecord, EditError>),
}

pub struct InventoryView {
    controller: ListController,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    pending: usize,
}

impl InventoryView {
    pub fn new(client: Arc<dyn ModelRegistryClient>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            controller: ListController::new(client),
            tx,
            rx,
            pending: 0,
        }
    }

    pub fn controller(&self) -> &ListController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ListController {
        &mut self.controller
    }

    /// Number of remote calls not yet handled
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn is_idle(&self) -> bool {
        self.pending == 0
    }

    /// Fire the initial records and options fetches
    pub fn activate(&mut self) {
        let request = self.controller.refresh();
        self.spawn_query(request);

        let client = self.controller.client();
        self.spawn(async move { Completion::Options(client.get_enumerated_options().await) });
    }

    pub fn search(&mut self, term: impl Into<String>) {
        let request = self.controller.change_search_term(term);
        self.spawn_query(request);
    }

    pub fn sort(&mut self, field: SortField) {
        let request = self.controller.change_sort(field);
        self.spawn_query(request);
    }

    pub fn refresh(&mut self) {
        let request = self.controller.refresh();
        self.spawn_query(request);
    }

    /// Validate the open edit and send it. Validation failures return
    /// immediately without a remote call.
    pub fn save(&mut self) -> Result<(), EditError> {
        let request = self.controller.begin_save()?;
        let client = self.controller.client();

        self.spawn(async move { Completion::Save(request.execute(client.as_ref()).await) });
        Ok(())
    }

    /// Wait for the next remote call to finish
    pub async fn next_completion(&mut self) -> Option<Completion> {
        if self.pending == 0 {
            return None;
        }

        let completion = self.rx.recv().await;
        if completion.is_some() {
            self.pending -= 1;
        }
        completion
    }

    pub fn handle(&mut self, completion: Completion) -> ViewUpdate {
        match completion {
            Completion::Query(outcome) => ViewUpdate::List {
                applied: self.controller.apply(outcome),
            },
            Completion::Options(result) => {
                self.controller.apply_options(result);
                ViewUpdate::Options {
                    loaded: self.controller.options().is_loaded(),
                }
            }
            Completion::Save(outcome) => match self.controller.apply_save(outcome) {
                Ok((record, refresh)) => {
                    self.spawn_query(refresh);
                    ViewUpdate::Saved(Ok(record))
                }
                Err(e) => ViewUpdate::Saved(Err(e)),
            },
        }
    }

    /// Handle completions until nothing is in flight
    pub async fn settle(&mut self) -> Vec<ViewUpdate> {
        let mut updates = Vec::new();
        while let Some(completion) = self.next_completion().await {
            updates.push(self.handle(completion));
        }
        updates
    }

    fn spawn_query(&mut self, request: QueryRequest) {
        debug!(seq = request.seq(), "Issuing model list request");
        let client = self.controller.client();
        self.spawn(async move { Completion::Query(request.execute(client.as_ref()).await) });
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        self.pending += 1;
        let tx = self.tx.clone();

        tokio::spawn(async move {
            // The receiver lives as long as the view
            let _ = tx.send(task.await);
        });
    }
}

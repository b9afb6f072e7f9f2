//! Model inventory - searchable, sortable list with inline editing

mod controller;
mod edit;
mod view;

pub use controller::{ListController, ListState, QueryOutcome, QueryRequest, LOAD_FAILED_MESSAGE};
pub use edit::{EditError, EditSession, SaveOutcome, SaveRequest, UPDATE_FAILED_MESSAGE};
pub use view::{Completion, InventoryView, ViewUpdate};

//! Domain layer - model records, query state and the registry client contract

pub mod client;
pub mod error;
pub mod model;
pub mod options;
pub mod query;

pub use client::ModelRegistryClient;
pub use error::RemoteError;
pub use model::{
    BusinessLine, DisplayLabels, FormDraft, FormField, ModelFields, ModelId, ModelRecord,
    ModelType, OptionCategory, RiskRating, Status, ValidationError,
};
pub use options::{EnumOption, EnumeratedOptionSet};
pub use query::{QueryState, SortDirection, SortField, SortOrder};

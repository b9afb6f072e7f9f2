//! Model domain - registered model records and their form input

mod classification;
mod entity;
mod validation;

pub use classification::{BusinessLine, ModelType, OptionCategory, RiskRating, Status};
pub use entity::{DisplayLabels, ModelFields, ModelId, ModelRecord};
pub use validation::{FormDraft, FormField, ValidationError};

//! Form input and required-field validation

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::classification::{BusinessLine, ModelType, RiskRating, Status};
use super::entity::ModelFields;

/// One input of the registration or edit form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormField {
    Name,
    Version,
    Sponsor,
    BusinessLine,
    ModelType,
    RiskRating,
    Status,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::Name,
        FormField::Version,
        FormField::Sponsor,
        FormField::BusinessLine,
        FormField::ModelType,
        FormField::RiskRating,
        FormField::Status,
    ];

    /// Label shown next to the input and in field-level messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Model Name",
            Self::Version => "Model Version",
            Self::Sponsor => "Model Sponsor",
            Self::BusinessLine => "Business Line",
            Self::ModelType => "Model Type",
            Self::RiskRating => "Risk Rating",
            Self::Status => "Status",
        }
    }

    /// JSON property name on the wire
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Name => "modelName",
            Self::Version => "modelVersion",
            Self::Sponsor => "modelSponsor",
            Self::BusinessLine => "businessLine",
            Self::ModelType => "modelType",
            Self::RiskRating => "riskRating",
            Self::Status => "status",
        }
    }

    /// Message shown when the field is left empty
    pub fn required_message(&self) -> String {
        format!("{} is required", self.label())
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-', ' '], "").as_str() {
            "name" | "modelname" => Ok(Self::Name),
            "version" | "modelversion" => Ok(Self::Version),
            "sponsor" | "modelsponsor" => Ok(Self::Sponsor),
            "businessline" => Ok(Self::BusinessLine),
            "modeltype" | "type" => Ok(Self::ModelType),
            "riskrating" | "risk" => Ok(Self::RiskRating),
            "status" => Ok(Self::Status),
            _ => Err(format!("Unknown field '{}'", s)),
        }
    }
}

/// Validation errors raised before anything is sent to the registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more required inputs are empty
    #[error("Missing required fields: {}", join_labels(.fields))]
    MissingFields { fields: Vec<FormField> },

    /// A classification value outside the registry's own option set
    #[error("Invalid {field} value '{value}'")]
    UnknownValue { field: FormField, value: String },

    /// Model IDs are positive integers
    #[error("Invalid model ID {id}: must be a positive integer")]
    InvalidId { id: u64 },
}

impl ValidationError {
    /// Field-level messages, in form order
    pub fn field_messages(&self) -> Vec<(FormField, String)> {
        match self {
            Self::MissingFields { fields } => fields
                .iter()
                .map(|field| (*field, field.required_message()))
                .collect(),
            Self::UnknownValue { field, .. } => {
                vec![(*field, format!("{} has an invalid value", field.label()))]
            }
            Self::InvalidId { .. } => Vec::new(),
        }
    }
}

fn join_labels(fields: &[FormField]) -> String {
    fields
        .iter()
        .map(FormField::label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Raw form input; any field may still be empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    name: String,
    version: String,
    sponsor: String,
    business_line: String,
    model_type: String,
    risk_rating: String,
    status: String,
}

impl FormDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fill a draft from a complete field set
    pub fn from_fields(fields: &ModelFields) -> Self {
        Self {
            name: fields.name.clone(),
            version: fields.version.clone(),
            sponsor: fields.sponsor.clone(),
            business_line: fields.business_line.code().to_string(),
            model_type: fields.model_type.code().to_string(),
            risk_rating: fields.risk_rating.code().to_string(),
            status: fields.status.code().to_string(),
        }
    }

    /// Builder-style method to set one field
    pub fn with(mut self, field: FormField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Version => &self.version,
            FormField::Sponsor => &self.sponsor,
            FormField::BusinessLine => &self.business_line,
            FormField::ModelType => &self.model_type,
            FormField::RiskRating => &self.risk_rating,
            FormField::Status => &self.status,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::Name => &mut self.name,
            FormField::Version => &mut self.version,
            FormField::Sponsor => &mut self.sponsor,
            FormField::BusinessLine => &mut self.business_line,
            FormField::ModelType => &mut self.model_type,
            FormField::RiskRating => &mut self.risk_rating,
            FormField::Status => &mut self.status,
        };
        *slot = value.into();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Fields that are empty or whitespace only, in form order
    pub fn missing_fields(&self) -> Vec<FormField> {
        FormField::ALL
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }

    /// Turn the draft into a complete field set.
    ///
    /// All empty fields are reported together in a single error.
    pub fn validate(&self) -> Result<ModelFields, ValidationError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields { fields: missing });
        }

        Ok(ModelFields {
            name: self.name.trim().to_string(),
            version: self.version.trim().to_string(),
            sponsor: self.sponsor.trim().to_string(),
            business_line: parse_code::<BusinessLine>(&self.business_line),
            model_type: parse_code::<ModelType>(&self.model_type),
            risk_rating: parse_code::<RiskRating>(&self.risk_rating),
            status: parse_code::<Status>(&self.status),
        })
    }
}

fn parse_code<T: FromStr<Err = Infallible>>(value: &str) -> T {
    match value.parse() {
        Ok(code) => code,
        Err(never) => match never {},
    }
}

impl ModelFields {
    /// Reject classification codes outside the built-in option sets.
    ///
    /// Only the registry itself applies this; clients pass codes through.
    pub fn ensure_known(&self) -> Result<(), ValidationError> {
        let codes = [
            (FormField::BusinessLine, self.business_line.is_known(), self.business_line.code()),
            (FormField::ModelType, self.model_type.is_known(), self.model_type.code()),
            (FormField::RiskRating, self.risk_rating.is_known(), self.risk_rating.code()),
            (FormField::Status, self.status.is_known(), self.status.code()),
        ];

        match codes.into_iter().find(|(_, known, _)| !known) {
            Some((field, _, value)) => Err(ValidationError::UnknownValue {
                field,
                value: value.to_string(),
            }),
            None => Ok(()),
        }
    }
}

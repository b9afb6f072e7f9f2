//! Enumerated option sets served by the registry

use serde::{Deserialize, Serialize};

use super::model::{BusinessLine, ModelType, OptionCategory, RiskRating, Status};

/// One allowed value of a classification field with its display label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumOption {
    pub value: String,
    pub display_name: String,
}

impl EnumOption {
    pub fn new(value: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            display_name: display_name.into(),
        }
    }
}

/// Allowed values for every classification field, in server order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumeratedOptionSet {
    #[serde(default)]
    pub business_lines: Vec<EnumOption>,
    #[serde(default)]
    pub model_types: Vec<EnumOption>,
    #[serde(default)]
    pub risk_ratings: Vec<EnumOption>,
    #[serde(default)]
    pub statuses: Vec<EnumOption>,
}

impl EnumeratedOptionSet {
    /// The option set the registry ships with
    pub fn standard() -> Self {
        Self {
            business_lines: BusinessLine::ALL
                .iter()
                .map(|v| EnumOption::new(v.code(), v.display_name()))
                .collect(),
            model_types: ModelType::ALL
                .iter()
                .map(|v| EnumOption::new(v.code(), v.display_name()))
                .collect(),
            risk_ratings: RiskRating::ALL
                .iter()
                .map(|v| EnumOption::new(v.code(), v.display_name()))
                .collect(),
            statuses: Status::ALL
                .iter()
                .map(|v| EnumOption::new(v.code(), v.display_name()))
                .collect(),
        }
    }

    pub fn options(&self, category: OptionCategory) -> &[EnumOption] {
        match category {
            OptionCategory::BusinessLines => &self.business_lines,
            OptionCategory::ModelTypes => &self.model_types,
            OptionCategory::RiskRatings => &self.risk_ratings,
            OptionCategory::Statuses => &self.statuses,
        }
    }

    /// Display label for a code, if the category lists it
    pub fn display_name(&self, category: OptionCategory, value: &str) -> Option<&str> {
        self.options(category)
            .iter()
            .find(|option| option.value == value)
            .map(|option| option.display_name.as_str())
    }
}

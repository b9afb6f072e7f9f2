//! Search and sort parameters for the model list

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Column a list query can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortField {
    #[serde(rename = "id")]
    Id,
    #[serde(rename = "modelName")]
    Name,
    #[serde(rename = "modelVersion")]
    Version,
    #[serde(rename = "modelSponsor")]
    Sponsor,
    #[serde(rename = "businessLine")]
    BusinessLine,
    #[serde(rename = "modelType")]
    ModelType,
    #[serde(rename = "riskRating")]
    RiskRating,
    #[serde(rename = "status")]
    Status,
    #[serde(rename = "createdAt")]
    CreatedAt,
    #[serde(rename = "updatedAt")]
    UpdatedAt,
}

impl SortField {
    /// Value of the `sortBy` query parameter
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "modelName",
            Self::Version => "modelVersion",
            Self::Sponsor => "modelSponsor",
            Self::BusinessLine => "businessLine",
            Self::ModelType => "modelType",
            Self::RiskRating => "riskRating",
            Self::Status => "status",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-', ' '], "").as_str() {
            "id" => Ok(Self::Id),
            "name" | "modelname" => Ok(Self::Name),
            "version" | "modelversion" => Ok(Self::Version),
            "sponsor" | "modelsponsor" => Ok(Self::Sponsor),
            "businessline" => Ok(Self::BusinessLine),
            "modeltype" | "type" => Ok(Self::ModelType),
            "riskrating" | "risk" => Ok(Self::RiskRating),
            "status" => Ok(Self::Status),
            "createdat" | "created" => Ok(Self::CreatedAt),
            "updatedat" | "updated" => Ok(Self::UpdatedAt),
            _ => Err(format!("Unknown sort field '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            _ => Err(format!("Unknown sort direction '{}'", s)),
        }
    }
}

/// Sort column together with its direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

/// What subset and order of the collection the list should show.
///
/// A direction only exists alongside a sort field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    search_term: String,
    sort: Option<SortOrder>,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_sort(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort = Some(SortOrder { field, direction });
        self
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn sort(&self) -> Option<SortOrder> {
        self.sort
    }

    pub fn sort_field(&self) -> Option<SortField> {
        self.sort.map(|s| s.field)
    }

    /// Current direction; ascending when nothing is sorted
    pub fn sort_direction(&self) -> SortDirection {
        self.sort.map(|s| s.direction).unwrap_or_default()
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Same column flips direction, any other column starts ascending
    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort = Some(match self.sort {
            Some(current) if current.field == field => SortOrder {
                field,
                direction: current.direction.flipped(),
            },
            _ => SortOrder {
                field,
                direction: SortDirection::Asc,
            },
        });
    }

    /// Query-string pairs for `GET /api/models`; empty means "everything"
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        let term = self.search_term.trim();
        if !term.is_empty() {
            params.push(("search", term.to_string()));
        }

        if let Some(sort) = self.sort {
            params.push(("sortBy", sort.field.wire_name().to_string()));
            params.push(("sortDir", sort.direction.wire_name().to_string()));
        }

        params
    }
}

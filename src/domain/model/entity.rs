//! Model record entity and related types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::classification::{BusinessLine, ModelType, RiskRating, Status};
use super::validation::ValidationError;

/// Model identifier - positive integer assigned by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct ModelId(u64);

impl ModelId {
    /// Create a new ModelId after validation
    pub fn new(id: u64) -> Result<Self, ValidationError> {
        if id == 0 {
            return Err(ValidationError::InvalidId { id });
        }

        Ok(Self(id))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for ModelId {
    type Error = ValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ModelId> for u64 {
    fn from(id: ModelId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ModelId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<u64>()
            .map_err(|_| ValidationError::InvalidId { id: 0 })?;
        Self::new(id)
    }
}

/// The editable fields of a model record, always complete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelFields {
    #[serde(rename = "modelName")]
    pub name: String,

    #[serde(rename = "modelVersion")]
    pub version: String,

    #[serde(rename = "modelSponsor")]
    pub sponsor: String,

    #[serde(rename = "businessLine")]
    pub business_line: BusinessLine,

    #[serde(rename = "modelType")]
    pub model_type: ModelType,

    #[serde(rename = "riskRating")]
    pub risk_rating: RiskRating,

    pub status: Status,
}

/// Labels the registry may resolve server-side and attach to a record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayLabels {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_line_display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_type_display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_rating_display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_display_name: Option<String>,
}

/// A registered model as returned by the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRecord {
    id: ModelId,

    #[serde(flatten)]
    fields: ModelFields,

    #[serde(flatten)]
    labels: DisplayLabels,

    #[serde(with = "timestamp")]
    created_at: DateTime<Utc>,

    #[serde(with = "timestamp")]
    updated_at: DateTime<Utc>,
}

impl ModelRecord {
    /// Create a freshly registered record
    pub fn new(id: ModelId, fields: ModelFields) -> Self {
        let now = Utc::now();
        Self {
            id,
            fields,
            labels: DisplayLabels::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style method to set server-resolved labels
    pub fn with_labels(mut self, labels: DisplayLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Builder-style method to set both timestamps
    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    pub fn id(&self) -> ModelId {
        self.id
    }

    pub fn fields(&self) -> &ModelFields {
        &self.fields
    }

    pub fn name(&self) -> &str {
        &self.fields.name
    }

    pub fn version(&self) -> &str {
        &self.fields.version
    }

    pub fn sponsor(&self) -> &str {
        &self.fields.sponsor
    }

    pub fn business_line(&self) -> &BusinessLine {
        &self.fields.business_line
    }

    pub fn model_type(&self) -> &ModelType {
        &self.fields.model_type
    }

    pub fn risk_rating(&self) -> &RiskRating {
        &self.fields.risk_rating
    }

    pub fn status(&self) -> &Status {
        &self.fields.status
    }

    pub fn labels(&self) -> &DisplayLabels {
        &self.labels
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace every editable field at once
    pub fn replace_fields(&mut self, fields: ModelFields) {
        self.fields = fields;
        self.touch();
    }

    /// Advance updated_at, strictly, even when the clock has not moved
    fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }
}

/// Timestamps are RFC 3339 on the way out. On the way in the registry may
/// also send a zone-less local date-time, which is taken as UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;

        if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(parsed.with_timezone(&Utc));
        }

        raw.parse::<NaiveDateTime>()
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::fixtures::pd_model_fields;

    #[test]
    fn test_model_id_rejects_zero() {
        assert!(ModelId::new(0).is_err());
        assert_eq!(ModelId::new(7).unwrap().value(), 7);
        assert_eq!("42".parse::<ModelId>().unwrap().value(), 42);
        assert!("abc".parse::<ModelId>().is_err());
    }

    #[test]
    fn test_fields_use_wire_names() {
        let json = serde_json::to_value(pd_model_fields()).unwrap();

        assert_eq!(json["modelName"], "PD Model");
        assert_eq!(json["modelVersion"], "1.0");
        assert_eq!(json["modelSponsor"], "Risk Team");
        assert_eq!(json["businessLine"], "RETAIL_BANKING");
        assert_eq!(json["modelType"], "CREDIT_RISK");
        assert_eq!(json["riskRating"], "HIGH");
        assert_eq!(json["status"], "IN_DEVELOPMENT");
    }

    #[test]
    fn test_record_accepts_local_date_times_and_labels() {
        let json = serde_json::json!({
            "id": 3,
            "modelName": "LGD Model",
            "modelVersion": "2.1",
            "modelSponsor": "Credit",
            "businessLine": "WHOLESALE_LENDING",
            "businessLineDisplayName": "Wholesale Lending",
            "modelType": "CREDIT_RISK",
            "riskRating": "MEDIUM",
            "status": "VALIDATED",
            "createdAt": "2024-03-01T10:15:30.123",
            "updatedAt": "2024-03-02T08:00:00Z"
        });

        let record: ModelRecord = serde_json::from_value(json).unwrap();

        assert_eq!(record.id().value(), 3);
        assert_eq!(record.name(), "LGD Model");
        assert_eq!(record.business_line(), &BusinessLine::WholesaleLending);
        assert_eq!(
            record.labels().business_line_display_name.as_deref(),
            Some("Wholesale Lending")
        );
        assert!(record.labels().status_display_name.is_none());
        assert_eq!(record.created_at().to_rfc3339(), "2024-03-01T10:15:30.123+00:00");
    }

    #[test]
    fn test_record_rejects_non_positive_id() {
        let mut json = serde_json::to_value(ModelRecord::new(
            ModelId::new(1).unwrap(),
            pd_model_fields(),
        ))
        .unwrap();
        json["id"] = serde_json::json!(0);

        assert!(serde_json::from_value::<ModelRecord>(json).is_err());
    }

    #[test]
    fn test_replace_fields_advances_updated_at() {
        let mut record = ModelRecord::new(ModelId::new(1).unwrap(), pd_model_fields());
        let created = record.created_at();
        let before = record.updated_at();

        let mut fields = pd_model_fields();
        fields.status = Status::Validated;
        record.replace_fields(fields.clone());

        assert_eq!(record.fields(), &fields);
        assert_eq!(record.created_at(), created);
        assert!(record.updated_at() > before);
    }
}

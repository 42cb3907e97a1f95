use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{HeatNumber, RuleType};

/// One raw submitted field value. Attempt lists carry the sub-records of a
/// multi-attempt heat; each sub-record maps component keys to numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum FieldValue {
    Number(Decimal),
    Text(String),
    Attempts(Vec<BTreeMap<String, Decimal>>),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_attempts(&self) -> Option<&[BTreeMap<String, Decimal>]> {
        match self {
            FieldValue::Attempts(list) => Some(list),
            _ => None,
        }
    }
}

/// Inbound judge submission: raw field values for one athlete, never
/// persisted as-is. Always passed through the normalizer.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SubmissionRequest {
    pub event_id: Uuid,
    pub modality_id: Uuid,
    pub athlete_id: Uuid,
    pub judge_id: Uuid,
    #[schema(value_type = Option<i32>)]
    pub heat: Option<HeatNumber>,
    pub rule_type: RuleType,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
    #[validate(length(max = 2000, message = "notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Field keys that configure the modality itself rather than capture a
/// judge-entered value. Filtered out of the scoring fields exposed to judges.
pub const RESERVED_CONFIG_KEYS: &[&str] = &["usa_baterias", "config", "observacoes_config"];

/// Aggregation applied to a calculated field over the other captured
/// numeric fields of the same submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Sum,
    Best,
}

/// Closed union over the supported input kinds of a configured field.
/// Validation is exhaustive pattern matching over this union.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Number {
        min: Option<Decimal>,
        max: Option<Decimal>,
        step: Option<Decimal>,
    },
    Integer {
        min: Option<i64>,
        max: Option<i64>,
    },
    Text,
    Select {
        options: Vec<String>,
    },
    /// Derived from the other fields by `formula`; never typed by a judge.
    Calculated {
        formula: Aggregation,
    },
}

/// One configured input of a modality's scoring model. Immutable once
/// created; edited only through administrative configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FieldDefinition {
    pub key: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub required: bool,
    pub order: i32,
}

impl FieldDefinition {
    /// Calculated fields are visible but not judge-editable.
    pub fn is_editable(&self) -> bool {
        !matches!(self.kind, FieldKind::Calculated { .. })
    }
}

/// The per-modality schema describing how a score is captured. A modality
/// has at most one active scoring model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScoringModel {
    pub modality_id: Uuid,
    pub uses_heats: bool,
    pub fields: Vec<FieldDefinition>,
}

impl ScoringModel {
    /// Fields judges actually fill in: configuration-only keys removed,
    /// ordered by their declared position.
    pub fn scoring_fields(&self) -> Vec<&FieldDefinition> {
        let mut fields: Vec<&FieldDefinition> = self
            .fields
            .iter()
            .filter(|f| !RESERVED_CONFIG_KEYS.contains(&f.key.as_str()))
            .collect();
        fields.sort_by_key(|f| f.order);
        fields
    }
}

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::HeatNumber;

/// Medal label derived from final rank position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    /// Maps a 1-based rank position to a medal; positions >= 4 get none.
    pub fn from_position(position: i32) -> Option<Medal> {
        match position {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Medal::Gold => "gold",
            Medal::Silver => "silver",
            Medal::Bronze => "bronze",
        }
    }
}

impl std::str::FromStr for Medal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gold" => Ok(Medal::Gold),
            "silver" => Ok(Medal::Silver),
            "bronze" => Ok(Medal::Bronze),
            other => Err(format!("unknown medal: {other}")),
        }
    }
}

/// Structured sub-fields of a time score, kept alongside the canonical
/// millisecond value so consumers can render the original entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TimeComponents {
    pub minutes: u32,
    pub seconds: u32,
    pub milliseconds: u32,
}

impl TimeComponents {
    pub fn zero() -> Self {
        Self {
            minutes: 0,
            seconds: 0,
            milliseconds: 0,
        }
    }
}

/// A captured per-field value on a score. Numeric for measured fields,
/// text for select/free-text fields of a configured scoring model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum AttemptValue {
    Number(Decimal),
    Text(String),
}

/// Upsert key for a score record. Exactly one [`NormalizedScore`] exists per
/// key; re-submission mutates the existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScoreKey {
    pub event_id: Uuid,
    pub modality_id: Uuid,
    pub athlete_id: Uuid,
    pub heat: Option<HeatNumber>,
}

/// The persisted unit of the scoring engine: one athlete's result for a
/// (event, modality, heat) scope, normalized to the unit family's canonical
/// base so ordering is a pure numeric comparison.
///
/// `position` and `medal` are derived fields rewritten by the ranking
/// calculator on every recompute; they are never judge-editable.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NormalizedScore {
    pub score_id: Uuid,
    pub event_id: Uuid,
    pub modality_id: Uuid,
    pub athlete_id: Uuid,
    pub team_id: Option<Uuid>,
    pub judge_id: Uuid,
    #[schema(value_type = Option<i32>)]
    pub heat: Option<HeatNumber>,
    pub value: Decimal,
    pub unit: String,
    pub time_components: Option<TimeComponents>,
    pub attempts: Option<BTreeMap<String, AttemptValue>>,
    pub notes: Option<String>,
    pub position: Option<i32>,
    pub medal: Option<Medal>,
    pub recorded_at: chrono::NaiveDateTime,
}

impl NormalizedScore {
    pub fn key(&self) -> ScoreKey {
        ScoreKey {
            event_id: self.event_id,
            modality_id: self.modality_id,
            athlete_id: self.athlete_id,
            heat: self.heat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medal_from_position() {
        assert_eq!(Medal::from_position(1), Some(Medal::Gold));
        assert_eq!(Medal::from_position(2), Some(Medal::Silver));
        assert_eq!(Medal::from_position(3), Some(Medal::Bronze));
        assert_eq!(Medal::from_position(4), None);
        assert_eq!(Medal::from_position(0), None);
    }

    #[test]
    fn test_medal_label_round_trip() {
        for medal in [Medal::Gold, Medal::Silver, Medal::Bronze] {
            assert_eq!(medal.as_str().parse::<Medal>(), Ok(medal));
        }
        assert!("platinum".parse::<Medal>().is_err());
    }
}

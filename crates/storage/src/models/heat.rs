use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Reserved heat identifier for the final round, distinct from any regular
/// heat number a competition can realistically reach.
pub const FINAL_HEAT_NUMBER: i32 = 999;

/// A heat ("bateria") identifier within a (modality, event) pair.
///
/// Regular heats are numbered sequentially from 1; the final round uses the
/// reserved sentinel [`FINAL_HEAT_NUMBER`] on the wire. The `Ord` impl sorts
/// regular heats numerically with the final last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum HeatNumber {
    Regular(i32),
    Final,
}

impl HeatNumber {
    pub fn is_final(self) -> bool {
        matches!(self, HeatNumber::Final)
    }

    pub fn as_i32(self) -> i32 {
        match self {
            HeatNumber::Regular(n) => n,
            HeatNumber::Final => FINAL_HEAT_NUMBER,
        }
    }
}

impl From<HeatNumber> for i32 {
    fn from(heat: HeatNumber) -> Self {
        heat.as_i32()
    }
}

impl TryFrom<i32> for HeatNumber {
    type Error = String;

    fn try_from(n: i32) -> Result<Self, Self::Error> {
        match n {
            FINAL_HEAT_NUMBER => Ok(HeatNumber::Final),
            n if n >= 1 && n < FINAL_HEAT_NUMBER => Ok(HeatNumber::Regular(n)),
            other => Err(format!("invalid heat number: {other}")),
        }
    }
}

impl std::fmt::Display for HeatNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeatNumber::Regular(n) => write!(f, "bateria {n}"),
            HeatNumber::Final => write!(f, "final"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Heat {
    pub heat_id: Uuid,
    pub event_id: Uuid,
    pub modality_id: Uuid,
    #[schema(value_type = i32)]
    pub number: HeatNumber,
    pub created_at: chrono::NaiveDateTime,
}

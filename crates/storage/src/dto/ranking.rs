use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::{HeatNumber, Medal, NormalizedScore, TimeComponents};

/// Query parameters selecting a ranked scope. `heat` is the wire-level heat
/// number (999 selects the final); absent means the heat-less scope.
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ScopeQuery {
    pub event_id: Uuid,
    pub modality_id: Uuid,
    pub heat: Option<i32>,
}

impl ScopeQuery {
    pub fn heat(&self) -> Result<Option<HeatNumber>, String> {
        self.heat.map(HeatNumber::try_from).transpose()
    }
}

/// Outbound ranked entry. Consumers may truncate the list (e.g. top 10)
/// without affecting stored data.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RankedScoreResponse {
    pub athlete_id: Uuid,
    pub team_id: Option<Uuid>,
    #[schema(value_type = Option<i32>)]
    pub heat: Option<HeatNumber>,
    pub value: Decimal,
    pub unit: String,
    pub time_components: Option<TimeComponents>,
    pub position: Option<i32>,
    pub medal: Option<Medal>,
    pub recorded_at: chrono::NaiveDateTime,
}

impl From<NormalizedScore> for RankedScoreResponse {
    fn from(score: NormalizedScore) -> Self {
        Self {
            athlete_id: score.athlete_id,
            team_id: score.team_id,
            heat: score.heat,
            value: score.value,
            unit: score.unit,
            time_components: score.time_components,
            position: score.position,
            medal: score.medal,
            recorded_at: score.recorded_at,
        }
    }
}

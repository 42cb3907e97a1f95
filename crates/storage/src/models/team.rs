use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Team membership as seen by the engine: read-only, sourced from the
/// external team-membership data.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamRef {
    pub team_id: Uuid,
    pub member_athlete_ids: Vec<Uuid>,
}

impl TeamRef {
    /// Members other than the given athlete, in stored order.
    pub fn teammates_of(&self, athlete_id: Uuid) -> impl Iterator<Item = Uuid> + '_ {
        self.member_athlete_ids
            .iter()
            .copied()
            .filter(move |id| *id != athlete_id)
    }
}

//! Fan-out of a team submission: the primary athlete's normalized result is
//! cloned to every other team member so each member independently satisfies
//! the one-record-per-(event, modality, athlete, heat) invariant.

use uuid::Uuid;

use storage::models::{NormalizedScore, TeamRef};

/// Clones the primary score for every teammate. Each clone keeps the
/// primary's value, unit, components, attempts, heat, notes, judge and
/// timestamp, under a fresh score id and the member's athlete id.
pub fn propagate(primary: &NormalizedScore, team: &TeamRef) -> Vec<NormalizedScore> {
    team.teammates_of(primary.athlete_id)
        .map(|athlete_id| NormalizedScore {
            score_id: Uuid::new_v4(),
            athlete_id,
            team_id: Some(team.team_id),
            ..primary.clone()
        })
        .collect()
}

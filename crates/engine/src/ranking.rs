//! Whole-scope rank and medal recomputation. Every call re-sorts all scores
//! of a (modality, event, heat) scope and rewrites every record's position
//! and medal, which makes the operation idempotent and safe to re-run after
//! any single write.

use std::cmp::Ordering;

use storage::models::{Medal, NormalizedScore, SortDirection};

/// Sorts by canonical value per `direction` and assigns 1-based positions;
/// positions 1-3 receive gold, silver and bronze.
///
/// Ties on `value` break deterministically: the earlier `recorded_at` ranks
/// first, with `athlete_id` as the last resort so equal-timestamp records
/// still order the same on every recompute.
pub fn rank(mut scores: Vec<NormalizedScore>, direction: SortDirection) -> Vec<NormalizedScore> {
    scores.sort_by(|a, b| {
        let by_value = match direction {
            SortDirection::Ascending => a.value.cmp(&b.value),
            SortDirection::Descending => b.value.cmp(&a.value),
        };
        by_value
            .then_with(|| a.recorded_at.cmp(&b.recorded_at))
            .then_with(|| a.athlete_id.cmp(&b.athlete_id))
    });

    for (index, score) in scores.iter_mut().enumerate() {
        let position = index as i32 + 1;
        score.position = Some(position);
        score.medal = Medal::from_position(position);
    }

    scores
}

/// Ordering of two already-ranked records by stored position, unranked last.
pub fn by_position(a: &NormalizedScore, b: &NormalizedScore) -> Ordering {
    match (a.position, b.position) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.recorded_at.cmp(&b.recorded_at),
    }
}

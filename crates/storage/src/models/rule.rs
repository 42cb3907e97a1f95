use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Ordering direction for a ranked scope. Ascending for elapsed time
/// (lower is better), descending for distance and points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Canonical unit family of a measured result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScoreFamily {
    Time,
    Distance,
    Points,
}

impl ScoreFamily {
    /// Canonical base unit: integer milliseconds for time, decimal meters
    /// for distance, raw count for points.
    pub fn unit(&self) -> &'static str {
        match self {
            ScoreFamily::Time => "ms",
            ScoreFamily::Distance => "m",
            ScoreFamily::Points => "pontos",
        }
    }

    pub fn direction(&self) -> SortDirection {
        match self {
            ScoreFamily::Time => SortDirection::Ascending,
            ScoreFamily::Distance | ScoreFamily::Points => SortDirection::Descending,
        }
    }
}

/// How a modality's raw submission is interpreted. Resolved once from the
/// modality metadata, never inferred from which input keys happen to be
/// present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    Time,
    Distance,
    Points,
    /// Multi-attempt heats: each attempt is scored per the inner family and
    /// the best attempt becomes the canonical value.
    Attempts(ScoreFamily),
    /// Model-driven capture against the modality's configured scoring fields.
    Dynamic,
}

impl RuleType {
    pub fn direction(&self) -> SortDirection {
        match self {
            RuleType::Time => SortDirection::Ascending,
            RuleType::Distance | RuleType::Points | RuleType::Dynamic => SortDirection::Descending,
            RuleType::Attempts(family) => family.direction(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_per_family() {
        assert_eq!(RuleType::Time.direction(), SortDirection::Ascending);
        assert_eq!(RuleType::Distance.direction(), SortDirection::Descending);
        assert_eq!(RuleType::Points.direction(), SortDirection::Descending);
        assert_eq!(
            RuleType::Attempts(ScoreFamily::Time).direction(),
            SortDirection::Ascending
        );
        assert_eq!(RuleType::Dynamic.direction(), SortDirection::Descending);
    }

    #[test]
    fn test_canonical_units() {
        assert_eq!(ScoreFamily::Time.unit(), "ms");
        assert_eq!(ScoreFamily::Distance.unit(), "m");
        assert_eq!(ScoreFamily::Points.unit(), "pontos");
    }
}

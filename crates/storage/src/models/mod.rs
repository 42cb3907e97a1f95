mod heat;
mod rule;
mod score;
mod scoring_model;
mod team;

pub use heat::{FINAL_HEAT_NUMBER, Heat, HeatNumber};
pub use rule::{RuleType, ScoreFamily, SortDirection};
pub use score::{AttemptValue, Medal, NormalizedScore, ScoreKey, TimeComponents};
pub use scoring_model::{
    Aggregation, FieldDefinition, FieldKind, RESERVED_CONFIG_KEYS, ScoringModel,
};
pub use team::TeamRef;

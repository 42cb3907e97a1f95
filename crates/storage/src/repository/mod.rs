pub mod heat;
pub mod score;
pub mod scoring_model;
pub mod team;

pub use heat::HeatRepository;
pub use score::ScoreRepository;
pub use scoring_model::ScoringModelRepository;
pub use team::TeamRepository;

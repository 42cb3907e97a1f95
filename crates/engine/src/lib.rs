pub mod error;
pub mod heats;
pub mod normalizer;
pub mod propagation;
pub mod ranking;
pub mod registry;
pub mod submission;

pub use error::{EngineError, Result};
pub use heats::{HeatManager, ScoreScope};
pub use registry::ModelRegistry;
pub use submission::{ConflictPolicy, PropagationFailure, SubmissionOutcome, SubmissionService};

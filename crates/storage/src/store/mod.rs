//! Contracts consumed by the scoring engine. The engine never talks to a
//! concrete backend; everything flows through these traits so the Postgres
//! repositories and the in-memory store are interchangeable.

pub mod memory;

use uuid::Uuid;

use crate::error::Result;
use crate::models::{Heat, HeatNumber, NormalizedScore, ScoreKey, ScoringModel, TeamRef};

/// Durable keyed score storage with upsert-by-key semantics: exactly one
/// record exists per (event, modality, athlete, heat) tuple.
#[async_trait::async_trait]
pub trait ScoreStore: Send + Sync {
    /// Inserts or replaces the record stored under `key`, returning the
    /// persisted record.
    async fn upsert(&self, key: &ScoreKey, record: NormalizedScore) -> Result<NormalizedScore>;

    /// All records for the (event, modality, heat) scope. `heat: None`
    /// selects the implicit scope of heat-less modalities, never "all heats".
    async fn list_by_scope(
        &self,
        event_id: Uuid,
        modality_id: Uuid,
        heat: Option<HeatNumber>,
    ) -> Result<Vec<NormalizedScore>>;

    /// Administrative removal. Not called by the engine's submission flow.
    async fn delete(&self, key: &ScoreKey) -> Result<()>;
}

/// Heat persistence for a (modality, event) pair.
#[async_trait::async_trait]
pub trait HeatStore: Send + Sync {
    async fn list_heats(&self, event_id: Uuid, modality_id: Uuid) -> Result<Vec<Heat>>;

    async fn insert_heat(&self, heat: Heat) -> Result<Heat>;
}

/// External team-membership data, read-only from the engine's perspective.
#[async_trait::async_trait]
pub trait TeamMembershipProvider: Send + Sync {
    async fn team_for_athlete(&self, athlete_id: Uuid) -> Result<Option<TeamRef>>;
}

/// External configuration store holding the active scoring model per
/// modality.
#[async_trait::async_trait]
pub trait ScoringModelProvider: Send + Sync {
    async fn model_for_modality(&self, modality_id: Uuid) -> Result<Option<ScoringModel>>;
}

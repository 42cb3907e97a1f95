//! Heat ("bateria") lifecycle per (modality, event): regular heats are
//! numbered sequentially on demand; a single distinguished final heat can be
//! created once at least one regular heat exists.

use std::sync::Arc;

use uuid::Uuid;

use storage::models::{FINAL_HEAT_NUMBER, Heat, HeatNumber};
use storage::store::HeatStore;

use crate::error::{EngineError, Result};

/// The (modality, event, heat) triple every persist and rank operation is
/// scoped to. `heat: None` is the implicit single scope of heat-less
/// modalities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScoreScope {
    pub event_id: Uuid,
    pub modality_id: Uuid,
    pub heat: Option<HeatNumber>,
}

pub struct HeatManager {
    store: Arc<dyn HeatStore>,
}

impl HeatManager {
    pub fn new(store: Arc<dyn HeatStore>) -> Self {
        Self { store }
    }

    /// Regular heats in numeric order, the final last.
    pub async fn list_heats(&self, event_id: Uuid, modality_id: Uuid) -> Result<Vec<Heat>> {
        let mut heats = self.store.list_heats(event_id, modality_id).await?;
        heats.sort_by_key(|h| h.number);
        Ok(heats)
    }

    /// Creates the next regular heat: `max(existing regular numbers) + 1`,
    /// starting at 1. Always allowed, final heat present or not.
    pub async fn create_regular_heat(&self, event_id: Uuid, modality_id: Uuid) -> Result<Heat> {
        let heats = self.store.list_heats(event_id, modality_id).await?;
        let next = heats
            .iter()
            .filter_map(|h| match h.number {
                HeatNumber::Regular(n) => Some(n),
                HeatNumber::Final => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        if next >= FINAL_HEAT_NUMBER {
            return Err(EngineError::Precondition(
                "regular heat numbering exhausted".to_string(),
            ));
        }

        tracing::debug!(%event_id, %modality_id, number = next, "creating regular heat");
        let heat = self
            .store
            .insert_heat(Heat {
                heat_id: Uuid::new_v4(),
                event_id,
                modality_id,
                number: HeatNumber::Regular(next),
                created_at: chrono::Utc::now().naive_utc(),
            })
            .await?;
        Ok(heat)
    }

    /// Creates the single final heat. Requires at least one regular heat and
    /// no existing final for the (modality, event) pair.
    pub async fn create_final_heat(&self, event_id: Uuid, modality_id: Uuid) -> Result<Heat> {
        let heats = self.store.list_heats(event_id, modality_id).await?;

        if !heats.iter().any(|h| matches!(h.number, HeatNumber::Regular(_))) {
            return Err(EngineError::Precondition(
                "a final heat requires at least one regular heat".to_string(),
            ));
        }
        if heats.iter().any(|h| h.number.is_final()) {
            return Err(EngineError::Precondition(
                "a final heat already exists".to_string(),
            ));
        }

        tracing::debug!(%event_id, %modality_id, "creating final heat");
        let heat = self
            .store
            .insert_heat(Heat {
                heat_id: Uuid::new_v4(),
                event_id,
                modality_id,
                number: HeatNumber::Final,
                created_at: chrono::Utc::now().naive_utc(),
            })
            .await?;
        Ok(heat)
    }
}

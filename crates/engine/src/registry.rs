//! Read-side access to the per-modality scoring model configuration.

use std::sync::Arc;

use uuid::Uuid;

use storage::models::{FieldDefinition, ScoringModel};
use storage::store::ScoringModelProvider;

use crate::error::Result;

pub struct ModelRegistry {
    provider: Arc<dyn ScoringModelProvider>,
}

impl ModelRegistry {
    pub fn new(provider: Arc<dyn ScoringModelProvider>) -> Self {
        Self { provider }
    }

    /// The modality's active scoring model, if one is configured. Absence is
    /// not an error; the caller falls back to the fixed rule types.
    pub async fn model(&self, modality_id: Uuid) -> Result<Option<ScoringModel>> {
        Ok(self.provider.model_for_modality(modality_id).await?)
    }

    /// The fields judges actually fill in: configuration-only keys filtered
    /// out, ordered by declared position. Calculated fields are included but
    /// flagged non-editable via [`FieldDefinition::is_editable`].
    pub async fn scoring_fields(&self, modality_id: Uuid) -> Result<Vec<FieldDefinition>> {
        let Some(model) = self.model(modality_id).await? else {
            return Ok(Vec::new());
        };
        Ok(model.scoring_fields().into_iter().cloned().collect())
    }
}

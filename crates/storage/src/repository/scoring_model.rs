use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{FieldDefinition, ScoringModel};
use crate::store::ScoringModelProvider;

#[derive(FromRow)]
struct ScoringModelRow {
    modality_id: Uuid,
    uses_heats: bool,
    fields: serde_json::Value,
}

pub struct ScoringModelRepository {
    pool: PgPool,
}

impl ScoringModelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ScoringModelProvider for ScoringModelRepository {
    async fn model_for_modality(&self, modality_id: Uuid) -> Result<Option<ScoringModel>> {
        let row = sqlx::query_as::<_, ScoringModelRow>(
            r#"
            SELECT modality_id, uses_heats, fields
            FROM scoring_models
            WHERE modality_id = $1
            "#,
        )
        .bind(modality_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let fields: Vec<FieldDefinition> = serde_json::from_value(row.fields)?;
        Ok(Some(ScoringModel {
            modality_id: row.modality_id,
            uses_heats: row.uses_heats,
            fields,
        }))
    }
}

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Heat, HeatNumber};
use crate::store::HeatStore;

#[derive(FromRow)]
struct HeatRow {
    heat_id: Uuid,
    event_id: Uuid,
    modality_id: Uuid,
    heat_number: i32,
    created_at: chrono::NaiveDateTime,
}

impl HeatRow {
    fn into_model(self) -> Result<Heat> {
        let number = HeatNumber::try_from(self.heat_number)
            .map_err(StorageError::ConstraintViolation)?;
        Ok(Heat {
            heat_id: self.heat_id,
            event_id: self.event_id,
            modality_id: self.modality_id,
            number,
            created_at: self.created_at,
        })
    }
}

pub struct HeatRepository {
    pool: PgPool,
}

impl HeatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl HeatStore for HeatRepository {
    async fn list_heats(&self, event_id: Uuid, modality_id: Uuid) -> Result<Vec<Heat>> {
        let rows = sqlx::query_as::<_, HeatRow>(
            r#"
            SELECT heat_id, event_id, modality_id, heat_number, created_at
            FROM heats
            WHERE event_id = $1 AND modality_id = $2
            ORDER BY heat_number
            "#,
        )
        .bind(event_id)
        .bind(modality_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(HeatRow::into_model).collect()
    }

    async fn insert_heat(&self, heat: Heat) -> Result<Heat> {
        let row = sqlx::query_as::<_, HeatRow>(
            r#"
            INSERT INTO heats (heat_id, event_id, modality_id, heat_number, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING heat_id, event_id, modality_id, heat_number, created_at
            "#,
        )
        .bind(heat.heat_id)
        .bind(heat.event_id)
        .bind(heat.modality_id)
        .bind(heat.number.as_i32())
        .bind(heat.created_at)
        .fetch_one(&self.pool)
        .await?;

        row.into_model()
    }
}

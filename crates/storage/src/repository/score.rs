use std::collections::BTreeMap;

use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{AttemptValue, HeatNumber, Medal, NormalizedScore, ScoreKey, TimeComponents};
use crate::store::ScoreStore;

/// Column sentinel for the heat-less scope. The unique index on
/// (event_id, modality_id, athlete_id, heat_number) relies on heat_number
/// being NOT NULL, so "no heat" is stored as 0.
const NO_HEAT: i32 = 0;

#[derive(FromRow)]
struct ScoreRow {
    score_id: Uuid,
    event_id: Uuid,
    modality_id: Uuid,
    athlete_id: Uuid,
    team_id: Option<Uuid>,
    judge_id: Uuid,
    heat_number: i32,
    value: Decimal,
    unit: String,
    time_components: Option<serde_json::Value>,
    attempts: Option<serde_json::Value>,
    notes: Option<String>,
    position: Option<i32>,
    medal: Option<String>,
    recorded_at: chrono::NaiveDateTime,
}

impl ScoreRow {
    fn into_model(self) -> Result<NormalizedScore> {
        let heat = decode_heat(self.heat_number)?;
        let medal = self
            .medal
            .map(|m| m.parse::<Medal>().map_err(StorageError::ConstraintViolation))
            .transpose()?;
        let time_components: Option<TimeComponents> = self
            .time_components
            .map(serde_json::from_value)
            .transpose()?;
        let attempts: Option<BTreeMap<String, AttemptValue>> =
            self.attempts.map(serde_json::from_value).transpose()?;

        Ok(NormalizedScore {
            score_id: self.score_id,
            event_id: self.event_id,
            modality_id: self.modality_id,
            athlete_id: self.athlete_id,
            team_id: self.team_id,
            judge_id: self.judge_id,
            heat,
            value: self.value,
            unit: self.unit,
            time_components,
            attempts,
            notes: self.notes,
            position: self.position,
            medal,
            recorded_at: self.recorded_at,
        })
    }
}

fn encode_heat(heat: Option<HeatNumber>) -> i32 {
    heat.map(HeatNumber::as_i32).unwrap_or(NO_HEAT)
}

fn decode_heat(column: i32) -> Result<Option<HeatNumber>> {
    if column == NO_HEAT {
        return Ok(None);
    }
    HeatNumber::try_from(column)
        .map(Some)
        .map_err(StorageError::ConstraintViolation)
}

pub struct ScoreRepository {
    pool: PgPool,
}

impl ScoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ScoreStore for ScoreRepository {
    async fn upsert(&self, key: &ScoreKey, record: NormalizedScore) -> Result<NormalizedScore> {
        let time_components = record
            .time_components
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;
        let attempts = record.attempts.as_ref().map(serde_json::to_value).transpose()?;

        let row = sqlx::query_as::<_, ScoreRow>(
            r#"
            INSERT INTO scores (
                score_id, event_id, modality_id, athlete_id, team_id, judge_id,
                heat_number, value, unit, time_components, attempts, notes,
                position, medal, recorded_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (event_id, modality_id, athlete_id, heat_number)
            DO UPDATE SET
                team_id = EXCLUDED.team_id,
                judge_id = EXCLUDED.judge_id,
                value = EXCLUDED.value,
                unit = EXCLUDED.unit,
                time_components = EXCLUDED.time_components,
                attempts = EXCLUDED.attempts,
                notes = EXCLUDED.notes,
                position = EXCLUDED.position,
                medal = EXCLUDED.medal,
                recorded_at = EXCLUDED.recorded_at
            RETURNING score_id, event_id, modality_id, athlete_id, team_id, judge_id,
                      heat_number, value, unit, time_components, attempts, notes,
                      position, medal, recorded_at
            "#,
        )
        .bind(record.score_id)
        .bind(key.event_id)
        .bind(key.modality_id)
        .bind(key.athlete_id)
        .bind(record.team_id)
        .bind(record.judge_id)
        .bind(encode_heat(key.heat))
        .bind(record.value)
        .bind(&record.unit)
        .bind(time_components)
        .bind(attempts)
        .bind(&record.notes)
        .bind(record.position)
        .bind(record.medal.map(|m| m.as_str()))
        .bind(record.recorded_at)
        .fetch_one(&self.pool)
        .await?;

        row.into_model()
    }

    async fn list_by_scope(
        &self,
        event_id: Uuid,
        modality_id: Uuid,
        heat: Option<HeatNumber>,
    ) -> Result<Vec<NormalizedScore>> {
        let rows = sqlx::query_as::<_, ScoreRow>(
            r#"
            SELECT score_id, event_id, modality_id, athlete_id, team_id, judge_id,
                   heat_number, value, unit, time_components, attempts, notes,
                   position, medal, recorded_at
            FROM scores
            WHERE event_id = $1 AND modality_id = $2 AND heat_number = $3
            ORDER BY recorded_at, athlete_id
            "#,
        )
        .bind(event_id)
        .bind(modality_id)
        .bind(encode_heat(heat))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ScoreRow::into_model).collect()
    }

    async fn delete(&self, key: &ScoreKey) -> Result<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM scores
            WHERE event_id = $1 AND modality_id = $2 AND athlete_id = $3 AND heat_number = $4
            "#,
        )
        .bind(key.event_id)
        .bind(key.modality_id)
        .bind(key.athlete_id)
        .bind(encode_heat(key.heat))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::TeamRef;
use crate::store::TeamMembershipProvider;

pub struct TeamRepository {
    pool: PgPool,
}

impl TeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl TeamMembershipProvider for TeamRepository {
    async fn team_for_athlete(&self, athlete_id: Uuid) -> Result<Option<TeamRef>> {
        let team_id: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT team_id FROM team_members WHERE athlete_id = $1 LIMIT 1
            "#,
        )
        .bind(athlete_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(team_id) = team_id else {
            return Ok(None);
        };

        let member_athlete_ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT athlete_id FROM team_members WHERE team_id = $1 ORDER BY athlete_id
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(TeamRef {
            team_id,
            member_athlete_ids,
        }))
    }
}

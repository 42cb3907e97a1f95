//! In-process implementation of the store contracts, backed by `RwLock`ed
//! maps. Used by the engine's tests and usable as a development backend.

use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Heat, HeatNumber, NormalizedScore, ScoreKey, ScoringModel, TeamRef};
use crate::store::{HeatStore, ScoreStore, ScoringModelProvider, TeamMembershipProvider};

#[derive(Default)]
pub struct MemoryStore {
    scores: RwLock<HashMap<ScoreKey, NormalizedScore>>,
    heats: RwLock<Vec<Heat>>,
    teams: RwLock<Vec<TeamRef>>,
    models: RwLock<HashMap<Uuid, ScoringModel>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_team(&self, team: TeamRef) {
        self.teams.write().await.push(team);
    }

    pub async fn add_model(&self, model: ScoringModel) {
        self.models.write().await.insert(model.modality_id, model);
    }

    pub async fn score_count(&self) -> usize {
        self.scores.read().await.len()
    }
}

#[async_trait::async_trait]
impl ScoreStore for MemoryStore {
    async fn upsert(&self, key: &ScoreKey, record: NormalizedScore) -> Result<NormalizedScore> {
        let mut scores = self.scores.write().await;
        scores.insert(*key, record.clone());
        Ok(record)
    }

    async fn list_by_scope(
        &self,
        event_id: Uuid,
        modality_id: Uuid,
        heat: Option<HeatNumber>,
    ) -> Result<Vec<NormalizedScore>> {
        let scores = self.scores.read().await;
        let mut matched: Vec<NormalizedScore> = scores
            .values()
            .filter(|s| {
                s.event_id == event_id && s.modality_id == modality_id && s.heat == heat
            })
            .cloned()
            .collect();
        matched.sort_by_key(|s| (s.recorded_at, s.athlete_id));
        Ok(matched)
    }

    async fn delete(&self, key: &ScoreKey) -> Result<()> {
        self.scores.write().await.remove(key);
        Ok(())
    }
}

#[async_trait::async_trait]
impl HeatStore for MemoryStore {
    async fn list_heats(&self, event_id: Uuid, modality_id: Uuid) -> Result<Vec<Heat>> {
        let heats = self.heats.read().await;
        let mut matched: Vec<Heat> = heats
            .iter()
            .filter(|h| h.event_id == event_id && h.modality_id == modality_id)
            .cloned()
            .collect();
        matched.sort_by_key(|h| h.number);
        Ok(matched)
    }

    async fn insert_heat(&self, heat: Heat) -> Result<Heat> {
        self.heats.write().await.push(heat.clone());
        Ok(heat)
    }
}

#[async_trait::async_trait]
impl TeamMembershipProvider for MemoryStore {
    async fn team_for_athlete(&self, athlete_id: Uuid) -> Result<Option<TeamRef>> {
        let teams = self.teams.read().await;
        Ok(teams
            .iter()
            .find(|t| t.member_athlete_ids.contains(&athlete_id))
            .cloned())
    }
}

#[async_trait::async_trait]
impl ScoringModelProvider for MemoryStore {
    async fn model_for_modality(&self, modality_id: Uuid) -> Result<Option<ScoringModel>> {
        Ok(self.models.read().await.get(&modality_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn score(event_id: Uuid, modality_id: Uuid, athlete_id: Uuid, heat: Option<HeatNumber>) -> NormalizedScore {
        NormalizedScore {
            score_id: Uuid::new_v4(),
            event_id,
            modality_id,
            athlete_id,
            team_id: None,
            judge_id: Uuid::new_v4(),
            heat,
            value: Decimal::from(10),
            unit: "pontos".to_string(),
            time_components: None,
            attempts: None,
            notes: None,
            position: None,
            medal: None,
            recorded_at: chrono::Utc::now().naive_utc(),
        }
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_key() {
        let store = MemoryStore::new();
        let (event, modality, athlete) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let first = score(event, modality, athlete, None);
        store.upsert(&first.key(), first.clone()).await.unwrap();

        let mut second = score(event, modality, athlete, None);
        second.value = Decimal::from(20);
        store.upsert(&second.key(), second).await.unwrap();

        let listed = store.list_by_scope(event, modality, None).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].value, Decimal::from(20));
    }

    #[tokio::test]
    async fn test_scope_listing_filters_by_heat() {
        let store = MemoryStore::new();
        let (event, modality) = (Uuid::new_v4(), Uuid::new_v4());

        let in_heat = score(event, modality, Uuid::new_v4(), Some(HeatNumber::Regular(1)));
        let heatless = score(event, modality, Uuid::new_v4(), None);
        store.upsert(&in_heat.key(), in_heat).await.unwrap();
        store.upsert(&heatless.key(), heatless).await.unwrap();

        let heat_scope = store
            .list_by_scope(event, modality, Some(HeatNumber::Regular(1)))
            .await
            .unwrap();
        assert_eq!(heat_scope.len(), 1);

        let no_heat_scope = store.list_by_scope(event, modality, None).await.unwrap();
        assert_eq!(no_heat_scope.len(), 1);
    }
}

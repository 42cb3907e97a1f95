//! End-to-end submission flow over the in-memory store: normalization,
//! team fan-out, upsert semantics, heat isolation and rank/medal assignment.

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use engine::{ConflictPolicy, EngineError, HeatManager, SubmissionService};
use storage::dto::submission::{FieldValue, SubmissionRequest};
use storage::error::{Result as StorageResult, StorageError};
use storage::models::{HeatNumber, Medal, NormalizedScore, RuleType, ScoreKey, TeamRef};
use storage::store::memory::MemoryStore;
use storage::store::ScoreStore;

/// Score store that fails selected operations while delegating the rest to
/// the in-memory store, for exercising the flow's degraded paths.
struct FlakyScoreStore {
    inner: Arc<MemoryStore>,
    failing_athletes: Vec<Uuid>,
    fail_listing: bool,
}

#[async_trait::async_trait]
impl ScoreStore for FlakyScoreStore {
    async fn upsert(&self, key: &ScoreKey, record: NormalizedScore) -> StorageResult<NormalizedScore> {
        if self.failing_athletes.contains(&record.athlete_id) {
            return Err(StorageError::ConstraintViolation(
                "write rejected by the backend".to_string(),
            ));
        }
        self.inner.upsert(key, record).await
    }

    async fn list_by_scope(
        &self,
        event_id: Uuid,
        modality_id: Uuid,
        heat: Option<HeatNumber>,
    ) -> StorageResult<Vec<NormalizedScore>> {
        if self.fail_listing {
            return Err(StorageError::ConstraintViolation(
                "listing unavailable".to_string(),
            ));
        }
        self.inner.list_by_scope(event_id, modality_id, heat).await
    }

    async fn delete(&self, key: &ScoreKey) -> StorageResult<()> {
        self.inner.delete(key).await
    }
}

fn service(store: &Arc<MemoryStore>) -> SubmissionService {
    SubmissionService::new(store.clone(), store.clone(), store.clone())
}

fn request(
    event_id: Uuid,
    modality_id: Uuid,
    athlete_id: Uuid,
    rule_type: RuleType,
    fields: Vec<(&str, FieldValue)>,
) -> SubmissionRequest {
    SubmissionRequest {
        event_id,
        modality_id,
        athlete_id,
        judge_id: Uuid::new_v4(),
        heat: None,
        rule_type,
        fields: fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        notes: None,
    }
}

fn time_fields(minutes: i64, seconds: i64, milliseconds: i64) -> Vec<(&'static str, FieldValue)> {
    vec![
        ("minutes", FieldValue::Number(Decimal::from(minutes))),
        ("seconds", FieldValue::Number(Decimal::from(seconds))),
        ("milliseconds", FieldValue::Number(Decimal::from(milliseconds))),
    ]
}

#[tokio::test]
async fn test_three_time_entries_rank_ascending_with_medals() {
    let store = Arc::new(MemoryStore::new());
    let service = service(&store);
    let (event, modality) = (Uuid::new_v4(), Uuid::new_v4());

    // 00:30.500, 00:29.000, 00:31.250
    let entries = [
        (time_fields(0, 30, 500), 30_500i64),
        (time_fields(0, 29, 0), 29_000),
        (time_fields(0, 31, 250), 31_250),
    ];

    let mut last = None;
    for (fields, _) in &entries {
        let req = request(event, modality, Uuid::new_v4(), RuleType::Time, fields.clone());
        last = Some(service.submit(req).await.unwrap());
    }

    let outcome = last.unwrap();
    assert!(!outcome.ranking_pending);
    let ranking = outcome.ranking;
    assert_eq!(ranking.len(), 3);

    let values: Vec<Decimal> = ranking.iter().map(|s| s.value).collect();
    assert_eq!(
        values,
        vec![Decimal::from(29_000), Decimal::from(30_500), Decimal::from(31_250)]
    );
    assert_eq!(ranking[0].position, Some(1));
    assert_eq!(ranking[0].medal, Some(Medal::Gold));
    assert_eq!(ranking[1].medal, Some(Medal::Silver));
    assert_eq!(ranking[2].medal, Some(Medal::Bronze));
}

#[tokio::test]
async fn test_distance_ranks_descending() {
    let store = Arc::new(MemoryStore::new());
    let service = service(&store);
    let (event, modality) = (Uuid::new_v4(), Uuid::new_v4());

    let ten_twenty = Uuid::new_v4();
    for (athlete, meters, centimeters) in [(ten_twenty, 10, 20), (Uuid::new_v4(), 10, 5)] {
        let req = request(
            event,
            modality,
            athlete,
            RuleType::Distance,
            vec![
                ("meters", FieldValue::Number(Decimal::from(meters))),
                ("centimeters", FieldValue::Number(Decimal::from(centimeters))),
            ],
        );
        service.submit(req).await.unwrap();
    }

    let ranked = service.ranked_scope(event, modality, None).await.unwrap();
    assert_eq!(ranked[0].athlete_id, ten_twenty);
    assert_eq!(ranked[0].value, Decimal::new(1020, 2));
    assert_eq!(ranked[0].position, Some(1));
    assert_eq!(ranked[0].medal, Some(Medal::Gold));
    assert_eq!(ranked[1].value, Decimal::new(1005, 2));
}

#[tokio::test]
async fn test_team_submission_fans_out_to_members() {
    let store = Arc::new(MemoryStore::new());
    let (event, modality) = (Uuid::new_v4(), Uuid::new_v4());
    let members = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
    store
        .add_team(TeamRef {
            team_id: Uuid::new_v4(),
            member_athlete_ids: members.to_vec(),
        })
        .await;
    let service = service(&store);

    let mut req = request(
        event,
        modality,
        members[0],
        RuleType::Points,
        vec![("score", FieldValue::Number(Decimal::from(42)))],
    );
    req.heat = Some(HeatNumber::Regular(1));
    let outcome = service.submit(req).await.unwrap();

    assert_eq!(outcome.propagated, 2);
    assert!(outcome.propagation_failures.is_empty());

    let scope = service
        .ranked_scope(event, modality, Some(HeatNumber::Regular(1)))
        .await
        .unwrap();
    assert_eq!(scope.len(), 3);
    for member in members {
        let score = scope.iter().find(|s| s.athlete_id == member).unwrap();
        assert_eq!(score.value, Decimal::from(42));
        assert_eq!(score.unit, "pontos");
    }
}

#[tokio::test]
async fn test_resubmission_upserts_instead_of_appending() {
    let store = Arc::new(MemoryStore::new());
    let service = service(&store);
    let (event, modality, athlete) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

    let first = request(event, modality, athlete, RuleType::Time, time_fields(0, 31, 0));
    service.submit(first).await.unwrap();

    let corrected = request(event, modality, athlete, RuleType::Time, time_fields(0, 29, 500));
    service.submit(corrected).await.unwrap();

    assert_eq!(store.score_count().await, 1);
    let scope = service.ranked_scope(event, modality, None).await.unwrap();
    assert_eq!(scope[0].value, Decimal::from(29_500));
    assert_eq!(scope[0].position, Some(1));
}

#[tokio::test]
async fn test_heat_isolation() {
    let store = Arc::new(MemoryStore::new());
    let service = service(&store);
    let (event, modality) = (Uuid::new_v4(), Uuid::new_v4());

    let mut heat_one = request(
        event,
        modality,
        Uuid::new_v4(),
        RuleType::Points,
        vec![("score", FieldValue::Number(Decimal::from(50)))],
    );
    heat_one.heat = Some(HeatNumber::Regular(1));
    service.submit(heat_one).await.unwrap();

    let mut heat_two = request(
        event,
        modality,
        Uuid::new_v4(),
        RuleType::Points,
        vec![("score", FieldValue::Number(Decimal::from(10)))],
    );
    heat_two.heat = Some(HeatNumber::Regular(2));
    let outcome = service.submit(heat_two).await.unwrap();

    // The heat-2 recompute must not see heat 1's score: its only entry is
    // position 1 despite the higher score in heat 1.
    assert_eq!(outcome.ranking.len(), 1);
    assert_eq!(outcome.ranking[0].position, Some(1));

    let heat_one_scope = service
        .ranked_scope(event, modality, Some(HeatNumber::Regular(1)))
        .await
        .unwrap();
    assert_eq!(heat_one_scope.len(), 1);
    assert_eq!(heat_one_scope[0].position, Some(1));

    let final_scope = service
        .ranked_scope(event, modality, Some(HeatNumber::Final))
        .await
        .unwrap();
    assert!(final_scope.is_empty());
}

#[tokio::test]
async fn test_reject_policy_blocks_conflicting_team_overwrite() {
    let store = Arc::new(MemoryStore::new());
    let (event, modality) = (Uuid::new_v4(), Uuid::new_v4());
    let members = [Uuid::new_v4(), Uuid::new_v4()];
    store
        .add_team(TeamRef {
            team_id: Uuid::new_v4(),
            member_athlete_ids: members.to_vec(),
        })
        .await;

    // The teammate already has an individual score in the scope.
    let service = service(&store);
    let individual = request(
        event,
        modality,
        members[1],
        RuleType::Points,
        vec![("score", FieldValue::Number(Decimal::from(10)))],
    );
    service.submit(individual).await.unwrap();

    let rejecting = SubmissionService::new(store.clone(), store.clone(), store.clone())
        .with_policy(ConflictPolicy::Reject);
    let team_submission = request(
        event,
        modality,
        members[0],
        RuleType::Points,
        vec![("score", FieldValue::Number(Decimal::from(42)))],
    );
    let err = rejecting.submit(team_submission).await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    // Default policy: last team write wins.
    let overwriting = request(
        event,
        modality,
        members[0],
        RuleType::Points,
        vec![("score", FieldValue::Number(Decimal::from(42)))],
    );
    service.submit(overwriting).await.unwrap();
    let scope = service.ranked_scope(event, modality, None).await.unwrap();
    let teammate = scope.iter().find(|s| s.athlete_id == members[1]).unwrap();
    assert_eq!(teammate.value, Decimal::from(42));
}

#[tokio::test]
async fn test_final_heat_flow_with_heat_manager() {
    let store = Arc::new(MemoryStore::new());
    let manager = HeatManager::new(store.clone());
    let service = service(&store);
    let (event, modality) = (Uuid::new_v4(), Uuid::new_v4());

    assert!(manager.create_final_heat(event, modality).await.is_err());
    manager.create_regular_heat(event, modality).await.unwrap();
    let final_heat = manager.create_final_heat(event, modality).await.unwrap();

    let mut req = request(
        event,
        modality,
        Uuid::new_v4(),
        RuleType::Time,
        time_fields(1, 2, 3),
    );
    req.heat = Some(final_heat.number);
    let outcome = service.submit(req).await.unwrap();

    assert_eq!(outcome.score.heat, Some(HeatNumber::Final));
    assert_eq!(outcome.score.value, Decimal::from(62_003));
    assert_eq!(outcome.ranking[0].medal, Some(Medal::Gold));
}

#[tokio::test]
async fn test_ranking_survives_mixed_submission_order() {
    let store = Arc::new(MemoryStore::new());
    let service = service(&store);
    let (event, modality) = (Uuid::new_v4(), Uuid::new_v4());

    let mut athletes = Vec::new();
    for seconds in [45, 40, 50, 42] {
        let athlete = Uuid::new_v4();
        athletes.push((athlete, seconds));
        let req = request(event, modality, athlete, RuleType::Time, time_fields(0, seconds, 0));
        service.submit(req).await.unwrap();
    }

    let ranked = service.ranked_scope(event, modality, None).await.unwrap();
    let positions: Vec<(Option<i32>, Decimal)> =
        ranked.iter().map(|s| (s.position, s.value)).collect();
    assert_eq!(
        positions,
        vec![
            (Some(1), Decimal::from(40_000)),
            (Some(2), Decimal::from(42_000)),
            (Some(3), Decimal::from(45_000)),
            (Some(4), Decimal::from(50_000)),
        ]
    );
    // Exactly the podium carries medals.
    assert!(ranked[0..3].iter().all(|s| s.medal.is_some()));
    assert_eq!(ranked[3].medal, None);
}

#[tokio::test]
async fn test_teammate_write_failure_keeps_primary_and_is_reported() {
    let store = Arc::new(MemoryStore::new());
    let (event, modality) = (Uuid::new_v4(), Uuid::new_v4());
    let members = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
    store
        .add_team(TeamRef {
            team_id: Uuid::new_v4(),
            member_athlete_ids: members.to_vec(),
        })
        .await;

    let flaky = Arc::new(FlakyScoreStore {
        inner: store.clone(),
        failing_athletes: vec![members[1]],
        fail_listing: false,
    });
    let service = SubmissionService::new(flaky, store.clone(), store.clone());

    let req = request(
        event,
        modality,
        members[0],
        RuleType::Points,
        vec![("score", FieldValue::Number(Decimal::from(42)))],
    );
    let outcome = service.submit(req).await.unwrap();

    // The failed teammate write is reported, not escalated: the primary and
    // the surviving clone are stored and ranked.
    assert_eq!(outcome.score.athlete_id, members[0]);
    assert_eq!(outcome.propagated, 1);
    assert_eq!(outcome.propagation_failures.len(), 1);
    assert_eq!(outcome.propagation_failures[0].athlete_id, members[1]);
    assert!(!outcome.ranking_pending);
    assert_eq!(outcome.ranking.len(), 2);

    assert_eq!(store.score_count().await, 2);
    let scope = store.list_by_scope(event, modality, None).await.unwrap();
    assert!(scope.iter().any(|s| s.athlete_id == members[0]));
    assert!(scope.iter().all(|s| s.athlete_id != members[1]));
}

#[tokio::test]
async fn test_failed_recompute_acknowledges_with_ranking_pending() {
    let store = Arc::new(MemoryStore::new());
    let (event, modality, athlete) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

    // Every listing fails, so the recompute fails on the retry too.
    let flaky = Arc::new(FlakyScoreStore {
        inner: store.clone(),
        failing_athletes: Vec::new(),
        fail_listing: true,
    });
    let service = SubmissionService::new(flaky, store.clone(), store.clone());

    let req = request(event, modality, athlete, RuleType::Time, time_fields(0, 29, 0));
    let outcome = service.submit(req).await.unwrap();

    // The score is durable and acknowledged; only the positions are stale.
    assert!(outcome.ranking_pending);
    assert!(outcome.ranking.is_empty());
    assert_eq!(outcome.score.value, Decimal::from(29_000));

    let scope = store.list_by_scope(event, modality, None).await.unwrap();
    assert_eq!(scope.len(), 1);
    assert_eq!(scope[0].athlete_id, athlete);
    assert_eq!(scope[0].position, None);
}

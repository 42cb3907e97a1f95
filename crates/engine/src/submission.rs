//! End-to-end submission flow: normalize, propagate to teammates, persist,
//! recompute the scope's ranking. Recomputes are serialized per scope so two
//! concurrent submissions cannot overwrite each other's freshly written
//! ranks with stale sort results.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use storage::dto::submission::SubmissionRequest;
use storage::models::{HeatNumber, NormalizedScore, SortDirection};
use storage::store::{ScoreStore, ScoringModelProvider, TeamMembershipProvider};

use crate::error::{EngineError, Result};
use crate::heats::ScoreScope;
use crate::registry::ModelRegistry;
use crate::{normalizer, propagation, ranking};

/// What happens when a team submission would overwrite a teammate's
/// pre-existing, different score in the same heat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// The team submission is authoritative; the clone overwrites.
    Overwrite,
    /// The submission is rejected so the conflicting score must be resolved
    /// explicitly first.
    Reject,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PropagationFailure {
    pub athlete_id: Uuid,
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmissionOutcome {
    pub score: NormalizedScore,
    /// Teammate records written alongside the primary.
    pub propagated: usize,
    /// Teammate writes that failed after the primary succeeded. The primary
    /// is never rolled back for these.
    pub propagation_failures: Vec<PropagationFailure>,
    /// The scope's full ranking after recompute, in rank order.
    pub ranking: Vec<NormalizedScore>,
    /// Set when the recompute failed after a retry: scores are durable but
    /// the scope's positions are stale until the next successful recompute.
    pub ranking_pending: bool,
}

#[derive(Default)]
struct ScopeLocks {
    inner: Mutex<HashMap<ScoreScope, Arc<Mutex<()>>>>,
}

impl ScopeLocks {
    async fn lock_for(&self, scope: ScoreScope) -> Arc<Mutex<()>> {
        let mut locks = self.inner.lock().await;
        // A uniquely held Arc means no submission is using that scope's
        // lock; sweep those so the map stays bounded by active scopes.
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks.entry(scope).or_default().clone()
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}

pub struct SubmissionService {
    scores: Arc<dyn ScoreStore>,
    teams: Arc<dyn TeamMembershipProvider>,
    registry: ModelRegistry,
    policy: ConflictPolicy,
    locks: ScopeLocks,
}

impl SubmissionService {
    pub fn new(
        scores: Arc<dyn ScoreStore>,
        teams: Arc<dyn TeamMembershipProvider>,
        models: Arc<dyn ScoringModelProvider>,
    ) -> Self {
        Self {
            scores,
            teams,
            registry: ModelRegistry::new(models),
            policy: ConflictPolicy::Overwrite,
            locks: ScopeLocks::default(),
        }
    }

    pub fn with_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Processes one judge submission end to end. Returns the stored primary
    /// score together with propagation results and the recomputed ranking.
    pub async fn submit(&self, request: SubmissionRequest) -> Result<SubmissionOutcome> {
        request
            .validate()
            .map_err(|e| EngineError::validation("request", e.to_string()))?;

        let model = self.registry.model(request.modality_id).await?;
        let mut primary = normalizer::normalize(&request, model.as_ref())?;

        let team = self.teams.team_for_athlete(request.athlete_id).await?;
        let clones = match &team {
            Some(team) => {
                primary.team_id = Some(team.team_id);
                propagation::propagate(&primary, team)
            }
            None => Vec::new(),
        };

        let scope = ScoreScope {
            event_id: primary.event_id,
            modality_id: primary.modality_id,
            heat: primary.heat,
        };
        let direction = request.rule_type.direction();

        let lock = self.locks.lock_for(scope).await;
        let _guard = lock.lock().await;

        if self.policy == ConflictPolicy::Reject && !clones.is_empty() {
            self.check_teammate_conflicts(&scope, &clones).await?;
        }

        let stored = self.upsert_with_retry(&primary).await?;

        let mut propagated = 0;
        let mut propagation_failures = Vec::new();
        for clone in &clones {
            match self.upsert_with_retry(clone).await {
                Ok(_) => propagated += 1,
                Err(err) => {
                    tracing::warn!(
                        athlete_id = %clone.athlete_id,
                        error = %err,
                        "teammate write failed; keeping primary score"
                    );
                    propagation_failures.push(PropagationFailure {
                        athlete_id: clone.athlete_id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        let (ranking, ranking_pending) = match self.recompute_scope(&scope, direction).await {
            Ok(ranked) => (ranked, false),
            Err(first) => {
                tracing::warn!(error = %first, "ranking recompute failed; retrying once");
                match self.recompute_scope(&scope, direction).await {
                    Ok(ranked) => (ranked, false),
                    Err(err) => {
                        tracing::error!(
                            error = %err,
                            "ranking recompute failed after retry; scope left un-ranked"
                        );
                        (Vec::new(), true)
                    }
                }
            }
        };

        Ok(SubmissionOutcome {
            score: stored,
            propagated,
            propagation_failures,
            ranking,
            ranking_pending,
        })
    }

    /// The scope's stored scores in rank order, for the read side. Unranked
    /// records (a crash between the score and rank writes) sort last.
    pub async fn ranked_scope(
        &self,
        event_id: Uuid,
        modality_id: Uuid,
        heat: Option<HeatNumber>,
    ) -> Result<Vec<NormalizedScore>> {
        let mut scores = self.scores.list_by_scope(event_id, modality_id, heat).await?;
        scores.sort_by(ranking::by_position);
        Ok(scores)
    }

    async fn check_teammate_conflicts(
        &self,
        scope: &ScoreScope,
        clones: &[NormalizedScore],
    ) -> Result<()> {
        let existing = self
            .scores
            .list_by_scope(scope.event_id, scope.modality_id, scope.heat)
            .await?;

        for clone in clones {
            let prior = existing.iter().find(|s| s.athlete_id == clone.athlete_id);
            if let Some(prior) = prior {
                if prior.value != clone.value {
                    return Err(EngineError::Conflict(format!(
                        "athlete {} already has a different score in this scope",
                        clone.athlete_id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Upserts one record, retrying once as an update when the store reports
    /// a unique violation the upsert did not resolve.
    async fn upsert_with_retry(&self, record: &NormalizedScore) -> Result<NormalizedScore> {
        match self.scores.upsert(&record.key(), record.clone()).await {
            Ok(stored) => Ok(stored),
            Err(err) if err.is_unique_violation() => {
                tracing::warn!(error = %err, "upsert hit unique violation; retrying as update");
                Ok(self.scores.upsert(&record.key(), record.clone()).await?)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn recompute_scope(
        &self,
        scope: &ScoreScope,
        direction: SortDirection,
    ) -> Result<Vec<NormalizedScore>> {
        let scores = self
            .scores
            .list_by_scope(scope.event_id, scope.modality_id, scope.heat)
            .await?;
        let ranked = ranking::rank(scores, direction);

        let mut stored = Vec::with_capacity(ranked.len());
        for score in ranked {
            stored.push(self.scores.upsert(&score.key(), score).await?);
        }
        Ok(stored)
    }
}

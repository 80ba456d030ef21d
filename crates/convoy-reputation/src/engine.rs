use std::sync::Arc;

use chrono::{DateTime, Utc};

use convoy_types::{AgentId, Opinion, ReputationConfig, Result};

use crate::combiner::{OpinionCombiner, combiner_for};
use crate::opinion::local_opinion;
use crate::recommendation::{RecommendedOpinion, recommended_opinion};
use crate::registry::NetworkSnapshot;
use crate::score::{ReputationBreakdown, reputation_score};
use crate::selector::{RankedCandidate, rank_candidates, select_best};
use crate::temporal::{DirectEvidence, TemporalWeighter};

/// Subjective-logic reputation engine.
///
/// Stateless apart from its configuration: every query is recomputed from the logs in the
/// snapshot it is given, at the logical time `now` supplied by the caller.
#[derive(Debug, Clone)]
pub struct ReputationEngine {
    config: Arc<ReputationConfig>,
    combiner: Arc<dyn OpinionCombiner>,
}

impl ReputationEngine {
    /// Engine using the combination policy named in `config`.
    pub fn new(config: ReputationConfig) -> Self {
        let combiner = combiner_for(config.combiner);
        Self::with_combiner(config, combiner)
    }

    /// Engine with a caller-supplied combination strategy.
    pub fn with_combiner(config: ReputationConfig, combiner: Arc<dyn OpinionCombiner>) -> Self {
        Self {
            config: Arc::new(config),
            combiner,
        }
    }

    pub fn config(&self) -> &ReputationConfig {
        &self.config
    }

    pub fn combiner(&self) -> &dyn OpinionCombiner {
        self.combiner.as_ref()
    }

    fn weighter(&self, now: DateTime<Utc>) -> TemporalWeighter<'_> {
        TemporalWeighter::new(&self.config, now)
    }

    /// Weighted evidence the observer's own log holds about `target`.
    pub fn direct_evidence(
        &self,
        snapshot: &NetworkSnapshot,
        observer: &AgentId,
        target: &AgentId,
        now: DateTime<Utc>,
    ) -> Result<DirectEvidence> {
        let view = snapshot.agent(observer)?;
        Ok(self.weighter(now).direct_evidence(view.log(), target))
    }

    /// The observer's local opinion of `target`.
    pub fn direct_opinion(
        &self,
        snapshot: &NetworkSnapshot,
        observer: &AgentId,
        target: &AgentId,
        now: DateTime<Utc>,
    ) -> Result<Opinion> {
        let evidence = self.direct_evidence(snapshot, observer, target, now)?;
        Ok(local_opinion(evidence.mass(), evidence.comm_quality))
    }

    /// One-hop recommendation about `target` gathered from `neighbors`.
    pub fn recommended_opinion(
        &self,
        snapshot: &NetworkSnapshot,
        observer: &AgentId,
        target: &AgentId,
        neighbors: &[AgentId],
        now: DateTime<Utc>,
    ) -> Result<RecommendedOpinion> {
        let view = snapshot.agent(observer)?;
        Ok(recommended_opinion(
            snapshot,
            view,
            target,
            neighbors,
            &self.weighter(now),
        ))
    }

    /// Full pipeline with every intermediate opinion exposed.
    pub fn compute_reputation_debug(
        &self,
        snapshot: &NetworkSnapshot,
        self_id: &AgentId,
        target: &AgentId,
        neighbors: &[AgentId],
        now: DateTime<Utc>,
    ) -> Result<ReputationBreakdown> {
        let local = self.direct_opinion(snapshot, self_id, target, now)?;
        let recommended = self.recommended_opinion(snapshot, self_id, target, neighbors, now)?;
        let combined = self.combiner.combine(&local, &recommended.opinion);
        let score = reputation_score(&combined, self.config.gamma);

        tracing::debug!(
            observer = %self_id,
            target = %target,
            combiner = self.combiner.name(),
            neighbors = recommended.contributions.len(),
            score,
            "computed reputation"
        );

        Ok(ReputationBreakdown {
            score,
            local,
            recommended,
            combined,
        })
    }

    /// Reputation of `target` as seen by `self_id`.
    pub fn compute_reputation(
        &self,
        snapshot: &NetworkSnapshot,
        self_id: &AgentId,
        target: &AgentId,
        neighbors: &[AgentId],
        now: DateTime<Utc>,
    ) -> Result<f64> {
        self.compute_reputation_debug(snapshot, self_id, target, neighbors, now)
            .map(|breakdown| breakdown.score)
    }

    fn score_candidates(
        &self,
        snapshot: &NetworkSnapshot,
        self_id: &AgentId,
        candidates: &[AgentId],
        neighbors: &[AgentId],
        now: DateTime<Utc>,
    ) -> Result<Vec<RankedCandidate>> {
        candidates
            .iter()
            .map(|candidate| {
                self.compute_reputation(snapshot, self_id, candidate, neighbors, now)
                    .map(|score| RankedCandidate {
                        id: candidate.clone(),
                        score,
                    })
            })
            .collect()
    }

    /// Every candidate with its score, best first. Equal scores keep input order.
    pub fn rank_providers(
        &self,
        snapshot: &NetworkSnapshot,
        self_id: &AgentId,
        candidates: &[AgentId],
        neighbors: &[AgentId],
        now: DateTime<Utc>,
    ) -> Result<Vec<RankedCandidate>> {
        let scored = self.score_candidates(snapshot, self_id, candidates, neighbors, now)?;
        Ok(rank_candidates(scored))
    }

    /// Highest-reputation candidate, or `None` for an empty candidate list.
    pub fn select_optimal_provider(
        &self,
        snapshot: &NetworkSnapshot,
        self_id: &AgentId,
        candidates: &[AgentId],
        neighbors: &[AgentId],
        now: DateTime<Utc>,
    ) -> Result<Option<AgentId>> {
        if candidates.is_empty() {
            return Ok(None);
        }
        let scored = self.score_candidates(snapshot, self_id, candidates, neighbors, now)?;
        Ok(select_best(scored))
    }
}

impl Default for ReputationEngine {
    fn default() -> Self {
        Self::new(ReputationConfig::default())
    }
}

use serde::{Deserialize, Serialize};

use convoy_types::{AgentId, Interaction, Opinion, TrajectoryEvidence, Vector};

use crate::integration::{EdgeWeight, integration_weight};
use crate::opinion::direct_opinion;
use crate::registry::{AgentView, NetworkSnapshot};
use crate::temporal::TemporalWeighter;

/// What one neighbor contributed to a recommended opinion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborRecommendation {
    pub neighbor: AgentId,
    /// The neighbor's own direct opinion of the target.
    pub opinion: Opinion,
    pub edge: EdgeWeight,
}

/// Weighted average of neighbor opinions about one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedOpinion {
    pub opinion: Opinion,
    pub total_weight: f64,
    pub contributions: Vec<NeighborRecommendation>,
}

/// Trajectory pair recorded on the edge `from → to`, chosen according to `policy`.
///
/// Empty slices when the edge was never observed.
pub fn edge_trajectories<'a>(
    log: &'a [Interaction],
    from: &AgentId,
    to: &AgentId,
    policy: TrajectoryEvidence,
) -> (&'a [Vector], &'a [Vector]) {
    let mut edges = log.iter().filter(|r| r.is_edge(from, to));
    let record = match policy {
        TrajectoryEvidence::First => edges.next(),
        TrajectoryEvidence::Latest => edges.last(),
    };
    record
        .map(|r| (r.sender_trajectory.as_slice(), r.recipient_trajectory.as_slice()))
        .unwrap_or_default()
}

/// Gather one-hop recommendations about `target` on behalf of `observer`.
///
/// Only ids that are registered peers of the observer and present in the snapshot are
/// consulted; anything else is skipped. Each neighbor reports its direct opinion only, so
/// recommendations never chain. With no usable weight the result is [`Opinion::VACUOUS`].
pub fn recommended_opinion(
    snapshot: &NetworkSnapshot,
    observer: &AgentView,
    target: &AgentId,
    neighbors: &[AgentId],
    weighter: &TemporalWeighter<'_>,
) -> RecommendedOpinion {
    let policy = weighter.config().trajectory_evidence;
    let mut contributions = Vec::with_capacity(neighbors.len());
    let (mut belief, mut disbelief, mut uncertainty, mut total_weight) = (0.0, 0.0, 0.0, 0.0);

    for neighbor_id in neighbors {
        if !observer.has_peer(neighbor_id) {
            tracing::debug!(
                observer = %observer.id(),
                neighbor = %neighbor_id,
                "not a registered peer, skipping"
            );
            continue;
        }
        let Some(neighbor) = snapshot.get(neighbor_id) else {
            tracing::debug!(
                observer = %observer.id(),
                neighbor = %neighbor_id,
                "peer not in registry, skipping"
            );
            continue;
        };

        let log = neighbor.log();
        let opinion = direct_opinion(log, target, weighter);
        let (trajectory_from, trajectory_to) = edge_trajectories(log, neighbor_id, target, policy);
        let edge = integration_weight(
            log,
            neighbor_id,
            target,
            trajectory_from,
            trajectory_to,
            weighter,
        );
        tracing::trace!(
            neighbor = %neighbor_id,
            target = %target,
            frequency = edge.frequency,
            similarity = edge.similarity,
            weight = edge.weight,
            "recommendation edge"
        );

        belief += edge.weight * opinion.belief;
        disbelief += edge.weight * opinion.disbelief;
        uncertainty += edge.weight * opinion.uncertainty;
        total_weight += edge.weight;

        contributions.push(NeighborRecommendation {
            neighbor: neighbor_id.clone(),
            opinion,
            edge,
        });
    }

    let opinion = if total_weight == 0.0 {
        Opinion::VACUOUS
    } else {
        Opinion {
            belief: belief / total_weight,
            disbelief: disbelief / total_weight,
            uncertainty: uncertainty / total_weight,
        }
    };

    RecommendedOpinion {
        opinion,
        total_weight,
        contributions,
    }
}

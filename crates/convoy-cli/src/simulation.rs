use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use convoy_reputation::{AgentRegistry, NetworkSnapshot, RankedCandidate, ReputationEngine};
use convoy_types::{AgentId, Interaction, ReputationConfig, Vector};

use crate::config::SimulationSettings;

/// Messages accepted by the ingestion writer.
#[derive(Debug)]
pub enum IngestMessage {
    Record(Interaction),
    /// Replies with the number of records applied so far, once everything queued before it
    /// has been written.
    Flush(oneshot::Sender<usize>),
}

/// Single writer that owns all appends to the registry.
///
/// Producers only hold the sender; a `Flush` acts as the barrier between an ingestion phase
/// and the queries that follow it.
pub fn spawn_ingest_writer(
    registry: Arc<AgentRegistry>,
    capacity: usize,
) -> (mpsc::Sender<IngestMessage>, tokio::task::JoinHandle<usize>) {
    let (tx, mut rx) = mpsc::channel::<IngestMessage>(capacity);
    let handle = tokio::spawn(async move {
        let mut applied = 0usize;
        while let Some(message) = rx.recv().await {
            match message {
                IngestMessage::Record(record) => match registry.ingest(record) {
                    Ok(()) => applied += 1,
                    Err(e) => tracing::error!("Failed to ingest interaction: {}", e),
                },
                IngestMessage::Flush(reply) => {
                    // The flushing side may have given up waiting.
                    let _ = reply.send(applied);
                }
            }
        }
        tracing::debug!(applied, "ingest writer stopped");
        applied
    });
    (tx, handle)
}

async fn flush(tx: &mpsc::Sender<IngestMessage>) -> Result<usize> {
    let (reply_tx, reply_rx) = oneshot::channel();
    tx.send(IngestMessage::Flush(reply_tx))
        .await
        .context("Ingest writer stopped")?;
    reply_rx.await.context("Ingest writer dropped flush request")
}

/// Synthetic motion record: one sample per round.
///
/// Vehicles start near the beginning of the road, drive at a jittered cruising speed and
/// weave slightly between lane lines. Headings come from consecutive positions.
pub fn synthesize_trajectory(rng: &mut StdRng, rounds: usize, settings: &SimulationSettings) -> Vec<Vector> {
    let dt = settings.round_interval_secs as f64;
    let mut longitudinal: f64 = rng.gen_range(0.0..50.0);
    let lateral_center: f64 = rng.gen_range(1.5..2.0);
    let cruise: f64 = rng.gen_range(8.0..16.0);

    let mut previous: Option<(f64, f64)> = None;
    let mut samples = Vec::with_capacity(rounds);
    for _ in 0..rounds {
        let jitter: f64 = rng.gen_range(-1.5..1.5);
        let speed = (cruise + jitter).max(0.0);
        let lateral: f64 = lateral_center + rng.gen_range(-0.2..0.2);
        let x = (longitudinal / settings.road_length_m).min(1.0);

        let direction = match previous {
            Some((px, py)) => (lateral - py).atan2(x - px),
            None => 0.0,
        };
        samples.push(Vector::new(speed, x, direction));

        previous = Some((x, lateral));
        longitudinal += speed * dt;
    }
    samples
}

/// Link quality for a round: `0.8 + 0.1·sin(round)`, clamped to [0.5, 1].
pub fn comm_quality(round: usize) -> f64 {
    (0.8 + 0.1 * (round as f64).sin()).clamp(0.5, 1.0)
}

/// One agent's standing after a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStanding {
    pub id: AgentId,
    pub malicious: bool,
    /// Mean reputation of this agent across every other agent's view.
    pub reputation: f64,
    /// Difference to the previous round, if there was one.
    pub change: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: usize,
    pub interactions: usize,
    pub honest_interactions: usize,
    pub malicious_interactions: usize,
    pub standings: Vec<AgentStanding>,
    pub min: f64,
    pub max: f64,
    pub honest_mean: Option<f64>,
    pub malicious_mean: Option<f64>,
}

impl RoundSummary {
    /// Honest mean minus malicious mean, when both groups exist.
    pub fn gap(&self) -> Option<f64> {
        Some(self.honest_mean? - self.malicious_mean?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub agents: Vec<AgentId>,
    pub malicious: Vec<AgentId>,
    pub rounds: Vec<RoundSummary>,
    /// Final standings, best first.
    pub ranking: Vec<RankedCandidate>,
    /// Provider each agent would pick after the last round.
    pub selections: BTreeMap<AgentId, Option<AgentId>>,
    pub total_interactions: usize,
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn others<'a>(ids: &'a [AgentId], me: &'a AgentId) -> Vec<AgentId> {
    ids.iter().filter(|id| *id != me).cloned().collect()
}

/// Fixed origin of logical time so runs are reproducible.
fn epoch() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

/// Logical time of `round`, or an error when it falls outside chrono's range.
fn round_time(interval_secs: i64, round: usize) -> Result<DateTime<Utc>> {
    i64::try_from(round)
        .ok()
        .and_then(|r| interval_secs.checked_mul(r))
        .and_then(Duration::try_seconds)
        .and_then(|offset| epoch().checked_add_signed(offset))
        .with_context(|| format!("round {round} at {interval_secs}s intervals is out of range"))
}

/// Average reputation of `subject` over every other agent's view, using all remaining
/// agents as neighbors.
fn perceived_reputation(
    engine: &ReputationEngine,
    snapshot: &NetworkSnapshot,
    ids: &[AgentId],
    subject: &AgentId,
    now: DateTime<Utc>,
) -> Result<f64> {
    let mut scores = Vec::with_capacity(ids.len().saturating_sub(1));
    for observer in ids.iter().filter(|id| *id != subject) {
        let neighbors: Vec<AgentId> = ids
            .iter()
            .filter(|id| *id != observer && *id != subject)
            .cloned()
            .collect();
        scores.push(engine.compute_reputation(snapshot, observer, subject, &neighbors, now)?);
    }
    Ok(mean(&scores).unwrap_or(engine.config().gamma))
}

/// Run the honest/malicious scenario.
///
/// Every round each ordered pair (requester, provider) exchanges data once and the
/// requester logs the outcome: honest providers earn `honest_events`, malicious ones
/// `malicious_events`. After the writer has drained the round, every agent's perceived
/// reputation is computed from a snapshot.
pub async fn run(settings: &SimulationSettings, config: ReputationConfig) -> Result<SimulationReport> {
    if settings.agents < 2 {
        bail!("simulation needs at least two agents, got {}", settings.agents);
    }
    if settings.round_interval_secs < 0 {
        bail!("round_interval_secs must not be negative, got {}", settings.round_interval_secs);
    }
    round_time(settings.round_interval_secs, settings.rounds.saturating_sub(1))?;

    let ids: Vec<AgentId> = (1..=settings.agents).map(|i| AgentId::new(i.to_string())).collect();
    let malicious: HashSet<AgentId> = settings
        .malicious
        .iter()
        .map(|m| AgentId::new(m.as_str()))
        .collect();
    for m in &malicious {
        if !ids.contains(m) {
            tracing::warn!("Malicious id {} is not part of the simulation", m);
        }
    }

    let engine = ReputationEngine::new(config);
    let registry = Arc::new(AgentRegistry::new());
    for id in &ids {
        registry.register(id.clone());
        for peer in others(&ids, id) {
            registry.add_peer(id, peer)?;
        }
    }

    let mut rng = StdRng::seed_from_u64(settings.seed);
    let trajectories: BTreeMap<AgentId, Vec<Vector>> = ids
        .iter()
        .map(|id| (id.clone(), synthesize_trajectory(&mut rng, settings.rounds, settings)))
        .collect();

    tracing::info!(
        agents = ids.len(),
        malicious = malicious.len(),
        rounds = settings.rounds,
        combiner = engine.combiner().name(),
        "Starting simulation"
    );

    let (tx, writer) = spawn_ingest_writer(Arc::clone(&registry), 1024);
    let mut rounds = Vec::with_capacity(settings.rounds);
    let mut previous: BTreeMap<AgentId, f64> = BTreeMap::new();
    let mut total_interactions = 0usize;
    let mut last_now = epoch();

    for round in 0..settings.rounds {
        let now = round_time(settings.round_interval_secs, round)?;
        last_now = now;
        let quality = comm_quality(round);
        let (mut honest_interactions, mut malicious_interactions) = (0usize, 0usize);

        for requester in &ids {
            for provider in ids.iter().filter(|p| *p != requester) {
                let is_malicious = malicious.contains(provider);
                let (pos, neg) = if is_malicious {
                    malicious_interactions += 1;
                    settings.malicious_events
                } else {
                    honest_interactions += 1;
                    settings.honest_events
                };
                let record = Interaction::new(requester.clone(), provider.clone(), pos, neg, now, quality)
                    .with_trajectories(
                        trajectories[requester][round..=round].to_vec(),
                        trajectories[provider][round..=round].to_vec(),
                    );
                tx.send(IngestMessage::Record(record))
                    .await
                    .context("Ingest writer stopped")?;
            }
        }
        let applied = flush(&tx).await?;
        let interactions = honest_interactions + malicious_interactions;
        total_interactions += interactions;

        let snapshot = registry.snapshot();
        let mut standings = Vec::with_capacity(ids.len());
        for id in &ids {
            let reputation = perceived_reputation(&engine, &snapshot, &ids, id, now)?;
            let change = previous.get(id).map(|p| reputation - p);
            previous.insert(id.clone(), reputation);
            standings.push(AgentStanding {
                id: id.clone(),
                malicious: malicious.contains(id),
                reputation,
                change,
            });
        }

        let all: Vec<f64> = standings.iter().map(|s| s.reputation).collect();
        let honest: Vec<f64> = standings.iter().filter(|s| !s.malicious).map(|s| s.reputation).collect();
        let bad: Vec<f64> = standings.iter().filter(|s| s.malicious).map(|s| s.reputation).collect();
        let summary = RoundSummary {
            round: round + 1,
            interactions,
            honest_interactions,
            malicious_interactions,
            min: all.iter().copied().fold(f64::INFINITY, f64::min),
            max: all.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            honest_mean: mean(&honest),
            malicious_mean: mean(&bad),
            standings,
        };
        tracing::info!(
            round = summary.round,
            applied,
            honest_mean = summary.honest_mean,
            malicious_mean = summary.malicious_mean,
            "Round complete"
        );
        rounds.push(summary);
    }

    drop(tx);
    let applied = writer.await.context("Ingest writer panicked")?;
    tracing::debug!(applied, "ingestion finished");

    let snapshot = registry.snapshot();
    let final_scores: Vec<RankedCandidate> = ids
        .iter()
        .map(|id| RankedCandidate {
            id: id.clone(),
            score: previous.get(id).copied().unwrap_or(engine.config().gamma),
        })
        .collect();
    let ranking = convoy_reputation::rank_candidates(final_scores);

    let mut selections = BTreeMap::new();
    for id in &ids {
        let candidates = others(&ids, id);
        let choice = engine.select_optimal_provider(&snapshot, id, &candidates, &candidates, last_now)?;
        selections.insert(id.clone(), choice);
    }

    let mut malicious: Vec<AgentId> = malicious.into_iter().filter(|m| ids.contains(m)).collect();
    malicious.sort();

    Ok(SimulationReport {
        agents: ids,
        malicious,
        rounds,
        ranking,
        selections,
        total_interactions,
    })
}

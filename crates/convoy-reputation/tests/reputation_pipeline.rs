use chrono::{DateTime, Duration, TimeZone, Utc};

use convoy_reputation::*;
use convoy_types::*;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn id(s: &str) -> AgentId {
    AgentId::from(s)
}

fn path(start: f64) -> Vec<Vector> {
    (0..4)
        .map(|i| Vector::new(12.0, start + 0.02 * i as f64, 0.1))
        .collect()
}

/// Two records from "1" about "2", both within the recency window.
#[test]
fn test_golden_two_interactions() {
    let config = ReputationConfig {
        zeta: 0.7,
        sigma: 0.3,
        theta: 1.0,
        tau: 1.0,
        gamma: 0.5,
        recency_threshold_secs: 60.0,
        ..ReputationConfig::default()
    };
    let engine = ReputationEngine::new(config);
    let registry = AgentRegistry::new();
    registry.register("1");
    registry.register("2");
    registry
        .ingest(Interaction::new("1", "2", 1, 0, t0(), 0.9))
        .unwrap();
    registry
        .ingest(Interaction::new("1", "2", 0, 2, t0() + Duration::seconds(1), 0.7))
        .unwrap();
    let snapshot = registry.snapshot();
    let now = t0() + Duration::seconds(2);

    let evidence = engine
        .direct_evidence(&snapshot, &id("1"), &id("2"), now)
        .unwrap();
    let pos_mass = 0.7 * 1.0 * 1.0;
    let neg_mass = 0.7 * 1.0 * 2.0;
    let comm_quality = (0.9 + 0.7) / 2.0;
    assert_eq!(evidence.matched, 2);
    assert_eq!(evidence.past, EvidenceMass::default());
    assert_eq!(evidence.mass().positive, pos_mass);
    assert_eq!(evidence.mass().negative, neg_mass);
    assert_eq!(evidence.comm_quality, comm_quality);

    let total = pos_mass + neg_mass;
    let base_uncertainty = 1.0 - comm_quality;
    let belief = (1.0 - base_uncertainty) * (pos_mass / total) * (pos_mass / 30.0).tanh();
    let disbelief = (1.0 - base_uncertainty) * (neg_mass / total) * (neg_mass / 50.0).tanh();
    let uncertainty = 1.0 - belief - disbelief;
    let score = belief + 0.5 * uncertainty;

    let breakdown = engine
        .compute_reputation_debug(&snapshot, &id("1"), &id("2"), &[], now)
        .unwrap();
    assert_eq!(
        breakdown.local,
        Opinion {
            belief,
            disbelief,
            uncertainty
        }
    );
    assert_eq!(breakdown.combined, breakdown.local);
    assert_eq!(breakdown.recommended.opinion, Opinion::VACUOUS);
    assert_eq!(breakdown.score, score);

    // Worked by hand.
    assert!((belief - 0.006_221_093).abs() < 1e-9);
    assert!((disbelief - 0.014_929_432).abs() < 1e-9);
    assert!((uncertainty - 0.978_849_475).abs() < 1e-9);
    assert!((score - 0.495_645_831).abs() < 1e-9);
}

/// Every peer of `subject` records one interaction about it per round.
fn run_rounds(
    engine: &ReputationEngine,
    subject: &str,
    positive: u32,
    negative: u32,
    rounds: i64,
) -> Vec<Vec<f64>> {
    let names = ["1", "2", "3", "4"];
    let registry = AgentRegistry::new();
    for name in names {
        registry.register(name);
    }
    for owner in names {
        for peer in names.iter().filter(|p| **p != owner) {
            registry.add_peer(&id(owner), *peer).unwrap();
        }
    }
    let observers: Vec<AgentId> = names.iter().filter(|n| **n != subject).map(|n| id(n)).collect();

    let mut history = vec![Vec::new(); observers.len()];
    for round in 0..rounds {
        let ts = t0() + Duration::seconds(round);
        for (k, observer) in observers.iter().enumerate() {
            let record = Interaction::new(observer.clone(), subject, positive, negative, ts, 0.9)
                .with_trajectories(path(0.1 * k as f64), path(0.1 * k as f64 + 0.01));
            registry.ingest(record).unwrap();
        }

        let snapshot = registry.snapshot();
        for (k, observer) in observers.iter().enumerate() {
            let neighbors: Vec<AgentId> =
                observers.iter().filter(|n| *n != observer).cloned().collect();
            let score = engine
                .compute_reputation(&snapshot, observer, &id(subject), &neighbors, ts)
                .unwrap();
            history[k].push(score);
        }
    }
    history
}

fn engines() -> Vec<ReputationEngine> {
    let windowed = ReputationConfig {
        recency_threshold_secs: 2.0,
        ..ReputationConfig::default()
    };
    let fused = ReputationConfig {
        combiner: CombinerPolicy::Weighted { local_weight: 0.6 },
        ..ReputationConfig::default()
    };
    vec![
        ReputationEngine::default(),
        ReputationEngine::new(windowed),
        ReputationEngine::new(fused),
    ]
}

#[test]
fn test_pure_positive_reputation_never_drops() {
    for engine in engines() {
        for scores in run_rounds(&engine, "1", 1, 0, 5) {
            assert!(
                scores.windows(2).all(|w| w[1] >= w[0]),
                "expected non-decreasing, got {scores:?}"
            );
            assert!(scores[4] > scores[0]);
        }
    }
}

#[test]
fn test_pure_negative_reputation_never_rises() {
    for engine in engines() {
        for scores in run_rounds(&engine, "3", 0, 2, 5) {
            assert!(
                scores.windows(2).all(|w| w[1] <= w[0]),
                "expected non-increasing, got {scores:?}"
            );
            assert!(scores[4] < engine.config().gamma);
        }
    }
}

#[test]
fn test_zero_neighbors_equals_local_scalar() {
    let engine = ReputationEngine::default();
    let registry = AgentRegistry::new();
    registry.register("me");
    registry.register("n");
    registry.add_peer(&id("me"), "n").unwrap();
    registry
        .ingest(Interaction::new("me", "t", 4, 1, t0(), 0.85))
        .unwrap();
    registry
        .ingest(Interaction::new("n", "t", 0, 9, t0(), 0.95))
        .unwrap();
    let snapshot = registry.snapshot();

    let local = engine
        .direct_opinion(&snapshot, &id("me"), &id("t"), t0())
        .unwrap();
    let expected = reputation_score(&local, engine.config().gamma);

    let alone = engine
        .compute_reputation(&snapshot, &id("me"), &id("t"), &[], t0())
        .unwrap();
    let with_neighbor = engine
        .compute_reputation(&snapshot, &id("me"), &id("t"), &[id("n")], t0())
        .unwrap();
    assert_eq!(alone, expected);
    assert_eq!(with_neighbor, expected);
}

#[test]
fn test_selector_returns_argmax() {
    let engine = ReputationEngine::default();
    let registry = AgentRegistry::new();
    registry.register("me");
    let evidence = [("a", 1, 0), ("b", 6, 0), ("c", 3, 0), ("d", 0, 4)];
    for (target, pos, neg) in evidence {
        registry
            .ingest(Interaction::new("me", target, pos, neg, t0(), 0.9))
            .unwrap();
    }
    let snapshot = registry.snapshot();
    let candidates: Vec<AgentId> = evidence.iter().map(|(t, _, _)| id(t)).collect();

    let ranked = engine
        .rank_providers(&snapshot, &id("me"), &candidates, &[], t0())
        .unwrap();
    let best_by_hand = ranked
        .iter()
        .max_by(|x, y| x.score.partial_cmp(&y.score).unwrap())
        .unwrap();
    assert_eq!(best_by_hand.id, id("b"));

    let best = engine
        .select_optimal_provider(&snapshot, &id("me"), &candidates, &[], t0())
        .unwrap();
    assert_eq!(best, Some(id("b")));
}

#[test]
fn test_selector_tie_goes_to_first_listed() {
    let engine = ReputationEngine::default();
    let registry = AgentRegistry::new();
    registry.register("me");
    let snapshot = registry.snapshot();

    // Nobody is known, so every candidate scores exactly gamma.
    let best = engine
        .select_optimal_provider(&snapshot, &id("me"), &[id("z"), id("a"), id("m")], &[], t0())
        .unwrap();
    assert_eq!(best, Some(id("z")));
}

use serde::{Deserialize, Serialize};

use convoy_types::{AgentId, Interaction, Vector};

use crate::frequency::interaction_frequency;
use crate::temporal::TemporalWeighter;
use crate::trajectory::trajectory_similarity;

/// Weight of one recommendation edge and the two signals it was built from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeWeight {
    pub frequency: f64,
    pub similarity: f64,
    /// `ρ1·frequency + ρ2·similarity`
    pub weight: f64,
}

/// Integration weight δ of the edge `from → to`, evaluated over `from`'s log.
///
/// The share `1 - ρ1 - ρ2` is reserved for a third signal and currently contributes nothing.
pub fn integration_weight(
    log: &[Interaction],
    from: &AgentId,
    to: &AgentId,
    trajectory_from: &[Vector],
    trajectory_to: &[Vector],
    weighter: &TemporalWeighter<'_>,
) -> EdgeWeight {
    let config = weighter.config();
    let frequency = interaction_frequency(log, from, to, weighter);
    let similarity = trajectory_similarity(trajectory_from, trajectory_to, config);

    EdgeWeight {
        frequency,
        similarity,
        weight: config.rho1 * frequency + config.rho2 * similarity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use convoy_types::ReputationConfig;

    #[test]
    fn test_weight_blends_both_signals() {
        let cfg = ReputationConfig {
            rho1: 0.6,
            rho2: 0.3,
            ..ReputationConfig::default()
        };
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let weighter = TemporalWeighter::new(&cfg, ts);
        let log = vec![
            Interaction::new("a", "b", 2, 0, ts, 0.9),
            Interaction::new("a", "c", 1, 0, ts, 0.9),
        ];
        let path = vec![Vector::new(10.0, 0.2, 0.0), Vector::new(10.0, 0.3, 0.0)];

        let edge = integration_weight(&log, &"a".into(), &"b".into(), &path, &path, &weighter);
        // Frequency: 2 / ((2 + 1) / 2); identical paths give similarity 1.
        assert!((edge.frequency - 4.0 / 3.0).abs() < 1e-12);
        assert!((edge.similarity - 1.0).abs() < 1e-12);
        assert!((edge.weight - (0.6 * 4.0 / 3.0 + 0.3)).abs() < 1e-12);
    }

    #[test]
    fn test_missing_trajectories_leave_frequency_only() {
        let cfg = ReputationConfig::default();
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let weighter = TemporalWeighter::new(&cfg, ts);
        let log = vec![Interaction::new("a", "b", 1, 0, ts, 0.9)];

        let edge = integration_weight(&log, &"a".into(), &"b".into(), &[], &[], &weighter);
        assert_eq!(edge.similarity, 0.0);
        assert!((edge.weight - cfg.rho1).abs() < 1e-12);
    }
}

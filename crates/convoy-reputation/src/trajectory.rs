use std::f64::consts::{FRAC_PI_4, PI};

use serde::{Deserialize, Serialize};

use convoy_types::{ReputationConfig, Vector};

/// Two normalized positions closer than this count as the same place.
pub const LOCATION_MATCH_THRESHOLD: f64 = 0.05;

/// Per-axis dissimilarity of two trajectories, each in [0, 1] for well-formed input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryComparison {
    pub speed: f64,
    pub location: f64,
    pub direction: f64,
}

impl TrajectoryComparison {
    pub fn between(a: &[Vector], b: &[Vector]) -> Self {
        Self {
            speed: speed_difference(a, b),
            location: location_difference(a, b),
            direction: direction_difference(a, b),
        }
    }

    /// `ψ1·speed + ψ2·location + ψ3·direction`
    pub fn dissimilarity(&self, config: &ReputationConfig) -> f64 {
        config.psi1 * self.speed + config.psi2 * self.location + config.psi3 * self.direction
    }
}

/// Similarity of two motion records: `1 - dissimilarity`, or 0 if either is empty.
pub fn trajectory_similarity(a: &[Vector], b: &[Vector], config: &ReputationConfig) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    1.0 - TrajectoryComparison::between(a, b).dissimilarity(config)
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> Option<f64> {
    let len = values.len();
    if len == 0 {
        return None;
    }
    Some(values.sum::<f64>() / len as f64)
}

/// Relative gap between mean speeds.
pub fn speed_difference(a: &[Vector], b: &[Vector]) -> f64 {
    let (Some(mean_a), Some(mean_b)) = (
        mean(a.iter().map(|v| v.speed)),
        mean(b.iter().map(|v| v.speed)),
    ) else {
        return 0.0;
    };

    let max = mean_a.max(mean_b);
    if max == 0.0 {
        return 0.0;
    }
    (mean_a - mean_b).abs() / max
}

/// Length of the longest common subsequence of two position sequences, where positions
/// match when they differ by less than `threshold`.
///
/// Order-preserving but not time-aligned. Keeps only two rows of the DP table.
pub fn lcs_len(a: &[f64], b: &[f64], threshold: f64) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &x in a {
        for (j, &y) in b.iter().enumerate() {
            curr[j + 1] = if (x - y).abs() < threshold {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Share of the longer trajectory not covered by the LCS of the two position sequences.
pub fn location_difference(a: &[Vector], b: &[Vector]) -> f64 {
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 0.0;
    }

    let loc_a: Vec<f64> = a.iter().map(|v| v.location).collect();
    let loc_b: Vec<f64> = b.iter().map(|v| v.location).collect();
    let common = lcs_len(&loc_a, &loc_b, LOCATION_MATCH_THRESHOLD);

    (max_len - common) as f64 / max_len as f64
}

/// Heading difference score.
///
/// The angle between mean headings is folded into [0, π]. Up to π/4 the score is `sin(φ)`;
/// beyond it is `0.5 + |sin(φ + π/4)| / 2`. The two branches do not meet at π/4.
pub fn direction_difference(a: &[Vector], b: &[Vector]) -> f64 {
    let (Some(mean_a), Some(mean_b)) = (
        mean(a.iter().map(|v| v.direction)),
        mean(b.iter().map(|v| v.direction)),
    ) else {
        return 0.0;
    };

    let mut phi = (mean_a - mean_b).abs();
    if phi > PI {
        phi = 2.0 * PI - phi;
    }

    if phi <= FRAC_PI_4 {
        phi.sin()
    } else {
        0.5 + (phi + FRAC_PI_4).sin().abs() / 2.0
    }
}

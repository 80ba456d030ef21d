use serde::{Deserialize, Serialize};

use crate::error::{ConvoyError, Result};

const SUM_TOLERANCE: f64 = 1e-9;

/// Which (neighbor → target) record supplies the trajectory pair for a recommendation edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrajectoryEvidence {
    /// The oldest matching record. Stays fixed once the edge has been observed.
    #[default]
    First,
    /// The newest matching record.
    Latest,
}

/// How local and recommended opinions are merged into the final opinion.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum CombinerPolicy {
    /// Keep the local opinion; recommendations are computed but not applied.
    #[default]
    LocalOnly,
    /// Convex blend `w * local + (1 - w) * recommended`.
    Weighted { local_weight: f64 },
}

/// Scalar weights of the reputation model. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReputationConfig {
    /// Share of uncertainty credited to reputation (γ).
    #[serde(default = "default_gamma")]
    pub gamma: f64,

    /// Integration weight of interaction frequency (ρ1).
    #[serde(default = "default_rho")]
    pub rho1: f64,

    /// Integration weight of trajectory similarity (ρ2).
    #[serde(default = "default_rho")]
    pub rho2: f64,

    /// Weight of recent evidence (ζ).
    #[serde(default = "default_zeta")]
    pub zeta: f64,

    /// Weight of past evidence (σ).
    #[serde(default = "default_sigma")]
    pub sigma: f64,

    /// Decay factor for positive events (θ).
    #[serde(default = "default_decay")]
    pub theta: f64,

    /// Decay factor for negative events (τ).
    #[serde(default = "default_decay")]
    pub tau: f64,

    /// Trajectory weight of the speed axis (ψ1).
    #[serde(default = "default_psi1")]
    pub psi1: f64,

    /// Trajectory weight of the location axis (ψ2).
    #[serde(default = "default_psi2")]
    pub psi2: f64,

    /// Trajectory weight of the direction axis (ψ3).
    #[serde(default = "default_psi3")]
    pub psi3: f64,

    /// Records at most this many seconds old count as recent.
    #[serde(default = "default_recency_threshold", alias = "t_recent")]
    pub recency_threshold_secs: f64,

    #[serde(default)]
    pub trajectory_evidence: TrajectoryEvidence,

    #[serde(default)]
    pub combiner: CombinerPolicy,
}

fn default_gamma() -> f64 {
    0.5
}

fn default_rho() -> f64 {
    0.5
}

fn default_zeta() -> f64 {
    0.7
}

fn default_sigma() -> f64 {
    0.3
}

fn default_decay() -> f64 {
    1.0
}

fn default_psi1() -> f64 {
    0.3
}

fn default_psi2() -> f64 {
    0.4
}

fn default_psi3() -> f64 {
    0.3
}

fn default_recency_threshold() -> f64 {
    60.0
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self {
            gamma: default_gamma(),
            rho1: default_rho(),
            rho2: default_rho(),
            zeta: default_zeta(),
            sigma: default_sigma(),
            theta: default_decay(),
            tau: default_decay(),
            psi1: default_psi1(),
            psi2: default_psi2(),
            psi3: default_psi3(),
            recency_threshold_secs: default_recency_threshold(),
            trajectory_evidence: TrajectoryEvidence::default(),
            combiner: CombinerPolicy::default(),
        }
    }
}

impl ReputationConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ConvoyError::Serialization(e.to_string()))
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| ConvoyError::Serialization(e.to_string()))
    }

    /// Share of the integration weight left for a future third signal: `1 - ρ1 - ρ2`.
    pub fn reserved_integration_weight(&self) -> f64 {
        1.0 - self.rho1 - self.rho2
    }

    /// Check the intended relationships between weights.
    ///
    /// The engine itself runs on any values; this is meant for load time.
    pub fn validate(&self) -> Result<()> {
        let unit_weights = [
            ("gamma", self.gamma),
            ("rho1", self.rho1),
            ("rho2", self.rho2),
            ("zeta", self.zeta),
            ("sigma", self.sigma),
            ("psi1", self.psi1),
            ("psi2", self.psi2),
            ("psi3", self.psi3),
        ];
        let mut problems = Vec::new();

        for (name, value) in unit_weights {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                problems.push(format!("{name} must be within [0, 1], got {value}"));
            }
        }
        for (name, value) in [("theta", self.theta), ("tau", self.tau)] {
            if !value.is_finite() || value < 0.0 {
                problems.push(format!("{name} must be a non-negative number, got {value}"));
            }
        }
        if !self.recency_threshold_secs.is_finite() || self.recency_threshold_secs < 0.0 {
            problems.push(format!(
                "recency_threshold_secs must be a non-negative number, got {}",
                self.recency_threshold_secs
            ));
        }
        if self.rho1 + self.rho2 > 1.0 + SUM_TOLERANCE {
            problems.push(format!(
                "rho1 + rho2 must not exceed 1, got {}",
                self.rho1 + self.rho2
            ));
        }
        if (self.zeta + self.sigma - 1.0).abs() > SUM_TOLERANCE {
            problems.push(format!(
                "zeta + sigma must equal 1, got {}",
                self.zeta + self.sigma
            ));
        }
        let psi_sum = self.psi1 + self.psi2 + self.psi3;
        if (psi_sum - 1.0).abs() > SUM_TOLERANCE {
            problems.push(format!("psi1 + psi2 + psi3 must equal 1, got {psi_sum}"));
        }
        if let CombinerPolicy::Weighted { local_weight } = self.combiner {
            if !local_weight.is_finite() || !(0.0..=1.0).contains(&local_weight) {
                problems.push(format!(
                    "combiner.local_weight must be within [0, 1], got {local_weight}"
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConvoyError::InvalidConfig(problems.join("; ")))
        }
    }
}

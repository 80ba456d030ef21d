use std::ops::{Add, AddAssign};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use convoy_types::{AgentId, Interaction, ReputationConfig};

/// Communication quality assumed when no record about the target exists.
pub const DEFAULT_COMM_QUALITY: f64 = 0.5;

/// Bucket a record falls into relative to the query time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recency {
    Recent,
    Past,
}

/// Decay- and recency-weighted event counts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EvidenceMass {
    pub positive: f64,
    pub negative: f64,
}

impl EvidenceMass {
    pub fn new(positive: f64, negative: f64) -> Self {
        Self { positive, negative }
    }

    pub fn total(&self) -> f64 {
        self.positive + self.negative
    }
}

impl Add for EvidenceMass {
    type Output = EvidenceMass;

    fn add(self, rhs: EvidenceMass) -> EvidenceMass {
        EvidenceMass {
            positive: self.positive + rhs.positive,
            negative: self.negative + rhs.negative,
        }
    }
}

impl AddAssign for EvidenceMass {
    fn add_assign(&mut self, rhs: EvidenceMass) {
        self.positive += rhs.positive;
        self.negative += rhs.negative;
    }
}

/// Everything an observer's log says about one target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectEvidence {
    pub recent: EvidenceMass,
    pub past: EvidenceMass,
    /// Mean communication quality over matched records, or [`DEFAULT_COMM_QUALITY`].
    pub comm_quality: f64,
    /// Number of records that mention the target as recipient.
    pub matched: usize,
}

impl DirectEvidence {
    pub fn mass(&self) -> EvidenceMass {
        self.recent + self.past
    }
}

/// Splits records into recent/past buckets around a fixed logical `now` and applies the
/// configured decay multipliers.
#[derive(Debug, Clone, Copy)]
pub struct TemporalWeighter<'a> {
    config: &'a ReputationConfig,
    now: DateTime<Utc>,
}

impl<'a> TemporalWeighter<'a> {
    pub fn new(config: &'a ReputationConfig, now: DateTime<Utc>) -> Self {
        Self { config, now }
    }

    pub fn config(&self) -> &'a ReputationConfig {
        self.config
    }

    /// Seconds elapsed between `timestamp` and `now`. Negative for records from the future.
    fn age_secs(&self, timestamp: DateTime<Utc>) -> f64 {
        let age = self.now.signed_duration_since(timestamp);
        match age.num_nanoseconds() {
            Some(ns) => ns as f64 / 1e9,
            None => age.num_milliseconds() as f64 / 1e3,
        }
    }

    pub fn classify(&self, timestamp: DateTime<Utc>) -> Recency {
        if self.age_secs(timestamp) <= self.config.recency_threshold_secs {
            Recency::Recent
        } else {
            Recency::Past
        }
    }

    /// Weighted mass of a single record and the bucket it landed in.
    pub fn weigh(&self, record: &Interaction) -> (Recency, EvidenceMass) {
        let recency = self.classify(record.timestamp);
        let weight = match recency {
            Recency::Recent => self.config.zeta,
            Recency::Past => self.config.sigma,
        };
        let mass = EvidenceMass {
            positive: weight * self.config.theta * f64::from(record.positive_events),
            negative: weight * self.config.tau * f64::from(record.negative_events),
        };
        (recency, mass)
    }

    /// Collect the evidence about `target` held in `log`, regardless of who sent it.
    pub fn direct_evidence(&self, log: &[Interaction], target: &AgentId) -> DirectEvidence {
        let mut recent = EvidenceMass::default();
        let mut past = EvidenceMass::default();
        let mut quality_sum = 0.0;
        let mut matched = 0usize;

        for record in log.iter().filter(|r| &r.recipient == target) {
            match self.weigh(record) {
                (Recency::Recent, mass) => recent += mass,
                (Recency::Past, mass) => past += mass,
            }
            quality_sum += record.comm_quality;
            matched += 1;
        }

        let comm_quality = if matched > 0 {
            quality_sum / matched as f64
        } else {
            DEFAULT_COMM_QUALITY
        };

        DirectEvidence {
            recent,
            past,
            comm_quality,
            matched,
        }
    }

    /// Weighted mass of every record on the exact edge `from → to`.
    pub fn edge_mass(&self, log: &[Interaction], from: &AgentId, to: &AgentId) -> EvidenceMass {
        let mut recent = EvidenceMass::default();
        let mut past = EvidenceMass::default();
        for record in log.iter().filter(|r| r.is_edge(from, to)) {
            match self.weigh(record) {
                (Recency::Recent, mass) => recent += mass,
                (Recency::Past, mass) => past += mass,
            }
        }
        recent + past
    }
}

use serde::{Deserialize, Serialize};

use convoy_types::Opinion;

use crate::recommendation::RecommendedOpinion;

/// `belief + γ·uncertainty`. Not clamped.
pub fn reputation_score(opinion: &Opinion, gamma: f64) -> f64 {
    opinion.belief + gamma * opinion.uncertainty
}

/// A reputation score together with every opinion that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReputationBreakdown {
    pub score: f64,
    pub local: Opinion,
    pub recommended: RecommendedOpinion,
    pub combined: Opinion,
}

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use convoy_types::AgentId;

/// A candidate provider and the reputation the observer computed for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub id: AgentId,
    pub score: f64,
}

/// Order candidates best-first.
///
/// The sort is stable, so candidates with equal scores keep their input order and the one
/// listed first wins a tie. NaN scores rank after every number, in input order.
pub fn rank_candidates(mut candidates: Vec<RankedCandidate>) -> Vec<RankedCandidate> {
    candidates.sort_by(|a, b| by_score_desc(a.score, b.score));
    candidates
}

fn by_score_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => b.total_cmp(&a),
        (a_nan, b_nan) => a_nan.cmp(&b_nan),
    }
}

/// Best candidate, or `None` when there are no candidates.
pub fn select_best(candidates: Vec<RankedCandidate>) -> Option<AgentId> {
    rank_candidates(candidates).into_iter().next().map(|c| c.id)
}

use std::fmt::Debug;
use std::sync::Arc;

use convoy_types::{CombinerPolicy, Opinion};

/// Strategy for merging an observer's own opinion with its neighbors' recommendation.
pub trait OpinionCombiner: Send + Sync + Debug {
    fn combine(&self, local: &Opinion, recommended: &Opinion) -> Opinion;

    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;
}

/// Keeps the local opinion and discards the recommendation, so penalties earned from
/// direct negative evidence are never diluted by what neighbors say.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalOnly;

impl OpinionCombiner for LocalOnly {
    fn combine(&self, local: &Opinion, _recommended: &Opinion) -> Opinion {
        *local
    }

    fn name(&self) -> &'static str {
        "local_only"
    }
}

/// Component-wise convex blend: `w * local + (1 - w) * recommended`.
#[derive(Debug, Clone, Copy)]
pub struct WeightedFusion {
    pub local_weight: f64,
}

impl WeightedFusion {
    pub fn new(local_weight: f64) -> Self {
        Self { local_weight }
    }
}

impl OpinionCombiner for WeightedFusion {
    fn combine(&self, local: &Opinion, recommended: &Opinion) -> Opinion {
        let w = self.local_weight;
        Opinion {
            belief: w * local.belief + (1.0 - w) * recommended.belief,
            disbelief: w * local.disbelief + (1.0 - w) * recommended.disbelief,
            uncertainty: w * local.uncertainty + (1.0 - w) * recommended.uncertainty,
        }
    }

    fn name(&self) -> &'static str {
        "weighted"
    }
}

/// Build the combiner a configuration asks for.
pub fn combiner_for(policy: CombinerPolicy) -> Arc<dyn OpinionCombiner> {
    match policy {
        CombinerPolicy::LocalOnly => Arc::new(LocalOnly),
        CombinerPolicy::Weighted { local_weight } => Arc::new(WeightedFusion::new(local_weight)),
    }
}

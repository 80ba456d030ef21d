use convoy_types::{AgentId, Interaction, Opinion};

use crate::temporal::{EvidenceMass, TemporalWeighter};

/// Positive mass at which belief saturation reaches tanh(1).
pub const POSITIVE_SATURATION: f64 = 30.0;
/// Negative mass at which disbelief saturation reaches tanh(1).
pub const NEGATIVE_SATURATION: f64 = 50.0;

/// Derive an opinion triple from weighted evidence and link quality.
///
/// With no evidence at all the opinion is [`Opinion::VACUOUS`]. Otherwise belief and
/// disbelief are the evidence shares scaled by `comm_quality` and a tanh saturation curve,
/// and uncertainty is whatever is left. The residual is not clamped.
pub fn local_opinion(mass: EvidenceMass, comm_quality: f64) -> Opinion {
    let total = mass.total();
    if total == 0.0 {
        return Opinion::VACUOUS;
    }

    let base_uncertainty = 1.0 - comm_quality;
    let scale_positive = (mass.positive / POSITIVE_SATURATION).tanh();
    let scale_negative = (mass.negative / NEGATIVE_SATURATION).tanh();

    let belief = (1.0 - base_uncertainty) * (mass.positive / total) * scale_positive;
    let disbelief = (1.0 - base_uncertainty) * (mass.negative / total) * scale_negative;

    Opinion {
        belief,
        disbelief,
        uncertainty: 1.0 - belief - disbelief,
    }
}

/// Opinion of `target` formed only from records in `log`.
pub fn direct_opinion(
    log: &[Interaction],
    target: &AgentId,
    weighter: &TemporalWeighter<'_>,
) -> Opinion {
    let evidence = weighter.direct_evidence(log, target);
    local_opinion(evidence.mass(), evidence.comm_quality)
}

use std::collections::BTreeMap;

use convoy_types::{AgentId, Interaction};

use crate::temporal::TemporalWeighter;

/// How much attention `from` pays to `to`, relative to its average across all recipients.
///
/// `N(from → to) / N̄(from)` where both sides are decay-weighted event masses taken from
/// `log`. Values above 1 mean above-average attention. Returns 0 when `from` has no weighted
/// activity at all. Multiplying every event count by the same constant leaves the ratio
/// unchanged.
pub fn interaction_frequency(
    log: &[Interaction],
    from: &AgentId,
    to: &AgentId,
    weighter: &TemporalWeighter<'_>,
) -> f64 {
    let edge = weighter.edge_mass(log, from, to).total();

    // Ordered map so the average is summed in the same order on every query.
    let mut per_recipient: BTreeMap<&AgentId, f64> = BTreeMap::new();
    for record in log.iter().filter(|r| &r.sender == from) {
        let (_, mass) = weighter.weigh(record);
        *per_recipient.entry(&record.recipient).or_default() += mass.total();
    }

    if per_recipient.is_empty() {
        return 0.0;
    }
    let average = per_recipient.values().sum::<f64>() / per_recipient.len() as f64;
    if average == 0.0 {
        return 0.0;
    }
    edge / average
}

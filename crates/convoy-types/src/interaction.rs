use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::AgentId;

/// One trajectory sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub speed: f64,
    /// Position along the road, normalized to [0, 1].
    pub location: f64,
    /// Heading in radians.
    pub direction: f64,
}

impl Vector {
    pub fn new(speed: f64, location: f64, direction: f64) -> Self {
        Self {
            speed,
            location,
            direction,
        }
    }
}

/// An evidence record: what `sender` observed while exchanging data with `recipient`.
///
/// Records are appended to a log once and never changed afterwards. Nothing about the
/// contents is validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Requesting side of the exchange.
    pub sender: AgentId,
    /// Providing side of the exchange; the subject of the evidence.
    pub recipient: AgentId,
    pub positive_events: u32,
    pub negative_events: u32,
    pub timestamp: DateTime<Utc>,
    /// Link quality in [0, 1].
    pub comm_quality: f64,
    pub sender_trajectory: Vec<Vector>,
    pub recipient_trajectory: Vec<Vector>,
}

impl Interaction {
    pub fn new(
        sender: impl Into<AgentId>,
        recipient: impl Into<AgentId>,
        positive_events: u32,
        negative_events: u32,
        timestamp: DateTime<Utc>,
        comm_quality: f64,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            positive_events,
            negative_events,
            timestamp,
            comm_quality,
            sender_trajectory: Vec::new(),
            recipient_trajectory: Vec::new(),
        }
    }

    pub fn with_trajectories(mut self, sender: Vec<Vector>, recipient: Vec<Vector>) -> Self {
        self.sender_trajectory = sender;
        self.recipient_trajectory = recipient;
        self
    }

    /// True if this record describes `from` interacting with `to`.
    pub fn is_edge(&self, from: &AgentId, to: &AgentId) -> bool {
        &self.sender == from && &self.recipient == to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_interaction_has_empty_trajectories() {
        let inter = Interaction::new("1", "2", 1, 0, Utc::now(), 0.9);
        assert!(inter.sender_trajectory.is_empty());
        assert!(inter.recipient_trajectory.is_empty());
        assert_eq!(inter.sender.as_str(), "1");
    }

    #[test]
    fn test_is_edge_is_directional() {
        let inter = Interaction::new("1", "2", 1, 0, Utc::now(), 0.9);
        let a = AgentId::from("1");
        let b = AgentId::from("2");
        assert!(inter.is_edge(&a, &b));
        assert!(!inter.is_edge(&b, &a));
    }

    #[test]
    fn test_with_trajectories() {
        let inter = Interaction::new("1", "2", 0, 1, Utc::now(), 0.5)
            .with_trajectories(vec![Vector::new(10.0, 0.1, 0.0)], vec![]);
        assert_eq!(inter.sender_trajectory.len(), 1);
        assert!(inter.recipient_trajectory.is_empty());
    }
}

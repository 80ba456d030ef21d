use serde::{Deserialize, Serialize};

/// Subjective-logic opinion triple.
///
/// The three components are expected to sum to one, but nothing forces them into [0, 1]:
/// out-of-range communication quality produces a negative residual uncertainty, which is
/// passed through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Opinion {
    pub belief: f64,
    pub disbelief: f64,
    pub uncertainty: f64,
}

impl Opinion {
    /// Opinion about a peer nothing is known about.
    pub const VACUOUS: Opinion = Opinion {
        belief: 0.0,
        disbelief: 0.0,
        uncertainty: 1.0,
    };

    pub fn new(belief: f64, disbelief: f64, uncertainty: f64) -> Self {
        Self {
            belief,
            disbelief,
            uncertainty,
        }
    }

    pub fn is_vacuous(&self) -> bool {
        *self == Self::VACUOUS
    }
}

impl Default for Opinion {
    fn default() -> Self {
        Self::VACUOUS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_vacuous() {
        let op = Opinion::default();
        assert!(op.is_vacuous());
        assert_eq!(op.uncertainty, 1.0);
    }

    #[test]
    fn test_non_vacuous() {
        assert!(!Opinion::new(0.2, 0.1, 0.7).is_vacuous());
    }
}

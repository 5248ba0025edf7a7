use serde::{Deserialize, Serialize};

use super::ScoreVector;

/// Multipliers applied to each score component.
///
/// Weights are used as given: they are not renormalized, and a sum above 1 is absorbed by
/// clamping the total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub specialization: f64,
    pub performance: f64,
    pub rating: f64,
    pub availability: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            specialization: 0.40,
            performance: 0.30,
            rating: 0.20,
            availability: 0.10,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.specialization + self.performance + self.rating + self.availability
    }

    /// Weighted dot product of the components, clamped into [0, 1].
    pub fn total(&self, scores: &ScoreVector) -> f64 {
        let total = scores.specialization * self.specialization
            + scores.performance * self.performance
            + scores.rating * self.rating
            + scores.availability * self.availability;
        total.clamp(0.0, 1.0)
    }
}

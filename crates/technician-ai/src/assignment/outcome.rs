use serde::{Deserialize, Serialize};

use super::domain::TechnicianId;
use super::scoring::{Assessment, WorkloadLabel};

/// Proximity is not computed until real geo data exists.
pub const LOCATION_PROXIMITY_PLACEHOLDER: f64 = 0.0;

/// Ranked recommendation returned for a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub recommended_technician_id: TechnicianId,
    pub confidence: f64,
    pub reason: String,
    pub alternatives: Vec<AlternativeTechnician>,
    pub factors: AssignmentFactors,
}

/// Runner-up candidate surfaced next to the recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeTechnician {
    pub technician_id: TechnicianId,
    pub confidence: f64,
    pub reason: String,
}

/// Breakdown of the winning candidate's signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentFactors {
    pub specialization_match: f64,
    pub location_proximity: f64,
    pub rating: f64,
    pub workload: WorkloadLabel,
}

/// Candidate after scoring, kept in provider order until ranked.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedTechnician {
    pub technician_id: TechnicianId,
    pub display_name: String,
    pub assessment: Assessment,
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl Recommendation {
    /// Build the response from candidates already sorted best-first. `None` when empty.
    pub(crate) fn from_ranked(ranked: &[RankedTechnician]) -> Option<Self> {
        let (best, rest) = ranked.split_first()?;
        let scores = &best.assessment.scores;

        Some(Self {
            recommended_technician_id: best.technician_id.clone(),
            confidence: round2(best.assessment.confidence),
            reason: best.assessment.reason.clone(),
            alternatives: rest
                .iter()
                .take(2)
                .map(|candidate| AlternativeTechnician {
                    technician_id: candidate.technician_id.clone(),
                    confidence: round2(candidate.assessment.confidence),
                    reason: candidate.assessment.reason.clone(),
                })
                .collect(),
            factors: AssignmentFactors {
                specialization_match: round2(scores.specialization),
                location_proximity: LOCATION_PROXIMITY_PLACEHOLDER,
                rating: round2(scores.rating),
                workload: WorkloadLabel::from_performance(scores.performance),
            },
        })
    }
}

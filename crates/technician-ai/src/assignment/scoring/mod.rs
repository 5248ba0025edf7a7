mod explain;
mod predictive;
mod rules;
mod weights;

pub use explain::{ScoreFactor, WorkloadLabel};
pub use predictive::{
    FeatureVector, InferenceError, LogisticSuccessModel, ModelLoadError, PredictiveScorer,
    SuccessClassifier, FEATURE_NAMES,
};
pub use weights::ScoringWeights;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{Technician, TechnicianStats};
use crate::config::ScoringSettings;

/// Directory data gathered for one candidate before scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSnapshot {
    pub technician: Technician,
    pub stats: Option<TechnicianStats>,
    pub workload: u32,
    pub reviews_average: f64,
}

/// Per-technician component scores, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreVector {
    pub specialization: f64,
    pub performance: f64,
    pub rating: f64,
    pub availability: f64,
}

impl ScoreVector {
    pub fn compute(categories: &[String], snapshot: &CandidateSnapshot) -> Self {
        let tags = snapshot.technician.specialization_tags();
        Self {
            specialization: rules::specialization_score(categories, &tags),
            performance: rules::performance_score(snapshot.stats.as_ref(), snapshot.workload),
            rating: rules::rating_score(snapshot.technician.rating, snapshot.reviews_average),
            availability: rules::availability_score(snapshot.workload),
        }
    }

    pub(crate) fn factors(&self) -> [(ScoreFactor, f64); 4] {
        [
            (ScoreFactor::Specialization, self.specialization),
            (ScoreFactor::Performance, self.performance),
            (ScoreFactor::Rating, self.rating),
            (ScoreFactor::Availability, self.availability),
        ]
    }
}

/// Scored candidate: component breakdown, confidence used for ranking, and justification.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub scores: ScoreVector,
    pub confidence: f64,
    pub reason: String,
}

/// Weighted dot product over the four components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WeightedScorer {
    weights: ScoringWeights,
}

impl WeightedScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn assess(&self, categories: &[String], snapshot: &CandidateSnapshot) -> Assessment {
        let scores = ScoreVector::compute(categories, snapshot);
        Assessment {
            confidence: self.weights.total(&scores),
            reason: explain::reason(&scores.factors()),
            scores,
        }
    }

    pub fn assess_all(
        &self,
        categories: &[String],
        candidates: &[CandidateSnapshot],
    ) -> Vec<Assessment> {
        candidates
            .iter()
            .map(|snapshot| self.assess(categories, snapshot))
            .collect()
    }
}

/// Ranking strategy chosen once at startup.
#[derive(Debug, Clone)]
pub enum Scorer {
    Weighted(WeightedScorer),
    Predictive(PredictiveScorer),
}

impl Default for Scorer {
    fn default() -> Self {
        Self::weighted(ScoringWeights::default())
    }
}

impl Scorer {
    pub fn weighted(weights: ScoringWeights) -> Self {
        Self::Weighted(WeightedScorer::new(weights))
    }

    pub fn predictive(classifier: Arc<dyn SuccessClassifier>, weights: ScoringWeights) -> Self {
        Self::Predictive(PredictiveScorer::new(
            classifier,
            WeightedScorer::new(weights),
        ))
    }

    /// Load the configured classifier, falling back to weighted scoring when it cannot be read.
    pub fn from_settings(settings: &ScoringSettings) -> Self {
        let weights = settings.weights;
        if (weights.sum() - 1.0).abs() > 0.05 {
            warn!(
                weight_sum = weights.sum(),
                "scoring weights do not sum to 1; confidences will be skewed"
            );
        }

        let Some(path) = settings.model_path.as_ref() else {
            info!(?weights, "using weighted technician scoring");
            return Self::weighted(weights);
        };

        match LogisticSuccessModel::from_path(path) {
            Ok(model) => {
                info!(
                    path = %path.display(),
                    version = model.version().unwrap_or("unversioned"),
                    "loaded technician success classifier"
                );
                Self::predictive(Arc::new(model), weights)
            }
            Err(error) => {
                warn!(
                    path = %path.display(),
                    %error,
                    "classifier unavailable; using weighted technician scoring"
                );
                Self::weighted(weights)
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Scorer::Weighted(_) => "weighted",
            Scorer::Predictive(_) => "predictive",
        }
    }

    pub fn assess_all(
        &self,
        categories: &[String],
        candidates: &[CandidateSnapshot],
    ) -> Vec<Assessment> {
        match self {
            Scorer::Weighted(scorer) => scorer.assess_all(categories, candidates),
            Scorer::Predictive(scorer) => scorer.assess_all(categories, candidates),
        }
    }
}

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::explain::{reason, ScoreFactor};
use super::rules::{
    capacity_score, rating_score, specialization_match_fraction, success_rate_or_assumed,
};
use super::{Assessment, CandidateSnapshot, ScoreVector, WeightedScorer};

/// Feature names in the order trained classifiers expect them.
pub const FEATURE_NAMES: [&str; 5] = [
    "specialization_match",
    "avg_rating",
    "success_rate",
    "workload_score",
    "experience_score",
];

const NEUTRAL_MATCH: f64 = 0.5;
const EXPERIENCE_SATURATION_BOOKINGS: f64 = 100.0;

/// Inputs handed to a [`SuccessClassifier`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub specialization_match: f64,
    pub avg_rating: f64,
    pub success_rate: f64,
    pub workload_score: f64,
    pub experience_score: f64,
}

impl FeatureVector {
    pub fn assemble(categories: &[String], snapshot: &CandidateSnapshot) -> Self {
        let tags = snapshot.technician.specialization_tags();
        let total_bookings = snapshot
            .stats
            .as_ref()
            .map(|stats| stats.total_bookings)
            .unwrap_or(0);
        let success_rate = success_rate_or_assumed(
            snapshot
                .stats
                .as_ref()
                .filter(|stats| stats.total_bookings > 0),
        );

        Self {
            specialization_match: specialization_match_fraction(categories, &tags)
                .unwrap_or(NEUTRAL_MATCH),
            avg_rating: rating_score(snapshot.technician.rating, snapshot.reviews_average),
            success_rate,
            workload_score: capacity_score(snapshot.workload),
            experience_score: (f64::from(total_bookings) / EXPERIENCE_SATURATION_BOOKINGS)
                .min(1.0),
        }
    }

    pub fn as_array(&self) -> [f64; 5] {
        [
            self.specialization_match,
            self.avg_rating,
            self.success_rate,
            self.workload_score,
            self.experience_score,
        ]
    }

    pub(crate) fn factors(&self) -> [(ScoreFactor, f64); 5] {
        [
            (ScoreFactor::Specialization, self.specialization_match),
            (ScoreFactor::Rating, self.avg_rating),
            (ScoreFactor::Performance, self.success_rate),
            (ScoreFactor::Availability, self.workload_score),
            (ScoreFactor::Experience, self.experience_score),
        ]
    }
}

/// Trained model predicting the probability that an assignment succeeds.
pub trait SuccessClassifier: Send + Sync {
    fn predict_success(&self, features: &FeatureVector) -> Result<f64, InferenceError>;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error("classifier unavailable: {0}")]
    Unavailable(String),
    #[error("feature {name} is not a finite number")]
    InvalidFeature { name: &'static str },
    #[error("classifier produced a non-finite probability")]
    NonFinite,
}

#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("model features {found:?} do not match the expected {expected:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("model has {found} coefficients, expected {expected}")]
    CoefficientCount { expected: usize, found: usize },
    #[error("model coefficients must be finite numbers")]
    NonFiniteCoefficient,
}

#[derive(Debug, Deserialize)]
struct ModelArtifact {
    #[serde(default)]
    version: Option<String>,
    features: Vec<String>,
    coefficients: Vec<f64>,
    intercept: f64,
}

/// Logistic regression over [`FEATURE_NAMES`], exported as a JSON artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticSuccessModel {
    version: Option<String>,
    coefficients: [f64; 5],
    intercept: f64,
}

impl LogisticSuccessModel {
    pub fn new(coefficients: [f64; 5], intercept: f64) -> Result<Self, ModelLoadError> {
        if !intercept.is_finite() || coefficients.iter().any(|value| !value.is_finite()) {
            return Err(ModelLoadError::NonFiniteCoefficient);
        }
        Ok(Self {
            version: None,
            coefficients,
            intercept,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelLoadError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelLoadError> {
        let artifact: ModelArtifact = serde_json::from_reader(reader)?;

        let expected: Vec<String> = FEATURE_NAMES.iter().map(|name| name.to_string()).collect();
        if artifact.features != expected {
            return Err(ModelLoadError::FeatureMismatch {
                expected,
                found: artifact.features,
            });
        }

        let coefficients: [f64; 5] = artifact
            .coefficients
            .as_slice()
            .try_into()
            .map_err(|_| ModelLoadError::CoefficientCount {
                expected: FEATURE_NAMES.len(),
                found: artifact.coefficients.len(),
            })?;

        let mut model = Self::new(coefficients, artifact.intercept)?;
        model.version = artifact.version;
        Ok(model)
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

impl SuccessClassifier for LogisticSuccessModel {
    fn predict_success(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let values = features.as_array();
        if let Some(index) = values.iter().position(|value| !value.is_finite()) {
            return Err(InferenceError::InvalidFeature {
                name: FEATURE_NAMES[index],
            });
        }

        let logit = values
            .iter()
            .zip(self.coefficients.iter())
            .fold(self.intercept, |acc, (value, weight)| acc + value * weight);
        let probability = 1.0 / (1.0 + (-logit).exp());

        if probability.is_finite() {
            Ok(probability)
        } else {
            Err(InferenceError::NonFinite)
        }
    }
}

/// Classifier-backed scorer that re-scores with the weighted formula when inference fails.
#[derive(Clone)]
pub struct PredictiveScorer {
    classifier: Arc<dyn SuccessClassifier>,
    fallback: WeightedScorer,
}

impl std::fmt::Debug for PredictiveScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictiveScorer")
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

impl PredictiveScorer {
    pub fn new(classifier: Arc<dyn SuccessClassifier>, fallback: WeightedScorer) -> Self {
        Self {
            classifier,
            fallback,
        }
    }

    pub fn fallback(&self) -> &WeightedScorer {
        &self.fallback
    }

    fn predict(
        &self,
        categories: &[String],
        snapshot: &CandidateSnapshot,
    ) -> Result<Assessment, InferenceError> {
        let features = FeatureVector::assemble(categories, snapshot);
        let probability = self.classifier.predict_success(&features)?;

        Ok(Assessment {
            scores: ScoreVector::compute(categories, snapshot),
            confidence: probability.clamp(0.0, 1.0),
            reason: reason(&features.factors()),
        })
    }

    /// All-or-nothing: one failed inference sends the whole pool through the fallback.
    pub fn assess_all(
        &self,
        categories: &[String],
        candidates: &[CandidateSnapshot],
    ) -> Vec<Assessment> {
        let predicted: Result<Vec<_>, _> = candidates
            .iter()
            .map(|snapshot| self.predict(categories, snapshot))
            .collect();

        match predicted {
            Ok(assessments) => assessments,
            Err(error) => {
                warn!(%error, "classifier inference failed; using weighted scoring");
                self.fallback.assess_all(categories, candidates)
            }
        }
    }
}

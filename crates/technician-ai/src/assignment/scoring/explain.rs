use serde::{Deserialize, Serialize};

/// Signals a recommendation can be justified with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    Specialization,
    Performance,
    Rating,
    Availability,
    Experience,
}

impl ScoreFactor {
    pub fn label(&self) -> &'static str {
        match self {
            ScoreFactor::Specialization => "excellent specialization match",
            ScoreFactor::Performance => "strong performance history",
            ScoreFactor::Rating => "high customer ratings",
            ScoreFactor::Availability => "good availability",
            ScoreFactor::Experience => "extensive experience",
        }
    }
}

const SECONDARY_FACTOR_THRESHOLD: f64 = 0.7;

/// Cite the strongest factor, plus the runner-up when it clears 0.7.
///
/// Ties keep the order in which factors were supplied.
pub(crate) fn reason(factors: &[(ScoreFactor, f64)]) -> String {
    let mut ranked = factors.to_vec();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut cited = Vec::with_capacity(2);
    if let Some((top, _)) = ranked.first() {
        cited.push(top.label());
    }
    if let Some((second, score)) = ranked.get(1) {
        if *score > SECONDARY_FACTOR_THRESHOLD {
            cited.push(second.label());
        }
    }

    if cited.is_empty() {
        "Best available match".to_string()
    } else {
        format!("Best match based on {}", cited.join(" and "))
    }
}

/// Qualitative workload bucket derived from the performance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadLabel {
    Light,
    Moderate,
    Heavy,
}

impl WorkloadLabel {
    pub fn from_performance(performance: f64) -> Self {
        if performance >= 0.8 {
            Self::Light
        } else if performance >= 0.6 {
            Self::Moderate
        } else {
            Self::Heavy
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Heavy => "heavy",
        }
    }
}

use std::collections::HashSet;
use std::sync::Arc;

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::assignment::directory::{
    DirectoryError, InMemoryDirectory, TechnicianDirectory, TechnicianRecord,
};
use crate::assignment::domain::{
    Booking, BookingId, BookingService, Priority, Technician, TechnicianId, TechnicianStats,
};
use crate::assignment::scoring::{FeatureVector, InferenceError, Scorer, SuccessClassifier};
use crate::assignment::service::RecommendationEngine;

pub(super) fn technician(id: &str, specialization: &str, rating: f64) -> Technician {
    Technician {
        technician_id: TechnicianId(id.to_string()),
        display_name: format!("Technician {id}"),
        email: format!("{id}@example.com"),
        specialization: specialization.to_string(),
        rating,
        is_available: true,
    }
}

pub(super) fn record(
    id: &str,
    specialization: &str,
    rating: f64,
    workload: u32,
    history: Option<(u32, u32)>,
) -> TechnicianRecord {
    TechnicianRecord {
        technician: technician(id, specialization, rating),
        stats: history.map(|(total, completed)| TechnicianStats::from_counts(total, completed)),
        current_workload: workload,
        reviews_average: 0.0,
    }
}

pub(super) fn booking(categories: &[&str]) -> Booking {
    let services = categories
        .iter()
        .enumerate()
        .map(|(index, category)| BookingService {
            service_id: index as i64 + 1,
            service_name: format!("{category} service"),
            category: category.to_string(),
        })
        .collect();

    Booking::new(
        BookingId(42),
        services,
        Utc.with_ymd_and_hms(2025, 10, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp"),
        None,
        Priority::Normal,
    )
    .expect("booking valid")
}

/// A brakes specialist and a higher-rated engine specialist.
pub(super) fn brakes_pool() -> Vec<TechnicianRecord> {
    vec![
        record("tech-A", "brakes,suspension", 4.2, 1, None),
        record("tech-B", "engine", 4.8, 0, None),
    ]
}

pub(super) fn engine_with<D>(directory: D) -> RecommendationEngine<D>
where
    D: TechnicianDirectory + 'static,
{
    RecommendationEngine::new(Arc::new(directory), Scorer::default())
}

pub(super) fn engine(records: Vec<TechnicianRecord>) -> RecommendationEngine<InMemoryDirectory> {
    engine_with(InMemoryDirectory::new(records))
}

/// Directory whose stats lookups fail for selected ids.
pub(super) struct FlakyDirectory {
    inner: InMemoryDirectory,
    failing: HashSet<String>,
}

impl FlakyDirectory {
    pub(super) fn new(records: Vec<TechnicianRecord>, failing: &[&str]) -> Self {
        Self {
            inner: InMemoryDirectory::new(records),
            failing: failing.iter().map(|id| id.to_string()).collect(),
        }
    }
}

impl TechnicianDirectory for FlakyDirectory {
    fn list_available_technicians(&self) -> Result<Vec<Technician>, DirectoryError> {
        self.inner.list_available_technicians()
    }

    fn stats(&self, id: &TechnicianId) -> Result<Option<TechnicianStats>, DirectoryError> {
        if self.failing.contains(id.as_str()) {
            return Err(DirectoryError::Unavailable(
                "stats service timed out".to_string(),
            ));
        }
        self.inner.stats(id)
    }

    fn current_workload(&self, id: &TechnicianId) -> Result<u32, DirectoryError> {
        self.inner.current_workload(id)
    }

    fn reviews_average(&self, id: &TechnicianId) -> Result<f64, DirectoryError> {
        self.inner.reviews_average(id)
    }
}

/// Directory that cannot even list candidates.
pub(super) struct OfflineDirectory;

impl TechnicianDirectory for OfflineDirectory {
    fn list_available_technicians(&self) -> Result<Vec<Technician>, DirectoryError> {
        Err(DirectoryError::Unavailable("backend offline".to_string()))
    }

    fn stats(&self, _id: &TechnicianId) -> Result<Option<TechnicianStats>, DirectoryError> {
        Err(DirectoryError::Unavailable("backend offline".to_string()))
    }

    fn current_workload(&self, _id: &TechnicianId) -> Result<u32, DirectoryError> {
        Err(DirectoryError::Unavailable("backend offline".to_string()))
    }

    fn reviews_average(&self, _id: &TechnicianId) -> Result<f64, DirectoryError> {
        Err(DirectoryError::Unavailable("backend offline".to_string()))
    }
}

/// Classifier that trusts experience above everything else.
pub(super) struct ExperienceClassifier;

impl SuccessClassifier for ExperienceClassifier {
    fn predict_success(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        Ok(0.2 + 0.7 * features.experience_score)
    }
}

/// Classifier that is deployed but cannot serve predictions.
pub(super) struct BrokenClassifier;

impl SuccessClassifier for BrokenClassifier {
    fn predict_success(&self, _features: &FeatureVector) -> Result<f64, InferenceError> {
        Err(InferenceError::Unavailable(
            "model server unreachable".to_string(),
        ))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

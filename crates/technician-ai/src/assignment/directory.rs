use serde::{Deserialize, Serialize};

use super::domain::{Technician, TechnicianId, TechnicianStats};

/// Read access to technicians and their operational metadata.
///
/// Implementations may sit on a database, a remote backend, or fixture data; the engine only
/// relies on these four queries.
pub trait TechnicianDirectory: Send + Sync {
    fn list_available_technicians(&self) -> Result<Vec<Technician>, DirectoryError>;
    fn stats(&self, id: &TechnicianId) -> Result<Option<TechnicianStats>, DirectoryError>;
    fn current_workload(&self, id: &TechnicianId) -> Result<u32, DirectoryError>;
    fn reviews_average(&self, id: &TechnicianId) -> Result<f64, DirectoryError>;
}

/// Error enumeration for directory failures.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("technician {0} is not known to the directory")]
    UnknownTechnician(TechnicianId),
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Everything the directory knows about one technician.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicianRecord {
    pub technician: Technician,
    pub stats: Option<TechnicianStats>,
    pub current_workload: u32,
    pub reviews_average: f64,
}

/// Directory backed by an in-process roster. Listing preserves insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    records: Vec<TechnicianRecord>,
}

impl InMemoryDirectory {
    pub fn new(records: Vec<TechnicianRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[TechnicianRecord] {
        &self.records
    }

    fn record(&self, id: &TechnicianId) -> Result<&TechnicianRecord, DirectoryError> {
        self.records
            .iter()
            .find(|record| &record.technician.technician_id == id)
            .ok_or_else(|| DirectoryError::UnknownTechnician(id.clone()))
    }

    /// Roster served when no roster file is configured.
    pub fn demo() -> Self {
        let entry = |id: &str,
                     name: &str,
                     specialization: &str,
                     rating: f64,
                     total: u32,
                     completed: u32,
                     workload: u32,
                     reviews: f64| TechnicianRecord {
            technician: Technician {
                technician_id: TechnicianId(id.to_string()),
                display_name: name.to_string(),
                email: format!("{id}@carcare.example"),
                specialization: specialization.to_string(),
                rating,
                is_available: true,
            },
            stats: Some(TechnicianStats::from_counts(total, completed)),
            current_workload: workload,
            reviews_average: reviews,
        };

        Self::new(vec![
            entry(
                "tech-001",
                "Omar Hassan",
                "engine,transmission,diagnostics",
                4.7,
                48,
                42,
                2,
                4.8,
            ),
            entry("tech-002", "Lina Farouk", "brakes,suspension", 4.5, 35, 29, 1, 4.6),
            entry(
                "tech-003",
                "Karim Adel",
                "electrical,air conditioning",
                4.3,
                22,
                17,
                4,
                0.0,
            ),
            entry("tech-004", "Mona Sami", "tires,brakes,oil change", 4.6, 30, 26, 6, 4.5),
            entry("tech-005", "Youssef Nabil", "body work,paint", 4.2, 0, 0, 0, 0.0),
        ])
    }
}

impl TechnicianDirectory for InMemoryDirectory {
    fn list_available_technicians(&self) -> Result<Vec<Technician>, DirectoryError> {
        Ok(self
            .records
            .iter()
            .filter(|record| record.technician.is_available)
            .map(|record| record.technician.clone())
            .collect())
    }

    fn stats(&self, id: &TechnicianId) -> Result<Option<TechnicianStats>, DirectoryError> {
        Ok(self.record(id)?.stats)
    }

    fn current_workload(&self, id: &TechnicianId) -> Result<u32, DirectoryError> {
        Ok(self.record(id)?.current_workload)
    }

    fn reviews_average(&self, id: &TechnicianId) -> Result<f64, DirectoryError> {
        Ok(self.record(id)?.reviews_average)
    }
}

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::directory::{InMemoryDirectory, TechnicianRecord};
use super::domain::{Technician, TechnicianId, TechnicianStats};

/// Errors raised while importing a technician roster export.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to open roster: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse roster: {0}")]
    Csv(#[from] csv::Error),
    #[error("roster row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },
}

pub fn load_roster_path(path: impl AsRef<Path>) -> Result<InMemoryDirectory, RosterError> {
    let file = File::open(path)?;
    load_roster(file)
}

/// Build a directory from a CSV export with one technician per row.
pub fn load_roster<R: Read>(reader: R) -> Result<InMemoryDirectory, RosterError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, row) in csv_reader.deserialize::<RosterRow>().enumerate() {
        let row = row?;
        records.push(row.into_record(index + 1)?);
    }

    Ok(InMemoryDirectory::new(records))
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    technician_id: String,
    display_name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    specialization: String,
    #[serde(default, deserialize_with = "blank_as_zero")]
    rating: f64,
    #[serde(default = "available_by_default", deserialize_with = "flag")]
    is_available: bool,
    #[serde(default, deserialize_with = "blank_as_zero")]
    total_bookings: u32,
    #[serde(default, deserialize_with = "blank_as_zero")]
    completed_bookings: u32,
    #[serde(default, deserialize_with = "blank_as_zero")]
    current_workload: u32,
    #[serde(default, deserialize_with = "blank_as_zero")]
    review_average: f64,
}

impl RosterRow {
    fn into_record(self, row: usize) -> Result<TechnicianRecord, RosterError> {
        if self.technician_id.is_empty() {
            return Err(RosterError::InvalidRow {
                row,
                reason: "technician_id is blank".to_string(),
            });
        }
        if self.completed_bookings > self.total_bookings {
            return Err(RosterError::InvalidRow {
                row,
                reason: format!(
                    "completed_bookings {} exceeds total_bookings {}",
                    self.completed_bookings, self.total_bookings
                ),
            });
        }

        let stats = (self.total_bookings > 0)
            .then(|| TechnicianStats::from_counts(self.total_bookings, self.completed_bookings));

        Ok(TechnicianRecord {
            technician: Technician {
                technician_id: TechnicianId(self.technician_id),
                display_name: self.display_name,
                email: self.email,
                specialization: self.specialization,
                rating: self.rating,
                is_available: self.is_available,
            },
            stats,
            current_workload: self.current_workload,
            reviews_average: self.review_average,
        })
    }
}

fn available_by_default() -> bool {
    true
}

fn blank_as_zero<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr + Default,
    T::Err: std::fmt::Display,
{
    let raw = String::deserialize(deserializer)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(T::default());
    }
    trimmed.parse::<T>().map_err(serde::de::Error::custom)
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "1" | "true" | "yes" | "y" => Ok(true),
        "0" | "false" | "no" | "n" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "'{other}' is not a recognised availability flag"
        ))),
    }
}

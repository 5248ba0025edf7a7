use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier wrapper for maintenance bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(pub i64);

/// Identifier wrapper for technicians as issued by the backing directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TechnicianId(pub String);

impl TechnicianId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TechnicianId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Service line item requested on a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingService {
    #[serde(alias = "service_id")]
    pub service_id: i64,
    #[serde(alias = "service_name")]
    pub service_name: String,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Scheduling urgency attached to a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Urgent,
    Normal,
    Low,
}

impl Priority {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "urgent" => Ok(Self::Urgent),
            "normal" => Ok(Self::Normal),
            "low" => Ok(Self::Low),
            _ => Err(ValidationError::InvalidPriority(raw.to_string())),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::Normal => "normal",
            Self::Low => "low",
        }
    }
}

/// Validated booking handed to the recommendation engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    pub id: BookingId,
    pub services: Vec<BookingService>,
    pub scheduled_at: DateTime<Utc>,
    pub location: Option<GeoLocation>,
    pub priority: Priority,
}

impl Booking {
    pub fn new(
        id: BookingId,
        services: Vec<BookingService>,
        scheduled_at: DateTime<Utc>,
        location: Option<GeoLocation>,
        priority: Priority,
    ) -> Result<Self, ValidationError> {
        if services.is_empty() {
            return Err(ValidationError::EmptyServices);
        }

        Ok(Self {
            id,
            services,
            scheduled_at,
            location,
            priority,
        })
    }

    /// Requested categories, lower-cased and trimmed, with blanks dropped.
    pub fn requested_categories(&self) -> Vec<String> {
        self.services
            .iter()
            .map(|service| service.category.trim().to_lowercase())
            .filter(|category| !category.is_empty())
            .collect()
    }
}

/// Candidate technician as supplied by the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Technician {
    #[serde(alias = "technician_id", alias = "TechnicianId")]
    pub technician_id: TechnicianId,
    #[serde(alias = "display_name", alias = "DisplayName")]
    pub display_name: String,
    #[serde(default, alias = "Email")]
    pub email: String,
    #[serde(default, alias = "Specialization")]
    pub specialization: String,
    #[serde(default, alias = "Rating")]
    pub rating: f64,
    #[serde(
        default = "default_available",
        alias = "is_available",
        alias = "IsAvailable"
    )]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

impl Technician {
    /// Specialization tags split on commas, lower-cased and trimmed.
    pub fn specialization_tags(&self) -> Vec<String> {
        self.specialization
            .to_lowercase()
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Historical booking counters for a technician.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicianStats {
    #[serde(alias = "total_bookings", alias = "TotalBookings")]
    pub total_bookings: u32,
    #[serde(alias = "completed_bookings", alias = "CompletedBookings")]
    pub completed_bookings: u32,
    #[serde(default, alias = "success_rate", alias = "SuccessRate")]
    pub success_rate: Option<f64>,
}

impl TechnicianStats {
    /// Fill in a missing success rate from the counters.
    pub fn with_derived_rate(self) -> Self {
        if self.success_rate.is_some() {
            self
        } else {
            Self::from_counts(self.total_bookings, self.completed_bookings)
        }
    }

    /// Derive the success rate from raw counters; undefined when nothing was booked.
    pub fn from_counts(total_bookings: u32, completed_bookings: u32) -> Self {
        let success_rate = if total_bookings > 0 {
            Some(f64::from(completed_bookings) / f64::from(total_bookings))
        } else {
            None
        };

        Self {
            total_bookings,
            completed_bookings,
            success_rate,
        }
    }
}

/// Wire payload for an assignment request before validation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRequest {
    #[serde(alias = "booking_id")]
    pub booking_id: i64,
    pub services: Vec<BookingService>,
    #[serde(alias = "scheduled_date", deserialize_with = "deserialize_timestamp")]
    pub scheduled_date: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<GeoLocation>,
    #[serde(default = "default_priority")]
    pub priority: String,
}

fn default_priority() -> String {
    "normal".to_string()
}

impl AssignmentRequest {
    pub fn into_booking(self) -> Result<Booking, ValidationError> {
        let priority = Priority::parse(&self.priority)?;
        Booking::new(
            BookingId(self.booking_id),
            self.services,
            self.scheduled_date,
            self.location,
            priority,
        )
    }
}

/// Rejections raised while turning a request into a [`Booking`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("at least one service must be requested")]
    EmptyServices,
    #[error("priority must be urgent, normal, or low (got '{0}')")]
    InvalidPriority(String),
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "failed to parse '{raw}' as an RFC 3339 or YYYY-MM-DDTHH:MM:SS timestamp"
        ))
    })
}

//! Technician assignment: booking intake, candidate scoring, and recommendation assembly.

pub mod directory;
pub mod domain;
pub mod outcome;
pub mod remote;
pub mod roster;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use directory::{DirectoryError, InMemoryDirectory, TechnicianDirectory, TechnicianRecord};
pub use domain::{
    AssignmentRequest, Booking, BookingId, BookingService, GeoLocation, Priority, Technician,
    TechnicianId, TechnicianStats, ValidationError,
};
pub use outcome::{AlternativeTechnician, AssignmentFactors, RankedTechnician, Recommendation};
pub use remote::RemoteDirectory;
pub use router::assignment_router;
pub use scoring::{Scorer, ScoringWeights};
pub use service::{CandidateError, RecommendationEngine, RecommendationError};

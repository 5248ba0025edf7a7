use std::sync::Arc;

use tracing::{debug, info, warn};

use super::directory::{DirectoryError, TechnicianDirectory};
use super::domain::{Booking, Technician, TechnicianId};
use super::outcome::{RankedTechnician, Recommendation};
use super::scoring::{CandidateSnapshot, Scorer};

/// Engine ranking directory candidates for a booking with the configured scorer.
pub struct RecommendationEngine<D> {
    directory: Arc<D>,
    scorer: Arc<Scorer>,
}

impl<D> Clone for RecommendationEngine<D> {
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
            scorer: Arc::clone(&self.scorer),
        }
    }
}

impl<D> RecommendationEngine<D>
where
    D: TechnicianDirectory + 'static,
{
    pub fn new(directory: Arc<D>, scorer: Scorer) -> Self {
        Self {
            directory,
            scorer: Arc::new(scorer),
        }
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Technicians currently offered by the directory, in directory order.
    pub fn available_technicians(&self) -> Result<Vec<Technician>, RecommendationError> {
        Ok(self.directory.list_available_technicians()?)
    }

    /// Rank every available technician for the booking and describe the best match.
    pub fn recommend(&self, booking: &Booking) -> Result<Recommendation, RecommendationError> {
        let ranked = self.rank(booking)?;
        let recommendation =
            Recommendation::from_ranked(&ranked).ok_or(RecommendationError::ScoringFailed {
                attempted: 0,
            })?;

        if let Some(best) = ranked.first() {
            info!(
                booking_id = booking.id.0,
                technician_id = %best.technician_id,
                technician_name = %best.display_name,
                score = best.assessment.confidence,
                "selected technician"
            );
        }

        Ok(recommendation)
    }

    /// Score candidates and sort them best-first; ties keep directory order.
    pub fn rank(&self, booking: &Booking) -> Result<Vec<RankedTechnician>, RecommendationError> {
        info!(
            booking_id = booking.id.0,
            priority = booking.priority.label(),
            scorer = self.scorer.kind(),
            "starting technician recommendation"
        );

        let technicians = self.directory.list_available_technicians()?;
        if technicians.is_empty() {
            warn!(booking_id = booking.id.0, "no available technicians found");
            return Err(RecommendationError::NoTechnicians);
        }

        let attempted = technicians.len();
        debug!(candidates = attempted, "fetched available technicians");

        let snapshots: Vec<CandidateSnapshot> = technicians
            .into_iter()
            .filter_map(|technician| {
                let id = technician.technician_id.clone();
                match self.snapshot(technician) {
                    Ok(snapshot) => Some(snapshot),
                    Err(error) => {
                        warn!(technician_id = %id, %error, "skipping technician");
                        None
                    }
                }
            })
            .collect();

        if snapshots.is_empty() {
            return Err(RecommendationError::ScoringFailed { attempted });
        }

        let categories = booking.requested_categories();
        let assessments = self.scorer.assess_all(&categories, &snapshots);

        let mut ranked: Vec<RankedTechnician> = snapshots
            .into_iter()
            .zip(assessments)
            .map(|(snapshot, assessment)| {
                debug!(
                    technician_id = %snapshot.technician.technician_id,
                    score = assessment.confidence,
                    specialization = assessment.scores.specialization,
                    performance = assessment.scores.performance,
                    rating = assessment.scores.rating,
                    availability = assessment.scores.availability,
                    "scored technician"
                );
                RankedTechnician {
                    technician_id: snapshot.technician.technician_id,
                    display_name: snapshot.technician.display_name,
                    assessment,
                }
            })
            .collect();

        ranked.sort_by(|a, b| b.assessment.confidence.total_cmp(&a.assessment.confidence));
        Ok(ranked)
    }

    fn snapshot(&self, technician: Technician) -> Result<CandidateSnapshot, CandidateError> {
        if technician.technician_id.as_str().trim().is_empty() {
            return Err(CandidateError::BlankId);
        }
        if !technician.rating.is_finite() || !(0.0..=5.0).contains(&technician.rating) {
            return Err(CandidateError::InvalidRating {
                technician_id: technician.technician_id,
                rating: technician.rating,
            });
        }

        let id = &technician.technician_id;
        let stats = self.directory.stats(id)?;
        let workload = self.directory.current_workload(id)?;
        let reviews_average = self.directory.reviews_average(id)?;

        if !reviews_average.is_finite() || reviews_average < 0.0 {
            return Err(CandidateError::InvalidReviews {
                technician_id: id.clone(),
                average: reviews_average,
            });
        }

        Ok(CandidateSnapshot {
            technician,
            stats,
            workload,
            reviews_average,
        })
    }
}

/// Conditions under which no recommendation can be made.
#[derive(Debug, thiserror::Error)]
pub enum RecommendationError {
    #[error("No available technicians found")]
    NoTechnicians,
    #[error("Failed to score technicians ({attempted} candidate(s) rejected)")]
    ScoringFailed { attempted: usize },
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl RecommendationError {
    /// Whether the caller should treat this as "no recommendation possible".
    pub fn is_no_recommendation(&self) -> bool {
        matches!(
            self,
            RecommendationError::NoTechnicians | RecommendationError::ScoringFailed { .. }
        )
    }
}

/// Why a single candidate was left out of the ranking.
#[derive(Debug, thiserror::Error)]
pub enum CandidateError {
    #[error("technician id is blank")]
    BlankId,
    #[error("technician {technician_id} has rating {rating} outside 0..=5")]
    InvalidRating {
        technician_id: TechnicianId,
        rating: f64,
    },
    #[error("technician {technician_id} has an invalid review average {average}")]
    InvalidReviews {
        technician_id: TechnicianId,
        average: f64,
    },
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

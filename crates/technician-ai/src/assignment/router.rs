use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::info;

use super::directory::TechnicianDirectory;
use super::domain::AssignmentRequest;
use super::outcome::Recommendation;
use super::service::RecommendationEngine;
use crate::error::AppError;

/// Router builder exposing the assignment endpoints.
pub fn assignment_router<D>(engine: Arc<RecommendationEngine<D>>) -> Router
where
    D: TechnicianDirectory + 'static,
{
    Router::new()
        .route("/api/assign-technician", post(assign_handler::<D>))
        .route(
            "/api/technicians/available",
            get(available_technicians_handler::<D>),
        )
        .with_state(engine)
}

pub(crate) async fn assign_handler<D>(
    State(engine): State<Arc<RecommendationEngine<D>>>,
    payload: Result<Json<AssignmentRequest>, JsonRejection>,
) -> Result<Json<Recommendation>, AppError>
where
    D: TechnicianDirectory + 'static,
{
    let Json(request) = payload?;
    let booking = request.into_booking()?;
    let booking_id = booking.id.0;
    info!(
        booking_id,
        services = booking.services.len(),
        "received assignment request"
    );

    // Directory lookups may block on the backend.
    let recommendation =
        tokio::task::spawn_blocking(move || engine.recommend(&booking)).await??;
    info!(
        booking_id,
        technician_id = %recommendation.recommended_technician_id,
        confidence = recommendation.confidence,
        "recommended technician"
    );
    Ok(Json(recommendation))
}

pub(crate) async fn available_technicians_handler<D>(
    State(engine): State<Arc<RecommendationEngine<D>>>,
) -> Result<Json<Value>, AppError>
where
    D: TechnicianDirectory + 'static,
{
    let technicians =
        tokio::task::spawn_blocking(move || engine.available_technicians()).await??;
    Ok(Json(json!({
        "count": technicians.len(),
        "technicians": technicians,
    })))
}

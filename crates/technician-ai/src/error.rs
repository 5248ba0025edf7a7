use crate::assignment::roster::RosterError;
use crate::assignment::{RecommendationError, ValidationError};
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::task::JoinError;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(true);

/// Controls whether 5xx responses carry the underlying error text.
pub fn expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::Relaxed);
}

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Roster(RosterError),
    Validation(ValidationError),
    Payload(serde_json::Error),
    Rejected(JsonRejection),
    Recommendation(RecommendationError),
    Task(JoinError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Roster(err) => write!(f, "roster error: {}", err),
            AppError::Validation(err) => write!(f, "invalid request: {}", err),
            AppError::Payload(err) => write!(f, "malformed payload: {}", err),
            AppError::Rejected(err) => write!(f, "malformed payload: {}", err.body_text()),
            AppError::Recommendation(err) if err.is_no_recommendation() => {
                write!(f, "{}", err)
            }
            AppError::Recommendation(err) => write!(f, "recommendation error: {}", err),
            AppError::Task(err) => write!(f, "background task failed: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Roster(err) => Some(err),
            AppError::Validation(err) => Some(err),
            AppError::Payload(err) => Some(err),
            AppError::Rejected(err) => Some(err),
            AppError::Recommendation(err) => Some(err),
            AppError::Task(err) => Some(err),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Payload(_) | AppError::Rejected(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Recommendation(err) if err.is_no_recommendation() => StatusCode::NOT_FOUND,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Roster(_)
            | AppError::Recommendation(_)
            | AppError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self, expose_internal: bool) -> String {
        if self.status().is_server_error() && !expose_internal {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let message = self.public_message(EXPOSE_INTERNAL_ERRORS.load(Ordering::Relaxed));
        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        Self::Rejected(value)
    }
}

impl From<RosterError> for AppError {
    fn from(value: RosterError) -> Self {
        Self::Roster(value)
    }
}

impl From<ValidationError> for AppError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Payload(value)
    }
}

impl From<RecommendationError> for AppError {
    fn from(value: RecommendationError) -> Self {
        Self::Recommendation(value)
    }
}

impl From<JoinError> for AppError {
    fn from(value: JoinError) -> Self {
        Self::Task(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::DirectoryError;

    #[test]
    fn maps_conditions_to_status_codes() {
        assert_eq!(
            AppError::from(ValidationError::EmptyServices).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(RecommendationError::NoTechnicians).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(RecommendationError::ScoringFailed { attempted: 3 }).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(RecommendationError::Directory(DirectoryError::Unavailable(
                "backend down".to_string()
            )))
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn no_recommendation_message_is_passed_through() {
        let err = AppError::from(RecommendationError::NoTechnicians);
        assert_eq!(err.to_string(), "No available technicians found");
    }

    #[test]
    fn internal_details_are_hidden_when_not_exposed() {
        let outage = AppError::from(RecommendationError::Directory(DirectoryError::Unavailable(
            "GET http://backend/api returned 502".to_string(),
        )));
        assert_eq!(outage.public_message(false), "Internal server error");
        assert!(outage.public_message(true).contains("502"));

        let invalid = AppError::from(ValidationError::EmptyServices);
        assert_eq!(invalid.public_message(false), invalid.to_string());

        let missing = AppError::from(RecommendationError::NoTechnicians);
        assert_eq!(
            missing.public_message(false),
            "No available technicians found"
        );
    }
}

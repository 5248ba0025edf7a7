use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use technician_ai::assignment::roster::load_roster_path;
use technician_ai::assignment::{
    DirectoryError, InMemoryDirectory, RecommendationEngine, RecommendationError, RemoteDirectory,
    Scorer, Technician, TechnicianDirectory, TechnicianId, TechnicianStats,
};
use technician_ai::config::{AppConfig, DirectorySettings};
use technician_ai::error::AppError;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Technician source selected from configuration.
pub(crate) enum ConfiguredDirectory {
    Roster(InMemoryDirectory),
    Backend(RemoteDirectory),
}

impl ConfiguredDirectory {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Roster(_) => "roster",
            Self::Backend(_) => "backend",
        }
    }
}

impl TechnicianDirectory for ConfiguredDirectory {
    fn list_available_technicians(&self) -> Result<Vec<Technician>, DirectoryError> {
        match self {
            Self::Roster(directory) => directory.list_available_technicians(),
            Self::Backend(directory) => directory.list_available_technicians(),
        }
    }

    fn stats(&self, id: &TechnicianId) -> Result<Option<TechnicianStats>, DirectoryError> {
        match self {
            Self::Roster(directory) => directory.stats(id),
            Self::Backend(directory) => directory.stats(id),
        }
    }

    fn current_workload(&self, id: &TechnicianId) -> Result<u32, DirectoryError> {
        match self {
            Self::Roster(directory) => directory.current_workload(id),
            Self::Backend(directory) => directory.current_workload(id),
        }
    }

    fn reviews_average(&self, id: &TechnicianId) -> Result<f64, DirectoryError> {
        match self {
            Self::Roster(directory) => directory.reviews_average(id),
            Self::Backend(directory) => directory.reviews_average(id),
        }
    }
}

/// Backend URL first, then the roster file, then the demo roster.
///
/// Building a backend directory creates a blocking HTTP client, so call this off the async runtime.
pub(crate) fn load_directory(settings: &DirectorySettings) -> Result<ConfiguredDirectory, AppError> {
    if let Some(url) = settings.backend_url.as_deref() {
        let directory = RemoteDirectory::new(url, settings.api_key.clone())
            .map_err(RecommendationError::from)?;
        info!(
            backend = %directory.base_url(),
            authenticated = settings.api_key.is_some(),
            "using technician backend"
        );
        return Ok(ConfiguredDirectory::Backend(directory));
    }

    match settings.roster_path.as_ref() {
        Some(path) => {
            let directory = load_roster_path(path)?;
            info!(
                path = %path.display(),
                technicians = directory.records().len(),
                "loaded technician roster"
            );
            Ok(ConfiguredDirectory::Roster(directory))
        }
        None => {
            info!("no roster configured; serving demo technicians");
            Ok(ConfiguredDirectory::Roster(InMemoryDirectory::demo()))
        }
    }
}

pub(crate) fn build_engine(
    config: &AppConfig,
) -> Result<RecommendationEngine<ConfiguredDirectory>, AppError> {
    let directory = load_directory(&config.directory)?;
    let scorer = Scorer::from_settings(&config.scoring);
    Ok(RecommendationEngine::new(Arc::new(directory), scorer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn demo_roster_is_used_without_a_path() {
        match load_directory(&DirectorySettings::default()).expect("demo loads") {
            ConfiguredDirectory::Roster(directory) => assert_eq!(directory.records().len(), 5),
            ConfiguredDirectory::Backend(_) => panic!("no backend was configured"),
        }
    }

    #[test]
    fn unreadable_roster_is_reported() {
        let settings = DirectorySettings {
            roster_path: Some(PathBuf::from("/nonexistent/roster.csv")),
            ..Default::default()
        };

        match load_directory(&settings) {
            Err(AppError::Roster(_)) => {}
            Err(other) => panic!("expected roster error, got {other}"),
            Ok(_) => panic!("missing roster should not load"),
        }
    }

    #[test]
    fn backend_url_takes_precedence_over_roster() {
        let settings = DirectorySettings {
            roster_path: Some(PathBuf::from("/nonexistent/roster.csv")),
            backend_url: Some("http://bookings.internal:8080/".to_string()),
            api_key: Some("key".to_string()),
        };

        let directory = load_directory(&settings).expect("backend directory builds");
        assert_eq!(directory.label(), "backend");
    }

    #[test]
    fn invalid_backend_url_is_reported() {
        let settings = DirectorySettings {
            backend_url: Some("bookings without scheme".to_string()),
            ..Default::default()
        };

        match load_directory(&settings) {
            Err(AppError::Recommendation(RecommendationError::Directory(
                DirectoryError::Unavailable(_),
            ))) => {}
            Err(other) => panic!("expected directory error, got {other}"),
            Ok(_) => panic!("invalid url should not load"),
        }
    }
}

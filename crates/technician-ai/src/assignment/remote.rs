use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use super::directory::{DirectoryError, TechnicianDirectory};
use super::domain::{Technician, TechnicianId, TechnicianStats};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Directory served by the booking backend's technician API.
///
/// Calls block, so async callers must run them on a blocking thread.
#[derive(Debug, Clone)]
pub struct RemoteDirectory {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkloadPayload {
    #[serde(default, alias = "CurrentWorkload")]
    current_workload: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RatingPayload {
    #[serde(default, alias = "AverageRating")]
    average_rating: f64,
}

impl RemoteDirectory {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, DirectoryError> {
        let base_url = Url::parse(base_url).map_err(|err| {
            DirectoryError::Unavailable(format!("invalid backend url '{base_url}': {err}"))
        })?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| DirectoryError::Unavailable(format!("http client: {err}")))?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, DirectoryError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                DirectoryError::Unavailable(format!("{} cannot be a base url", self.base_url))
            })?;
            path.pop_if_empty()
                .extend(["api", "ai", "technicians"])
                .extend(segments);
        }
        Ok(url)
    }

    /// `Ok(None)` on 404; any other non-success status is an outage.
    fn fetch_optional<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<Option<T>, DirectoryError> {
        let url = self.endpoint(segments)?;
        let mut request = self.client.get(url.clone());
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().map_err(|err| {
            warn!(%url, error = %err, "technician backend unreachable");
            DirectoryError::Unavailable(format!("GET {url}: {err}"))
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(%url, "technician backend returned 404");
            return Ok(None);
        }
        if !status.is_success() {
            warn!(%url, %status, "technician backend rejected request");
            return Err(DirectoryError::Unavailable(format!(
                "GET {url} returned {status}"
            )));
        }

        response
            .json::<T>()
            .map(Some)
            .map_err(|err| DirectoryError::Unavailable(format!("GET {url}: {err}")))
    }

    fn fetch_for<T: DeserializeOwned>(
        &self,
        id: &TechnicianId,
        resource: &str,
    ) -> Result<T, DirectoryError> {
        self.fetch_optional(&[id.as_str(), resource])?
            .ok_or_else(|| DirectoryError::UnknownTechnician(id.clone()))
    }
}

impl TechnicianDirectory for RemoteDirectory {
    fn list_available_technicians(&self) -> Result<Vec<Technician>, DirectoryError> {
        let technicians: Vec<Technician> = self.fetch_optional(&["available"])?.ok_or_else(|| {
            DirectoryError::Unavailable("available technicians endpoint not found".to_string())
        })?;
        debug!(count = technicians.len(), "fetched technicians from backend");
        Ok(technicians)
    }

    fn stats(&self, id: &TechnicianId) -> Result<Option<TechnicianStats>, DirectoryError> {
        let stats: Option<TechnicianStats> = self.fetch_optional(&[id.as_str(), "stats"])?;
        Ok(stats.map(TechnicianStats::with_derived_rate))
    }

    fn current_workload(&self, id: &TechnicianId) -> Result<u32, DirectoryError> {
        let payload: WorkloadPayload = self.fetch_for(id, "workload")?;
        Ok(payload.current_workload)
    }

    fn reviews_average(&self, id: &TechnicianId) -> Result<f64, DirectoryError> {
        let payload: RatingPayload = self.fetch_for(id, "rating")?;
        Ok(payload.average_rating)
    }
}

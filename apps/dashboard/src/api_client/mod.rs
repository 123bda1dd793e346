/// Recruitment API client, the only place the dashboard talks to the backend.
///
/// Every call carries the configured bearer token. The token is never
/// inspected or refreshed here; an expired token surfaces as an ordinary
/// request failure.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::application::{ApplicationRecord, ApplicationStatus, ApplicationsResponse};
use crate::models::ranking::RankedCandidates;

/// Shown when the backend gives no readable reason for a failure.
pub const GENERIC_FAILURE: &str = "Request failed, please try again";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {}", .message.as_deref().unwrap_or(GENERIC_FAILURE))]
    Api {
        status: u16,
        message: Option<String>,
    },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// Text for the transient notification shown to the operator.
    /// Server-reported messages are surfaced verbatim; everything else is generic.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Api {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

/// The slice of the recruitment REST API the dashboard consumes.
///
/// Held as `Arc<dyn RecruitmentApi>` so the dashboard can run against a fake.
#[async_trait]
pub trait RecruitmentApi: Send + Sync {
    /// GET /jobs/company/applications
    async fn fetch_applications(&self) -> Result<Vec<ApplicationRecord>, ApiError>;

    /// PUT /company/applications/{id}/status
    async fn update_status(
        &self,
        id: &str,
        status: &ApplicationStatus,
        note: Option<&str>,
    ) -> Result<(), ApiError>;

    /// GET /company/jobs/{jobId}/ranked-candidates
    async fn ranked_candidates(&self, job_id: &str) -> Result<RankedCandidates, ApiError>;
}

#[derive(Debug, Serialize)]
struct StatusUpdateBody<'a> {
    status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// reqwest-backed implementation of [`RecruitmentApi`].
#[derive(Clone)]
pub struct HttpRecruitmentApi {
    client: Client,
    base_url: Url,
    token: String,
}

impl HttpRecruitmentApi {
    pub fn new(base_url: &str, token: String, timeout: Duration) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url,
            token,
        })
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Turns a non-success response into `ApiError::Api`, keeping the
    /// server's `error` message when the body parses.
    async fn error_from(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .map(|e| e.error);
        warn!("Recruitment API returned {status}: {body}");
        ApiError::Api { status, message }
    }
}

#[async_trait]
impl RecruitmentApi for HttpRecruitmentApi {
    async fn fetch_applications(&self) -> Result<Vec<ApplicationRecord>, ApiError> {
        let url = self.endpoint(&["jobs", "company", "applications"]);
        debug!("GET {url}");

        let response = self.client.get(url).bearer_auth(&self.token).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body = response.text().await?;
        let parsed: ApplicationsResponse = serde_json::from_str(&body)?;
        debug!("Fetched {} applications", parsed.applications.len());
        Ok(parsed.applications)
    }

    async fn update_status(
        &self,
        id: &str,
        status: &ApplicationStatus,
        note: Option<&str>,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&["company", "applications", id, "status"]);
        debug!("PUT {url} status={status}");

        let response = self
            .client
            .put(url)
            .bearer_auth(&self.token)
            .json(&StatusUpdateBody {
                status: status.as_str(),
                note,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }

    async fn ranked_candidates(&self, job_id: &str) -> Result<RankedCandidates, ApiError> {
        let url = self.endpoint(&["company", "jobs", job_id, "ranked-candidates"]);
        debug!("GET {url}");

        let response = self.client.get(url).bearer_auth(&self.token).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body = response.text().await?;
        let mut ranked: RankedCandidates = serde_json::from_str(&body)?;
        ranked.sort_ranked();
        Ok(ranked)
    }
}

// Log service REST client

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

use crate::config::ApiConfig;
use crate::errors::FetchError;
use crate::models::{Job, LogPage};
use crate::query::LogQuery;
use crate::telemetry;

/// Source of job logs.
///
/// The dashboard receives an implementation instead of reaching for a global
/// client, so tests can swap in mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LogSource: Send + Sync {
    /// One page of jobs matching the query, plus the total match count
    async fn fetch_logs(&self, query: &LogQuery) -> Result<LogPage, FetchError>;

    /// A single job with its operators
    async fn fetch_job(&self, job_id: &str) -> Result<Job, FetchError>;
}

/// HttpLogClient talks to the log service over HTTP
#[derive(Debug, Clone)]
pub struct HttpLogClient {
    client: Client,
    base_url: Url,
}

impl HttpLogClient {
    /// Create a client from configuration
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| FetchError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Self::with_client(client, &config.base_url)
    }

    /// Create a client around an existing reqwest client
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, FetchError> {
        let base_url =
            Url::parse(base_url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, escaping each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, FetchError> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl LogSource for HttpLogClient {
    #[tracing::instrument(skip(self), fields(page = query.page, page_size = query.page_size))]
    async fn fetch_logs(&self, query: &LogQuery) -> Result<LogPage, FetchError> {
        let url = self.endpoint(&["logs"])?;
        let started = Instant::now();

        let result = async {
            let response = self.client.get(url).query(&query.to_params()).send().await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(FetchError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            Self::read_json::<LogPage>(response).await
        }
        .await;

        telemetry::record_request("logs", started.elapsed(), result.as_ref().err());

        match &result {
            Ok(page) => tracing::debug!(
                jobs = page.logs.len(),
                total = page.total_files,
                "Fetched log page"
            ),
            Err(e) => tracing::warn!(error = %e, kind = e.kind(), "Log page request failed"),
        }

        result
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_job(&self, job_id: &str) -> Result<Job, FetchError> {
        let url = self.endpoint(&["logs", job_id])?;
        let started = Instant::now();

        let result = async {
            let response = self.client.get(url).send().await?;

            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                return Err(FetchError::NotFound(job_id.to_string()));
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(FetchError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            Self::read_json::<Job>(response).await
        }
        .await;

        telemetry::record_request("job", started.elapsed(), result.as_ref().err());

        if let Err(e) = &result {
            tracing::warn!(job_id = job_id, error = %e, kind = e.kind(), "Job request failed");
        }

        result
    }
}

use crate::api::models::MetadataHistory;
use crate::diagnostics::log_fetch;
use crate::utils::with_timeout;
use chrono::Utc;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server answered with status {0}")]
    Status(u16),
    #[error("no response within {0:?}")]
    Timeout(Duration),
}

/// One-shot reader for the `/mediainfo` endpoint.
#[derive(Clone)]
pub struct MediainfoClient {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl MediainfoClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the current history. Every failure is logged and reported as `None`.
    pub async fn fetch_mediainfo(&self) -> Option<MetadataHistory> {
        let started_at = Utc::now();
        match self.try_fetch().await {
            Ok(history) => {
                log_fetch("mediainfo", started_at, &format!("{} records", history.len()));
                Some(history)
            }
            Err(err) => {
                tracing::warn!("mediainfo fetch from {} failed: {err}", self.url);
                None
            }
        }
    }

    pub async fn try_fetch(&self) -> Result<MetadataHistory, FetchError> {
        let request = async {
            let response = self.http.get(&self.url).send().await?;
            if !response.status().is_success() {
                return Err(FetchError::Status(response.status().as_u16()));
            }
            Ok::<_, FetchError>(response.json::<MetadataHistory>().await?)
        };

        with_timeout(self.timeout, request)
            .await
            .unwrap_or(Err(FetchError::Timeout(self.timeout)))
    }
}

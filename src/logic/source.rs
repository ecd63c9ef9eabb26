use crate::error::{FetchError, StartupError};
use crate::model::{RefreshOutcome, StatusSnapshot};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::time::Duration;
use url::Url;

pub const STATUS_PATH: &str = "api/status";
pub const REFRESH_PATH: &str = "api/refresh";

/// Where status snapshots come from. Implemented over HTTP in production and
/// by in-memory doubles in tests.
pub trait StatusSource: Send + Sync {
    /// `GET /api/status`
    fn fetch_status(&self) -> BoxFuture<'_, Result<StatusSnapshot, FetchError>>;

    /// `POST /api/refresh`. A decodable reply is returned as-is, including `success: false`.
    fn trigger_refresh(&self) -> BoxFuture<'_, Result<RefreshOutcome, FetchError>>;
}

pub struct HttpStatusClient {
    client: reqwest::Client,
    status_url: Url,
    refresh_url: Url,
}

impl HttpStatusClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StartupError> {
        let invalid = |source: url::ParseError| StartupError::InvalidUrl {
            url: base_url.to_string(),
            source,
        };

        let mut base = Url::parse(base_url).map_err(invalid)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let status_url = base.join(STATUS_PATH).map_err(invalid)?;
        let refresh_url = base.join(REFRESH_PATH).map_err(invalid)?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(StartupError::HttpClient)?;

        Ok(Self {
            client,
            status_url,
            refresh_url,
        })
    }

    pub fn status_url(&self) -> &Url {
        &self.status_url
    }

    pub fn refresh_url(&self) -> &Url {
        &self.refresh_url
    }

    async fn get_status(&self) -> Result<StatusSnapshot, FetchError> {
        tracing::debug!(url = %self.status_url, "fetching status");
        let response = self.client.get(self.status_url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status));
        }
        let body = response.bytes().await?;
        parse_status_body(&body)
    }

    async fn post_refresh(&self) -> Result<RefreshOutcome, FetchError> {
        tracing::debug!(url = %self.refresh_url, "requesting refresh");
        let response = self.client.post(self.refresh_url.clone()).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        match serde_json::from_slice::<RefreshOutcome>(&body) {
            Ok(outcome) => Ok(outcome),
            Err(_) if !status.is_success() => Err(FetchError::HttpStatus(status)),
            Err(e) => Err(e.into()),
        }
    }
}

impl StatusSource for HttpStatusClient {
    fn fetch_status(&self) -> BoxFuture<'_, Result<StatusSnapshot, FetchError>> {
        self.get_status().boxed()
    }

    fn trigger_refresh(&self) -> BoxFuture<'_, Result<RefreshOutcome, FetchError>> {
        self.post_refresh().boxed()
    }
}

/// Decodes a status body. A truthy top-level `error` field is a failure even
/// on a 2xx response.
pub fn parse_status_body(body: &[u8]) -> Result<StatusSnapshot, FetchError> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    if let Some(message) = value.get("error").and_then(error_message) {
        return Err(FetchError::Application(message));
    }
    Ok(serde_json::from_value(value)?)
}

fn error_message(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null | serde_json::Value::Bool(false) => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;

// File: livewatch-client/src/status_client.rs

use std::time::Duration;
use async_trait::async_trait;
use tracing::debug;

use livewatch_common::error::Error;
use livewatch_common::models::StatusSnapshot;

/// Anything that can produce a status snapshot for the poller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self) -> Result<StatusSnapshot, Error>;
}

/// Calls the server's `GET /api/live-status`.
#[derive(Clone)]
pub struct HttpStatusClient {
    http: reqwest::Client,
    url: String,
}

impl HttpStatusClient {
    /// `request_timeout` bounds the whole request, connect through body.
    pub fn new(url: &str, request_timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            http,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Interprets an endpoint response. A non-success status carries `{ "error": ... }`.
pub fn decode_status_response(status: u16, body: &str) -> Result<StatusSnapshot, Error> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or_else(|| body.to_string());
        return Err(Error::Upstream(format!("status endpoint HTTP {}: {}", status, message)));
    }
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl StatusSource for HttpStatusClient {
    async fn fetch_status(&self) -> Result<StatusSnapshot, Error> {
        let resp = self.http.get(&self.url).send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        let snapshot = decode_status_response(status, &body)?;
        debug!("Fetched live status: {} stream(s)", snapshot.streams.len());
        Ok(snapshot)
    }
}

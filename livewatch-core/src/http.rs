//! HTTP client abstraction for the platform integrations
//!
//! The platform clients never talk to `reqwest` directly; they go through
//! [`HttpClient`] so tests can swap in `MockHttpClient` and script the
//! responses of the token, Helix and YouTube endpoints without a network.
//!
//! Responses are returned with their status code instead of being turned into
//! errors here, since each platform decides what a non-success status means
//! (Twitch evicts its cached token on `401`, for example).

use std::collections::HashMap;
use async_trait::async_trait;
use crate::Error;

/// Status code and body text of a completed request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A generic trait for making HTTP requests.
///
/// `Err` is reserved for transport failures (DNS, connect, TLS, body read).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: String, headers: HashMap<String, String>) -> Result<HttpResponse, Error>;
    async fn post_form(&self, url: String, form: HashMap<String, String>) -> Result<HttpResponse, Error>;
}

#[derive(Clone, Default)]
pub struct DefaultHttpClient {
    client: reqwest::Client,
}

impl DefaultHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl HttpClient for DefaultHttpClient {
    async fn get(&self, url: String, headers: HashMap<String, String>) -> Result<HttpResponse, Error> {
        let mut request = self.client.get(&url);
        for (key, value) in headers {
            request = request.header(&key, value);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }

    async fn post_form(&self, url: String, form: HashMap<String, String>) -> Result<HttpResponse, Error> {
        let response = self.client
            .post(&url)
            .form(&form)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

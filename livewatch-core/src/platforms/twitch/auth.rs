// Twitch app access token (client-credentials grant) with an expiry-aware cache.
//
// Usage from the live client:
// ```rust
// let token = self.tokens.get_or_fetch(self.http.as_ref(), &creds, &self.token_url).await?;
// ```

use std::collections::HashMap;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::Error;
use crate::http::HttpClient;
use crate::platforms::{ensure_success, parse_body};
use crate::platforms::credentials::TwitchCredentials;

pub const TWITCH_TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";

/// Seconds before expiry at which a cached token is treated as expired.
pub const DEFAULT_EXPIRY_MARGIN_SECS: i64 = 60;

/// Matches Twitch's JSON from the token endpoint
#[derive(Deserialize)]
struct AppTokenResponse {
    access_token: String,
    expires_in: i64,
    #[allow(dead_code)]
    token_type: Option<String>, // "bearer"
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl AppToken {
    fn fresh_for(&self, margin: Duration) -> bool {
        self.expires_at - Utc::now() > margin
    }
}

struct CachedToken {
    client_id: String,
    token: AppToken,
}

/// Holds at most one app token, tagged with the client id it was issued for.
///
/// The lock is held across the token exchange so concurrent callers wait for one
/// exchange instead of racing several.
pub struct AppTokenCache {
    slot: Mutex<Option<CachedToken>>,
    margin: Duration,
}

impl Default for AppTokenCache {
    fn default() -> Self {
        Self::new(DEFAULT_EXPIRY_MARGIN_SECS)
    }
}

impl AppTokenCache {
    pub fn new(margin_secs: i64) -> Self {
        Self {
            slot: Mutex::new(None),
            margin: Duration::seconds(margin_secs),
        }
    }

    /// Returns a bearer token, exchanging credentials only when the cached token
    /// is missing, about to expire, or belongs to another client id.
    pub async fn get_or_fetch(
        &self,
        http: &dyn HttpClient,
        creds: &TwitchCredentials,
        token_url: &str,
    ) -> Result<String, Error> {
        let mut slot = self.slot.lock().await;
        if let Some(cached) = slot.as_ref() {
            if cached.client_id == creds.client_id && cached.token.fresh_for(self.margin) {
                return Ok(cached.token.access_token.clone());
            }
        }

        let token = request_app_token(http, creds, token_url).await?;
        debug!(
            "Twitch app token issued; expires in {} s",
            (token.expires_at - Utc::now()).num_seconds()
        );
        let access_token = token.access_token.clone();
        *slot = Some(CachedToken {
            client_id: creds.client_id.clone(),
            token,
        });
        Ok(access_token)
    }

    /// Drops the cached token so the next call re-authenticates.
    pub async fn invalidate(&self) {
        self.slot.lock().await.take();
    }
}

/// Performs the client-credentials exchange.
pub async fn request_app_token(
    http: &dyn HttpClient,
    creds: &TwitchCredentials,
    token_url: &str,
) -> Result<AppToken, Error> {
    let mut form = HashMap::new();
    form.insert("client_id".to_string(), creds.client_id.clone());
    form.insert("client_secret".to_string(), creds.client_secret.clone());
    form.insert("grant_type".to_string(), "client_credentials".to_string());

    let resp = http.post_form(token_url.to_string(), form).await?;
    ensure_success("Twitch token endpoint", &resp)?;
    let parsed: AppTokenResponse = parse_body("Twitch token endpoint", &resp)?;

    Ok(AppToken {
        access_token: parsed.access_token,
        expires_at: Utc::now() + Duration::seconds(parsed.expires_in),
    })
}

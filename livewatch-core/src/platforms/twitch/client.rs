// File: src/platforms/twitch/client.rs

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use tracing::debug;
use url::Url;

use livewatch_common::models::{LiveStream, Platform, TrackedChannel, UNTRACKED_PRIORITY};
use livewatch_common::traits::platform_traits::LivePlatformClient;

use crate::Error;
use crate::http::HttpClient;
use crate::platforms::{ensure_success, parse_body};
use crate::platforms::credentials::{CredentialProvider, TwitchCredentials};
use crate::platforms::twitch::auth::{AppTokenCache, TWITCH_TOKEN_URL};
use crate::platforms::twitch::streams::{StreamData, StreamsResponse};

pub const HELIX_STREAMS_URL: &str = "https://api.twitch.tv/helix/streams";

/// Helix caps `user_login` repetitions per request.
pub const MAX_LOGINS_PER_REQUEST: usize = 100;

/// Batch live-status lookup against Helix "Get Streams".
///
/// One token exchange (cached between calls), then one request per 100 logins.
pub struct TwitchLiveClient {
    http: Arc<dyn HttpClient>,
    credentials: Arc<dyn CredentialProvider>,
    tokens: AppTokenCache,
    token_url: String,
    streams_url: String,
}

impl TwitchLiveClient {
    pub fn new(http: Arc<dyn HttpClient>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            http,
            credentials,
            tokens: AppTokenCache::default(),
            token_url: TWITCH_TOKEN_URL.to_string(),
            streams_url: HELIX_STREAMS_URL.to_string(),
        }
    }

    /// Points the client at different token / streams endpoints.
    pub fn with_endpoints(mut self, token_url: &str, streams_url: &str) -> Self {
        self.token_url = token_url.to_string();
        self.streams_url = streams_url.to_string();
        self
    }

    async fn fetch_streams_page(
        &self,
        creds: &TwitchCredentials,
        bearer_token: &str,
        logins: &[TrackedChannel],
    ) -> Result<Vec<StreamData>, Error> {
        let mut params: Vec<(&str, &str)> = logins
            .iter()
            .map(|c| ("user_login", c.channel_id.as_str()))
            .collect();
        params.push(("first", "100"));
        let url = Url::parse_with_params(&self.streams_url, &params)?;

        let mut headers = HashMap::new();
        headers.insert("Client-Id".to_string(), creds.client_id.clone());
        headers.insert("Authorization".to_string(), format!("Bearer {}", bearer_token));

        let resp = self.http.get(url.to_string(), headers).await?;
        if resp.status == 401 {
            // Token revoked or expired early; next call will re-authenticate.
            self.tokens.invalidate().await;
        }
        ensure_success("Twitch get streams", &resp)?;

        let parsed: StreamsResponse = parse_body("Twitch get streams", &resp)?;
        Ok(parsed.data)
    }
}

/// Maps Helix entries back onto the roster by case-insensitive login.
///
/// Entries with no roster match are kept with `is_owner = false` and
/// [`UNTRACKED_PRIORITY`].
pub fn map_live_entries(channels: &[TrackedChannel], entries: Vec<StreamData>) -> Vec<LiveStream> {
    let by_login: HashMap<String, &TrackedChannel> = channels
        .iter()
        .map(|c| (c.channel_id.to_lowercase(), c))
        .collect();

    entries
        .into_iter()
        .filter(StreamData::is_live)
        .map(|entry| {
            let stream_url = format!("https://www.twitch.tv/{}", entry.user_login);
            let thumbnail = entry.thumbnail();
            match by_login.get(&entry.user_login.to_lowercase()) {
                Some(channel) => LiveStream::for_channel(
                    channel,
                    stream_url,
                    entry.title,
                    thumbnail,
                    Some(entry.viewer_count),
                ),
                None => {
                    debug!("Twitch returned untracked live login '{}'", entry.user_login);
                    LiveStream {
                        channel_id: entry.user_login.clone(),
                        channel_name: if entry.user_name.is_empty() {
                            entry.user_login.clone()
                        } else {
                            entry.user_name
                        },
                        platform: Platform::Twitch,
                        stream_url,
                        title: entry.title,
                        thumbnail,
                        viewer_count: Some(entry.viewer_count),
                        is_owner: false,
                        priority: UNTRACKED_PRIORITY,
                    }
                }
            }
        })
        .collect()
}

#[async_trait]
impl LivePlatformClient for TwitchLiveClient {
    fn platform(&self) -> Platform {
        Platform::Twitch
    }

    async fn fetch_live(&self, channels: &[TrackedChannel]) -> Result<Vec<LiveStream>, Error> {
        if channels.is_empty() {
            return Ok(Vec::new());
        }

        let creds = self.credentials.twitch().ok_or_else(|| {
            Error::Configuration("TWITCH_CLIENT_ID / TWITCH_CLIENT_SECRET are not set".into())
        })?;

        let token = self
            .tokens
            .get_or_fetch(self.http.as_ref(), &creds, &self.token_url)
            .await?;

        let mut entries = Vec::new();
        for chunk in channels.chunks(MAX_LOGINS_PER_REQUEST) {
            let page = self.fetch_streams_page(&creds, &token, chunk).await?;
            entries.extend(page);
        }

        let live = map_live_entries(channels, entries);
        if live.is_empty() {
            debug!("Twitch: none of {} channel(s) live", channels.len());
        } else {
            debug!("Twitch: {} of {} channel(s) live", live.len(), channels.len());
        }
        Ok(live)
    }
}

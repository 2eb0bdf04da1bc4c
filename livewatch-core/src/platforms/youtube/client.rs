// File: src/platforms/youtube/client.rs

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use futures_util::future::join_all;
use tracing::{debug, warn};
use url::Url;

use livewatch_common::models::{LiveStream, Platform, TrackedChannel};
use livewatch_common::traits::platform_traits::LivePlatformClient;

use crate::Error;
use crate::http::HttpClient;
use crate::platforms::{ensure_success, parse_body};
use crate::platforms::credentials::CredentialProvider;
use crate::platforms::youtube::search::{SearchItem, SearchResponse, VideosResponse};

pub const YOUTUBE_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
pub const YOUTUBE_VIDEOS_URL: &str = "https://www.googleapis.com/youtube/v3/videos";

/// `videos.list` accepts at most this many ids per call.
pub const MAX_VIDEO_IDS_PER_REQUEST: usize = 50;

/// Per-channel live lookup against the YouTube Data API.
///
/// There is no batch "which of these channels are live" call, so every channel
/// gets its own `search.list` request. A failing channel is logged and skipped.
pub struct YouTubeLiveClient {
    http: Arc<dyn HttpClient>,
    credentials: Arc<dyn CredentialProvider>,
    search_url: String,
    videos_url: String,
}

impl YouTubeLiveClient {
    pub fn new(http: Arc<dyn HttpClient>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            http,
            credentials,
            search_url: YOUTUBE_SEARCH_URL.to_string(),
            videos_url: YOUTUBE_VIDEOS_URL.to_string(),
        }
    }

    pub fn with_endpoints(mut self, search_url: &str, videos_url: &str) -> Self {
        self.search_url = search_url.to_string();
        self.videos_url = videos_url.to_string();
        self
    }

    /// `Ok(None)` when the channel has no live broadcast.
    async fn search_live(&self, api_key: &str, channel: &TrackedChannel) -> Result<Option<SearchItem>, Error> {
        let url = Url::parse_with_params(
            &self.search_url,
            &[
                ("part", "snippet"),
                ("channelId", channel.channel_id.as_str()),
                ("eventType", "live"),
                ("type", "video"),
                ("maxResults", "1"),
                ("key", api_key),
            ],
        )?;

        let resp = self.http.get(url.to_string(), HashMap::new()).await?;
        ensure_success("YouTube search", &resp)?;
        let parsed: SearchResponse = parse_body("YouTube search", &resp)?;

        Ok(parsed
            .items
            .into_iter()
            .find(|item| item.id.video_id.is_some()))
    }

    /// Best-effort viewer counts, one `videos.list` call per chunk of ids. A failed
    /// chunk only loses the counts for its own videos.
    async fn viewer_counts(&self, api_key: &str, video_ids: &[String]) -> HashMap<String, u64> {
        let mut viewers = HashMap::new();
        for chunk in video_ids.chunks(MAX_VIDEO_IDS_PER_REQUEST) {
            match self.concurrent_viewers(api_key, chunk).await {
                Ok(counts) => viewers.extend(counts),
                Err(e) => warn!("YouTube viewer counts unavailable for {} video(s): {}", chunk.len(), e),
            }
        }
        viewers
    }

    async fn concurrent_viewers(&self, api_key: &str, video_ids: &[String]) -> Result<HashMap<String, u64>, Error> {
        let ids = video_ids.join(",");
        let url = Url::parse_with_params(
            &self.videos_url,
            &[("part", "liveStreamingDetails"), ("id", ids.as_str()), ("key", api_key)],
        )?;

        let resp = self.http.get(url.to_string(), HashMap::new()).await?;
        ensure_success("YouTube videos", &resp)?;
        let parsed: VideosResponse = parse_body("YouTube videos", &resp)?;

        Ok(parsed
            .items
            .into_iter()
            .filter_map(|video| {
                let viewers = video
                    .live_streaming_details?
                    .concurrent_viewers?
                    .parse::<u64>()
                    .ok()?;
                Some((video.id, viewers))
            })
            .collect())
    }
}

#[async_trait]
impl LivePlatformClient for YouTubeLiveClient {
    fn platform(&self) -> Platform {
        Platform::YouTube
    }

    async fn fetch_live(&self, channels: &[TrackedChannel]) -> Result<Vec<LiveStream>, Error> {
        if channels.is_empty() {
            return Ok(Vec::new());
        }

        let api_key = self
            .credentials
            .youtube_api_key()
            .ok_or_else(|| Error::Configuration("YOUTUBE_API_KEY is not set".into()))?;

        let lookups = channels.iter().map(|c| self.search_live(&api_key, c));
        let results = join_all(lookups).await;

        let mut video_ids = Vec::new();
        let mut live = Vec::new();
        for (channel, result) in channels.iter().zip(results) {
            match result {
                Ok(Some(item)) => {
                    let video_id = item.id.video_id.unwrap_or_default();
                    let stream = LiveStream::for_channel(
                        channel,
                        format!("https://www.youtube.com/watch?v={}", video_id),
                        item.snippet.title,
                        item.snippet.thumbnails.best(),
                        None,
                    );
                    video_ids.push(video_id);
                    live.push(stream);
                }
                Ok(None) => {
                    debug!("YouTube channel '{}' is not live", channel.channel_id);
                }
                Err(e) => {
                    warn!("Skipping YouTube channel '{}': {}", channel.channel_id, e);
                }
            }
        }

        if !video_ids.is_empty() {
            let viewers = self.viewer_counts(&api_key, &video_ids).await;
            for (stream, video_id) in live.iter_mut().zip(&video_ids) {
                stream.viewer_count = viewers.get(video_id).copied();
            }
        }

        debug!("YouTube: {} of {} channel(s) live", live.len(), channels.len());
        Ok(live)
    }
}

// File: livewatch-common/src/models/stream.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::channel::{ManualOverride, TrackedChannel};
use crate::models::platform::Platform;

/// Priority given to the synthesized manual-override entry. Higher than any
/// priority an operator is expected to configure.
pub const OVERRIDE_PRIORITY: i32 = 999;

/// `channelId` used for the synthesized manual-override entry.
pub const OVERRIDE_CHANNEL_ID: &str = "manual-override";

/// Priority for a live entry the platform returned but no tracked channel matches.
pub const UNTRACKED_PRIORITY: i32 = 1;

/// One channel that is live right now, normalized across platforms.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LiveStream {
    pub channel_id: String,
    pub channel_name: String,
    pub platform: Platform,
    pub stream_url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewer_count: Option<u64>,
    pub is_owner: bool,
    pub priority: i32,
}

impl LiveStream {
    /// Builds the live entry for a tracked channel, copying ownership and
    /// priority from the roster record.
    pub fn for_channel(
        channel: &TrackedChannel,
        stream_url: String,
        title: String,
        thumbnail: Option<String>,
        viewer_count: Option<u64>,
    ) -> Self {
        Self {
            channel_id: channel.channel_id.clone(),
            channel_name: channel.name.clone(),
            platform: channel.platform,
            stream_url,
            title,
            thumbnail,
            viewer_count,
            is_owner: channel.is_owner,
            priority: channel.priority,
        }
    }

    /// Synthesizes the entry shown while the manual override is live.
    pub fn from_override(manual: &ManualOverride) -> Self {
        Self {
            channel_id: OVERRIDE_CHANNEL_ID.to_string(),
            channel_name: manual.stream_title.clone(),
            platform: manual.platform,
            stream_url: manual.stream_url.clone(),
            title: manual.stream_title.clone(),
            thumbnail: manual.thumbnail.clone(),
            viewer_count: None,
            is_owner: true,
            priority: OVERRIDE_PRIORITY,
        }
    }
}

/// Result of one aggregation pass.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub streams: Vec<LiveStream>,
    pub is_live: bool,
    /// Absent when the roster was empty and no platform was asked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_at: Option<DateTime<Utc>>,
}

impl StatusSnapshot {
    /// The short-circuit answer for an empty roster.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(streams: Vec<LiveStream>, checked_at: DateTime<Utc>) -> Self {
        let is_live = !streams.is_empty();
        Self {
            streams,
            is_live,
            checked_at: Some(checked_at),
        }
    }
}

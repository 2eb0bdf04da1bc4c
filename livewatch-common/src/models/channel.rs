// File: livewatch-common/src/models/channel.rs

use serde::{Deserialize, Serialize};
use crate::models::platform::Platform;

/// A creator channel the operators want live checks for.
///
/// Owned by the content store; this workspace only ever reads it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TrackedChannel {
    pub id: String,
    pub name: String,
    pub platform: Platform,
    /// Twitch login or YouTube channel id.
    pub channel_id: String,
    #[serde(default)]
    pub channel_url: String,
    #[serde(default)]
    pub is_owner: bool,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Operator-forced "we are live" state that bypasses the platform queries.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ManualOverride {
    pub is_live: bool,
    pub platform: Platform,
    #[serde(default)]
    pub stream_url: String,
    #[serde(default)]
    pub stream_title: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

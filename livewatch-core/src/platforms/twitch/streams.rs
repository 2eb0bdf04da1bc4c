// ========================================================
// File: src/platforms/twitch/streams.rs
// ========================================================
use serde::Deserialize;

/// Response from the Helix "Get Streams" endpoint.
#[derive(Debug, Deserialize)]
pub struct StreamsResponse {
    #[serde(default)]
    pub data: Vec<StreamData>,
}

/// Single stream record. Helix only returns channels that are currently live.
#[derive(Debug, Deserialize)]
pub struct StreamData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub user_login: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub game_name: String,
    #[serde(rename = "type", default)]
    pub type_field: String, // "live", or "" after an error
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub viewer_count: u64,
    #[serde(default)]
    pub started_at: String,
    #[serde(default)]
    pub thumbnail_url: String,
}

impl StreamData {
    pub fn is_live(&self) -> bool {
        self.type_field.is_empty() || self.type_field.eq_ignore_ascii_case("live")
    }

    /// Helix thumbnails are templates with `{width}` and `{height}` placeholders.
    pub fn thumbnail(&self) -> Option<String> {
        if self.thumbnail_url.is_empty() {
            return None;
        }
        Some(
            self.thumbnail_url
                .replace("{width}", "1280")
                .replace("{height}", "720"),
        )
    }
}

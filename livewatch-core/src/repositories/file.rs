// File: src/repositories/file.rs
//
// Roster + override kept in a JSON document that operators edit by hand:
//
// {
//   "channels": [
//     { "id": "1", "name": "Alice", "platform": "twitch", "channelId": "alice",
//       "channelUrl": "https://www.twitch.tv/alice", "isOwner": true, "priority": 5 }
//   ],
//   "override": { "isLive": false, "platform": "youtube", "streamUrl": "", "streamTitle": "" }
// }

use std::path::{Path, PathBuf};
use async_trait::async_trait;
use serde::Deserialize;

use livewatch_common::models::{ManualOverride, TrackedChannel};
use livewatch_common::traits::repository_traits::ContentStore;

use crate::Error;

#[derive(Debug, Default, Deserialize)]
struct RosterDocument {
    #[serde(default)]
    channels: Vec<TrackedChannel>,
    #[serde(rename = "override", default)]
    manual_override: Option<ManualOverride>,
}

/// Re-reads the file on every call; there is no cache to invalidate.
#[derive(Debug, Clone)]
pub struct JsonFileContentStore {
    path: PathBuf,
}

impl JsonFileContentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<RosterDocument, Error> {
        let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            Error::ContentStore(format!("reading {}: {}", self.path.display(), e))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            Error::ContentStore(format!("parsing {}: {}", self.path.display(), e))
        })
    }
}

#[async_trait]
impl ContentStore for JsonFileContentStore {
    async fn list_enabled_tracked_channels(&self) -> Result<Vec<TrackedChannel>, Error> {
        let doc = self.load().await?;
        Ok(doc.channels.into_iter().filter(|c| c.enabled).collect())
    }

    async fn get_manual_override(&self) -> Result<Option<ManualOverride>, Error> {
        Ok(self.load().await?.manual_override)
    }
}

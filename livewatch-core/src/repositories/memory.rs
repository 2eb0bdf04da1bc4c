use async_trait::async_trait;
use tokio::sync::RwLock;

use livewatch_common::models::{ManualOverride, TrackedChannel};
use livewatch_common::traits::repository_traits::ContentStore;

use crate::Error;

/// Content store held in memory. Edits through the setters are visible on the
/// next aggregator call.
#[derive(Default)]
pub struct InMemoryContentStore {
    channels: RwLock<Vec<TrackedChannel>>,
    manual_override: RwLock<Option<ManualOverride>>,
}

impl InMemoryContentStore {
    pub fn new(channels: Vec<TrackedChannel>) -> Self {
        Self {
            channels: RwLock::new(channels),
            manual_override: RwLock::new(None),
        }
    }

    pub fn with_override(self, manual: ManualOverride) -> Self {
        Self {
            channels: self.channels,
            manual_override: RwLock::new(Some(manual)),
        }
    }

    pub async fn set_channels(&self, channels: Vec<TrackedChannel>) {
        *self.channels.write().await = channels;
    }

    pub async fn set_override(&self, manual: Option<ManualOverride>) {
        *self.manual_override.write().await = manual;
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn list_enabled_tracked_channels(&self) -> Result<Vec<TrackedChannel>, Error> {
        Ok(self
            .channels
            .read()
            .await
            .iter()
            .filter(|c| c.enabled)
            .cloned()
            .collect())
    }

    async fn get_manual_override(&self) -> Result<Option<ManualOverride>, Error> {
        Ok(self.manual_override.read().await.clone())
    }
}

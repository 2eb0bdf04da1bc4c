use async_trait::async_trait;
use crate::error::Error;
use crate::models::channel::TrackedChannel;
use crate::models::platform::Platform;
use crate::models::stream::LiveStream;

/// One streaming platform's "who of these is live" query.
#[async_trait]
pub trait LivePlatformClient: Send + Sync {
    /// Which roster partition this client serves.
    fn platform(&self) -> Platform;

    /// Returns the live subset of `channels`. An empty slice must return
    /// `Ok(vec![])` without touching the network.
    async fn fetch_live(&self, channels: &[TrackedChannel]) -> Result<Vec<LiveStream>, Error>;
}

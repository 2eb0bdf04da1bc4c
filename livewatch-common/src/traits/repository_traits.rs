use async_trait::async_trait;
use crate::error::Error;
use crate::models::channel::{ManualOverride, TrackedChannel};

/// Read-only view of the content store that owns the roster and the manual override.
///
/// Implementations must not cache: the aggregator calls both methods on every
/// poll cycle so that operator edits apply on the next poll.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn list_enabled_tracked_channels(&self) -> Result<Vec<TrackedChannel>, Error>;

    /// `Ok(None)` when no override record exists.
    async fn get_manual_override(&self) -> Result<Option<ManualOverride>, Error>;
}

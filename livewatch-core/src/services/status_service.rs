// File: src/services/status_service.rs
//
// Builds one StatusSnapshot per call: roster -> concurrent platform lookups ->
// merge -> sort -> manual override on top. Only a roster failure is returned as
// an error; everything a third party can break degrades to fewer streams.

use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use futures_util::future::join_all;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use livewatch_common::models::{LiveStream, StatusSnapshot, TrackedChannel};
use livewatch_common::traits::platform_traits::LivePlatformClient;
use livewatch_common::traits::repository_traits::ContentStore;

use crate::Error;

/// Upper bound for a single platform's lookup.
pub const DEFAULT_PLATFORM_TIMEOUT: Duration = Duration::from_secs(10);

pub struct StatusService {
    store: Arc<dyn ContentStore>,
    clients: Vec<Arc<dyn LivePlatformClient>>,
    platform_timeout: Duration,
}

impl StatusService {
    /// `clients` are queried in parallel; their order is the order their
    /// streams are concatenated in before sorting.
    pub fn new(store: Arc<dyn ContentStore>, clients: Vec<Arc<dyn LivePlatformClient>>) -> Self {
        Self {
            store,
            clients,
            platform_timeout: DEFAULT_PLATFORM_TIMEOUT,
        }
    }

    pub fn with_platform_timeout(mut self, platform_timeout: Duration) -> Self {
        self.platform_timeout = platform_timeout;
        self
    }

    pub async fn get_status(&self) -> Result<StatusSnapshot, Error> {
        let roster: Vec<TrackedChannel> = match self.store.list_enabled_tracked_channels().await {
            Ok(channels) => channels.into_iter().filter(|c| c.enabled).collect(),
            Err(e) => {
                error!("Failed to load tracked channels: {}", e);
                return Err(e);
            }
        };

        if roster.is_empty() {
            debug!("No tracked channels; skipping platform lookups");
            return Ok(StatusSnapshot::empty());
        }

        let lookups = self.clients.iter().filter_map(|client| {
            let platform = client.platform();
            let partition: Vec<TrackedChannel> = roster
                .iter()
                .filter(|c| c.platform == platform)
                .cloned()
                .collect();
            if partition.is_empty() {
                None
            } else {
                Some(self.query_platform(client.clone(), partition))
            }
        });

        let mut streams: Vec<LiveStream> = join_all(lookups).await.into_iter().flatten().collect();
        sort_streams(&mut streams);

        // The override goes on top after sorting, so no configured priority can outrank it.
        if let Some(entry) = self.override_entry().await {
            streams.insert(0, entry);
        }

        info!(
            "Live status: {} stream(s) across {} tracked channel(s)",
            streams.len(),
            roster.len()
        );
        Ok(StatusSnapshot::new(streams, Utc::now()))
    }

    async fn query_platform(
        &self,
        client: Arc<dyn LivePlatformClient>,
        channels: Vec<TrackedChannel>,
    ) -> Vec<LiveStream> {
        let platform = client.platform();
        let result = timeout(self.platform_timeout, client.fetch_live(&channels))
            .await
            .map_err(Error::from)
            .and_then(|r| r);
        match result {
            Ok(streams) => streams,
            Err(Error::Configuration(msg)) => {
                warn!("Skipping {} lookup, not configured: {}", platform, msg);
                Vec::new()
            }
            Err(Error::Timeout(_)) => {
                warn!(
                    "Skipping {} lookup: no answer within {:?}",
                    platform, self.platform_timeout
                );
                Vec::new()
            }
            Err(e) => {
                warn!("Skipping {} lookup: {}", platform, e);
                Vec::new()
            }
        }
    }

    async fn override_entry(&self) -> Option<LiveStream> {
        match self.store.get_manual_override().await {
            Ok(Some(manual)) if manual.is_live => Some(LiveStream::from_override(&manual)),
            Ok(_) => None,
            Err(e) => {
                warn!("Ignoring manual override, failed to load: {}", e);
                None
            }
        }
    }
}

/// Owners first, then higher priority first. `sort_by` is stable, so equal
/// keys keep their discovery order.
pub fn sort_streams(streams: &mut [LiveStream]) {
    streams.sort_by(|a, b| {
        b.is_owner
            .cmp(&a.is_owner)
            .then_with(|| b.priority.cmp(&a.priority))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use livewatch_common::models::{ManualOverride, Platform, OVERRIDE_CHANNEL_ID};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use crate::repositories::memory::InMemoryContentStore;

    /// Returns a live entry for every requested channel, or a fixed error.
    struct FakeClient {
        platform: Platform,
        fail: bool,
        delay: Option<Duration>,
        calls: AtomicUsize,
        viewers: Option<u64>,
    }

    impl FakeClient {
        fn new(platform: Platform) -> Self {
            Self { platform, fail: false, delay: None, calls: AtomicUsize::new(0), viewers: None }
        }
        fn failing(platform: Platform) -> Self {
            Self { fail: true, ..Self::new(platform) }
        }
    }

    #[async_trait]
    impl LivePlatformClient for FakeClient {
        fn platform(&self) -> Platform {
            self.platform
        }

        async fn fetch_live(&self, channels: &[TrackedChannel]) -> Result<Vec<LiveStream>, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(Error::Upstream("HTTP 503".into()));
            }
            assert!(channels.iter().all(|c| c.platform == self.platform));
            Ok(channels
                .iter()
                .map(|c| LiveStream::for_channel(c, c.channel_url.clone(), "live".into(), None, self.viewers))
                .collect())
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl ContentStore for BrokenStore {
        async fn list_enabled_tracked_channels(&self) -> Result<Vec<TrackedChannel>, Error> {
            Err(Error::ContentStore("connection refused".into()))
        }
        async fn get_manual_override(&self) -> Result<Option<ManualOverride>, Error> {
            Ok(None)
        }
    }

    fn channel(id: &str, platform: Platform, is_owner: bool, priority: i32) -> TrackedChannel {
        TrackedChannel {
            id: id.into(),
            name: id.into(),
            platform,
            channel_id: id.into(),
            channel_url: format!("https://example.test/{}", id),
            is_owner,
            priority,
            enabled: true,
        }
    }

    fn live_override(platform: Platform, title: &str) -> ManualOverride {
        ManualOverride {
            is_live: true,
            platform,
            stream_url: "https://example.test/special".into(),
            stream_title: title.into(),
            thumbnail: None,
        }
    }

    fn ids(snapshot: &StatusSnapshot) -> Vec<&str> {
        snapshot.streams.iter().map(|s| s.channel_id.as_str()).collect()
    }

    fn service(store: InMemoryContentStore, twitch: FakeClient, youtube: FakeClient) -> StatusService {
        StatusService::new(Arc::new(store), vec![Arc::new(twitch) as Arc<dyn LivePlatformClient>, Arc::new(youtube)])
    }

    #[tokio::test]
    async fn test_alice_scenario() -> Result<(), Error> {
        let store = InMemoryContentStore::new(vec![channel("alice", Platform::Twitch, true, 5)]);
        let twitch = FakeClient { viewers: Some(120), ..FakeClient::new(Platform::Twitch) };
        let svc = service(store, twitch, FakeClient::new(Platform::YouTube));

        let snapshot = svc.get_status().await?;
        assert!(snapshot.is_live);
        assert!(snapshot.checked_at.is_some());
        assert_eq!(snapshot.streams.len(), 1);
        let alice = &snapshot.streams[0];
        assert_eq!(alice.channel_id, "alice");
        assert!(alice.is_owner);
        assert_eq!(alice.priority, 5);
        assert_eq!(alice.viewer_count, Some(120));
        Ok(())
    }

    #[tokio::test]
    async fn test_override_comes_first() -> Result<(), Error> {
        let store = InMemoryContentStore::new(vec![channel("alice", Platform::Twitch, true, 5)])
            .with_override(live_override(Platform::YouTube, "Special"));
        let svc = service(store, FakeClient::new(Platform::Twitch), FakeClient::new(Platform::YouTube));

        let snapshot = svc.get_status().await?;
        assert_eq!(ids(&snapshot), vec![OVERRIDE_CHANNEL_ID, "alice"]);
        assert_eq!(snapshot.streams[0].title, "Special");
        assert_eq!(snapshot.streams[0].platform, Platform::YouTube);
        Ok(())
    }

    #[tokio::test]
    async fn test_override_outranks_any_configured_priority() -> Result<(), Error> {
        let store = InMemoryContentStore::new(vec![channel("big", Platform::Twitch, true, 5000)])
            .with_override(live_override(Platform::Twitch, "Special"));
        let svc = service(store, FakeClient::new(Platform::Twitch), FakeClient::new(Platform::YouTube));

        let snapshot = svc.get_status().await?;
        assert_eq!(ids(&snapshot), vec![OVERRIDE_CHANNEL_ID, "big"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_override_not_live_is_ignored() -> Result<(), Error> {
        let mut manual = live_override(Platform::Twitch, "Special");
        manual.is_live = false;
        let store = InMemoryContentStore::new(vec![channel("alice", Platform::Twitch, true, 5)])
            .with_override(manual);
        let svc = service(store, FakeClient::new(Platform::Twitch), FakeClient::new(Platform::YouTube));

        assert_eq!(ids(&svc.get_status().await?), vec!["alice"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_ordering_owner_then_priority_then_discovery() -> Result<(), Error> {
        let store = InMemoryContentStore::new(vec![
            channel("t-friend-low", Platform::Twitch, false, 1),
            channel("y-owner", Platform::YouTube, true, 2),
            channel("t-friend-high", Platform::Twitch, false, 9),
            channel("t-owner", Platform::Twitch, true, 2),
            channel("y-friend-high", Platform::YouTube, false, 9),
        ]);
        let svc = service(store, FakeClient::new(Platform::Twitch), FakeClient::new(Platform::YouTube));

        let snapshot = svc.get_status().await?;
        // Equal (owner, priority) pairs keep Twitch-before-YouTube discovery order.
        assert_eq!(
            ids(&snapshot),
            vec!["t-owner", "y-owner", "t-friend-high", "y-friend-high", "t-friend-low"]
        );

        let owners_done = snapshot.streams.iter().position(|s| !s.is_owner).unwrap_or(snapshot.streams.len());
        assert!(snapshot.streams[owners_done..].iter().all(|s| !s.is_owner));
        for group in [&snapshot.streams[..owners_done], &snapshot.streams[owners_done..]] {
            assert!(group.windows(2).all(|w| w[0].priority >= w[1].priority));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_roster_skips_platforms() -> Result<(), Error> {
        let twitch = Arc::new(FakeClient::new(Platform::Twitch));
        let youtube = Arc::new(FakeClient::new(Platform::YouTube));
        let svc = StatusService::new(
            Arc::new(InMemoryContentStore::new(vec![])),
            vec![twitch.clone() as Arc<dyn LivePlatformClient>, youtube.clone()],
        );

        let snapshot = svc.get_status().await?;
        assert_eq!(snapshot, StatusSnapshot::empty());
        assert_eq!(twitch.calls.load(Ordering::SeqCst), 0);
        assert_eq!(youtube.calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_partition_is_not_queried() -> Result<(), Error> {
        let twitch = Arc::new(FakeClient::new(Platform::Twitch));
        let youtube = Arc::new(FakeClient::new(Platform::YouTube));
        let svc = StatusService::new(
            Arc::new(InMemoryContentStore::new(vec![channel("alice", Platform::Twitch, true, 5)])),
            vec![twitch.clone() as Arc<dyn LivePlatformClient>, youtube.clone()],
        );

        svc.get_status().await?;
        assert_eq!(twitch.calls.load(Ordering::SeqCst), 1);
        assert_eq!(youtube.calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_total_outage_is_not_an_error() -> Result<(), Error> {
        let store = InMemoryContentStore::new(vec![
            channel("alice", Platform::Twitch, true, 5),
            channel("UCbob", Platform::YouTube, false, 3),
        ]);
        let svc = service(store, FakeClient::failing(Platform::Twitch), FakeClient::failing(Platform::YouTube));

        let snapshot = svc.get_status().await?;
        assert!(snapshot.streams.is_empty());
        assert!(!snapshot.is_live);
        Ok(())
    }

    #[tokio::test]
    async fn test_no_credentials_on_any_platform_is_not_an_error() -> Result<(), Error> {
        use crate::http::MockHttpClient;
        use crate::platforms::{StaticCredentials, TwitchLiveClient, YouTubeLiveClient};

        // Any HTTP call would panic: missing credentials must short-circuit.
        let http = Arc::new(MockHttpClient::new());
        let credentials = Arc::new(StaticCredentials::default());
        let clients: Vec<Arc<dyn LivePlatformClient>> = vec![
            Arc::new(TwitchLiveClient::new(http.clone(), credentials.clone())),
            Arc::new(YouTubeLiveClient::new(http, credentials)),
        ];
        let store = InMemoryContentStore::new(vec![
            channel("alice", Platform::Twitch, true, 5),
            channel("UCbob", Platform::YouTube, false, 3),
        ]);

        let snapshot = StatusService::new(Arc::new(store), clients).get_status().await?;
        assert!(snapshot.streams.is_empty());
        assert!(!snapshot.is_live);
        assert!(snapshot.checked_at.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_one_platform_down_keeps_the_other() -> Result<(), Error> {
        let store = InMemoryContentStore::new(vec![
            channel("alice", Platform::Twitch, true, 5),
            channel("UCbob", Platform::YouTube, false, 3),
        ]);
        let svc = service(store, FakeClient::failing(Platform::Twitch), FakeClient::new(Platform::YouTube));

        assert_eq!(ids(&svc.get_status().await?), vec!["UCbob"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_slow_platform_times_out() -> Result<(), Error> {
        let store = InMemoryContentStore::new(vec![
            channel("alice", Platform::Twitch, true, 5),
            channel("UCbob", Platform::YouTube, false, 3),
        ]);
        let slow = FakeClient { delay: Some(Duration::from_secs(30)), ..FakeClient::new(Platform::YouTube) };
        let svc = service(store, FakeClient::new(Platform::Twitch), slow)
            .with_platform_timeout(Duration::from_millis(50));

        assert_eq!(ids(&svc.get_status().await?), vec!["alice"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_roster_failure_is_fatal() {
        let svc = StatusService::new(
            Arc::new(BrokenStore),
            vec![Arc::new(FakeClient::new(Platform::Twitch))],
        );
        let err = svc.get_status().await.unwrap_err();
        assert!(matches!(err, Error::ContentStore(_)));
    }

    #[tokio::test]
    async fn test_roster_edits_apply_next_call() -> Result<(), Error> {
        let store = Arc::new(InMemoryContentStore::new(vec![]));
        let svc = StatusService::new(
            store.clone(),
            vec![Arc::new(FakeClient::new(Platform::Twitch))],
        );
        assert!(!svc.get_status().await?.is_live);

        store.set_channels(vec![channel("alice", Platform::Twitch, true, 5)]).await;
        assert_eq!(ids(&svc.get_status().await?), vec!["alice"]);
        Ok(())
    }
}

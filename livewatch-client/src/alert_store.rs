// File: livewatch-client/src/alert_store.rs
//
// Client-side alert state. One `AlertStore` per display surface; tests build
// their own instead of sharing a global.

use std::collections::HashSet;
use std::sync::Arc;
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::debug;

use livewatch_common::models::{LiveStream, StatusSnapshot};

use crate::primary::select_primary;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertState {
    /// Streams from the last successful poll, in server order.
    pub streams: Vec<LiveStream>,
    /// Dismissed channel ids. Kept across refreshes until cleared.
    pub dismissed_channel_ids: HashSet<String>,
    pub show_alert: bool,
    pub last_checked: Option<DateTime<Utc>>,
}

impl AlertState {
    fn recompute_show_alert(&mut self) {
        self.show_alert = self
            .streams
            .iter()
            .any(|s| !self.dismissed_channel_ids.contains(&s.channel_id));
    }

    /// Streams that are not dismissed.
    pub fn visible_streams(&self) -> Vec<LiveStream> {
        self.streams
            .iter()
            .filter(|s| !self.dismissed_channel_ids.contains(&s.channel_id))
            .cloned()
            .collect()
    }

    /// The stream to feature, chosen among the visible ones.
    pub fn primary(&self) -> Option<LiveStream> {
        select_primary(&self.visible_streams()).cloned()
    }
}

/// Shared handle to the alert state.
///
/// Every mutation replaces its fields and `show_alert` inside one
/// `send_modify`, so subscribers never see the two out of sync.
#[derive(Clone)]
pub struct AlertStore {
    state: Arc<watch::Sender<AlertState>>,
}

impl Default for AlertStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AlertState::default());
        Self { state: Arc::new(tx) }
    }

    /// Receiver that is notified after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<AlertState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> AlertState {
        self.state.borrow().clone()
    }

    pub fn streams(&self) -> Vec<LiveStream> {
        self.state.borrow().streams.clone()
    }

    pub fn show_alert(&self) -> bool {
        self.state.borrow().show_alert
    }

    pub fn last_checked(&self) -> Option<DateTime<Utc>> {
        self.state.borrow().last_checked
    }

    pub fn primary(&self) -> Option<LiveStream> {
        self.state.borrow().primary()
    }

    /// Replaces the streams with a freshly polled snapshot.
    pub fn apply_snapshot(&self, snapshot: StatusSnapshot) {
        let checked_at = snapshot.checked_at.unwrap_or_else(Utc::now);
        self.state.send_modify(|state| {
            state.streams = snapshot.streams;
            state.last_checked = Some(checked_at);
            state.recompute_show_alert();
        });
    }

    /// Hides `channel_id` until [`clear_dismissed`](Self::clear_dismissed),
    /// including in later snapshots that contain it again.
    pub fn dismiss(&self, channel_id: &str) {
        debug!("Dismissing live alert for '{}'", channel_id);
        self.state.send_modify(|state| {
            state.dismissed_channel_ids.insert(channel_id.to_string());
            state.recompute_show_alert();
        });
    }

    pub fn clear_dismissed(&self) {
        self.state.send_modify(|state| {
            state.dismissed_channel_ids.clear();
            state.recompute_show_alert();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livewatch_common::models::Platform;

    fn stream(id: &str, is_owner: bool, priority: i32) -> LiveStream {
        LiveStream {
            channel_id: id.into(),
            channel_name: id.into(),
            platform: Platform::YouTube,
            stream_url: format!("https://www.youtube.com/watch?v={}", id),
            title: "live".into(),
            thumbnail: None,
            viewer_count: None,
            is_owner,
            priority,
        }
    }

    fn snapshot(streams: Vec<LiveStream>) -> StatusSnapshot {
        StatusSnapshot::new(streams, Utc::now())
    }

    #[test]
    fn test_snapshot_sets_show_alert_and_last_checked() {
        let store = AlertStore::new();
        assert!(!store.show_alert());
        assert!(store.last_checked().is_none());

        store.apply_snapshot(snapshot(vec![stream("alice", true, 5)]));
        assert!(store.show_alert());
        assert!(store.last_checked().is_some());

        store.apply_snapshot(snapshot(vec![]));
        assert!(!store.show_alert());
    }

    #[test]
    fn test_dismissal_survives_refresh_until_cleared() {
        let store = AlertStore::new();
        store.apply_snapshot(snapshot(vec![stream("bob", false, 1)]));
        store.dismiss("bob");
        assert!(!store.show_alert());

        // bob went offline and came back
        store.apply_snapshot(snapshot(vec![]));
        store.apply_snapshot(snapshot(vec![stream("bob", false, 1)]));
        assert!(!store.show_alert());
        assert!(store.primary().is_none());

        store.clear_dismissed();
        assert!(store.show_alert());
        assert_eq!(store.primary().map(|s| s.channel_id), Some("bob".to_string()));
    }

    #[test]
    fn test_dismiss_one_of_two_keeps_alert() {
        let store = AlertStore::new();
        store.apply_snapshot(snapshot(vec![stream("owner", true, 1), stream("friend", false, 9)]));
        store.dismiss("owner");

        let state = store.snapshot();
        assert!(state.show_alert);
        assert_eq!(state.visible_streams().len(), 1);
        assert_eq!(state.primary().map(|s| s.channel_id), Some("friend".to_string()));
        // The stream list itself is untouched by dismissal.
        assert_eq!(state.streams.len(), 2);
    }

    #[tokio::test]
    async fn test_subscribers_see_consistent_state() {
        let store = AlertStore::new();
        let mut rx = store.subscribe();

        store.apply_snapshot(snapshot(vec![stream("alice", true, 5)]));
        rx.changed().await.expect("store alive");
        {
            let seen = rx.borrow_and_update();
            assert_eq!(seen.streams.len(), 1);
            assert!(seen.show_alert);
        }

        store.dismiss("alice");
        rx.changed().await.expect("store alive");
        let seen = rx.borrow_and_update();
        assert!(seen.dismissed_channel_ids.contains("alice"));
        assert!(!seen.show_alert);
    }

    #[test]
    fn test_stores_are_isolated() {
        let a = AlertStore::new();
        let b = AlertStore::new();
        a.apply_snapshot(snapshot(vec![stream("alice", true, 5)]));
        assert!(a.show_alert());
        assert!(!b.show_alert());
    }
}

// File: livewatch-client/src/poll_scheduler.rs

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::alert_store::AlertStore;
use crate::status_client::StatusSource;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Feeds the alert store from a status source on a fixed interval.
///
/// Polls run one at a time inside a single task: a tick that fires while a
/// poll is still in flight is skipped rather than queued. Each poll is bounded
/// by the poll timeout (the interval unless set), so a hung request cannot
/// stop later ticks.
pub struct PollScheduler {
    source: Arc<dyn StatusSource>,
    store: AlertStore,
    interval: Duration,
    poll_timeout: Option<Duration>,
}

impl PollScheduler {
    pub fn new(source: Arc<dyn StatusSource>, store: AlertStore) -> Self {
        Self {
            source,
            store,
            interval: DEFAULT_POLL_INTERVAL,
            poll_timeout: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_poll_timeout(mut self, poll_timeout: Duration) -> Self {
        self.poll_timeout = Some(poll_timeout);
        self
    }

    pub fn poll_timeout(&self) -> Duration {
        self.poll_timeout.unwrap_or(self.interval)
    }

    pub fn store(&self) -> &AlertStore {
        &self.store
    }

    /// One poll. On failure or timeout the previous alert state is kept as is.
    pub async fn poll_once(&self) -> bool {
        let deadline = self.poll_timeout();
        match timeout(deadline, self.source.fetch_status()).await {
            Ok(Ok(snapshot)) => {
                debug!("Poll ok: is_live={}, streams={}", snapshot.is_live, snapshot.streams.len());
                self.store.apply_snapshot(snapshot);
                true
            }
            Ok(Err(e)) => {
                warn!("Live status poll failed, keeping previous state: {}", e);
                false
            }
            Err(_) => {
                warn!("Live status poll timed out after {:?}, keeping previous state", deadline);
                false
            }
        }
    }

    /// Polls immediately, then every interval, until `shutdown` flips to `true`
    /// or its sender is dropped. An in-flight poll is abandoned on shutdown.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!("Live status poller started; interval={:?}", self.interval);

        loop {
            tokio::select! {
                biased;
                _ = async { shutdown.wait_for(|stop| *stop).await.map(|_| ()) } => break,
                _ = ticker.tick() => {
                    tokio::select! {
                        biased;
                        _ = shutdown.wait_for(|stop| *stop) => break,
                        _ = self.poll_once() => {}
                    }
                }
            }
        }
        info!("Live status poller stopped");
    }

    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}

//! Per-feed polling loop.
//!
//! Fetching -> Idle on success, Fetching -> Backoff on failure; both wait a fixed delay
//! and go back to Fetching. No failure is fatal. The loop only ends on shutdown.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::extract::{extract_events, FeedEvent};
use super::upstream::FeedSource;
use crate::config::PollerConfig;
use crate::coordination::ShutdownToken;
use crate::error::Result;
use crate::services::FeedTracker;

/// Poller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Fetching,
    Backoff,
    Idle,
}

impl std::fmt::Display for PollerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollerState::Fetching => write!(f, "fetching"),
            PollerState::Backoff => write!(f, "backoff"),
            PollerState::Idle => write!(f, "idle"),
        }
    }
}

/// Apply one cycle's events in order; returns the number of rounds accepted
pub async fn apply_events(tracker: &FeedTracker, events: &[FeedEvent]) -> usize {
    let mut accepted = 0;
    for event in events {
        let ok = match *event {
            FeedEvent::RoundAnnounced(round_id) => {
                tracker.announce_round(round_id).await;
                false
            }
            FeedEvent::AnnouncedDice { d1, d2, d3 } => tracker.ingest_announced(d1, d2, d3).await,
            FeedEvent::Round(candidate) => tracker.ingest(candidate).await,
        };
        if ok {
            accepted += 1;
        }
    }
    accepted
}

/// Drives one feed's source into its tracker
pub struct FeedPoller<S> {
    source: S,
    tracker: Arc<FeedTracker>,
    poll_interval: Duration,
    retry_delay: Duration,
}

impl<S: FeedSource> FeedPoller<S> {
    pub fn new(source: S, tracker: Arc<FeedTracker>, config: &PollerConfig) -> Self {
        Self {
            source,
            tracker,
            poll_interval: config.poll_interval(),
            retry_delay: config.retry_delay(),
        }
    }

    /// Delay spent in a waiting state before fetching again
    pub fn delay_for(&self, state: PollerState) -> Duration {
        match state {
            PollerState::Fetching => Duration::ZERO,
            PollerState::Backoff => self.retry_delay,
            PollerState::Idle => self.poll_interval,
        }
    }

    /// One fetch-and-ingest cycle; returns the number of rounds accepted
    pub async fn poll_once(&self) -> Result<usize> {
        let stats = self.tracker.stats();

        let records = match self.source.fetch().await.and_then(|e| e.into_records()) {
            Ok(records) => records,
            Err(e) => {
                stats.record_fetch_failed();
                return Err(e);
            }
        };
        stats.record_fetch_ok().await;

        let events = extract_events(self.tracker.kind(), &records);
        Ok(apply_events(&self.tracker, &events).await)
    }

    /// Run one state, returning the next one
    pub async fn step(&self, state: PollerState) -> PollerState {
        let tag = self.tracker.kind().log_tag();
        match state {
            PollerState::Fetching => match self.poll_once().await {
                Ok(accepted) => {
                    debug!("[{}] poll ok, {} new rounds", tag, accepted);
                    PollerState::Idle
                }
                Err(e) if e.is_transient() => {
                    warn!("[{}] fetch failed: {}", tag, e);
                    PollerState::Backoff
                }
                Err(e) => {
                    error!("[{}] poll cycle failed: {}", tag, e);
                    PollerState::Backoff
                }
            },
            PollerState::Backoff | PollerState::Idle => {
                tokio::time::sleep(self.delay_for(state)).await;
                PollerState::Fetching
            }
        }
    }

    /// Poll until shutdown
    pub async fn run(self, mut shutdown: ShutdownToken) {
        let tag = self.tracker.kind().log_tag();
        info!(
            "[{}] poller started (interval {:?}, retry {:?})",
            tag, self.poll_interval, self.retry_delay
        );

        let mut state = PollerState::Fetching;
        loop {
            if shutdown.is_shutdown_requested() {
                break;
            }
            tokio::select! {
                next = self.step(state) => state = next,
                signal = shutdown.wait_for_shutdown() => {
                    debug!("[{}] interrupted in {} by {}", tag, state, signal);
                    break;
                }
            }
        }

        info!("[{}] poller stopped", tag);
    }
}

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use crate::domain::FeedKind;

/// Per-feed counters for observability.
///
/// Updated outside the tracker lock; values are advisory.
pub struct FeedStats {
    /// Upstream fetches that parsed to an OK envelope
    pub fetches_ok: AtomicU64,
    /// Upstream fetches that failed (network, status, payload)
    pub fetches_failed: AtomicU64,
    /// Rounds accepted into history
    pub rounds_accepted: AtomicU64,
    /// Candidates rejected as duplicate or partial
    pub candidates_rejected: AtomicU64,
    last_fetch_ok: RwLock<Option<DateTime<Utc>>>,
    last_round_at: RwLock<Option<DateTime<Utc>>>,
}

/// Point-in-time copy of `FeedStats`
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct FeedStatsSnapshot {
    pub fetches_ok: u64,
    pub fetches_failed: u64,
    pub rounds_accepted: u64,
    pub candidates_rejected: u64,
    pub last_fetch_ok: Option<DateTime<Utc>>,
    pub last_round_at: Option<DateTime<Utc>>,
}

impl FeedStats {
    pub fn new() -> Self {
        Self {
            fetches_ok: AtomicU64::new(0),
            fetches_failed: AtomicU64::new(0),
            rounds_accepted: AtomicU64::new(0),
            candidates_rejected: AtomicU64::new(0),
            last_fetch_ok: RwLock::new(None),
            last_round_at: RwLock::new(None),
        }
    }

    pub async fn record_fetch_ok(&self) {
        self.fetches_ok.fetch_add(1, Ordering::Relaxed);
        *self.last_fetch_ok.write().await = Some(Utc::now());
    }

    pub fn record_fetch_failed(&self) {
        self.fetches_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub async fn record_accepted(&self) {
        self.rounds_accepted.fetch_add(1, Ordering::Relaxed);
        *self.last_round_at.write().await = Some(Utc::now());
    }

    pub fn record_rejected(&self) {
        self.candidates_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub async fn snapshot(&self) -> FeedStatsSnapshot {
        FeedStatsSnapshot {
            fetches_ok: self.fetches_ok.load(Ordering::Relaxed),
            fetches_failed: self.fetches_failed.load(Ordering::Relaxed),
            rounds_accepted: self.rounds_accepted.load(Ordering::Relaxed),
            candidates_rejected: self.candidates_rejected.load(Ordering::Relaxed),
            last_fetch_ok: *self.last_fetch_ok.read().await,
            last_round_at: *self.last_round_at.read().await,
        }
    }
}

impl Default for FeedStats {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedStatsSnapshot {
    /// Export as Prometheus samples labelled with the feed
    pub fn prometheus(&self, feed: FeedKind) -> String {
        format!(
            r#"taixiu_fetches_ok_total{{feed="{feed}"}} {}
taixiu_fetches_failed_total{{feed="{feed}"}} {}
taixiu_rounds_accepted_total{{feed="{feed}"}} {}
taixiu_candidates_rejected_total{{feed="{feed}"}} {}
"#,
            self.fetches_ok, self.fetches_failed, self.rounds_accepted, self.candidates_rejected,
        )
    }
}

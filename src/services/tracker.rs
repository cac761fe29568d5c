//! Per-feed round state: dedup cursor, latest round and bounded history.
//!
//! Each `FeedTracker` owns one exclusive lock guarding its state and cursor together.
//! Ingest is the only writer. Joint reads across feeds lock Standard before Md5.

use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::metrics::FeedStats;
use crate::domain::{FeedKind, Outcome, RoundCandidate, RoundResult};

/// Default bound on the per-feed history buffer
pub const MAX_HISTORY: usize = 50;

/// Read-only copy of one feed's state
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedState {
    /// `None` until the first round is accepted
    pub latest: Option<RoundResult>,
    /// Newest first
    pub history: Vec<RoundResult>,
}

impl FeedState {
    /// Outcomes, newest first
    pub fn outcomes(&self) -> Vec<Outcome> {
        self.history.iter().map(|r| r.outcome).collect()
    }
}

#[derive(Debug, Default)]
struct DedupCursor {
    last_round_id: Option<u64>,
    /// Round id announced by a marker record, waiting for its dice
    pending_round_id: Option<u64>,
}

#[derive(Debug, Default)]
struct TrackerInner {
    latest: Option<RoundResult>,
    history: VecDeque<RoundResult>,
    cursor: DedupCursor,
}

impl TrackerInner {
    fn apply(
        &mut self,
        kind: FeedKind,
        candidate: RoundCandidate,
        capacity: usize,
    ) -> Option<RoundResult> {
        let round_id = candidate.round_id.filter(|id| *id != 0)?;
        if self.cursor.last_round_id == Some(round_id) {
            return None;
        }
        let dice = candidate.dice()?;

        let round = match RoundResult::from_dice(round_id, dice) {
            Ok(round) => round,
            Err(e) => {
                debug!("[{}] dropping candidate: {}", kind.log_tag(), e);
                return None;
            }
        };

        self.cursor.last_round_id = Some(round_id);
        self.latest = Some(round.clone());
        self.history.push_front(round.clone());
        self.history.truncate(capacity);
        Some(round)
    }

    fn state(&self) -> FeedState {
        FeedState {
            latest: self.latest.clone(),
            history: self.history.iter().cloned().collect(),
        }
    }
}

/// Owner of one feed's state
pub struct FeedTracker {
    kind: FeedKind,
    capacity: usize,
    inner: Mutex<TrackerInner>,
    stats: FeedStats,
}

impl FeedTracker {
    pub fn new(kind: FeedKind) -> Self {
        Self::with_capacity(kind, MAX_HISTORY)
    }

    pub fn with_capacity(kind: FeedKind, capacity: usize) -> Self {
        Self {
            kind,
            capacity: capacity.max(1),
            inner: Mutex::new(TrackerInner::default()),
            stats: FeedStats::new(),
        }
    }

    pub fn kind(&self) -> FeedKind {
        self.kind
    }

    pub fn stats(&self) -> &FeedStats {
        &self.stats
    }

    /// Apply a candidate round.
    ///
    /// Accepted iff the round id is present and non-zero, differs from the last accepted id,
    /// and all three dice are present and valid. Rejection leaves state untouched.
    pub async fn ingest(&self, candidate: RoundCandidate) -> bool {
        let accepted = {
            let mut inner = self.inner.lock().await;
            inner.apply(self.kind, candidate, self.capacity)
        };
        self.finish(accepted).await
    }

    /// Remember the round id announced by a marker record
    pub async fn announce_round(&self, round_id: u64) {
        let mut inner = self.inner.lock().await;
        if inner.cursor.pending_round_id != Some(round_id) {
            debug!("[{}] pending round {}", self.kind.log_tag(), round_id);
        }
        inner.cursor.pending_round_id = Some(round_id);
    }

    /// Ingest dice against the pending announced round id.
    ///
    /// The pending id is cleared only when the round is accepted.
    pub async fn ingest_announced(&self, d1: Option<u8>, d2: Option<u8>, d3: Option<u8>) -> bool {
        let accepted = {
            let mut inner = self.inner.lock().await;
            let candidate = RoundCandidate {
                round_id: inner.cursor.pending_round_id,
                d1,
                d2,
                d3,
            };
            let accepted = inner.apply(self.kind, candidate, self.capacity);
            if accepted.is_some() {
                inner.cursor.pending_round_id = None;
            }
            accepted
        };
        self.finish(accepted).await
    }

    async fn finish(&self, accepted: Option<RoundResult>) -> bool {
        match accepted {
            Some(round) => {
                info!(
                    "[{}] round {} total {} -> {}",
                    self.kind.log_tag(),
                    round.round_id,
                    round.total,
                    round.outcome
                );
                self.stats.record_accepted().await;
                true
            }
            None => {
                self.stats.record_rejected();
                false
            }
        }
    }

    pub async fn snapshot(&self) -> FeedState {
        self.inner.lock().await.state()
    }

    pub async fn last_round_id(&self) -> Option<u64> {
        self.inner.lock().await.cursor.last_round_id
    }

    pub async fn pending_round_id(&self) -> Option<u64> {
        self.inner.lock().await.cursor.pending_round_id
    }
}

/// Both feeds' histories observed under both locks
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JointHistory {
    pub standard: Vec<RoundResult>,
    pub md5: Vec<RoundResult>,
}

/// The two feed trackers, shared between pollers and the read surface
#[derive(Clone)]
pub struct FeedRegistry {
    standard: Arc<FeedTracker>,
    md5: Arc<FeedTracker>,
}

impl FeedRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            standard: Arc::new(FeedTracker::with_capacity(FeedKind::Standard, capacity)),
            md5: Arc::new(FeedTracker::with_capacity(FeedKind::Md5, capacity)),
        }
    }

    pub fn get(&self, kind: FeedKind) -> &Arc<FeedTracker> {
        match kind {
            FeedKind::Standard => &self.standard,
            FeedKind::Md5 => &self.md5,
        }
    }

    /// Snapshot both histories atomically relative to each other.
    pub async fn joint_history(&self) -> JointHistory {
        let standard = self.standard.inner.lock().await;
        let md5 = self.md5.inner.lock().await;
        JointHistory {
            standard: standard.history.iter().cloned().collect(),
            md5: md5.history.iter().cloned().collect(),
        }
    }
}

impl Default for FeedRegistry {
    fn default() -> Self {
        Self::new(MAX_HISTORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(round_id: u64) -> RoundCandidate {
        RoundCandidate::new(round_id, 3, 4, 5)
    }

    #[tokio::test]
    async fn test_ingest_sets_latest_and_history() {
        let tracker = FeedTracker::new(FeedKind::Md5);
        assert!(tracker.ingest(candidate(10)).await);

        let state = tracker.snapshot().await;
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.latest.as_ref(), state.history.first());
        assert_eq!(state.history[0].total, 12);
        assert_eq!(tracker.last_round_id().await, Some(10));
    }

    #[tokio::test]
    async fn test_ingest_is_idempotent() {
        let tracker = FeedTracker::new(FeedKind::Md5);
        assert!(tracker.ingest(candidate(10)).await);
        assert!(!tracker.ingest(candidate(10)).await);
        assert_eq!(tracker.snapshot().await.history.len(), 1);

        let stats = tracker.stats().snapshot().await;
        assert_eq!(stats.rounds_accepted, 1);
        assert_eq!(stats.candidates_rejected, 1);
    }

    #[tokio::test]
    async fn test_rejects_partial_candidates() {
        let tracker = FeedTracker::new(FeedKind::Md5);
        let missing_die = RoundCandidate {
            d3: None,
            ..candidate(11)
        };
        let missing_id = RoundCandidate {
            round_id: None,
            ..candidate(11)
        };
        let zero_id = candidate(0);
        let bad_face = RoundCandidate::new(11, 1, 2, 9);

        for c in [missing_die, missing_id, zero_id, bad_face] {
            assert!(!tracker.ingest(c).await, "{:?}", c);
        }
        let state = tracker.snapshot().await;
        assert!(state.latest.is_none());
        assert!(state.history.is_empty());
        assert_eq!(tracker.last_round_id().await, None);
    }

    #[tokio::test]
    async fn test_history_bound_evicts_oldest() {
        let tracker = FeedTracker::new(FeedKind::Standard);
        for id in 1..=51 {
            assert!(tracker.ingest(candidate(id)).await);
        }
        let state = tracker.snapshot().await;
        assert_eq!(state.history.len(), MAX_HISTORY);
        assert_eq!(state.history[0].round_id, 51);
        assert_eq!(state.history.last().map(|r| r.round_id), Some(2));
        assert!(state.history.iter().all(|r| r.round_id != 1));
        assert_eq!(state.latest.as_ref(), state.history.first());
    }

    #[tokio::test]
    async fn test_same_id_accepted_again_after_other_round() {
        // Only the last accepted id is remembered
        let tracker = FeedTracker::new(FeedKind::Md5);
        assert!(tracker.ingest(candidate(5)).await);
        assert!(tracker.ingest(candidate(6)).await);
        assert!(tracker.ingest(candidate(5)).await);
        assert_eq!(tracker.snapshot().await.history.len(), 3);
    }

    #[tokio::test]
    async fn test_announced_round_flow() {
        let tracker = FeedTracker::new(FeedKind::Standard);

        // Dice before any announcement are rejected
        assert!(!tracker.ingest_announced(Some(1), Some(2), Some(3)).await);

        tracker.announce_round(700).await;
        assert_eq!(tracker.pending_round_id().await, Some(700));

        // Partial dice keep the pending id
        assert!(!tracker.ingest_announced(Some(1), None, Some(3)).await);
        assert_eq!(tracker.pending_round_id().await, Some(700));

        assert!(tracker.ingest_announced(Some(6), Some(6), Some(1)).await);
        assert_eq!(tracker.pending_round_id().await, None);

        let state = tracker.snapshot().await;
        assert_eq!(state.latest.map(|r| r.round_id), Some(700));

        // Consumed: the same dice record seen again is not a new round
        assert!(!tracker.ingest_announced(Some(6), Some(6), Some(1)).await);
        assert_eq!(tracker.snapshot().await.history.len(), 1);
    }

    #[tokio::test]
    async fn test_announced_duplicate_keeps_pending() {
        let tracker = FeedTracker::new(FeedKind::Standard);
        tracker.announce_round(9).await;
        assert!(tracker.ingest_announced(Some(1), Some(1), Some(1)).await);

        tracker.announce_round(9).await;
        assert!(!tracker.ingest_announced(Some(2), Some(2), Some(2)).await);
        assert_eq!(tracker.pending_round_id().await, Some(9));
    }

    #[tokio::test]
    async fn test_concurrent_ingest_no_lost_update() {
        let tracker = Arc::new(FeedTracker::new(FeedKind::Md5));
        let mut handles = Vec::new();
        for id in 1..=20u64 {
            let tracker = Arc::clone(&tracker);
            handles.push(tokio::spawn(async move { tracker.ingest(candidate(id)).await }));
        }
        for handle in handles {
            assert!(handle.await.unwrap());
        }

        let state = tracker.snapshot().await;
        assert_eq!(state.history.len(), 20);
        let mut ids: Vec<u64> = state.history.iter().map(|r| r.round_id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_ingest_applies_in_lock_order() {
        let tracker = Arc::new(FeedTracker::new(FeedKind::Md5));
        let ids = [5u64, 3, 9, 1, 7];

        // Hold the lock so each task queues behind the previous one
        let guard = tracker.inner.lock().await;
        let mut handles = Vec::new();
        for id in ids {
            let tracker = Arc::clone(&tracker);
            handles.push(tokio::spawn(async move { tracker.ingest(candidate(id)).await }));
            for _ in 0..3 {
                tokio::task::yield_now().await;
            }
        }
        drop(guard);

        for handle in handles {
            assert!(handle.await.unwrap());
        }

        let state = tracker.snapshot().await;
        let history: Vec<u64> = state.history.iter().map(|r| r.round_id).collect();
        assert_eq!(history, vec![7, 1, 9, 3, 5]);
        assert_eq!(state.latest.map(|r| r.round_id), Some(7));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_joint_history_during_concurrent_ingest() {
        let registry = FeedRegistry::new(MAX_HISTORY);
        let mut writers = Vec::new();
        for kind in FeedKind::ALL {
            let tracker = Arc::clone(registry.get(kind));
            writers.push(tokio::spawn(async move {
                for id in 1..=200u64 {
                    assert!(tracker.ingest(candidate(id)).await);
                    if id % 10 == 0 {
                        tokio::task::yield_now().await;
                    }
                }
            }));
        }

        let reader = {
            let registry = registry.clone();
            tokio::spawn(async move {
                for _ in 0..100 {
                    let joint = registry.joint_history().await;
                    for history in [&joint.standard, &joint.md5] {
                        assert!(history.len() <= MAX_HISTORY);
                        // Newest first with no gaps: never a half-applied round
                        assert!(history.windows(2).all(|w| w[0].round_id == w[1].round_id + 1));
                    }
                    tokio::task::yield_now().await;
                }
            })
        };

        for writer in writers {
            writer.await.unwrap();
        }
        reader.await.unwrap();

        let joint = registry.joint_history().await;
        assert_eq!(joint.standard.len(), MAX_HISTORY);
        assert_eq!(joint.md5.len(), MAX_HISTORY);
        assert_eq!(joint.standard[0].round_id, 200);
        assert_eq!(joint.md5[MAX_HISTORY - 1].round_id, 151);
    }

    #[tokio::test]
    async fn test_registry_joint_history() {
        let registry = FeedRegistry::new(MAX_HISTORY);
        registry.get(FeedKind::Standard).ingest(candidate(1)).await;
        registry.get(FeedKind::Md5).ingest(candidate(2)).await;
        registry.get(FeedKind::Md5).ingest(candidate(3)).await;

        let joint = registry.joint_history().await;
        assert_eq!(joint.standard.len(), 1);
        assert_eq!(joint.md5.iter().map(|r| r.round_id).collect::<Vec<_>>(), vec![3, 2]);
    }
}

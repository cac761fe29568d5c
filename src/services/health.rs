//! Feed health derived from poller activity.
//!
//! A feed is healthy while upstream fetches keep succeeding, degraded once the last
//! success is older than the staleness window, unhealthy if no fetch ever succeeded.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::metrics::FeedStatsSnapshot;
use super::tracker::FeedRegistry;
use crate::domain::FeedKind;

/// Health status for a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }

    fn rank(&self) -> u8 {
        match self {
            HealthStatus::Healthy => 0,
            HealthStatus::Degraded => 1,
            HealthStatus::Unhealthy => 2,
        }
    }
}

/// Health of one feed pipeline
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub last_round_id: Option<u64>,
    pub history_len: usize,
    pub stats: FeedStatsSnapshot,
}

/// Overall service health response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub components: Vec<ComponentHealth>,
}

/// Inputs for health evaluation
pub struct HealthState {
    /// When the service started
    pub started_at: DateTime<Utc>,
    /// Age after which the last successful fetch counts as stale
    pub stale_after: Duration,
}

impl HealthState {
    pub fn new(stale_after: std::time::Duration) -> Self {
        Self {
            started_at: Utc::now(),
            stale_after: Duration::from_std(stale_after).unwrap_or_else(|_| Duration::seconds(15)),
        }
    }

    /// Classify one feed from its counters
    pub fn classify(
        &self,
        stats: &FeedStatsSnapshot,
        now: DateTime<Utc>,
    ) -> (HealthStatus, Option<String>) {
        match stats.last_fetch_ok {
            None => (
                HealthStatus::Unhealthy,
                Some("No successful upstream fetch yet".to_string()),
            ),
            Some(last) if now - last > self.stale_after => (
                HealthStatus::Degraded,
                Some(format!(
                    "Last successful fetch {}s ago",
                    (now - last).num_seconds()
                )),
            ),
            Some(_) => (HealthStatus::Healthy, None),
        }
    }

    pub async fn get_health(&self, registry: &FeedRegistry) -> HealthResponse {
        let now = Utc::now();
        let mut components = Vec::new();
        let mut overall = HealthStatus::Healthy;

        for kind in FeedKind::ALL {
            let tracker = registry.get(kind);
            let stats = tracker.stats().snapshot().await;
            let state = tracker.snapshot().await;
            let (status, message) = self.classify(&stats, now);
            if status.rank() > overall.rank() {
                overall = status;
            }
            components.push(ComponentHealth {
                name: kind.to_string(),
                status,
                message,
                last_round_id: state.latest.map(|r| r.round_id),
                history_len: state.history.len(),
                stats,
            });
        }

        HealthResponse {
            status: overall,
            timestamp: now,
            uptime_seconds: (now - self.started_at).num_seconds().max(0) as u64,
            components,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> HealthState {
        HealthState::new(std::time::Duration::from_secs(15))
    }

    #[test]
    fn test_classify_feed() {
        let health = state();
        let now = Utc::now();
        let mut stats = FeedStatsSnapshot::default();
        assert_eq!(health.classify(&stats, now).0, HealthStatus::Unhealthy);

        stats.last_fetch_ok = Some(now - Duration::seconds(2));
        assert_eq!(health.classify(&stats, now).0, HealthStatus::Healthy);

        stats.last_fetch_ok = Some(now - Duration::seconds(60));
        let (status, message) = health.classify(&stats, now);
        assert_eq!(status, HealthStatus::Degraded);
        assert!(message.unwrap().contains("60s"));
    }

    #[tokio::test]
    async fn test_overall_health_without_fetches() {
        let registry = FeedRegistry::default();
        let health = state().get_health(&registry).await;
        assert_eq!(health.status, HealthStatus::Unhealthy);
        assert_eq!(health.components.len(), 2);
    }

    #[tokio::test]
    async fn test_overall_health_after_fetches() {
        let registry = FeedRegistry::default();
        for kind in FeedKind::ALL {
            registry.get(kind).stats().record_fetch_ok().await;
        }
        let health = state().get_health(&registry).await;
        assert!(health.status.is_healthy());
    }
}

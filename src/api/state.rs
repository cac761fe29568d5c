use std::sync::Arc;

use crate::services::{FeedRegistry, HealthState};

/// Shared application state for API handlers
#[derive(Clone)]
pub struct AppState {
    /// Feed trackers written by the pollers
    pub feeds: FeedRegistry,

    /// Health evaluation inputs
    pub health: Arc<HealthState>,
}

impl AppState {
    pub fn new(feeds: FeedRegistry, health: HealthState) -> Self {
        Self {
            feeds,
            health: Arc::new(health),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        (chrono::Utc::now() - self.health.started_at)
            .num_seconds()
            .max(0) as u64
    }
}

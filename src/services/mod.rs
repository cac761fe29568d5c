pub mod health;
pub mod metrics;
pub mod tracker;

pub use health::{ComponentHealth, HealthResponse, HealthState, HealthStatus};
pub use metrics::{FeedStats, FeedStatsSnapshot};
pub use tracker::{FeedRegistry, FeedState, FeedTracker, JointHistory, MAX_HISTORY};

//! Upstream feed collection
//!
//! Polls the two result feeds, filters their records by type and hands candidate
//! rounds to the owning `FeedTracker`.

pub mod extract;
pub mod poller;
pub mod upstream;

pub use extract::{extract_events, FeedEvent};
pub use poller::{apply_events, FeedPoller, PollerState};
pub use upstream::{FeedEnvelope, FeedRecord, FeedSource, HttpFeedSource};

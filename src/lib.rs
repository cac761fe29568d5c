pub mod api;
pub mod cli;
pub mod collector;
pub mod config;
pub mod coordination;
pub mod domain;
pub mod error;
pub mod prediction;
pub mod services;

pub use collector::{FeedPoller, FeedSource, HttpFeedSource};
pub use config::AppConfig;
pub use coordination::{GracefulShutdown, ShutdownSignal, ShutdownToken};
pub use domain::{classify_dice, FeedKind, Outcome, RoundCandidate, RoundResult};
pub use error::{Result, TrackerError};
pub use prediction::{predict, Prediction};
pub use services::{FeedRegistry, FeedState, FeedTracker};

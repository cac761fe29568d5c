//! History-driven next-round prediction (no IO).

pub mod markov;
pub mod pattern;
pub mod predictor;

pub use markov::{TransitionCounts, TransitionMatrix};
pub use pattern::{detect_pattern, leading_streak, Pattern, PATTERN_WINDOW};
pub use predictor::{predict, Prediction, NO_DATA_LABEL};

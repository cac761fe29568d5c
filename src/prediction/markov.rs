//! First-order Markov transition estimate over the outcome history.

use serde::Serialize;

use crate::domain::Outcome;

/// Probability used for a row with no observed transitions
const UNINFORMATIVE: f64 = 0.5;

/// Empirical P(next | prev) for the two outcomes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransitionMatrix {
    pub low_to_low: f64,
    pub low_to_high: f64,
    pub high_to_low: f64,
    pub high_to_high: f64,
}

/// Raw chronological transition counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionCounts {
    pub low_to_low: u32,
    pub low_to_high: u32,
    pub high_to_low: u32,
    pub high_to_high: u32,
}

impl TransitionCounts {
    /// Count transitions in a newest-first sequence, in chronological order.
    ///
    /// `history[i + 1]` happened before `history[i]`.
    pub fn count(history: &[Outcome]) -> Self {
        let mut counts = Self::default();
        for pair in history.windows(2) {
            let (after, before) = (pair[0], pair[1]);
            match (before, after) {
                (Outcome::Low, Outcome::Low) => counts.low_to_low += 1,
                (Outcome::Low, Outcome::High) => counts.low_to_high += 1,
                (Outcome::High, Outcome::Low) => counts.high_to_low += 1,
                (Outcome::High, Outcome::High) => counts.high_to_high += 1,
            }
        }
        counts
    }
}

impl TransitionMatrix {
    /// Estimate the matrix from a newest-first outcome sequence
    pub fn estimate(history: &[Outcome]) -> Self {
        Self::from_counts(TransitionCounts::count(history))
    }

    pub fn from_counts(counts: TransitionCounts) -> Self {
        let (low_to_low, low_to_high) = normalize(counts.low_to_low, counts.low_to_high);
        let (high_to_low, high_to_high) = normalize(counts.high_to_low, counts.high_to_high);
        Self {
            low_to_low,
            low_to_high,
            high_to_low,
            high_to_high,
        }
    }

    /// `(P(Low | from), P(High | from))`
    pub fn row(&self, from: Outcome) -> (f64, f64) {
        match from {
            Outcome::Low => (self.low_to_low, self.low_to_high),
            Outcome::High => (self.high_to_low, self.high_to_high),
        }
    }
}

fn normalize(to_low: u32, to_high: u32) -> (f64, f64) {
    let total = to_low + to_high;
    if total == 0 {
        return (UNINFORMATIVE, UNINFORMATIVE);
    }
    (to_low as f64 / total as f64, to_high as f64 / total as f64)
}

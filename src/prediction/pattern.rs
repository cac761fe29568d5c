//! Short-window pattern classification over recent outcomes.

use serde::Serialize;

use crate::domain::Outcome;

/// Number of most recent outcomes the detector looks at
pub const PATTERN_WINDOW: usize = 5;

/// Shape of the recent outcome window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    /// Every outcome in the window is the same
    Streak,
    /// Every adjacent pair differs
    Alternating,
    Irregular,
}

impl Pattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pattern::Streak => "streak",
            Pattern::Alternating => "alternating",
            Pattern::Irregular => "irregular",
        }
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a newest-first outcome window.
///
/// Windows shorter than two samples are always `Irregular`.
pub fn detect_pattern(recent: &[Outcome]) -> Pattern {
    if recent.len() < 2 {
        return Pattern::Irregular;
    }

    if recent.iter().all(|o| *o == recent[0]) {
        Pattern::Streak
    } else if recent.windows(2).all(|w| w[0] != w[1]) {
        Pattern::Alternating
    } else {
        Pattern::Irregular
    }
}

/// Length of the run of identical outcomes at the head of `history`
pub fn leading_streak(history: &[Outcome]) -> usize {
    match history.first() {
        Some(head) => history.iter().take_while(|o| *o == head).count(),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Outcome::{High as T, Low as X};

    #[test]
    fn test_streak() {
        assert_eq!(detect_pattern(&[T, T, T, T, T]), Pattern::Streak);
        assert_eq!(detect_pattern(&[X, X]), Pattern::Streak);
    }

    #[test]
    fn test_alternating() {
        assert_eq!(detect_pattern(&[T, X, T, X, T]), Pattern::Alternating);
        assert_eq!(detect_pattern(&[X, T]), Pattern::Alternating);
    }

    #[test]
    fn test_irregular() {
        assert_eq!(detect_pattern(&[T, T, X, T, X]), Pattern::Irregular);
        assert_eq!(detect_pattern(&[T]), Pattern::Irregular);
        assert_eq!(detect_pattern(&[]), Pattern::Irregular);
    }

    #[test]
    fn test_leading_streak() {
        assert_eq!(leading_streak(&[T, T, T, X, T]), 3);
        assert_eq!(leading_streak(&[X]), 1);
        assert_eq!(leading_streak(&[]), 0);
    }
}

//! Next-round call from the outcome history.
//!
//! Blends the short-window pattern with the Markov row of the last outcome:
//! - streak shorter than 4: follow it, otherwise bet on the break
//! - alternating: take the opposite of the last outcome
//! - irregular: take the likelier Markov successor (ties go to Tai)
//!
//! Confidence is `max(p) * 100 + |p_high - p_low| * 50`, capped at 95, and pinned at 50
//! while fewer than 5 rounds are known.

use serde::Serialize;

use super::markov::TransitionMatrix;
use super::pattern::{detect_pattern, leading_streak, Pattern, PATTERN_WINDOW};
use crate::domain::Outcome;

/// Streak length from which the predictor expects a reversal
pub const STREAK_REVERSAL_LEN: usize = 4;

/// Confidence ceiling in percent
pub const MAX_CONFIDENCE_PCT: f64 = 95.0;

/// Confidence reported while the sample is too small to trust
pub const SMALL_SAMPLE_CONFIDENCE_PCT: f64 = 50.0;

/// Label used when a feed has no rounds yet
pub const NO_DATA_LABEL: &str = "Chua co du lieu";

/// Next-round prediction; recomputed on every read
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// `None` when there is no history
    pub call: Option<Outcome>,
    /// Whole-percent string, e.g. "83%"
    pub confidence: String,
    pub rationale: String,
}

impl Prediction {
    fn no_data() -> Self {
        Self {
            call: None,
            confidence: format_pct(0.0),
            rationale: "Insufficient data: no rounds recorded yet.".to_string(),
        }
    }

    pub fn call_label(&self) -> &'static str {
        self.call.map(|o| o.as_str()).unwrap_or(NO_DATA_LABEL)
    }
}

/// Predict the next outcome from a newest-first history.
pub fn predict(history: &[Outcome]) -> Prediction {
    let Some(&last) = history.first() else {
        return Prediction::no_data();
    };

    let window = &history[..history.len().min(PATTERN_WINDOW)];
    let pattern = detect_pattern(window);
    let matrix = TransitionMatrix::estimate(history);
    let (prob_low, prob_high) = matrix.row(last);

    let (call, rule) = match pattern {
        Pattern::Streak => {
            let len = leading_streak(history);
            if len < STREAK_REVERSAL_LEN {
                (last, format!("streak of {len} {last}, continue"))
            } else {
                (last.opposite(), format!("streak of {len} {last}, reverse"))
            }
        }
        Pattern::Alternating => (last.opposite(), format!("alternating, opposite of {last}")),
        Pattern::Irregular => {
            let call = if prob_high >= prob_low {
                Outcome::High
            } else {
                Outcome::Low
            };
            (call, format!("irregular, markov favours {call}"))
        }
    };

    let computed = (prob_high.max(prob_low) * 100.0 + (prob_high - prob_low).abs() * 50.0)
        .min(MAX_CONFIDENCE_PCT);

    let mut rationale = format!(
        "Pattern {pattern}: {rule}. \
         Markov after {last}: P(Xiu)={prob_low:.2}, P(Tai)={prob_high:.2}."
    );

    let confidence = if history.len() < PATTERN_WINDOW {
        rationale.push_str(&format!(
            " Only {} rounds known, confidence fixed at {}.",
            history.len(),
            format_pct(SMALL_SAMPLE_CONFIDENCE_PCT)
        ));
        SMALL_SAMPLE_CONFIDENCE_PCT
    } else {
        computed
    };

    Prediction {
        call: Some(call),
        confidence: format_pct(confidence),
        rationale,
    }
}

fn format_pct(pct: f64) -> String {
    format!("{}%", pct.round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use Outcome::{High as T, Low as X};

    #[test]
    fn test_empty_history() {
        let p = predict(&[]);
        assert_eq!(p.call, None);
        assert_eq!(p.confidence, "0%");
        assert_eq!(p.call_label(), NO_DATA_LABEL);
        assert!(p.rationale.contains("Insufficient data"));
    }

    #[test]
    fn test_long_streak_reverses() {
        let p = predict(&[T, T, T, T, T]);
        assert_eq!(p.call, Some(X));
        assert!(p.rationale.contains("streak"));
        assert!(p.rationale.contains("reverse"));
        // Row for Tai is (0, 1): 100 + 50 capped
        assert_eq!(p.confidence, "95%");
    }

    #[test]
    fn test_short_streak_continues() {
        let p = predict(&[X, X, X]);
        assert_eq!(p.call, Some(X));
        assert!(p.rationale.contains("continue"));
        assert_eq!(p.confidence, "50%");
    }

    #[test]
    fn test_alternating_takes_opposite() {
        let p = predict(&[T, X, T, X]);
        assert_eq!(p.call, Some(X));
        assert!(p.rationale.contains("alternating"));
        assert_eq!(p.confidence, "50%");
    }

    #[test]
    fn test_irregular_follows_markov() {
        // Chronological: X X T X T T X T X T X T X X
        // After Xiu: X->X twice, X->T five times
        let history = [X, X, T, X, T, X, T, X, T, T, X, T, X, X];
        let p = predict(&history);
        assert_eq!(p.call, Some(T));
        assert!(p.rationale.contains("irregular"));
        assert!(p.rationale.contains("P(Xiu)=0.29"));
        assert!(p.rationale.contains("P(Tai)=0.71"));
        // 71.43 + 21.43 = 92.86
        assert_eq!(p.confidence, "93%");
    }

    #[test]
    fn test_irregular_tie_favours_tai() {
        // Chronological: T X X T T X, after Xiu: X->X once, X->T once
        let history = [X, T, T, X, X, T];
        let p = predict(&history);
        assert_eq!(p.call, Some(T));
        assert!(p.rationale.contains("P(Xiu)=0.50"));
        assert_eq!(p.confidence, "50%");
    }

    #[test]
    fn test_small_sample_pins_confidence() {
        for history in [vec![T], vec![T, X], vec![X, X, T], vec![T, T, T, T]] {
            let p = predict(&history);
            assert_eq!(p.confidence, "50%", "history {:?}", history);
            assert!(p.rationale.contains("confidence fixed"));
        }
    }

    #[test]
    fn test_streak_uses_full_history_length() {
        // Window is a 5-streak; the run continues past the window
        let history = [X, X, X, X, X, X, X, T];
        let p = predict(&history);
        assert_eq!(p.call, Some(T));
        assert!(p.rationale.contains("streak of 7"));
    }
}

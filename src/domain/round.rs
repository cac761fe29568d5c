use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};

/// Constant tag stamped on every round this service publishes
pub const SOURCE_TAG: &str = "Tele@CsTool001";

/// Highest total that still counts as Xiu (Low)
pub const LOW_MAX_TOTAL: u32 = 10;

/// Valid face range for a single die
pub const DIE_FACES: std::ops::RangeInclusive<u8> = 1..=6;

/// Binary outcome of a round (Xiu = Low, Tai = High)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "Xiu")]
    Low,
    #[serde(rename = "Tai")]
    High,
}

impl Outcome {
    /// Get the opposite outcome
    pub fn opposite(&self) -> Self {
        match self {
            Outcome::Low => Outcome::High,
            Outcome::High => Outcome::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Low => "Xiu",
            Outcome::High => "Tai",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify three die faces: Low when the sum is at most 10, High otherwise.
pub fn classify_dice(d1: u8, d2: u8, d3: u8) -> Outcome {
    let total = d1 as u32 + d2 as u32 + d3 as u32;
    if total <= LOW_MAX_TOTAL {
        Outcome::Low
    } else {
        Outcome::High
    }
}

/// A completed, validated round.
///
/// Serializes in the raw history shape existing consumers read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    #[serde(rename = "Phien")]
    pub round_id: u64,
    #[serde(rename = "Xuc_xac_1")]
    pub die1: u8,
    #[serde(rename = "Xuc_xac_2")]
    pub die2: u8,
    #[serde(rename = "Xuc_xac_3")]
    pub die3: u8,
    #[serde(rename = "Tong")]
    pub total: u32,
    #[serde(rename = "Ket_qua")]
    pub outcome: Outcome,
    #[serde(rename = "id")]
    pub source_tag: String,
}

impl RoundResult {
    /// Build a round from its id and dice, deriving total and outcome.
    pub fn from_dice(round_id: u64, dice: [u8; 3]) -> Result<Self> {
        if round_id == 0 {
            return Err(TrackerError::InvalidRound("round id is zero".to_string()));
        }
        if let Some(bad) = dice.iter().find(|d| !DIE_FACES.contains(d)) {
            return Err(TrackerError::InvalidRound(format!(
                "die out of range in round {}: {}",
                round_id, bad
            )));
        }

        let [die1, die2, die3] = dice;
        Ok(Self {
            round_id,
            die1,
            die2,
            die3,
            total: die1 as u32 + die2 as u32 + die3 as u32,
            outcome: classify_dice(die1, die2, die3),
            source_tag: SOURCE_TAG.to_string(),
        })
    }

    /// Dice rendered as "d1 - d2 - d3"
    pub fn dice_label(&self) -> String {
        format!("{} - {} - {}", self.die1, self.die2, self.die3)
    }
}

/// Unvalidated round as extracted from an upstream record.
///
/// Any field may be missing; `FeedTracker::ingest` decides whether it becomes a `RoundResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoundCandidate {
    pub round_id: Option<u64>,
    pub d1: Option<u8>,
    pub d2: Option<u8>,
    pub d3: Option<u8>,
}

impl RoundCandidate {
    pub fn new(round_id: u64, d1: u8, d2: u8, d3: u8) -> Self {
        Self {
            round_id: Some(round_id),
            d1: Some(d1),
            d2: Some(d2),
            d3: Some(d3),
        }
    }

    /// Dice triple, only when all three faces are present
    pub fn dice(&self) -> Option<[u8; 3]> {
        Some([self.d1?, self.d2?, self.d3?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_exhaustive() {
        for d1 in DIE_FACES {
            for d2 in DIE_FACES {
                for d3 in DIE_FACES {
                    let total = d1 as u32 + d2 as u32 + d3 as u32;
                    let expected = if total <= 10 { Outcome::Low } else { Outcome::High };
                    assert_eq!(classify_dice(d1, d2, d3), expected, "{d1}+{d2}+{d3}");
                }
            }
        }
    }

    #[test]
    fn test_classify_boundary() {
        assert_eq!(classify_dice(4, 3, 3), Outcome::Low);
        assert_eq!(classify_dice(5, 3, 3), Outcome::High);
        assert_eq!(classify_dice(1, 1, 1), Outcome::Low);
        assert_eq!(classify_dice(6, 6, 6), Outcome::High);
    }

    #[test]
    fn test_from_dice_derives_total_and_outcome() {
        let round = RoundResult::from_dice(42, [6, 5, 1]).unwrap();
        assert_eq!(round.total, 12);
        assert_eq!(round.outcome, Outcome::High);
        assert_eq!(round.source_tag, SOURCE_TAG);
        assert_eq!(round.dice_label(), "6 - 5 - 1");
    }

    #[test]
    fn test_from_dice_rejects_bad_input() {
        assert!(RoundResult::from_dice(0, [1, 2, 3]).is_err());
        assert!(RoundResult::from_dice(7, [0, 2, 3]).is_err());
        assert!(RoundResult::from_dice(7, [1, 2, 7]).is_err());
    }

    #[test]
    fn test_raw_shape_serialization() {
        let round = RoundResult::from_dice(1001, [2, 3, 4]).unwrap();
        let json = serde_json::to_value(&round).unwrap();
        assert_eq!(json["Phien"], 1001);
        assert_eq!(json["Xuc_xac_1"], 2);
        assert_eq!(json["Tong"], 9);
        assert_eq!(json["Ket_qua"], "Xiu");
        assert_eq!(json["id"], "Tele@CsTool001");
    }

    #[test]
    fn test_candidate_dice_requires_all_faces() {
        let mut candidate = RoundCandidate::new(5, 1, 2, 3);
        assert_eq!(candidate.dice(), Some([1, 2, 3]));
        candidate.d2 = None;
        assert_eq!(candidate.dice(), None);
    }
}

use serde::{Deserialize, Serialize};

use crate::domain::{RoundResult, SOURCE_TAG};
use crate::prediction::Prediction;

/// Result label shown before a feed's first round
pub const NONE_YET_LABEL: &str = "Chua co";

/// Static text served at `/`
pub const STATUS_TEXT: &str =
    "API Server for TaiXiu is running. Endpoints: /api/taixiu, /api/taixiumd5, /api/history";

// ============================================================================
// Latest round
// ============================================================================

/// Latest round of one feed plus the prediction for the next one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestResponse {
    /// Round id
    pub phien: u64,
    /// Dice as "d1 - d2 - d3"
    pub xuc_xac: String,
    /// Dice total
    pub tong: u32,
    /// "Tai", "Xiu" or the none-yet label
    pub ket_qua: String,
    /// Next round id
    pub phien_sau: u64,
    /// Prediction call
    pub du_doan: String,
    /// Confidence, e.g. "83%"
    pub do_tin_cay: String,
    /// Rationale for the call
    pub giai_thich: String,
    /// Source tag
    pub id: String,
}

impl LatestResponse {
    pub fn new(latest: Option<&RoundResult>, prediction: &Prediction) -> Self {
        let (phien, xuc_xac, tong, ket_qua) = match latest {
            Some(round) => (
                round.round_id,
                round.dice_label(),
                round.total,
                round.outcome.to_string(),
            ),
            None => (0, "0 - 0 - 0".to_string(), 0, NONE_YET_LABEL.to_string()),
        };

        Self {
            phien,
            xuc_xac,
            tong,
            ket_qua,
            phien_sau: phien.saturating_add(1),
            du_doan: prediction.call_label().to_string(),
            do_tin_cay: prediction.confidence.clone(),
            giai_thich: prediction.rationale.clone(),
            id: SOURCE_TAG.to_string(),
        }
    }
}

// ============================================================================
// History
// ============================================================================

/// Both feeds' bounded histories, newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub taixiu: Vec<RoundResult>,
    pub taixiumd5: Vec<RoundResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::predict;

    #[test]
    fn test_sentinel_view() {
        let view = LatestResponse::new(None, &predict(&[]));
        assert_eq!(view.phien, 0);
        assert_eq!(view.phien_sau, 1);
        assert_eq!(view.ket_qua, NONE_YET_LABEL);
        assert_eq!(view.do_tin_cay, "0%");
    }

    #[test]
    fn test_next_round_id_saturates_at_max() {
        let round = RoundResult::from_dice(u64::MAX, [1, 2, 3]).unwrap();
        let view = LatestResponse::new(Some(&round), &predict(&[round.outcome]));
        assert_eq!(view.phien, u64::MAX);
        assert_eq!(view.phien_sau, u64::MAX);
        assert_eq!(view.ket_qua, "Xiu");
    }
}

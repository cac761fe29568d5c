//! Record-type filtering into tracker events.

use crate::domain::{FeedKind, RoundCandidate};

use super::upstream::FeedRecord;

/// What a poll cycle asks the tracker to do, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedEvent {
    /// Marker record announced the id of the next dice record
    RoundAnnounced(u64),
    /// Dice for the announced round (standard feed)
    AnnouncedDice {
        d1: Option<u8>,
        d2: Option<u8>,
        d3: Option<u8>,
    },
    /// Self-contained round (MD5 feed)
    Round(RoundCandidate),
}

/// Turn one envelope's records into tracker events.
///
/// Standard feed: the first marker record's id is announced before any dice are applied.
/// MD5 feed: each dice record carries its own round id.
pub fn extract_events(kind: FeedKind, records: &[FeedRecord]) -> Vec<FeedEvent> {
    let mut events = Vec::new();

    if let Some(marker) = kind.marker_cmd() {
        if let Some(round_id) = records
            .iter()
            .find(|r| r.cmd == marker)
            .and_then(|r| r.sid)
        {
            events.push(FeedEvent::RoundAnnounced(round_id));
        }
    }

    for record in records.iter().filter(|r| r.cmd == kind.dice_cmd()) {
        let event = match kind {
            FeedKind::Standard => FeedEvent::AnnouncedDice {
                d1: record.d1,
                d2: record.d2,
                d3: record.d3,
            },
            FeedKind::Md5 => FeedEvent::Round(RoundCandidate {
                round_id: record.sid,
                d1: record.d1,
                d2: record.d2,
                d3: record.d3,
            }),
        };
        events.push(event);
    }

    events
}

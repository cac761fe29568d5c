use serde::{Deserialize, Serialize};

/// The two independent upstream result streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    /// Standard table: round id and dice arrive in separate record types
    Standard,
    /// MD5 table: dice records carry their own round id
    Md5,
}

impl FeedKind {
    pub const ALL: [FeedKind; 2] = [FeedKind::Standard, FeedKind::Md5];

    /// Record type carrying the dice
    pub fn dice_cmd(&self) -> i64 {
        match self {
            FeedKind::Standard => 1003,
            FeedKind::Md5 => 2006,
        }
    }

    /// Record type announcing the next round id, if the feed splits it out
    pub fn marker_cmd(&self) -> Option<i64> {
        match self {
            FeedKind::Standard => Some(1008),
            FeedKind::Md5 => None,
        }
    }

    /// Tag used in log lines
    pub fn log_tag(&self) -> &'static str {
        match self {
            FeedKind::Standard => "TX",
            FeedKind::Md5 => "MD5",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedKind::Standard => "standard",
            FeedKind::Md5 => "md5",
        }
    }
}

impl std::fmt::Display for FeedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_standard_feed_has_marker() {
        assert_eq!(FeedKind::Standard.marker_cmd(), Some(1008));
        assert_eq!(FeedKind::Md5.marker_cmd(), None);
        assert_ne!(FeedKind::Standard.dice_cmd(), FeedKind::Md5.dice_cmd());
    }
}

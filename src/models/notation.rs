//! Supported textual time notations.

use serde::{Deserialize, Serialize};

/// One of the textual time formats the extractor recognizes.
///
/// Variants are declared in priority order: when two candidate matches
/// overlap, the one produced by the earlier variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notation {
    /// `2024-01-01 09:30` or `2024/1/1 9:30`
    DateTime,
    /// `上午9:30`, `下午2:30`, `PM 2:30`
    Meridiem,
    /// `14:30:00`
    HourMinuteSecond,
    /// `14:30`
    HourMinute,
    /// `14时30分`, `9点5分`
    ChineseMarker,
}

impl Notation {
    /// All notations, highest priority first.
    pub const PRIORITY: [Notation; 5] = [
        Notation::DateTime,
        Notation::Meridiem,
        Notation::HourMinuteSecond,
        Notation::HourMinute,
        Notation::ChineseMarker,
    ];

    /// chrono format string used for the canonical display text.
    pub fn display_format(&self) -> &'static str {
        match self {
            Notation::DateTime => "%Y-%m-%d %H:%M",
            Notation::HourMinuteSecond => "%H:%M:%S",
            Notation::Meridiem | Notation::HourMinute | Notation::ChineseMarker => "%H:%M",
        }
    }
}

impl std::fmt::Display for Notation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notation::DateTime => write!(f, "date_time"),
            Notation::Meridiem => write!(f, "meridiem"),
            Notation::HourMinuteSecond => write!(f, "hour_minute_second"),
            Notation::HourMinute => write!(f, "hour_minute"),
            Notation::ChineseMarker => write!(f, "chinese_marker"),
        }
    }
}

//! A time occurrence found in free text.

use std::ops::Range;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Notation;

/// A time extracted from text, resolved to an absolute instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTime {
    /// Absolute point in time (millisecond resolution)
    pub instant: DateTime<Utc>,

    /// Canonical rendering: `HH:mm`, `HH:mm:ss` or `yyyy-MM-dd HH:mm`
    pub display_text: String,

    /// Half-open char-offset interval in the source text
    pub source_range: Range<usize>,

    /// Notation that produced the match
    pub notation: Notation,
}

impl ParsedTime {
    pub fn new(
        instant: DateTime<Utc>,
        display_text: String,
        source_range: Range<usize>,
        notation: Notation,
    ) -> Self {
        Self {
            instant,
            display_text,
            source_range,
            notation,
        }
    }

    /// Milliseconds since the Unix epoch.
    pub fn epoch_millis(&self) -> i64 {
        self.instant.timestamp_millis()
    }

    /// Half-open interval intersection against another match.
    pub fn overlaps(&self, other: &ParsedTime) -> bool {
        ranges_overlap(&self.source_range, &other.source_range)
    }
}

/// `a.start < b.end && b.start < a.end`
pub fn ranges_overlap(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(range: Range<usize>) -> ParsedTime {
        ParsedTime::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap(),
            "09:30".to_string(),
            range,
            Notation::HourMinute,
        )
    }

    #[test]
    fn test_ranges_overlap() {
        assert!(ranges_overlap(&(0..5), &(4..8)));
        assert!(ranges_overlap(&(2..3), &(0..8)));
        assert!(!ranges_overlap(&(0..5), &(5..8)));
        assert!(!ranges_overlap(&(5..8), &(0..5)));
    }

    #[test]
    fn test_parsed_time_overlaps() {
        assert!(sample(0..5).overlaps(&sample(3..9)));
        assert!(!sample(0..5).overlaps(&sample(6..9)));
    }

    #[test]
    fn test_epoch_millis() {
        let parsed = sample(0..5);
        assert_eq!(parsed.epoch_millis(), 1_704_101_400_000);
    }

    #[test]
    fn test_parsed_time_serialization() {
        let parsed = sample(3..8);
        let json = serde_json::to_string(&parsed).unwrap();
        let deserialized: ParsedTime = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, deserialized);
    }
}

//! Time tags selected by the user for duration calculations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ParsedTime;

/// Where a tag came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TagOrigin {
    /// Extracted from screen text
    #[default]
    Extracted,
    /// Entered by hand
    Manual,
}

impl std::fmt::Display for TagOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagOrigin::Extracted => write!(f, "extracted"),
            TagOrigin::Manual => write!(f, "manual"),
        }
    }
}

/// A selectable time on the result board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeTag {
    pub instant: DateTime<Utc>,
    pub display_text: String,
    pub origin: TagOrigin,

    /// Position on the board, starting at 0
    pub order_index: usize,
}

impl TimeTag {
    /// Create a tag from an extracted time.
    pub fn from_parsed(parsed: &ParsedTime, order_index: usize) -> Self {
        Self {
            instant: parsed.instant,
            display_text: parsed.display_text.clone(),
            origin: TagOrigin::Extracted,
            order_index,
        }
    }

    /// Builder method to set the origin.
    pub fn with_origin(mut self, origin: TagOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn is_manual(&self) -> bool {
        self.origin == TagOrigin::Manual
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Notation;
    use chrono::TimeZone;

    fn parsed() -> ParsedTime {
        ParsedTime::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 14, 30, 0).unwrap(),
            "14:30".to_string(),
            0..5,
            Notation::HourMinute,
        )
    }

    #[test]
    fn test_from_parsed() {
        let tag = TimeTag::from_parsed(&parsed(), 3);

        assert_eq!(tag.display_text, "14:30");
        assert_eq!(tag.order_index, 3);
        assert_eq!(tag.origin, TagOrigin::Extracted);
        assert!(!tag.is_manual());
    }

    #[test]
    fn test_with_origin() {
        let tag = TimeTag::from_parsed(&parsed(), 0).with_origin(TagOrigin::Manual);
        assert!(tag.is_manual());
    }

    #[test]
    fn test_tag_origin_serialization() {
        let json = serde_json::to_string(&TagOrigin::Manual).unwrap();
        assert_eq!(json, "\"manual\"");

        let deserialized: TagOrigin = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, TagOrigin::Manual);
    }

    #[test]
    fn test_tag_origin_display() {
        assert_eq!(format!("{}", TagOrigin::Extracted), "extracted");
        assert_eq!(format!("{}", TagOrigin::Manual), "manual");
    }
}

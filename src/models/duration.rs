//! Elapsed duration between two instants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculate::{duration_minutes, format_detailed, format_short};

/// Signed elapsed minutes with rendered text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationResult {
    /// `(end - start) / 60000`, truncated toward zero; negative if end precedes start
    pub total_minutes: i64,

    /// e.g. `1小时30分钟`
    pub short_text: String,

    /// Multi-line breakdown with totals in minutes and hours
    pub detailed_text: String,
}

impl DurationResult {
    /// Render a duration from a minute count.
    pub fn from_minutes(total_minutes: i64) -> Self {
        Self {
            total_minutes,
            short_text: format_short(total_minutes),
            detailed_text: format_detailed(total_minutes),
        }
    }

    /// Duration from `start` to `end`.
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::from_minutes(duration_minutes(
            start.timestamp_millis(),
            end.timestamp_millis(),
        ))
    }

    /// True when the selection was made end-first.
    pub fn is_negative(&self) -> bool {
        self.total_minutes < 0
    }
}

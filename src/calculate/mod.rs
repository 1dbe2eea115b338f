//! Duration calculation engine.
//!
//! Derives elapsed time from pairs of instants:
//! - Signed minute differences (negative when a pair is selected end-first)
//! - Short and detailed human-readable renderings
//! - Summaries over several start/end pairs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::DurationResult;

const MILLIS_PER_MINUTE: i64 = 60 * 1000;
const MINUTES_PER_HOUR: u64 = 60;
const MINUTES_PER_DAY: u64 = 24 * MINUTES_PER_HOUR;

/// Calculate elapsed minutes between two epoch-millisecond instants.
/// Truncates toward zero.
pub fn duration_minutes(start_millis: i64, end_millis: i64) -> i64 {
    // Widened so extreme inputs cannot overflow; the quotient always fits in i64
    let elapsed = i128::from(end_millis) - i128::from(start_millis);
    (elapsed / i128::from(MILLIS_PER_MINUTE)) as i64
}

/// Day/hour/minute breakdown of an absolute minute count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Breakdown {
    negative: bool,
    total: u64,
    days: u64,
    hours: u64,
    minutes: u64,
}

impl Breakdown {
    fn new(total_minutes: i64) -> Self {
        let total = total_minutes.unsigned_abs();
        Self {
            negative: total_minutes < 0,
            total,
            days: total / MINUTES_PER_DAY,
            hours: (total % MINUTES_PER_DAY) / MINUTES_PER_HOUR,
            minutes: total % MINUTES_PER_HOUR,
        }
    }

    fn sign(&self) -> &'static str {
        if self.negative {
            "-"
        } else {
            ""
        }
    }

    /// Components in display order; hours appear whenever days do.
    fn parts(&self) -> Vec<String> {
        let mut parts = Vec::with_capacity(3);
        if self.days > 0 {
            parts.push(format!("{}天", self.days));
        }
        if self.hours > 0 || self.days > 0 {
            parts.push(format!("{}小时", self.hours));
        }
        parts.push(format!("{}分钟", self.minutes));
        parts
    }
}

/// Format minutes as compact text, e.g. `1天1小时0分钟` or `-1小时30分钟`.
pub fn format_short(total_minutes: i64) -> String {
    let breakdown = Breakdown::new(total_minutes);
    format!("{}{}", breakdown.sign(), breakdown.parts().concat())
}

/// Format minutes as a multi-line breakdown:
///
/// ```text
/// 1小时 30分钟
///
/// 共计 90 分钟
/// 共计 1.50 小时
/// ```
pub fn format_detailed(total_minutes: i64) -> String {
    let breakdown = Breakdown::new(total_minutes);
    let sign = breakdown.sign();
    let hours = breakdown.total as f64 / MINUTES_PER_HOUR as f64;

    let lead = if breakdown.negative { "- " } else { "" };

    format!(
        "{}{}\n\n共计 {}{} 分钟\n共计 {}{:.2} 小时",
        lead,
        breakdown.parts().join(" "),
        sign,
        breakdown.total,
        sign,
        hours
    )
}

/// Durations for several start/end pairs plus their sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationSummary {
    /// One result per pair, in input order
    pub groups: Vec<DurationResult>,

    /// Sum of all group minutes
    pub total: DurationResult,
}

impl CalculationSummary {
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

/// Compute the duration of each `(start, end)` pair and their total.
pub fn summarize(pairs: &[(DateTime<Utc>, DateTime<Utc>)]) -> CalculationSummary {
    let groups: Vec<DurationResult> = pairs
        .iter()
        .map(|(start, end)| DurationResult::between(*start, *end))
        .collect();

    let total_minutes = groups
        .iter()
        .fold(0_i64, |acc, group| acc.saturating_add(group.total_minutes));

    CalculationSummary {
        groups,
        total: DurationResult::from_minutes(total_minutes),
    }
}

//! Notation pattern table.
//!
//! Each entry pairs a compiled regex with the rule that validates its
//! captures and turns them into a local date-time. Entries are listed in
//! priority order.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::{Captures, Regex};

use crate::models::Notation;

/// Local wall-clock value produced by a pattern, before timezone resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LocalStamp {
    /// Carries its own calendar date
    Dated(NaiveDateTime),
    /// Needs a base date
    TimeOfDay(NaiveTime),
}

impl LocalStamp {
    pub(crate) fn on(self, base_date: NaiveDate) -> NaiveDateTime {
        match self {
            LocalStamp::Dated(dt) => dt,
            LocalStamp::TimeOfDay(time) => base_date.and_time(time),
        }
    }
}

/// A compiled notation matcher with its validation/normalization rule.
pub(crate) struct NotationPattern {
    pub(crate) notation: Notation,
    pub(crate) regex: Regex,
    /// A candidate immediately followed by this char is not a match.
    pub(crate) forbid_next: Option<char>,
    pub(crate) resolve: fn(&Captures<'_>) -> Option<LocalStamp>,
}

/// All notation patterns, highest priority first.
pub(crate) static PATTERNS: LazyLock<Vec<NotationPattern>> = LazyLock::new(|| {
    vec![
        NotationPattern {
            notation: Notation::DateTime,
            regex: compile(
                r"([0-9]{4})[-/]([0-9]{1,2})[-/]([0-9]{1,2})[[:space:]]+([0-9]{1,2}):([0-9]{2})",
            ),
            forbid_next: None,
            resolve: resolve_date_time,
        },
        NotationPattern {
            notation: Notation::Meridiem,
            regex: compile(r"(上午|下午|(?i:am|pm))[[:space:]]*([0-9]{1,2}):([0-9]{2})"),
            forbid_next: None,
            resolve: resolve_meridiem,
        },
        NotationPattern {
            notation: Notation::HourMinuteSecond,
            regex: compile(r"([0-9]{1,2}):([0-9]{2}):([0-9]{2})"),
            forbid_next: None,
            resolve: resolve_hms,
        },
        NotationPattern {
            notation: Notation::HourMinute,
            regex: compile(r"([0-9]{1,2}):([0-9]{2})"),
            forbid_next: Some(':'),
            resolve: resolve_hm,
        },
        NotationPattern {
            notation: Notation::ChineseMarker,
            regex: compile(r"([0-9]{1,2})[时点]([0-9]{1,2})分?"),
            forbid_next: None,
            resolve: resolve_hm,
        },
    ]
});

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid notation pattern {}: {}", pattern, e))
}

fn field(caps: &Captures<'_>, index: usize) -> Option<u32> {
    caps.get(index)?.as_str().parse().ok()
}

/// Hour in [0,23], minute and second in [0,59].
pub(crate) fn is_valid_time(hour: u32, minute: u32, second: u32) -> bool {
    hour <= 23 && minute <= 59 && second <= 59
}

/// Year in [1900,2100], month in [1,12], day in [1,31], plus a valid time.
pub(crate) fn is_valid_date_time(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> bool {
    (1900..=2100).contains(&year)
        && (1..=12).contains(&month)
        && (1..=31).contains(&day)
        && is_valid_time(hour, minute, 0)
}

fn time_of_day(hour: u32, minute: u32, second: u32) -> Option<LocalStamp> {
    if !is_valid_time(hour, minute, second) {
        return None;
    }
    NaiveTime::from_hms_opt(hour, minute, second).map(LocalStamp::TimeOfDay)
}

fn resolve_date_time(caps: &Captures<'_>) -> Option<LocalStamp> {
    let year = caps.get(1)?.as_str().parse::<i32>().ok()?;
    let month = field(caps, 2)?;
    let day = field(caps, 3)?;
    let hour = field(caps, 4)?;
    let minute = field(caps, 5)?;

    if !is_valid_date_time(year, month, day, hour, minute) {
        return None;
    }

    // Rejects days past the end of the month (e.g. Feb 30)
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    Some(LocalStamp::Dated(date.and_time(time)))
}

fn resolve_meridiem(caps: &Captures<'_>) -> Option<LocalStamp> {
    let marker = caps.get(1)?.as_str();
    let mut hour = field(caps, 2)?;
    let minute = field(caps, 3)?;

    let is_pm = marker == "下午" || marker.eq_ignore_ascii_case("pm");
    let is_am = marker == "上午" || marker.eq_ignore_ascii_case("am");

    // 12-hour clock: PM 12:xx stays noon, AM 12:xx becomes midnight
    if is_pm && hour < 12 {
        hour += 12;
    } else if is_am && hour == 12 {
        hour = 0;
    }

    time_of_day(hour, minute, 0)
}

fn resolve_hms(caps: &Captures<'_>) -> Option<LocalStamp> {
    time_of_day(field(caps, 1)?, field(caps, 2)?, field(caps, 3)?)
}

fn resolve_hm(caps: &Captures<'_>) -> Option<LocalStamp> {
    time_of_day(field(caps, 1)?, field(caps, 2)?, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(notation: Notation) -> &'static NotationPattern {
        PATTERNS
            .iter()
            .find(|p| p.notation == notation)
            .expect("pattern registered")
    }

    fn resolve(notation: Notation, text: &str) -> Option<LocalStamp> {
        let p = pattern(notation);
        let caps = p.regex.captures(text)?;
        (p.resolve)(&caps)
    }

    fn hm(h: u32, m: u32) -> Option<LocalStamp> {
        Some(LocalStamp::TimeOfDay(NaiveTime::from_hms_opt(h, m, 0).unwrap()))
    }

    #[test]
    fn test_patterns_in_priority_order() {
        let order: Vec<Notation> = PATTERNS.iter().map(|p| p.notation).collect();
        assert_eq!(order, Notation::PRIORITY.to_vec());
    }

    #[test]
    fn test_is_valid_time() {
        assert!(is_valid_time(0, 0, 0));
        assert!(is_valid_time(23, 59, 59));
        assert!(!is_valid_time(24, 0, 0));
        assert!(!is_valid_time(12, 60, 0));
        assert!(!is_valid_time(12, 0, 60));
    }

    #[test]
    fn test_is_valid_date_time() {
        assert!(is_valid_date_time(1900, 1, 1, 0, 0));
        assert!(is_valid_date_time(2100, 12, 31, 23, 59));
        assert!(!is_valid_date_time(1899, 1, 1, 0, 0));
        assert!(!is_valid_date_time(2101, 1, 1, 0, 0));
        assert!(!is_valid_date_time(2024, 13, 1, 0, 0));
        assert!(!is_valid_date_time(2024, 0, 1, 0, 0));
        assert!(!is_valid_date_time(2024, 1, 32, 0, 0));
        assert!(!is_valid_date_time(2024, 1, 1, 24, 0));
    }

    #[test]
    fn test_resolve_date_time() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(
            resolve(Notation::DateTime, "2024/3/5 9:30"),
            Some(LocalStamp::Dated(expected))
        );
        assert_eq!(
            resolve(Notation::DateTime, "2024-03-05  09:30"),
            Some(LocalStamp::Dated(expected))
        );
    }

    #[test]
    fn test_resolve_date_time_rejects_impossible_day() {
        assert_eq!(resolve(Notation::DateTime, "2024-02-30 10:00"), None);
        assert_eq!(resolve(Notation::DateTime, "2024-13-01 10:00"), None);
    }

    #[test]
    fn test_resolve_meridiem() {
        assert_eq!(resolve(Notation::Meridiem, "上午9:30"), hm(9, 30));
        assert_eq!(resolve(Notation::Meridiem, "下午2:30"), hm(14, 30));
        assert_eq!(resolve(Notation::Meridiem, "PM 2:30"), hm(14, 30));
        assert_eq!(resolve(Notation::Meridiem, "pm2:30"), hm(14, 30));
        assert_eq!(resolve(Notation::Meridiem, "Am 7:05"), hm(7, 5));
    }

    #[test]
    fn test_resolve_meridiem_twelve_o_clock() {
        assert_eq!(resolve(Notation::Meridiem, "AM 12:15"), hm(0, 15));
        assert_eq!(resolve(Notation::Meridiem, "上午12:00"), hm(0, 0));
        assert_eq!(resolve(Notation::Meridiem, "PM 12:15"), hm(12, 15));
        assert_eq!(resolve(Notation::Meridiem, "下午12:00"), hm(12, 0));
    }

    #[test]
    fn test_resolve_meridiem_invalid_hour() {
        // 13 + 12 is out of range
        assert_eq!(resolve(Notation::Meridiem, "PM 13:00"), None);
        assert_eq!(resolve(Notation::Meridiem, "AM 9:75"), None);
    }

    #[test]
    fn test_resolve_hms() {
        assert_eq!(
            resolve(Notation::HourMinuteSecond, "14:30:05"),
            Some(LocalStamp::TimeOfDay(
                NaiveTime::from_hms_opt(14, 30, 5).unwrap()
            ))
        );
        assert_eq!(resolve(Notation::HourMinuteSecond, "14:30:60"), None);
    }

    #[test]
    fn test_resolve_chinese_marker() {
        assert_eq!(resolve(Notation::ChineseMarker, "9点5分"), hm(9, 5));
        assert_eq!(resolve(Notation::ChineseMarker, "14时30分"), hm(14, 30));
        assert_eq!(resolve(Notation::ChineseMarker, "14时30"), hm(14, 30));
        assert_eq!(resolve(Notation::ChineseMarker, "24点00分"), None);
    }

    #[test]
    fn test_local_stamp_on_base_date() {
        let base = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let time = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        assert_eq!(LocalStamp::TimeOfDay(time).on(base), base.and_time(time));

        let dated = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap().and_time(time);
        assert_eq!(LocalStamp::Dated(dated).on(base), dated);
    }

    #[test]
    fn test_digits_are_ascii_only() {
        // Fullwidth digits are not time digits
        assert!(pattern(Notation::HourMinute).regex.find("１４:３０").is_none());
    }
}

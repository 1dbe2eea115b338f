//! # Time Reader
//!
//! Extracts time-of-day and date-time occurrences from screen text and
//! computes elapsed durations between them.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (parsed times, durations, time tags)
//! - **extract**: Notation matching and overlap resolution
//! - **calculate**: Duration arithmetic and rendering
//! - **screen**: Screen text sources and text-dump assembly
//! - **selection**: Result board for pairing selected times
//! - **config**: Configuration loading and validation

pub mod calculate;
pub mod config;
pub mod extract;
pub mod models;
pub mod screen;
pub mod selection;

pub use calculate::{duration_minutes, format_detailed, format_short, CalculationSummary};
pub use extract::{extract_times, TimeExtractor};
pub use models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_extract_then_measure() {
        let extractor = TimeExtractor::with_timezone(Utc);
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let found = extractor.extract("上午9:30和下午2:30", base);

        let result = DurationResult::between(found[0].instant, found[1].instant);
        assert_eq!(result.total_minutes, 300);
        assert_eq!(result.short_text, "5小时0分钟");
    }

    #[test]
    fn test_reexports() {
        assert_eq!(format_short(duration_minutes(0, 5_400_000)), "1小时30分钟");
        assert!(format_detailed(-1).starts_with("- "));
    }
}

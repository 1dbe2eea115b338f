//! Time extraction engine.
//!
//! Scans free text for the supported time notations, resolves overlaps
//! between competing matches, and normalizes each accepted match to an
//! absolute instant.
//!
//! Notations are evaluated one at a time in fixed priority order
//! (date-time, meridiem, `H:MM:SS`, `H:MM`, Chinese marker). A candidate
//! whose range intersects a range already accepted is discarded, so the
//! higher-priority notation always wins regardless of match length.
//! Candidates with out-of-range fields are dropped silently.

mod patterns;

use std::ops::Range;

use chrono::{
    DateTime, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
};
use tracing::{debug, trace};

use crate::models::{ranges_overlap, ParsedTime};
use patterns::{NotationPattern, PATTERNS};

/// How far back to look for the offset in force before a DST gap.
const GAP_SEARCH_STEP_MINUTES: i64 = 30;
const GAP_SEARCH_LIMIT: i64 = 48;

/// Extract times from `text` using the system local timezone.
pub fn extract_times(text: &str, base_date: NaiveDate) -> Vec<ParsedTime> {
    TimeExtractor::local().extract(text, base_date)
}

/// Time extractor bound to the timezone used to resolve local wall-clock times.
#[derive(Debug, Clone)]
pub struct TimeExtractor<Tz: TimeZone = Local> {
    tz: Tz,
}

impl TimeExtractor<Local> {
    /// Extractor resolving times in the system local timezone.
    pub fn local() -> Self {
        Self { tz: Local }
    }
}

impl Default for TimeExtractor<Local> {
    fn default() -> Self {
        Self::local()
    }
}

impl<Tz: TimeZone> TimeExtractor<Tz> {
    pub fn with_timezone(tz: Tz) -> Self {
        Self { tz }
    }

    /// Current calendar date in the extractor's timezone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }

    /// Extract times, anchoring time-only notations to today.
    pub fn extract_today(&self, text: &str) -> Vec<ParsedTime> {
        self.extract(text, self.today())
    }

    /// Extract all time occurrences from `text`.
    ///
    /// `base_date` supplies the calendar date for notations without one.
    /// The result is ordered by position in `text` and no two returned
    /// source ranges overlap.
    pub fn extract(&self, text: &str, base_date: NaiveDate) -> Vec<ParsedTime> {
        // Byte ranges claimed so far, checked linearly
        let mut used: Vec<Range<usize>> = Vec::new();
        let mut accepted: Vec<(Range<usize>, ParsedTime)> = Vec::new();

        for pattern in PATTERNS.iter() {
            for (range, caps) in candidates(pattern, text) {
                if used.iter().any(|u| ranges_overlap(u, &range)) {
                    trace!(
                        "Discarding {} candidate {:?}: overlaps earlier match",
                        pattern.notation,
                        &text[range.clone()]
                    );
                    continue;
                }

                let Some(stamp) = (pattern.resolve)(&caps) else {
                    trace!(
                        "Discarding {} candidate {:?}: fields out of range",
                        pattern.notation,
                        &text[range.clone()]
                    );
                    continue;
                };

                let local = stamp.on(base_date);
                let parsed = ParsedTime::new(
                    self.resolve_instant(local),
                    local.format(pattern.notation.display_format()).to_string(),
                    0..0,
                    pattern.notation,
                );
                used.push(range.clone());
                accepted.push((range, parsed));
            }
        }

        accepted.sort_by_key(|(range, _)| range.start);

        let index = CharIndex::new(text);
        let results: Vec<ParsedTime> = accepted
            .into_iter()
            .map(|(range, mut parsed)| {
                parsed.source_range = index.to_chars(&range);
                parsed
            })
            .collect();

        debug!("Extracted {} times from {} chars", results.len(), index.len());
        results
    }

    /// Parse input that consists of exactly one time notation, e.g. a
    /// manually entered `9:30` or `2024-01-01 09:30`.
    pub fn parse_single(&self, input: &str, base_date: NaiveDate) -> Option<ParsedTime> {
        let trimmed = input.trim();
        let mut found = self.extract(trimmed, base_date);
        if found.len() != 1 {
            return None;
        }
        let parsed = found.pop()?;
        let whole = 0..trimmed.chars().count();
        (parsed.source_range == whole).then_some(parsed)
    }

    /// Convert a local wall-clock time to an instant.
    ///
    /// Repeated local times take the earlier instant; times inside a DST gap
    /// use the offset in force before the gap.
    fn resolve_instant(&self, local: NaiveDateTime) -> DateTime<Utc> {
        match self.tz.from_local_datetime(&local) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            LocalResult::None => {
                for step in 1..=GAP_SEARCH_LIMIT {
                    let earlier = local - Duration::minutes(GAP_SEARCH_STEP_MINUTES * step);
                    if let Some(offset) = self.tz.offset_from_local_datetime(&earlier).earliest() {
                        let seconds = i64::from(offset.fix().local_minus_utc());
                        return (local - Duration::seconds(seconds)).and_utc();
                    }
                }
                local.and_utc()
            }
        }
    }
}

/// Leftmost non-overlapping matches of one pattern, as byte ranges.
///
/// A candidate immediately followed by the pattern's forbidden char is
/// rejected and the scan resumes one char after its start.
fn candidates<'t>(
    pattern: &NotationPattern,
    text: &'t str,
) -> Vec<(Range<usize>, regex::Captures<'t>)> {
    let mut found = Vec::new();
    let mut pos = 0;

    while pos <= text.len() {
        let Some(caps) = pattern.regex.captures_at(text, pos) else {
            break;
        };
        let Some(whole) = caps.get(0) else {
            break;
        };
        let range = whole.range();

        let rejected = pattern
            .forbid_next
            .is_some_and(|forbidden| text[range.end..].starts_with(forbidden));

        if rejected {
            pos = range.start + text[range.start..].chars().next().map_or(1, char::len_utf8);
            continue;
        }

        pos = if range.is_empty() {
            range.end + text[range.end..].chars().next().map_or(1, char::len_utf8)
        } else {
            range.end
        };
        found.push((range, caps));
    }

    found
}

/// Byte-offset to char-offset conversion for one text.
struct CharIndex {
    /// Byte offset of each char boundary, including the end of the text
    boundaries: Vec<usize>,
}

impl CharIndex {
    fn new(text: &str) -> Self {
        let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        boundaries.push(text.len());
        Self { boundaries }
    }

    /// Number of chars in the text.
    fn len(&self) -> usize {
        self.boundaries.len() - 1
    }

    fn to_char(&self, byte: usize) -> usize {
        self.boundaries
            .binary_search(&byte)
            .unwrap_or_else(|insert_at| insert_at)
    }

    fn to_chars(&self, range: &Range<usize>) -> Range<usize> {
        self.to_char(range.start)..self.to_char(range.end)
    }
}

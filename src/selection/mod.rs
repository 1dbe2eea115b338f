//! Result board for picking times to calculate with.
//!
//! Collects extracted times across several reads (deduplicated by instant),
//! accepts manually entered times, and pairs selected tags into durations.

use chrono::{NaiveDate, TimeZone};
use thiserror::Error;
use tracing::{debug, info};

use crate::calculate::{summarize, CalculationSummary};
use crate::extract::TimeExtractor;
use crate::models::{DurationResult, ParsedTime, TagOrigin, TimeTag};

/// Errors from board operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Unrecognized time: {0:?}")]
    UnrecognizedTime(String),

    #[error("Tag index {index} out of range (board has {len} tags)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Ordered, instant-unique collection of selectable times.
#[derive(Debug, Clone, Default)]
pub struct TimeBoard {
    tags: Vec<TimeTag>,
}

impl TimeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tags(&self) -> &[TimeTag] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Add extracted times, skipping any whose instant is already on the board.
    /// Returns how many were added.
    pub fn add_extracted(&mut self, times: &[ParsedTime]) -> usize {
        let before = self.tags.len();
        for parsed in times {
            if self.contains_instant(parsed) {
                continue;
            }
            let tag = TimeTag::from_parsed(parsed, self.tags.len());
            self.tags.push(tag);
        }

        let added = self.tags.len() - before;
        info!(
            "Added {} of {} times, board now has {}",
            added,
            times.len(),
            self.tags.len()
        );
        added
    }

    /// Add a hand-entered time such as `9:30`, `下午2:30` or `2024-01-01 09:30`.
    ///
    /// Manual entries are always appended, even if the instant is already present.
    pub fn add_manual<Tz: TimeZone>(
        &mut self,
        extractor: &TimeExtractor<Tz>,
        input: &str,
        base_date: NaiveDate,
    ) -> Result<&TimeTag, SelectionError> {
        let parsed = extractor
            .parse_single(input, base_date)
            .ok_or_else(|| SelectionError::UnrecognizedTime(input.to_string()))?;

        let index = self.tags.len();
        self.tags
            .push(TimeTag::from_parsed(&parsed, index).with_origin(TagOrigin::Manual));
        debug!("Manual time {} added at {}", parsed.display_text, index);
        Ok(&self.tags[index])
    }

    pub fn get(&self, index: usize) -> Result<&TimeTag, SelectionError> {
        self.tags.get(index).ok_or(SelectionError::IndexOutOfRange {
            index,
            len: self.tags.len(),
        })
    }

    /// Duration from the tag at `start` to the tag at `end`.
    pub fn duration(&self, start: usize, end: usize) -> Result<DurationResult, SelectionError> {
        let start = self.get(start)?;
        let end = self.get(end)?;
        Ok(DurationResult::between(start.instant, end.instant))
    }

    /// Durations for several `(start, end)` index pairs plus their total.
    pub fn summarize(&self, pairs: &[(usize, usize)]) -> Result<CalculationSummary, SelectionError> {
        let instants = pairs
            .iter()
            .map(|&(start, end)| Ok((self.get(start)?.instant, self.get(end)?.instant)))
            .collect::<Result<Vec<_>, SelectionError>>()?;
        Ok(summarize(&instants))
    }

    /// Remove a tag and renumber the rest.
    pub fn remove(&mut self, index: usize) -> Result<TimeTag, SelectionError> {
        self.get(index)?;
        let removed = self.tags.remove(index);
        self.reindex();
        Ok(removed)
    }

    pub fn clear(&mut self) {
        debug!("Clearing {} tags", self.tags.len());
        self.tags.clear();
    }

    fn contains_instant(&self, parsed: &ParsedTime) -> bool {
        self.tags.iter().any(|tag| tag.instant == parsed.instant)
    }

    fn reindex(&mut self) {
        for (i, tag) in self.tags.iter_mut().enumerate() {
            tag.order_index = i;
        }
    }
}

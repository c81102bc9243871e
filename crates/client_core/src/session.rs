//! Working set and cursor for one selected range.

use shared::domain::{RangeSelection, Record, SampleIndex};

/// Records of the currently loaded range together with the cursor.
///
/// Invariant: `cursor < records.len()` whenever `records` is non-empty. The
/// cursor value is meaningless while the working set is empty.
#[derive(Debug, Clone, Default)]
pub struct RangeSession {
    records: Vec<Record>,
    cursor: usize,
    range: Option<RangeSelection>,
    generation: u64,
}

impl RangeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps in the records of a freshly loaded range and rewinds the cursor.
    pub fn replace(&mut self, range: RangeSelection, records: Vec<Record>) {
        self.records = records;
        self.cursor = 0;
        self.range = Some(range);
        self.generation += 1;
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn range(&self) -> Option<RangeSelection> {
        self.range
    }

    /// Bumped on every `replace`, so in-flight work can tell whether the
    /// working set it started from is still the current one.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cursor(&self) -> Option<usize> {
        (!self.records.is_empty()).then_some(self.cursor)
    }

    pub fn current(&self) -> Option<&Record> {
        self.records.get(self.cursor)
    }

    pub fn clamp_cursor(&mut self) {
        if self.cursor >= self.records.len() {
            self.cursor = self.records.len().saturating_sub(1);
        }
    }

    /// Moves the cursor by `delta`, pinned to the first and last record.
    pub fn advance(&mut self, delta: i64) {
        let Some(last) = self.records.len().checked_sub(1) else {
            return;
        };
        let step = usize::try_from(delta.unsigned_abs()).unwrap_or(usize::MAX);
        let moved = if delta.is_negative() {
            self.cursor.saturating_sub(step)
        } else {
            self.cursor.saturating_add(step)
        };
        self.cursor = moved.min(last);
    }

    /// Removes the record a save was issued for, provided the working set was
    /// not replaced in the meantime and `position` still holds that sample.
    pub fn remove_saved(
        &mut self,
        generation: u64,
        position: usize,
        sample_index: SampleIndex,
    ) -> Option<Record> {
        if generation != self.generation {
            return None;
        }
        if self.records.get(position)?.sample_index != sample_index {
            return None;
        }
        let removed = self.records.remove(position);
        self.clamp_cursor();
        Some(removed)
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;

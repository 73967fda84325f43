//! Fold State
//!
//! Tracks the detected collapsible ranges and the subset of them that is currently collapsed.
//!
//! Invariant: every collapsed start line is a key of the detected ranges. [`FoldState::set_ranges`]
//! prunes stale entries, so callers only need to feed it the result of each rescan.

use crate::detect::FoldRanges;
use std::collections::BTreeSet;
use tracing::debug;

/// A detected collapsible block (inclusive line range).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FoldRange {
    /// Line that stays visible when collapsed.
    pub start_line: usize,
    /// Last hidden line (inclusive).
    pub end_line: usize,
}

impl FoldRange {
    /// Create a range for `start_line..=end_line`.
    pub fn new(start_line: usize, end_line: usize) -> Self {
        Self {
            start_line,
            end_line,
        }
    }

    /// Number of lines hidden when collapsed.
    pub fn hidden_line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line)
    }

    /// Check if `line` is within the range.
    pub fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }
}

/// Detected ranges plus the collapsed subset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoldState {
    ranges: FoldRanges,
    folded: BTreeSet<usize>,
}

impl FoldState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the detected ranges, pruning collapsed entries that are no longer valid.
    pub fn set_ranges(&mut self, ranges: FoldRanges) {
        self.ranges = ranges;
        let before = self.folded.len();
        let ranges = &self.ranges;
        self.folded.retain(|line| ranges.contains_key(line));
        if self.folded.len() != before {
            debug!(pruned = before - self.folded.len(), "pruned stale folds");
        }
    }

    /// Detected ranges keyed by start line.
    pub fn ranges(&self) -> &FoldRanges {
        &self.ranges
    }

    /// End line of the range starting at `start_line`, if one was detected.
    pub fn end_for(&self, start_line: usize) -> Option<usize> {
        self.ranges.get(&start_line).copied()
    }

    /// Returns `true` if `line` starts a detected range.
    pub fn is_foldable(&self, line: usize) -> bool {
        self.ranges.contains_key(&line)
    }

    /// Returns `true` if `line` starts a collapsed range.
    pub fn is_folded(&self, line: usize) -> bool {
        self.folded.contains(&line)
    }

    /// Collapsed start lines, ascending.
    pub fn folded_lines(&self) -> impl Iterator<Item = usize> + '_ {
        self.folded.iter().copied()
    }

    /// Collapsed ranges, ascending by start line.
    pub fn folded_ranges(&self) -> impl Iterator<Item = FoldRange> + '_ {
        self.folded
            .iter()
            .filter_map(|line| self.end_for(*line).map(|end| FoldRange::new(*line, end)))
    }

    /// Returns `true` if nothing is collapsed.
    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }

    /// Flip the collapsed state of `line`. No-op (returns `false`) if `line` is not foldable.
    pub fn toggle(&mut self, line: usize) -> bool {
        if !self.is_foldable(line) {
            return false;
        }
        if !self.folded.remove(&line) {
            self.folded.insert(line);
        }
        debug!(line, folded = self.is_folded(line), "toggled fold");
        true
    }

    /// Collapse `line` if it is foldable.
    pub fn fold(&mut self, line: usize) -> bool {
        self.is_foldable(line) && self.folded.insert(line)
    }

    /// Expand `line`.
    pub fn unfold(&mut self, line: usize) -> bool {
        self.folded.remove(&line)
    }

    /// Collapse every detected range.
    pub fn fold_all(&mut self) {
        self.folded = self.ranges.keys().copied().collect();
    }

    /// Expand everything.
    pub fn unfold_all(&mut self) {
        self.folded.clear();
    }

    /// Shift collapsed start lines after an edit that changed the line count.
    ///
    /// Entries strictly after `edit_line` move by `line_delta`; an entry on `edit_line` moves only
    /// when `shift_edit_line` is set (the edit landed before the end of that line's content).
    /// Entries that would move before the edit line are dropped.
    pub fn apply_line_delta(&mut self, edit_line: usize, line_delta: isize, shift_edit_line: bool) {
        if line_delta == 0 {
            return;
        }
        self.folded = self
            .folded
            .iter()
            .filter_map(|&line| {
                let moves = line > edit_line || (line == edit_line && shift_edit_line);
                if !moves {
                    return Some(line);
                }
                let shifted = line as isize + line_delta;
                (shifted >= edit_line as isize).then_some(shifted as usize)
            })
            .collect();
    }

    /// Drop collapsed entries accepted by `overwritten`.
    pub fn clear_where(&mut self, mut overwritten: impl FnMut(FoldRange) -> bool) -> usize {
        let doomed: Vec<usize> = self
            .folded_ranges()
            .filter(|range| overwritten(*range))
            .map(|range| range.start_line)
            .collect();
        for line in &doomed {
            self.folded.remove(line);
        }
        if !doomed.is_empty() {
            debug!(cleared = doomed.len(), "cleared overwritten folds");
        }
        doomed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(ranges: &[(usize, usize)]) -> FoldState {
        let mut state = FoldState::new();
        state.set_ranges(ranges.iter().copied().collect());
        state
    }

    #[test]
    fn test_fold_range() {
        let range = FoldRange::new(5, 10);
        assert_eq!(range.hidden_line_count(), 5);
        assert!(range.contains_line(5));
        assert!(range.contains_line(10));
        assert!(!range.contains_line(11));
    }

    #[test]
    fn test_toggle_only_foldable_lines() {
        let mut folds = state(&[(0, 2)]);
        assert!(!folds.toggle(1));
        assert!(folds.is_empty());

        assert!(folds.toggle(0));
        assert!(folds.is_folded(0));
        assert!(folds.toggle(0));
        assert!(!folds.is_folded(0));
    }

    #[test]
    fn test_set_ranges_prunes_stale_entries() {
        let mut folds = state(&[(0, 2), (4, 6)]);
        folds.fold_all();
        folds.set_ranges(FoldRanges::from([(4, 7)]));
        assert_eq!(folds.folded_lines().collect::<Vec<_>>(), vec![4]);
        assert_eq!(
            folds.folded_ranges().collect::<Vec<_>>(),
            vec![FoldRange::new(4, 7)]
        );
    }

    #[test]
    fn test_line_delta_shifts_entries_after_edit() {
        let mut folds = state(&[(1, 3), (5, 8)]);
        folds.fold_all();

        folds.apply_line_delta(2, 2, false);
        assert_eq!(folds.folded_lines().collect::<Vec<_>>(), vec![1, 7]);

        folds.apply_line_delta(0, -1, false);
        assert_eq!(folds.folded_lines().collect::<Vec<_>>(), vec![0, 6]);

        // Moving an entry before the edit line drops it.
        folds.apply_line_delta(6, -1, true);
        assert_eq!(folds.folded_lines().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_clear_where() {
        let mut folds = state(&[(0, 2), (4, 6)]);
        folds.fold_all();
        assert_eq!(folds.clear_where(|r| r.start_line == 4), 1);
        assert_eq!(folds.folded_lines().collect::<Vec<_>>(), vec![0]);
    }
}

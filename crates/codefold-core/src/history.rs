//! History Manager
//!
//! Bounded undo/redo stacks of whole-text snapshots plus the debounce that coalesces bursts of
//! typing into one snapshot.
//!
//! Snapshots are pushed at session start, immediately before structural operations, and once a
//! typing burst has been idle for the debounce window. Pushing a snapshot whose text equals the
//! newest entry is a no-op; any fresh push clears the redo stack.

use crate::selection::Selection;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default number of undo entries kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Default idle window before a typing burst is snapshotted.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

/// A text snapshot with the selection to restore alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Real buffer text.
    pub text: String,
    /// Display selection start at snapshot time.
    pub selection_start: usize,
    /// Display selection end at snapshot time.
    pub selection_end: usize,
}

impl HistoryEntry {
    /// Create an entry from text and a selection.
    pub fn new(text: impl Into<String>, selection: Selection) -> Self {
        Self {
            text: text.into(),
            selection_start: selection.start,
            selection_end: selection.end,
        }
    }

    /// The stored selection.
    pub fn selection(&self) -> Selection {
        Selection::new(self.selection_start, self.selection_end)
    }
}

/// Undo (`past`) and redo (`future`) stacks.
#[derive(Debug, Clone)]
pub struct History {
    past: VecDeque<HistoryEntry>,
    future: Vec<HistoryEntry>,
    limit: usize,
}

impl History {
    /// Create an empty history keeping at most `limit` undo entries.
    pub fn new(limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record `entry` unless it matches the newest snapshot. Returns `true` if it was recorded.
    pub fn push_state(&mut self, entry: HistoryEntry) -> bool {
        if self.past.back().is_some_and(|top| top.text == entry.text) {
            return false;
        }
        self.future.clear();
        self.push_past(entry);
        debug!(depth = self.past.len(), "history snapshot");
        true
    }

    fn push_past(&mut self, entry: HistoryEntry) {
        while self.past.len() >= self.limit {
            self.past.pop_front();
        }
        self.past.push_back(entry);
    }

    /// Step back. `current` is the live state; it moves onto the redo stack.
    ///
    /// If the newest snapshot equals the live text it is skipped so an undo never looks like a
    /// no-op. When it is also the only snapshot there is nothing to undo and history is left
    /// untouched.
    pub fn undo(&mut self, current: HistoryEntry) -> Option<HistoryEntry> {
        let newest = self.past.back()?;
        if newest.text == current.text {
            if self.past.len() == 1 {
                return None;
            }
            self.past.pop_back();
        }
        let entry = self.past.pop_back()?;
        self.future.push(current);
        debug!(undo = self.past.len(), redo = self.future.len(), "undo");
        Some(entry)
    }

    /// Step forward. `current` moves back onto the undo stack.
    pub fn redo(&mut self, current: HistoryEntry) -> Option<HistoryEntry> {
        let entry = self.future.pop()?;
        self.push_past(current);
        debug!(undo = self.past.len(), redo = self.future.len(), "redo");
        Some(entry)
    }

    /// Drop the redo stack (a fresh edit landed).
    pub fn clear_redo(&mut self) {
        self.future.clear();
    }

    /// Can undo
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Can redo
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Undo stack depth.
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    /// Redo stack depth.
    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    /// Undo entries, oldest first.
    pub fn past(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.past.iter()
    }

    /// Newest undo entry.
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.past.back()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

/// A cancellable delayed task: "snapshot once typing has been idle for `delay`".
///
/// Every keystroke reschedules it; the owner polls it with the current time and fires at most once
/// per schedule.
#[derive(Debug, Clone)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    /// Create an idle debounce.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Cancel any pending deadline and schedule a new one `delay` after `now`.
    pub fn reschedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Drop the pending deadline.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` if a deadline is pending.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Pending deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consume the deadline if it has passed at `now`.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Consume the deadline regardless of time (teardown flush). Returns `true` if one was pending.
    pub fn flush(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

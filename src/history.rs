//! Bounded undo/redo over whole-grid snapshots.

use crate::grid::Grid;

/// Number of committed states kept.
pub const HISTORY_CAPACITY: usize = 10;

/// A retained state: the grid and which frame it belonged to.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub grid: Grid,
    pub frame_index: usize,
}

/// Linear history with a cursor.
///
/// Pushing after an undo drops the redo branch. Once more than
/// [`HISTORY_CAPACITY`] entries exist the oldest is evicted.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
    index: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// A history holding just `grid` as its baseline.
    pub fn with_baseline(grid: Grid, frame_index: usize) -> Self {
        let mut history = Self::new();
        history.push(grid, frame_index);
        history
    }

    /// Record a committed state.
    pub fn push(&mut self, grid: Grid, frame_index: usize) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.index + 1);
        }
        self.entries.push(HistoryEntry { grid, frame_index });
        self.index = self.entries.len() - 1;

        if self.entries.len() > HISTORY_CAPACITY {
            let excess = self.entries.len() - HISTORY_CAPACITY;
            self.entries.drain(..excess);
            self.index -= excess;
        }
    }

    /// Drop everything and start again from `grid`.
    pub fn reset(&mut self, grid: Grid, frame_index: usize) {
        self.entries.clear();
        self.index = 0;
        self.push(grid, frame_index);
    }

    /// Replace the grid of the entry under the cursor.
    ///
    /// Used to fold the rest of a freehand stroke into the entry recorded
    /// when the stroke began. No-op on an empty history.
    pub fn amend(&mut self, grid: Grid) {
        if let Some(entry) = self.entries.get_mut(self.index) {
            entry.grid = grid;
        }
    }

    /// Step back one entry. Returns `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        self.undo_to(|_| true)
    }

    /// Step forward one entry. Returns `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        self.redo_to(|_| true)
    }

    /// Step back to the nearest earlier entry accepted by `usable`.
    ///
    /// Entries that are rejected are stepped over. If none qualifies the
    /// cursor does not move.
    pub fn undo_to(&mut self, usable: impl Fn(&HistoryEntry) -> bool) -> Option<&HistoryEntry> {
        let target = (0..self.index).rev().find(|&i| usable(&self.entries[i]))?;
        self.index = target;
        self.entries.get(target)
    }

    /// Forward counterpart of [`History::undo_to`].
    pub fn redo_to(&mut self, usable: impl Fn(&HistoryEntry) -> bool) -> Option<&HistoryEntry> {
        let target = (self.index + 1..self.entries.len()).find(|&i| usable(&self.entries[i]))?;
        self.index = target;
        self.entries.get(target)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cursor position.
    pub fn index(&self) -> usize {
        self.index
    }
}

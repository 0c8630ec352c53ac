use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// Default number of snapshots kept for undo.
pub const MAX_HISTORY_COUNT: usize = 100;

/// One undoable state of the editor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEntry")]
pub struct HistoryEntry {
    pub grid: Grid,
    pub height: usize,
    pub width: usize,
}

#[derive(Deserialize)]
struct RawEntry {
    grid: Grid,
    height: usize,
    width: usize,
}

impl TryFrom<RawEntry> for HistoryEntry {
    type Error = String;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        if (raw.height, raw.width) != (raw.grid.height(), raw.grid.width()) {
            return Err(format!(
                "snapshot claims {}x{} but its grid is {}x{}",
                raw.height,
                raw.width,
                raw.grid.height(),
                raw.grid.width()
            ));
        }
        Ok(HistoryEntry::new(raw.grid))
    }
}

impl HistoryEntry {
    pub fn new(grid: Grid) -> Self {
        HistoryEntry {
            height: grid.height(),
            width: grid.width(),
            grid,
        }
    }
}

impl From<Grid> for HistoryEntry {
    fn from(grid: Grid) -> Self {
        HistoryEntry::new(grid)
    }
}

/// Bounded undo/redo log of full snapshots.
///
/// `cursor` always indexes a valid entry, and the log never holds more than
/// `capacity` entries; the oldest snapshots are evicted first.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawHistory")]
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    capacity: usize,
}

#[derive(Deserialize)]
struct RawHistory {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    capacity: usize,
}

impl TryFrom<RawHistory> for HistoryStore {
    type Error = String;

    fn try_from(raw: RawHistory) -> Result<Self, Self::Error> {
        let capacity = raw.capacity.max(1);
        if raw.cursor >= raw.entries.len() || raw.entries.len() > capacity {
            return Err(format!(
                "history cursor {} / length {} is outside capacity {}",
                raw.cursor,
                raw.entries.len(),
                capacity
            ));
        }
        Ok(HistoryStore {
            entries: raw.entries,
            cursor: raw.cursor,
            capacity,
        })
    }
}

impl HistoryStore {
    pub fn new(initial: HistoryEntry) -> Self {
        Self::with_capacity(initial, MAX_HISTORY_COUNT)
    }

    pub fn with_capacity(initial: HistoryEntry, capacity: usize) -> Self {
        HistoryStore {
            entries: vec![initial],
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    /// Records `entry` as the newest state, discarding any redo branch.
    ///
    /// Returns `false` without touching the log when `entry` equals the
    /// current state.
    pub fn push(&mut self, entry: HistoryEntry) -> bool {
        if *self.current() == entry {
            return false;
        }

        self.entries.truncate(self.cursor + 1);
        self.entries.push(entry);
        if self.entries.len() > self.capacity {
            let excess = self.entries.len() - self.capacity;
            self.entries.drain(..excess);
        }
        self.cursor = self.entries.len() - 1;
        true
    }

    pub fn undo(&mut self) -> &HistoryEntry {
        if self.can_undo() {
            self.cursor -= 1;
        }
        self.current()
    }

    pub fn redo(&mut self) -> &HistoryEntry {
        if self.can_redo() {
            self.cursor += 1;
        }
        self.current()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }

    /// Drops every entry and starts over from `entry`.
    pub fn reset(&mut self, entry: HistoryEntry) {
        self.entries.clear();
        self.entries.push(entry);
        self.cursor = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}

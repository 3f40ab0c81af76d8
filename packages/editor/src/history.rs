//! # History Store
//!
//! Linear undo/redo timeline of editor state snapshots.
//!
//! ## Design
//!
//! - Each recorded entry is a full [`AppState`] snapshot
//! - `index` points at the entry matching the live state
//! - Recording truncates any future (no branching)
//! - Recording a snapshot equal to the current entry is coalesced away
//! - Navigation only moves the index; the session dispatches the state
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut store = HistoryStore::new();
//! store.record(initial.clone());
//! store.record(edited.clone());
//!
//! assert!(store.has_past());
//! let previous = store.back().map(|entry| entry.data.clone());
//! ```

use dropzone_document::AppState;
use serde::{Deserialize, Serialize};

/// One recorded snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub data: AppState,
}

impl History {
    pub fn new(data: AppState) -> Self {
        Self { data }
    }
}

/// Undo/redo timeline
#[derive(Debug)]
pub struct HistoryStore {
    histories: Vec<History>,

    /// Position of the live entry (meaningless while empty)
    index: usize,

    /// Maximum number of entries (0 = unlimited)
    max_levels: usize,
}

impl HistoryStore {
    /// Create a store with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            histories: Vec::new(),
            index: 0,
            max_levels,
        }
    }

    /// Append a snapshot after the current position
    ///
    /// Returns `false` when the snapshot was coalesced with the current entry.
    pub fn record(&mut self, data: AppState) -> bool {
        if self.current().is_some_and(|entry| entry.data == data) {
            return false;
        }

        if !self.histories.is_empty() {
            self.histories.truncate(self.index + 1);
        }
        self.histories.push(History::new(data));

        if self.max_levels > 0 && self.histories.len() > self.max_levels {
            let excess = self.histories.len() - self.max_levels;
            self.histories.drain(..excess);
        }

        self.index = self.histories.len() - 1;
        true
    }

    pub fn has_past(&self) -> bool {
        !self.histories.is_empty() && self.index > 0
    }

    pub fn has_future(&self) -> bool {
        !self.histories.is_empty() && self.index < self.histories.len() - 1
    }

    pub fn current(&self) -> Option<&History> {
        self.histories.get(self.index)
    }

    pub fn prev_history(&self) -> Option<&History> {
        if self.has_past() {
            self.histories.get(self.index - 1)
        } else {
            None
        }
    }

    pub fn next_history(&self) -> Option<&History> {
        if self.has_future() {
            self.histories.get(self.index + 1)
        } else {
            None
        }
    }

    /// Step back one entry; `None` (and no change) without a past
    pub fn back(&mut self) -> Option<&History> {
        if !self.has_past() {
            return None;
        }
        self.index -= 1;
        self.histories.get(self.index)
    }

    /// Step forward one entry; `None` (and no change) without a future
    pub fn forward(&mut self) -> Option<&History> {
        if !self.has_future() {
            return None;
        }
        self.index += 1;
        self.histories.get(self.index)
    }

    /// Replace the whole timeline; the last entry becomes current
    pub fn set_histories(&mut self, histories: Vec<History>) {
        self.index = histories.len().saturating_sub(1);
        self.histories = histories;
    }

    /// Jump to entry `index`; ignored when out of bounds
    pub fn set_history_index(&mut self, index: usize) -> Option<&History> {
        if index >= self.histories.len() {
            return None;
        }
        self.index = index;
        self.histories.get(index)
    }

    pub fn histories(&self) -> &[History] {
        &self.histories
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.histories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }

    pub fn clear(&mut self) {
        self.histories.clear();
        self.index = 0;
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// History navigation bound to keyboard chords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryCommand {
    Undo,
    Redo,
}

impl HistoryCommand {
    /// Resolve a chord such as `"meta+z"` (case-insensitive)
    pub fn from_chord(chord: &str) -> Option<Self> {
        match chord.trim().to_ascii_lowercase().as_str() {
            "meta+z" => Some(HistoryCommand::Undo),
            "meta+shift+z" | "meta+y" => Some(HistoryCommand::Redo),
            _ => None,
        }
    }
}

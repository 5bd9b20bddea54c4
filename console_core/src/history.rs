//! Command history with a wrapping recall cursor
//!
//! Entries are kept oldest first. Recording past capacity evicts the oldest
//! entry. Recall walks the entries in either direction and wraps around when
//! it runs off an end, so repeated presses cycle through the whole history.

use std::collections::VecDeque;

/// Bounded, insertion-ordered record of submitted commands
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    /// Maximum number of entries (at least 1)
    capacity: usize,
    /// Entries, oldest first
    entries: VecDeque<String>,
    /// Next index to hand out; `None` means "unset, re-anchor on next recall"
    cursor: Option<usize>,
}

impl HistoryBuffer {
    /// Creates an empty history, clamping the capacity to at least 1
    ///
    /// Storage grows with use; nothing is reserved for the full capacity.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::new(),
            cursor: None,
        }
    }

    /// Records a submitted command
    ///
    /// Evicts the oldest entry when full and points the cursor at the new entry.
    pub fn record(&mut self, text: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(text.into());
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Returns the entry under the cursor and steps towards older entries
    ///
    /// Stepping below the oldest entry unsets the cursor; the next call
    /// re-anchors at the newest entry. Returns an empty string when there is
    /// nothing to recall.
    pub fn recall_older(&mut self) -> String {
        let Some(last) = self.last_index() else {
            return String::new();
        };

        let idx = match self.cursor {
            Some(idx) if idx <= last => idx,
            _ => last,
        };

        self.cursor = idx.checked_sub(1);
        self.entries[idx].clone()
    }

    /// Returns the entry under the cursor and steps towards newer entries
    ///
    /// A cursor at or past the newest entry (or unset) restarts at the oldest
    /// entry. Returns an empty string when there is nothing to recall.
    pub fn recall_newer(&mut self) -> String {
        let Some(last) = self.last_index() else {
            return String::new();
        };

        let idx = match self.cursor {
            Some(idx) if idx < last => idx,
            _ => 0,
        };

        self.cursor = Some(idx + 1);
        self.entries[idx].clone()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current recall cursor
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Iterates entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    fn last_index(&self) -> Option<usize> {
        self.entries.len().checked_sub(1)
    }
}

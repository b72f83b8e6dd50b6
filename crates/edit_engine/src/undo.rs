//! Undo/redo history
//!
//! Commands are recorded after they have been applied. Entries before the
//! cursor are applied; entries at or after it have been undone and can be
//! redone until a new command is pushed.

use crate::{Command, Result};
use doc_model::Document;
use tracing::debug;

/// Manages the linear undo/redo history
#[derive(Debug)]
pub struct UndoManager {
    entries: Vec<Box<dyn Command>>,
    /// Number of entries currently applied
    cursor: usize,
    /// Maximum number of entries kept
    max_entries: usize,
}

impl UndoManager {
    pub const DEFAULT_MAX_ENTRIES: usize = 200;

    /// Create a new undo manager
    pub fn new() -> Self {
        Self::with_max_entries(Self::DEFAULT_MAX_ENTRIES)
    }

    /// Create with a custom size limit (at least one entry is kept)
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            max_entries: max_entries.max(1),
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Record a command that the caller has already applied.
    ///
    /// Anything that was undone is discarded.
    pub fn push(&mut self, command: Box<dyn Command>) {
        let discarded = self.entries.len() - self.cursor;
        self.entries.truncate(self.cursor);
        self.entries.push(command);
        self.cursor += 1;

        // Enforce max entries
        let overflow = self.entries.len().saturating_sub(self.max_entries);
        if overflow > 0 {
            self.entries.drain(..overflow);
            self.cursor -= overflow;
        }
        debug!(discarded, dropped = overflow, depth = self.cursor, "Recorded command");
    }

    /// Unapply the most recent applied command. Returns `Ok(false)` if there
    /// is nothing to undo. On error the history is left unchanged.
    pub fn undo(&mut self, document: &mut Document) -> Result<bool> {
        if self.cursor == 0 {
            return Ok(false);
        }
        self.entries[self.cursor - 1].unapply(document)?;
        self.cursor -= 1;
        debug!(depth = self.cursor, "Undo");
        Ok(true)
    }

    /// Re-apply the most recently undone command. Returns `Ok(false)` if
    /// there is nothing to redo. On error the history is left unchanged.
    pub fn redo(&mut self, document: &mut Document) -> Result<bool> {
        if self.cursor == self.entries.len() {
            return Ok(false);
        }
        self.entries[self.cursor].apply(document)?;
        self.cursor += 1;
        debug!(depth = self.cursor, "Redo");
        Ok(true)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    pub fn undo_count(&self) -> usize {
        self.cursor
    }

    pub fn redo_count(&self) -> usize {
        self.entries.len() - self.cursor
    }

    /// The command the next [`UndoManager::undo`] would unapply
    pub fn peek_undo(&self) -> Option<&dyn Command> {
        self.cursor.checked_sub(1).map(|i| self.entries[i].as_ref())
    }

    /// The command the next [`UndoManager::redo`] would apply
    pub fn peek_redo(&self) -> Option<&dyn Command> {
        self.entries.get(self.cursor).map(|c| c.as_ref())
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new()
    }
}

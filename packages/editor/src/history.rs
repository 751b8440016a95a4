//! # Undo/Redo History
//!
//! Snapshot history: every committed change records the tree as it was
//! before and after. Undo restores `before`, redo restores `after`.
//!
//! - New entries clear the redo stack
//! - Batches merge several commits into one undo step
//! - `max_levels` bounds the undo stack (0 = unlimited)

use stencil_document::DocumentTree;

/// One undoable step
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub before: DocumentTree,
    pub after: DocumentTree,
    pub description: Option<String>,
}

#[derive(Debug)]
pub struct UndoStack {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    max_levels: usize,
    current_batch: Option<Batch>,
}

#[derive(Debug)]
struct Batch {
    description: Option<String>,
    entry: Option<HistoryEntry>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Record a committed change
    pub fn record(&mut self, before: DocumentTree, after: DocumentTree, description: Option<String>) {
        if let Some(batch) = &mut self.current_batch {
            match &mut batch.entry {
                // Keep the oldest `before`, move `after` forward
                Some(entry) => entry.after = after,
                None => {
                    batch.entry = Some(HistoryEntry {
                        before,
                        after,
                        description: batch.description.clone().or(description),
                    })
                }
            }
            return;
        }

        self.push_entry(HistoryEntry {
            before,
            after,
            description,
        });
    }

    pub fn begin_batch(&mut self, description: Option<String>) {
        self.current_batch = Some(Batch {
            description,
            entry: None,
        });
    }

    pub fn end_batch(&mut self) {
        if let Some(Batch { entry: Some(entry), .. }) = self.current_batch.take() {
            self.push_entry(entry);
        }
    }

    pub fn is_batching(&self) -> bool {
        self.current_batch.is_some()
    }

    fn push_entry(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        self.redo_stack.clear();
    }

    /// The state to restore for an undo, if any
    pub fn undo(&mut self) -> Option<DocumentTree> {
        self.end_batch();
        let entry = self.undo_stack.pop()?;
        let state = entry.before.clone();
        self.redo_stack.push(entry);
        Some(state)
    }

    /// The state to restore for a redo, if any
    pub fn redo(&mut self) -> Option<DocumentTree> {
        let entry = self.redo_stack.pop()?;
        let state = entry.after.clone();
        self.undo_stack.push(entry);
        Some(state)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|entry| entry.description.as_deref())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|entry| entry.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

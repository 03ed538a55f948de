//! # Undo/Redo Stack
//!
//! Tracks editing history as whole-state snapshots.
//!
//! ## Design
//!
//! - The state is captured before each mutation is applied
//! - Undo swaps the current state with the last snapshot and moves it to redo
//! - New mutations clear the redo stack
//! - Batches group several mutations into one undo step (e.g. a burst of
//!   typing)
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//! stack.apply(&Mutation::SetTitle { title: "Hi".into() }, &mut state)?;
//! stack.undo(&mut state);
//! stack.redo(&mut state);
//! ```

use crate::{Mutation, MutationError};
use elemental_codec::EditingState;

/// One undo step: the state to return to
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub state: EditingState,

    /// Optional description of this step
    pub description: Option<String>,
}

#[derive(Debug, Default)]
struct PendingBatch {
    before: Option<EditingState>,
    description: Option<String>,
}

/// Undo/redo stack for one channel's editing state
#[derive(Debug)]
pub struct UndoStack {
    /// Snapshots taken before applied steps (most recent last)
    undo_stack: Vec<HistoryEntry>,

    /// Snapshots taken before undone steps (most recent last)
    redo_stack: Vec<HistoryEntry>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Currently building a batch
    current_batch: Option<PendingBatch>,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
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

    /// Apply a mutation and record it for undo
    pub fn apply(
        &mut self,
        mutation: &Mutation,
        state: &mut EditingState,
    ) -> Result<(), MutationError> {
        let before = state.clone();
        mutation.apply(state)?;

        match &mut self.current_batch {
            Some(batch) => {
                // The batch undoes to the state before its first mutation
                if batch.before.is_none() {
                    batch.before = Some(before);
                }
            }
            None => self.push(HistoryEntry {
                state: before,
                description: None,
            }),
        }

        Ok(())
    }

    /// Start a batch of mutations (will be undone/redone together)
    pub fn begin_batch(&mut self) {
        self.current_batch = Some(PendingBatch::default());
    }

    /// End the current batch and push to undo stack
    pub fn end_batch(&mut self) {
        if let Some(batch) = self.current_batch.take() {
            if let Some(before) = batch.before {
                self.push(HistoryEntry {
                    state: before,
                    description: batch.description,
                });
            }
        }
    }

    pub fn in_batch(&self) -> bool {
        self.current_batch.is_some()
    }

    /// Set description for current batch (if batching)
    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(batch) = &mut self.current_batch {
            batch.description = Some(description.into());
        }
    }

    fn push(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // New action invalidates the redo history
        self.redo_stack.clear();
    }

    /// Undo the most recent step. Returns false when there is nothing to undo.
    pub fn undo(&mut self, state: &mut EditingState) -> bool {
        self.end_batch();
        match self.undo_stack.pop() {
            Some(entry) => {
                let current = std::mem::replace(state, entry.state);
                self.redo_stack.push(HistoryEntry {
                    state: current,
                    description: entry.description,
                });
                true
            }
            None => false,
        }
    }

    /// Redo the most recently undone step
    pub fn redo(&mut self, state: &mut EditingState) -> bool {
        match self.redo_stack.pop() {
            Some(entry) => {
                let current = std::mem::replace(state, entry.state);
                self.undo_stack.push(HistoryEntry {
                    state: current,
                    description: entry.description,
                });
                true
            }
            None => false,
        }
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

    /// Clear all undo/redo history
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

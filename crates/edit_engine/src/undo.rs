//! Undo/redo manager

use crate::{Command, EditError, Result};

/// An entry in the undo stack
#[derive(Debug)]
struct UndoEntry {
    /// The original command (re-applied on redo)
    command: Box<dyn Command>,
    /// The inverse command (applied on undo)
    inverse: Box<dyn Command>,
}

/// Manages undo and redo stacks
#[derive(Debug)]
pub struct UndoManager {
    undo_stack: Vec<UndoEntry>,
    redo_stack: Vec<Box<dyn Command>>,
    /// Maximum number of undo entries
    max_entries: usize,
}

impl UndoManager {
    /// Create a new undo manager
    pub fn new() -> Self {
        Self::with_limit(100)
    }

    /// Create with a custom history limit
    pub fn with_limit(max_entries: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_entries,
        }
    }

    /// Record a freshly executed command. Clears the redo history.
    pub fn push(&mut self, command: Box<dyn Command>, inverse: Box<dyn Command>) {
        self.redo_stack.clear();
        self.record(command, inverse);
    }

    fn record(&mut self, command: Box<dyn Command>, inverse: Box<dyn Command>) {
        self.undo_stack.push(UndoEntry { command, inverse });
        if self.undo_stack.len() > self.max_entries {
            self.undo_stack.remove(0);
        }
    }

    /// The inverse of the last command. The entry stays put until
    /// [`commit_undo`](Self::commit_undo).
    pub fn peek_undo(&self) -> Result<&dyn Command> {
        self.undo_stack
            .last()
            .map(|entry| entry.inverse.as_ref())
            .ok_or(EditError::UndoStackEmpty)
    }

    /// Move the last command onto the redo stack once its inverse applied
    pub fn commit_undo(&mut self) {
        if let Some(entry) = self.undo_stack.pop() {
            self.redo_stack.push(entry.command);
        }
    }

    /// The command redo would re-apply
    pub fn peek_redo(&self) -> Result<&dyn Command> {
        self.redo_stack
            .last()
            .map(|command| command.as_ref())
            .ok_or(EditError::RedoStackEmpty)
    }

    /// Move the redone command back onto the undo stack with its new inverse
    pub fn commit_redo(&mut self, inverse: Box<dyn Command>) {
        if let Some(command) = self.redo_stack.pop() {
            self.record(command, inverse);
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new()
    }
}

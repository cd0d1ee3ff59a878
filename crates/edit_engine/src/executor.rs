//! Command execution engine

use crate::{
    Command, DocumentMutation, DocumentScan, EditError, ReplaceRange, ReplaceRanges, Result,
    TextEdit, TextRange, UndoManager, ViewEffects,
};
use doc_model::{DocumentTree, Selection};

/// The main editing engine that manages document state and command execution
#[derive(Debug)]
pub struct EditingEngine {
    /// Current document tree
    tree: DocumentTree,
    /// Current selection
    selection: Selection,
    /// Undo manager
    undo_manager: UndoManager,
    /// Range the view was last asked to bring into view
    reveal_request: Option<TextRange>,
}

impl EditingEngine {
    /// Create a new editing engine with an empty document
    pub fn new() -> Self {
        Self::with_tree(DocumentTree::default())
    }

    /// Create an editing engine with a specific document tree
    pub fn with_tree(tree: DocumentTree) -> Self {
        Self {
            tree,
            selection: Selection::default(),
            undo_manager: UndoManager::new(),
            reveal_request: None,
        }
    }

    /// Get the current document tree
    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    /// Get the current selection
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Take the pending scroll-into-view request, if any
    pub fn take_reveal_request(&mut self) -> Option<TextRange> {
        self.reveal_request.take()
    }

    /// Execute a command
    pub fn execute(&mut self, command: Box<dyn Command>) -> Result<()> {
        let result = command.apply(&self.tree, &self.selection)?;
        tracing::debug!(command = command.display_name(), "executed command");

        self.undo_manager.push(command, result.inverse);
        self.tree = result.tree;
        self.selection = result.selection;

        Ok(())
    }

    /// Undo the last command
    pub fn undo(&mut self) -> Result<()> {
        let inverse = self.undo_manager.peek_undo()?;
        let result = inverse.apply(&self.tree, &self.selection)?;
        self.undo_manager.commit_undo();

        self.tree = result.tree;
        self.selection = result.selection;

        Ok(())
    }

    /// Redo the last undone command
    pub fn redo(&mut self) -> Result<()> {
        let command = self.undo_manager.peek_redo()?;
        let result = command.apply(&self.tree, &self.selection)?;

        self.undo_manager.commit_redo(result.inverse);
        self.tree = result.tree;
        self.selection = result.selection;

        Ok(())
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.undo_manager.can_undo()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.undo_manager.can_redo()
    }

    fn check_range(&self, from: usize, to: usize) -> Result<()> {
        let size = self.tree.content_size();
        if from > to || to > size {
            return Err(EditError::InvalidCommand(format!(
                "Range {}..{} outside document of size {}",
                from, to, size
            )));
        }
        Ok(())
    }
}

impl Default for EditingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentScan for EditingEngine {
    fn traverse(&self, visitor: &mut dyn FnMut(Option<&str>, usize) -> bool) {
        self.tree.traverse(visitor);
    }

    fn snapshot_version(&self) -> u64 {
        self.tree.version()
    }

    fn content_size(&self) -> usize {
        self.tree.content_size()
    }
}

impl DocumentMutation for EditingEngine {
    fn apply_edit(&mut self, range: TextRange, text: &str) -> Result<()> {
        self.execute(Box::new(ReplaceRange::new(range, text)))
    }

    fn apply_edits(&mut self, edits: &[TextEdit]) -> Result<()> {
        self.execute(Box::new(ReplaceRanges::new(edits.to_vec())))
    }

    fn set_selection(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_range(from, to)?;
        self.selection = Selection::new(from, to);
        Ok(())
    }
}

impl ViewEffects for EditingEngine {
    fn scroll_into_view(&mut self, range: TextRange) -> bool {
        if self.check_range(range.from, range.to).is_err() {
            return false;
        }
        self.reveal_request = Some(range);
        true
    }
}

//! Capabilities the host editor lends to find/replace
//!
//! The find/replace core never touches the document tree directly. It reads
//! through [`DocumentScan`], writes through [`DocumentMutation`], and asks
//! the view for best-effort effects through [`ViewEffects`].

use crate::{Result, TextEdit};
use doc_model::DocumentTree;
use serde::{Deserialize, Serialize};

/// A half-open position range `[from, to)` in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub from: usize,
    pub to: usize,
}

impl TextRange {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    /// Number of positions covered
    pub fn len(&self) -> usize {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    pub fn contains(&self, pos: usize) -> bool {
        self.from <= pos && pos < self.to
    }

    pub fn overlaps(&self, other: &TextRange) -> bool {
        self.from < other.to && other.from < self.to
    }
}

/// Read access to a document snapshot
pub trait DocumentScan {
    /// Depth-first, document-order visit of every node. The visitor gets
    /// the node's text (runs only) and its start position, and returns
    /// `false` to skip the node's children.
    fn traverse(&self, visitor: &mut dyn FnMut(Option<&str>, usize) -> bool);

    /// Identifies the snapshot; changes whenever the content changes
    fn snapshot_version(&self) -> u64;

    /// Total number of addressable positions
    fn content_size(&self) -> usize;
}

/// Write access to the document and its selection
pub trait DocumentMutation {
    /// Atomically replace the text in `range` with `text`
    fn apply_edit(&mut self, range: TextRange, text: &str) -> Result<()>;

    /// Apply several edits in the given order. Each edit's range must be
    /// valid against the document as left by the previous one.
    fn apply_edits(&mut self, edits: &[TextEdit]) -> Result<()> {
        for edit in edits {
            self.apply_edit(edit.range, &edit.text)?;
        }
        Ok(())
    }

    fn set_selection(&mut self, from: usize, to: usize) -> Result<()>;

    fn move_cursor_to(&mut self, pos: usize) -> Result<()> {
        self.set_selection(pos, pos)
    }
}

/// Best-effort visual effects
pub trait ViewEffects {
    /// Bring `range` into view. Returns `false` when there is nothing to
    /// scroll to.
    fn scroll_into_view(&mut self, range: TextRange) -> bool;
}

/// Everything find/replace needs from its host
pub trait SearchHost: DocumentScan + DocumentMutation + ViewEffects {}

impl<T: DocumentScan + DocumentMutation + ViewEffects + ?Sized> SearchHost for T {}

impl DocumentScan for DocumentTree {
    fn traverse(&self, visitor: &mut dyn FnMut(Option<&str>, usize) -> bool) {
        self.descendants(|node, pos| visitor(node.text_content(), pos));
    }

    fn snapshot_version(&self) -> u64 {
        self.version()
    }

    fn content_size(&self) -> usize {
        DocumentTree::content_size(self)
    }
}

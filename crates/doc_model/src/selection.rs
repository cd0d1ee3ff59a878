//! Selection model - cursor position and text selection

use crate::NodeId;
use serde::{Deserialize, Serialize};

/// A position resolved to a run and a char offset inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// The run containing this position
    pub node_id: NodeId,
    /// Char offset within the run
    pub offset: usize,
}

impl Position {
    pub fn new(node_id: NodeId, offset: usize) -> Self {
        Self { node_id, offset }
    }
}

/// A selection in the document, in global positions
///
/// A selection has an anchor (where the selection started) and a focus
/// (where the caret is). When anchor == focus, the selection is collapsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Where the selection started
    pub anchor: usize,
    /// Where the selection ends (caret position)
    pub focus: usize,
}

impl Selection {
    /// Create a new selection
    pub fn new(anchor: usize, focus: usize) -> Self {
        Self { anchor, focus }
    }

    /// Create a collapsed selection (caret only)
    pub fn collapsed(position: usize) -> Self {
        Self {
            anchor: position,
            focus: position,
        }
    }

    /// Check if this selection is collapsed (just a caret)
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Check if the selection goes forward (anchor before focus)
    pub fn is_forward(&self) -> bool {
        self.anchor <= self.focus
    }

    /// The lower bound of the selection, regardless of direction
    pub fn start(&self) -> usize {
        self.anchor.min(self.focus)
    }

    /// The upper bound of the selection, regardless of direction
    pub fn end(&self) -> usize {
        self.anchor.max(self.focus)
    }
}

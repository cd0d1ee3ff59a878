//! Command system for document editing

use crate::{EditError, TextRange};
use doc_model::{DocModelError, DocumentTree, ParagraphSnapshot, Selection};
use serde::{Deserialize, Serialize};

/// Result of applying a command
#[derive(Debug)]
pub struct CommandResult {
    /// The new document tree after the command
    pub tree: DocumentTree,
    /// The new selection after the command
    pub selection: Selection,
    /// The inverse command (for undo)
    pub inverse: Box<dyn Command>,
}

/// Trait for all editing commands
pub trait Command: std::fmt::Debug + Send + Sync {
    /// Apply this command to a document
    fn apply(&self, tree: &DocumentTree, selection: &Selection) -> crate::Result<CommandResult>;

    /// Get a display name for this command
    fn display_name(&self) -> &str;
}

/// One replacement of a range with new text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub range: TextRange,
    pub text: String,
}

impl TextEdit {
    pub fn new(range: TextRange, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    /// Position right after the inserted text
    pub fn end_after_insert(&self) -> usize {
        self.range.from + self.text.chars().count()
    }
}

/// Replace the text in a range; the caret lands after the inserted text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceRange {
    pub edit: TextEdit,
}

impl ReplaceRange {
    pub fn new(range: TextRange, text: impl Into<String>) -> Self {
        Self {
            edit: TextEdit::new(range, text),
        }
    }
}

/// Apply one edit to `tree` in place and return its paragraph as it was before
fn apply_in_place(tree: &mut DocumentTree, edit: &TextEdit) -> crate::Result<ParagraphSnapshot> {
    let TextRange { from, to } = edit.range;
    let size = tree.content_size();
    if to > size {
        return Err(DocModelError::PositionOutOfRange { position: to, size }.into());
    }
    let para_id = tree
        .paragraph_at(from)
        .ok_or(DocModelError::RangeNotText { from, to })?;

    let before = tree.snapshot_paragraph(para_id)?;
    tree.replace_text(from, to, &edit.text)?;
    Ok(before)
}

impl Command for ReplaceRange {
    fn apply(&self, tree: &DocumentTree, _selection: &Selection) -> crate::Result<CommandResult> {
        let mut new_tree = tree.clone();
        let before = apply_in_place(&mut new_tree, &self.edit)?;

        Ok(CommandResult {
            tree: new_tree,
            selection: Selection::collapsed(self.edit.end_after_insert()),
            inverse: Box::new(RestoreParagraphs {
                snapshots: vec![before],
                selection: Some(Selection::collapsed(self.edit.range.to)),
            }),
        })
    }

    fn display_name(&self) -> &str {
        "Replace"
    }
}

/// Apply several edits, in order, as a single undoable step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceRanges {
    pub edits: Vec<TextEdit>,
}

impl ReplaceRanges {
    pub fn new(edits: Vec<TextEdit>) -> Self {
        Self { edits }
    }
}

impl Command for ReplaceRanges {
    fn apply(&self, tree: &DocumentTree, selection: &Selection) -> crate::Result<CommandResult> {
        if self.edits.is_empty() {
            return Err(EditError::InvalidCommand("No edits to apply".to_string()));
        }

        let mut new_tree = tree.clone();
        let mut snapshots = Vec::with_capacity(self.edits.len());
        for edit in &self.edits {
            snapshots.push(apply_in_place(&mut new_tree, edit)?);
        }
        // The earliest snapshot of a paragraph has to be restored last
        snapshots.reverse();

        let size = new_tree.content_size();
        let selection = Selection::new(selection.anchor.min(size), selection.focus.min(size));

        Ok(CommandResult {
            tree: new_tree,
            selection,
            inverse: Box::new(RestoreParagraphs {
                snapshots,
                selection: None,
            }),
        })
    }

    fn display_name(&self) -> &str {
        "Replace All"
    }
}

/// Put paragraphs back the way they were before an edit.
///
/// Snapshots are restored in order. Without a `selection` the current one
/// is kept, clamped to the restored document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreParagraphs {
    pub snapshots: Vec<ParagraphSnapshot>,
    pub selection: Option<Selection>,
}

impl Command for RestoreParagraphs {
    fn apply(&self, tree: &DocumentTree, selection: &Selection) -> crate::Result<CommandResult> {
        let mut new_tree = tree.clone();
        let mut current = Vec::with_capacity(self.snapshots.len());
        for snapshot in self.snapshots.iter().rev() {
            current.push(tree.snapshot_paragraph(snapshot.id())?);
        }
        for snapshot in &self.snapshots {
            new_tree.restore_paragraph(snapshot.clone())?;
        }

        let size = new_tree.content_size();
        let selection = self.selection.unwrap_or(*selection);
        let selection = Selection::new(selection.anchor.min(size), selection.focus.min(size));

        Ok(CommandResult {
            tree: new_tree,
            selection,
            inverse: Box::new(RestoreParagraphs {
                snapshots: current,
                selection: None,
            }),
        })
    }

    fn display_name(&self) -> &str {
        "Restore"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::{Node, Paragraph, Run, RunStyle};

    #[test]
    fn test_replace_range_and_inverse() {
        let tree = DocumentTree::from_plain_text("cat and cat");
        let cmd = ReplaceRange::new(TextRange::new(1, 4), "dog");
        let result = cmd.apply(&tree, &Selection::default()).unwrap();
        assert_eq!(result.tree.to_plain_text(), "dog and cat");
        assert_eq!(result.selection, Selection::collapsed(4));

        let undone = result.inverse.apply(&result.tree, &result.selection).unwrap();
        assert_eq!(undone.tree.to_plain_text(), "cat and cat");
    }

    #[test]
    fn test_replace_ranges_inverse_restores() {
        let tree = DocumentTree::from_plain_text("a a a");
        let edits = vec![
            TextEdit::new(TextRange::new(5, 6), "bb"),
            TextEdit::new(TextRange::new(3, 4), "bb"),
            TextEdit::new(TextRange::new(1, 2), "bb"),
        ];
        let result = ReplaceRanges::new(edits).apply(&tree, &Selection::default()).unwrap();
        assert_eq!(result.tree.to_plain_text(), "bb bb bb");

        let undone = result.inverse.apply(&result.tree, &result.selection).unwrap();
        assert_eq!(undone.tree.to_plain_text(), "a a a");
    }

    #[test]
    fn test_undo_restores_a_removed_styled_run() {
        let mut tree = DocumentTree::new();
        let para_id = tree.insert_paragraph(Paragraph::new(), tree.root_id(), None).unwrap();
        tree.insert_run(Run::new("a "), para_id, None).unwrap();
        let bold_id = tree
            .insert_run(Run::with_style("cat", RunStyle::bold()), para_id, None)
            .unwrap();

        let result = ReplaceRange::new(TextRange::new(3, 6), "")
            .apply(&tree, &Selection::default())
            .unwrap();
        assert_eq!(result.tree.to_plain_text(), "a ");
        assert!(result.tree.get_run(bold_id).is_none());

        let undone = result.inverse.apply(&result.tree, &result.selection).unwrap();
        let runs: Vec<(String, bool)> = undone
            .tree
            .get_paragraph(para_id)
            .unwrap()
            .children()
            .iter()
            .filter_map(|&id| undone.tree.get_run(id))
            .map(|run| (run.text.clone(), run.style.bold))
            .collect();
        assert_eq!(runs, vec![("a ".to_string(), false), ("cat".to_string(), true)]);
        assert_eq!(undone.selection, Selection::collapsed(6));
    }

    #[test]
    fn test_replace_ranges_inverse_handles_emptied_runs() {
        let tree = DocumentTree::from_plain_text("cat\ncat cat");
        let edits = vec![
            TextEdit::new(TextRange::new(10, 13), ""),
            TextEdit::new(TextRange::new(6, 9), ""),
            TextEdit::new(TextRange::new(1, 4), ""),
        ];
        let result = ReplaceRanges::new(edits).apply(&tree, &Selection::collapsed(12)).unwrap();
        assert_eq!(result.tree.to_plain_text(), "\n ");

        let undone = result.inverse.apply(&result.tree, &result.selection).unwrap();
        assert_eq!(undone.tree.to_plain_text(), "cat\ncat cat");
        assert_eq!(undone.tree.text_segments(), tree.text_segments());
    }

    #[test]
    fn test_replace_ranges_rejects_empty() {
        let tree = DocumentTree::from_plain_text("abc");
        let result = ReplaceRanges::new(Vec::new()).apply(&tree, &Selection::default());
        assert!(matches!(result, Err(EditError::InvalidCommand(_))));
    }

    #[test]
    fn test_failed_edit_leaves_tree_untouched() {
        let tree = DocumentTree::from_plain_text("ab\ncd");
        let cmd = ReplaceRange::new(TextRange::new(2, 6), "x");
        assert!(matches!(
            cmd.apply(&tree, &Selection::default()),
            Err(EditError::DocModel(_))
        ));
        assert_eq!(tree.to_plain_text(), "ab\ncd");
    }
}

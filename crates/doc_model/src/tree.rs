//! Document tree operations and storage
//!
//! Positions are counted in `char`s across the whole tree. The root has no
//! boundaries, runs occupy one position per char, images occupy one
//! position, and every other node adds an opening and a closing boundary
//! around its children.

use crate::{
    DocModelError, Document, Hyperlink, ImageNode, Node, NodeId, NodeType, Paragraph, Position,
    Result, Run, Table, TableCell, TableRow,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Storage for different node types
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeStorage {
    pub paragraphs: HashMap<NodeId, Paragraph>,
    pub runs: HashMap<NodeId, Run>,
    pub hyperlinks: HashMap<NodeId, Hyperlink>,
    pub images: HashMap<NodeId, ImageNode>,
    pub tables: HashMap<NodeId, Table>,
    pub table_rows: HashMap<NodeId, TableRow>,
    pub table_cells: HashMap<NodeId, TableCell>,
}

/// A run's text as seen from the global position scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSegment {
    pub run_id: NodeId,
    /// Position of the first char of the run
    pub start: usize,
    /// Length in chars
    pub len: usize,
}

impl TextSegment {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// A paragraph and every node below it, detached from the tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParagraphSnapshot {
    pub paragraph: Paragraph,
    pub runs: Vec<Run>,
    pub hyperlinks: Vec<Hyperlink>,
    pub images: Vec<ImageNode>,
}

impl ParagraphSnapshot {
    pub fn id(&self) -> NodeId {
        self.paragraph.id()
    }
}

/// The complete document tree structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTree {
    /// The root document
    pub document: Document,
    /// Storage for all nodes
    pub nodes: NodeStorage,
}

impl DocumentTree {
    /// Create a new empty document tree
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            nodes: NodeStorage::default(),
        }
    }

    /// Create a document tree with a single empty paragraph
    pub fn with_empty_paragraph() -> Self {
        let mut tree = Self::new();
        let mut para = Paragraph::new();
        let para_id = para.id();
        para.set_parent(Some(tree.root_id()));
        tree.nodes.paragraphs.insert(para_id, para);
        tree.document.add_body_child(para_id);
        tree
    }

    /// Build a tree with one paragraph per line of `text`
    pub fn from_plain_text(text: &str) -> Self {
        let mut tree = Self::new();
        let root = tree.root_id();
        for line in text.lines() {
            let mut para = Paragraph::new();
            let para_id = para.id();
            para.set_parent(Some(root));
            tree.nodes.paragraphs.insert(para_id, para);
            tree.document.add_body_child(para_id);
            if !line.is_empty() {
                let mut run = Run::new(line);
                let run_id = run.id();
                run.set_parent(Some(para_id));
                if let Some(para) = tree.nodes.paragraphs.get_mut(&para_id) {
                    para.add_child(run_id);
                }
                tree.nodes.runs.insert(run_id, run);
            }
        }
        tree
    }

    /// Get the document root ID
    pub fn root_id(&self) -> NodeId {
        self.document.id()
    }

    /// Current content version
    pub fn version(&self) -> u64 {
        self.document.version()
    }

    /// Get a paragraph by ID
    pub fn get_paragraph(&self, id: NodeId) -> Option<&Paragraph> {
        self.nodes.paragraphs.get(&id)
    }

    /// Get a run by ID
    pub fn get_run(&self, id: NodeId) -> Option<&Run> {
        self.nodes.runs.get(&id)
    }

    /// Get a mutable run by ID
    pub fn get_run_mut(&mut self, id: NodeId) -> Option<&mut Run> {
        self.nodes.runs.get_mut(&id)
    }

    /// Get a hyperlink by ID
    pub fn get_hyperlink(&self, id: NodeId) -> Option<&Hyperlink> {
        self.nodes.hyperlinks.get(&id)
    }

    /// Get any node by ID as a trait object
    pub fn get_node(&self, id: NodeId) -> Option<&dyn Node> {
        if id == self.document.id() {
            return Some(&self.document);
        }
        if let Some(node) = self.nodes.paragraphs.get(&id) {
            return Some(node);
        }
        if let Some(node) = self.nodes.runs.get(&id) {
            return Some(node);
        }
        if let Some(node) = self.nodes.hyperlinks.get(&id) {
            return Some(node);
        }
        if let Some(node) = self.nodes.images.get(&id) {
            return Some(node);
        }
        if let Some(node) = self.nodes.tables.get(&id) {
            return Some(node);
        }
        if let Some(node) = self.nodes.table_rows.get(&id) {
            return Some(node);
        }
        if let Some(node) = self.nodes.table_cells.get(&id) {
            return Some(node);
        }
        None
    }

    /// Get the node type for a given ID
    pub fn node_type(&self, id: NodeId) -> Option<NodeType> {
        self.get_node(id).map(|node| node.node_type())
    }

    // ------------------------------------------------------------------
    // Structure building
    // ------------------------------------------------------------------

    /// Insert a paragraph under the document root or a table cell
    pub fn insert_paragraph(
        &mut self,
        mut para: Paragraph,
        parent_id: NodeId,
        index: Option<usize>,
    ) -> Result<NodeId> {
        self.expect_parent(parent_id, &[NodeType::Document, NodeType::TableCell])?;
        let para_id = para.id();
        para.set_parent(Some(parent_id));
        self.attach_child(parent_id, para_id, index)?;
        self.nodes.paragraphs.insert(para_id, para);
        Ok(para_id)
    }

    /// Insert a run under a paragraph or a hyperlink
    pub fn insert_run(&mut self, mut run: Run, parent_id: NodeId, index: Option<usize>) -> Result<NodeId> {
        self.expect_parent(parent_id, &[NodeType::Paragraph, NodeType::Hyperlink])?;
        let run_id = run.id();
        run.set_parent(Some(parent_id));
        self.attach_child(parent_id, run_id, index)?;
        self.nodes.runs.insert(run_id, run);
        Ok(run_id)
    }

    /// Insert a hyperlink into a paragraph
    pub fn insert_hyperlink(
        &mut self,
        mut hyperlink: Hyperlink,
        para_id: NodeId,
        index: Option<usize>,
    ) -> Result<NodeId> {
        self.expect_parent(para_id, &[NodeType::Paragraph])?;
        let hyperlink_id = hyperlink.id();
        hyperlink.set_parent(Some(para_id));
        self.attach_child(para_id, hyperlink_id, index)?;
        self.nodes.hyperlinks.insert(hyperlink_id, hyperlink);
        Ok(hyperlink_id)
    }

    /// Insert a run into a hyperlink
    pub fn insert_run_into_hyperlink(
        &mut self,
        run: Run,
        hyperlink_id: NodeId,
        index: Option<usize>,
    ) -> Result<NodeId> {
        self.expect_parent(hyperlink_id, &[NodeType::Hyperlink])?;
        self.insert_run(run, hyperlink_id, index)
    }

    /// Insert an inline image into a paragraph
    pub fn insert_image(&mut self, mut image: ImageNode, para_id: NodeId, index: Option<usize>) -> Result<NodeId> {
        self.expect_parent(para_id, &[NodeType::Paragraph])?;
        let image_id = image.id();
        image.set_parent(Some(para_id));
        self.attach_child(para_id, image_id, index)?;
        self.nodes.images.insert(image_id, image);
        Ok(image_id)
    }

    /// Insert a table under the document root or a table cell
    pub fn insert_table(&mut self, mut table: Table, parent_id: NodeId, index: Option<usize>) -> Result<NodeId> {
        self.expect_parent(parent_id, &[NodeType::Document, NodeType::TableCell])?;
        let table_id = table.id();
        table.set_parent(Some(parent_id));
        self.attach_child(parent_id, table_id, index)?;
        self.nodes.tables.insert(table_id, table);
        Ok(table_id)
    }

    /// Insert a row into a table
    pub fn insert_table_row(&mut self, mut row: TableRow, table_id: NodeId, index: Option<usize>) -> Result<NodeId> {
        self.expect_parent(table_id, &[NodeType::Table])?;
        let row_id = row.id();
        row.set_parent(Some(table_id));
        self.attach_child(table_id, row_id, index)?;
        self.nodes.table_rows.insert(row_id, row);
        Ok(row_id)
    }

    /// Insert a cell into a table row
    pub fn insert_table_cell(&mut self, mut cell: TableCell, row_id: NodeId, index: Option<usize>) -> Result<NodeId> {
        self.expect_parent(row_id, &[NodeType::TableRow])?;
        let cell_id = cell.id();
        cell.set_parent(Some(row_id));
        self.attach_child(row_id, cell_id, index)?;
        self.nodes.table_cells.insert(cell_id, cell);
        Ok(cell_id)
    }

    /// Insert a paragraph into a table cell
    pub fn insert_paragraph_into_cell(&mut self, para: Paragraph, cell_id: NodeId, index: Option<usize>) -> Result<NodeId> {
        self.expect_parent(cell_id, &[NodeType::TableCell])?;
        self.insert_paragraph(para, cell_id, index)
    }

    fn expect_parent(&self, parent_id: NodeId, allowed: &[NodeType]) -> Result<()> {
        let node_type = self
            .node_type(parent_id)
            .ok_or(DocModelError::NodeNotFound(parent_id.as_uuid()))?;
        if allowed.contains(&node_type) {
            Ok(())
        } else {
            Err(DocModelError::TreeStructureError(format!(
                "{:?} cannot contain this node",
                node_type
            )))
        }
    }

    fn attach_child(&mut self, parent_id: NodeId, child_id: NodeId, index: Option<usize>) -> Result<()> {
        let len = self
            .get_node(parent_id)
            .map(|node| node.children().len())
            .ok_or(DocModelError::NodeNotFound(parent_id.as_uuid()))?;
        let index = index.unwrap_or(len);
        if index > len {
            return Err(DocModelError::InvalidOperation(format!(
                "child index {} out of bounds ({} children)",
                index, len
            )));
        }

        if parent_id == self.document.id() {
            self.document.insert_body_child(index, child_id);
            return Ok(());
        }
        if let Some(para) = self.nodes.paragraphs.get_mut(&parent_id) {
            para.insert_child(index, child_id);
        } else if let Some(hyperlink) = self.nodes.hyperlinks.get_mut(&parent_id) {
            hyperlink.insert_child(index, child_id);
        } else if let Some(table) = self.nodes.tables.get_mut(&parent_id) {
            table.insert_child(index, child_id);
        } else if let Some(row) = self.nodes.table_rows.get_mut(&parent_id) {
            row.insert_child(index, child_id);
        } else if let Some(cell) = self.nodes.table_cells.get_mut(&parent_id) {
            cell.insert_child(index, child_id);
        }
        self.document.increment_version();
        Ok(())
    }

    /// Remove a run from storage and from its parent
    fn remove_run(&mut self, run_id: NodeId) -> Result<Run> {
        let run = self
            .nodes
            .runs
            .remove(&run_id)
            .ok_or(DocModelError::NodeNotFound(run_id.as_uuid()))?;

        if let Some(parent_id) = run.parent() {
            if let Some(para) = self.nodes.paragraphs.get_mut(&parent_id) {
                para.remove_child(run_id);
            } else if let Some(hyperlink) = self.nodes.hyperlinks.get_mut(&parent_id) {
                hyperlink.remove_child(run_id);
            }
        }
        Ok(run)
    }

    // ------------------------------------------------------------------
    // Position scheme
    // ------------------------------------------------------------------

    /// Number of positions a node occupies
    pub fn node_size(&self, id: NodeId) -> usize {
        let Some(node) = self.get_node(id) else {
            return 0;
        };
        match node.node_type() {
            NodeType::Document => self.content_size(),
            NodeType::Run => node.text_content().map_or(0, |text| text.chars().count()),
            NodeType::Image => 1,
            _ => 2 + node.children().iter().map(|&child| self.node_size(child)).sum::<usize>(),
        }
    }

    /// Total size of the document content
    pub fn content_size(&self) -> usize {
        self.document
            .children()
            .iter()
            .map(|&child| self.node_size(child))
            .sum()
    }

    /// Depth-first traversal in document order.
    ///
    /// The visitor receives each node below the root together with its start
    /// position (for runs: the position of the first char). Returning
    /// `false` skips the node's children.
    pub fn descendants<F>(&self, mut visitor: F)
    where
        F: FnMut(&dyn Node, usize) -> bool,
    {
        let mut pos = 0;
        for &child in self.document.children() {
            pos += self.visit_node(child, pos, &mut visitor);
        }
    }

    /// Visit a subtree and return its size
    fn visit_node<F>(&self, id: NodeId, pos: usize, visitor: &mut F) -> usize
    where
        F: FnMut(&dyn Node, usize) -> bool,
    {
        let Some(node) = self.get_node(id) else {
            return 0;
        };
        let descend = visitor(node, pos);

        match node.node_type() {
            NodeType::Run => node.text_content().map_or(0, |text| text.chars().count()),
            NodeType::Image => 1,
            _ if !descend => self.node_size(id),
            _ => {
                let mut size = 0;
                for &child in node.children() {
                    size += self.visit_node(child, pos + 1 + size, visitor);
                }
                size + 2
            }
        }
    }

    /// All text runs with their global positions, in document order
    pub fn text_segments(&self) -> Vec<TextSegment> {
        let mut segments = Vec::new();
        self.descendants(|node, pos| {
            if let Some(text) = node.text_content() {
                segments.push(TextSegment {
                    run_id: node.id(),
                    start: pos,
                    len: text.chars().count(),
                });
            }
            true
        });
        segments
    }

    /// Resolve a global position to a run and a char offset inside it.
    ///
    /// A position on the boundary between two adjacent runs resolves to the
    /// end of the first.
    pub fn resolve_text(&self, pos: usize) -> Option<Position> {
        self.text_segments()
            .into_iter()
            .find(|seg| seg.start <= pos && pos <= seg.end())
            .map(|seg| Position::new(seg.run_id, pos - seg.start))
    }

    /// The text covered by `[from, to)`. Boundaries and atoms contribute
    /// nothing.
    pub fn text_between(&self, from: usize, to: usize) -> String {
        let mut result = String::new();
        for seg in self.text_segments() {
            if seg.end() <= from || seg.start >= to {
                continue;
            }
            if let Some(run) = self.get_run(seg.run_id) {
                let local_start = from.saturating_sub(seg.start);
                let local_end = to.min(seg.end()) - seg.start;
                result.extend(run.text.chars().skip(local_start).take(local_end - local_start));
            }
        }
        result
    }

    /// Plain-text rendering: one line per paragraph
    pub fn to_plain_text(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        self.descendants(|node, _| {
            match node.node_type() {
                NodeType::Paragraph => lines.push(String::new()),
                NodeType::Run => {
                    if let (Some(line), Some(text)) = (lines.last_mut(), node.text_content()) {
                        line.push_str(text);
                    }
                }
                _ => {}
            }
            true
        });
        lines.join("\n")
    }

    /// Replace the text in `[from, to)` with `text`.
    ///
    /// The range must be covered by text without gaps, so it never crosses a
    /// paragraph, hyperlink or image boundary. The replacement lands in the
    /// first run touched; runs left empty are removed. Every position after
    /// `to` shifts by `chars(text) - (to - from)`.
    pub fn replace_text(&mut self, from: usize, to: usize, text: &str) -> Result<()> {
        if from > to {
            return Err(DocModelError::InvalidOperation(format!(
                "inverted range {}..{}",
                from, to
            )));
        }
        let size = self.content_size();
        if to > size {
            return Err(DocModelError::PositionOutOfRange { position: to, size });
        }

        let segments = self.text_segments();

        if from == to {
            let seg = segments
                .iter()
                .find(|seg| seg.start <= from && from <= seg.end())
                .ok_or(DocModelError::RangeNotText { from, to })?;
            let run = self
                .get_run_mut(seg.run_id)
                .ok_or(DocModelError::NodeNotFound(seg.run_id.as_uuid()))?;
            let byte = byte_offset(&run.text, from - seg.start);
            run.text.insert_str(byte, text);
            self.document.increment_version();
            return Ok(());
        }

        let touched: Vec<TextSegment> = segments
            .into_iter()
            .filter(|seg| seg.start < to && seg.end() > from)
            .collect();
        let covered: usize = touched
            .iter()
            .map(|seg| to.min(seg.end()) - from.max(seg.start))
            .sum();
        if touched.is_empty() || covered != to - from {
            return Err(DocModelError::RangeNotText { from, to });
        }

        let mut emptied = Vec::new();
        for (i, seg) in touched.iter().enumerate() {
            let local_start = from.saturating_sub(seg.start);
            let local_end = to.min(seg.end()) - seg.start;
            let run = self
                .get_run_mut(seg.run_id)
                .ok_or(DocModelError::NodeNotFound(seg.run_id.as_uuid()))?;

            let start_byte = byte_offset(&run.text, local_start);
            let end_byte = byte_offset(&run.text, local_end);
            let insert = if i == 0 { text } else { "" };
            run.text.replace_range(start_byte..end_byte, insert);

            if run.text.is_empty() {
                emptied.push(seg.run_id);
            }
        }
        for run_id in emptied {
            self.remove_run(run_id)?;
        }

        self.document.increment_version();
        Ok(())
    }

    /// The paragraph holding the text at `pos`
    pub fn paragraph_at(&self, pos: usize) -> Option<NodeId> {
        let run_id = self.resolve_text(pos)?.node_id;
        let mut id = self.get_run(run_id)?.parent()?;
        while self.node_type(id)? != NodeType::Paragraph {
            id = self.get_node(id)?.parent()?;
        }
        Some(id)
    }

    /// Copy a paragraph together with its runs, hyperlinks and images
    pub fn snapshot_paragraph(&self, id: NodeId) -> Result<ParagraphSnapshot> {
        let paragraph = self
            .get_paragraph(id)
            .cloned()
            .ok_or(DocModelError::NodeNotFound(id.as_uuid()))?;

        let mut stack = paragraph.children().to_vec();
        let mut snapshot = ParagraphSnapshot {
            paragraph,
            runs: Vec::new(),
            hyperlinks: Vec::new(),
            images: Vec::new(),
        };
        while let Some(child) = stack.pop() {
            if let Some(run) = self.get_run(child) {
                snapshot.runs.push(run.clone());
            } else if let Some(hyperlink) = self.get_hyperlink(child) {
                stack.extend_from_slice(hyperlink.children());
                snapshot.hyperlinks.push(hyperlink.clone());
            } else if let Some(image) = self.nodes.images.get(&child) {
                snapshot.images.push(image.clone());
            }
        }
        Ok(snapshot)
    }

    /// Put a paragraph back exactly as it was snapshotted.
    ///
    /// Whatever currently sits below the paragraph is dropped first. The
    /// paragraph must still be in the tree.
    pub fn restore_paragraph(&mut self, snapshot: ParagraphSnapshot) -> Result<()> {
        let current = self.snapshot_paragraph(snapshot.id())?;
        for run in &current.runs {
            self.nodes.runs.remove(&run.id());
        }
        for hyperlink in &current.hyperlinks {
            self.nodes.hyperlinks.remove(&hyperlink.id());
        }
        for image in &current.images {
            self.nodes.images.remove(&image.id());
        }

        let ParagraphSnapshot {
            paragraph,
            runs,
            hyperlinks,
            images,
        } = snapshot;
        self.nodes.runs.extend(runs.into_iter().map(|run| (run.id(), run)));
        self.nodes
            .hyperlinks
            .extend(hyperlinks.into_iter().map(|hyperlink| (hyperlink.id(), hyperlink)));
        self.nodes.images.extend(images.into_iter().map(|image| (image.id(), image)));
        self.nodes.paragraphs.insert(paragraph.id(), paragraph);

        self.document.increment_version();
        Ok(())
    }
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::with_empty_paragraph()
    }
}

/// Byte offset of the `char_index`-th char (or the end of the string)
fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map_or(text.len(), |(byte, _)| byte)
}

//! Table nodes: tables contain rows, rows contain cells, cells contain
//! paragraphs

use crate::{Node, NodeId, NodeType};
use serde::{Deserialize, Serialize};

macro_rules! container_children {
    () => {
        pub fn add_child(&mut self, child_id: NodeId) {
            self.children.push(child_id);
        }

        pub fn insert_child(&mut self, index: usize, child_id: NodeId) {
            self.children.insert(index, child_id);
        }

        pub fn remove_child(&mut self, child_id: NodeId) -> bool {
            if let Some(pos) = self.children.iter().position(|&id| id == child_id) {
                self.children.remove(pos);
                true
            } else {
                false
            }
        }
    };
}

/// A table block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    id: NodeId,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    container_children!();
}

/// A row of a table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableRow {
    id: NodeId,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Repeat this row at the top of each page
    pub is_header: bool,
}

impl TableRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header() -> Self {
        Self {
            is_header: true,
            ..Self::default()
        }
    }

    container_children!();
}

/// A cell of a table row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCell {
    id: NodeId,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Number of grid columns this cell spans
    pub grid_span: u32,
}

impl TableCell {
    pub fn new() -> Self {
        Self {
            id: NodeId::new(),
            parent: None,
            children: Vec::new(),
            grid_span: 1,
        }
    }

    container_children!();
}

impl Default for TableCell {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for Table {
    fn id(&self) -> NodeId {
        self.id
    }

    fn node_type(&self) -> NodeType {
        NodeType::Table
    }

    fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    fn can_have_children(&self) -> bool {
        true
    }
}

impl Node for TableRow {
    fn id(&self) -> NodeId {
        self.id
    }

    fn node_type(&self) -> NodeType {
        NodeType::TableRow
    }

    fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    fn can_have_children(&self) -> bool {
        true
    }
}

impl Node for TableCell {
    fn id(&self) -> NodeId {
        self.id
    }

    fn node_type(&self) -> NodeType {
        NodeType::TableCell
    }

    fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    fn can_have_children(&self) -> bool {
        true
    }
}

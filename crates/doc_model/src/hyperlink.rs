//! Hyperlink node - wraps text runs with a link target

use crate::{Node, NodeId, NodeType};
use serde::{Deserialize, Serialize};

/// A hyperlink that wraps one or more runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hyperlink {
    id: NodeId,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Link target (URL or `#bookmark`)
    pub target: String,
    /// Optional tooltip shown on hover
    pub tooltip: Option<String>,
}

impl Hyperlink {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            parent: None,
            children: Vec::new(),
            target: target.into(),
            tooltip: None,
        }
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

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
}

impl Node for Hyperlink {
    fn id(&self) -> NodeId {
        self.id
    }

    fn node_type(&self) -> NodeType {
        NodeType::Hyperlink
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

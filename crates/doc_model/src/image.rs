//! Inline image node

use crate::{Node, NodeId, NodeType};
use serde::{Deserialize, Serialize};

/// An inline image. Occupies a single position and carries no text;
/// its alt text is metadata and never searchable content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageNode {
    id: NodeId,
    parent: Option<NodeId>,
    /// Reference into the document's image store
    pub resource_id: String,
    /// Alternative text for accessibility
    pub alt_text: Option<String>,
    /// Display width in points
    pub width: f32,
    /// Display height in points
    pub height: f32,
}

impl ImageNode {
    pub fn new(resource_id: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            id: NodeId::new(),
            parent: None,
            resource_id: resource_id.into(),
            alt_text: None,
            width,
            height,
        }
    }

    pub fn with_alt_text(mut self, alt_text: impl Into<String>) -> Self {
        self.alt_text = Some(alt_text.into());
        self
    }
}

impl Node for ImageNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn node_type(&self) -> NodeType {
        NodeType::Image
    }

    fn children(&self) -> &[NodeId] {
        &[]
    }

    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    fn can_have_children(&self) -> bool {
        false
    }
}

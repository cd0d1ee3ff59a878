//! Selection and caret rendering

use crate::{Color, RenderItem};
use doc_model::Selection;

/// Selection rendering configuration
#[derive(Debug, Clone)]
pub struct SelectionConfig {
    /// Selection highlight color
    pub color: Color,
    /// Caret color
    pub caret_color: Color,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            color: Color::rgba(51, 153, 255, 128), // Light blue with transparency
            caret_color: Color::BLACK,
        }
    }
}

/// Renders the editor selection
pub struct SelectionRenderer {
    config: SelectionConfig,
}

impl SelectionRenderer {
    pub fn new(config: SelectionConfig) -> Self {
        Self { config }
    }

    /// A caret for a collapsed selection, otherwise a selection span
    pub fn render(&self, selection: &Selection) -> RenderItem {
        if selection.is_collapsed() {
            RenderItem::Caret {
                position: selection.focus,
                color: self.config.caret_color,
            }
        } else {
            RenderItem::Selection {
                from: selection.start(),
                to: selection.end(),
                color: self.config.color,
            }
        }
    }
}

impl Default for SelectionRenderer {
    fn default() -> Self {
        Self::new(SelectionConfig::default())
    }
}

//! Render item types

use serde::{Deserialize, Serialize};

/// Color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// CSS `rgba()` notation
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {:.3})",
            self.r,
            self.g,
            self.b,
            self.a as f64 / 255.0
        )
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Inline highlight over a document range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRenderInfo {
    /// Start position (inclusive)
    pub from: usize,
    /// End position (exclusive)
    pub to: usize,
    /// Fill color
    pub color: Color,
    /// Class names the frontend attaches to the highlighted span
    pub classes: Vec<String>,
}

impl HighlightRenderInfo {
    pub fn new(from: usize, to: usize, color: Color) -> Self {
        Self {
            from,
            to,
            color,
            classes: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Space separated, as in an HTML `class` attribute
    pub fn class_attr(&self) -> String {
        self.classes.join(" ")
    }
}

/// Render item types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RenderItem {
    /// The caret (cursor)
    Caret { position: usize, color: Color },
    /// Selection highlight
    Selection { from: usize, to: usize, color: Color },
    /// Find/replace match highlight
    Highlight(HighlightRenderInfo),
}

/// Decorations for one document snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderModel {
    pub items: Vec<RenderItem>,
}

impl RenderModel {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn add(&mut self, item: RenderItem) {
        self.items.push(item);
    }

    /// All highlight items, in the order they were added
    pub fn highlights(&self) -> impl Iterator<Item = &HighlightRenderInfo> {
        self.items.iter().filter_map(|item| match item {
            RenderItem::Highlight(info) => Some(info),
            _ => None,
        })
    }
}

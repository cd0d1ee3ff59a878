//! Search match highlighting
//!
//! Highlights are a pure function of the search session: one inline
//! highlight per match, with the active match carrying a second class on
//! top. Nothing is highlighted while the panel is closed.

use crate::render_item::{Color, HighlightRenderInfo, RenderItem};
use edit_engine::{SearchSession, TextRange};
use serde::{Deserialize, Serialize};

/// Base class for every match
pub const DEFAULT_HIGHLIGHT_CLASS: &str = "find-replace-highlight";
/// Appended to the base class for the active match
pub const DEFAULT_ACTIVE_SUFFIX: &str = "-active";

/// Style of a search highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HighlightStyle {
    /// Any match
    #[default]
    Match,
    /// The active match
    Active,
}

impl HighlightStyle {
    pub fn color(self) -> Color {
        match self {
            HighlightStyle::Match => Color::rgba(255, 255, 0, 128),  // Yellow semi-transparent
            HighlightStyle::Active => Color::rgba(255, 150, 0, 160), // Orange semi-transparent
        }
    }
}

/// Class names attached to highlighted spans
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightClasses {
    pub base: String,
    pub active: String,
}

impl HighlightClasses {
    /// `base` for every match, `base` + `suffix` for the active one
    pub fn new(base: impl Into<String>, suffix: &str) -> Self {
        let base = base.into();
        let active = format!("{}{}", base, suffix);
        Self { base, active }
    }
}

impl Default for HighlightClasses {
    fn default() -> Self {
        Self::new(DEFAULT_HIGHLIGHT_CLASS, DEFAULT_ACTIVE_SUFFIX)
    }
}

/// One highlighted match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHighlight {
    pub range: TextRange,
    pub style: HighlightStyle,
    pub classes: Vec<String>,
}

impl SearchHighlight {
    pub fn is_active(&self) -> bool {
        self.style == HighlightStyle::Active
    }

    /// Convert to a render item for the frontend
    pub fn to_render_item(&self) -> RenderItem {
        RenderItem::Highlight(HighlightRenderInfo {
            from: self.range.from,
            to: self.range.to,
            color: self.style.color(),
            classes: self.classes.clone(),
        })
    }
}

/// Highlights for the current session state, in document order
pub fn search_highlights(session: &SearchSession, classes: &HighlightClasses) -> Vec<SearchHighlight> {
    if !session.is_panel_open() || session.query().is_empty() {
        return Vec::new();
    }

    let active = session.active_match_index();
    session
        .matches()
        .iter()
        .enumerate()
        .map(|(index, &range)| {
            if Some(index) == active {
                SearchHighlight {
                    range,
                    style: HighlightStyle::Active,
                    classes: vec![classes.base.clone(), classes.active.clone()],
                }
            } else {
                SearchHighlight {
                    range,
                    style: HighlightStyle::Match,
                    classes: vec![classes.base.clone()],
                }
            }
        })
        .collect()
}

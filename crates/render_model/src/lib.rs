//! Render Model - Decorations over the document text
//!
//! This crate turns editor state into render items the frontend draws:
//! the caret or selection, and find/replace match highlights.

mod render_item;
mod converter;
mod selection;
mod highlight;

pub use render_item::*;
pub use converter::*;
pub use selection::*;
pub use highlight::*;

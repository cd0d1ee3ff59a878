//! Document Model - Core document tree structure and types
//!
//! This crate provides the document model the editor hosts: a tree of nodes
//! with stable node IDs, addressed by a single global position scheme.
//! Text lives in runs; every other node contributes boundary positions.

mod node;
mod document;
mod paragraph;
mod run;
mod selection;
mod node_id;
mod tree;
mod error;
mod hyperlink;
mod image;
pub mod table;

pub use node::*;
pub use document::*;
pub use paragraph::*;
pub use run::*;
pub use selection::*;
pub use node_id::*;
pub use tree::*;
pub use error::*;
pub use hyperlink::*;
pub use image::*;
pub use table::*;

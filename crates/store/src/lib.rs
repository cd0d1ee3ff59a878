//! Store - Settings and document file I/O
//!
//! This crate handles application settings persistence, document
//! serialization, and loading documents from disk.

mod format;
mod serializer;
mod file_io;
mod error;
mod settings;

pub use format::*;
pub use serializer::*;
pub use file_io::*;
pub use error::*;
pub use settings::*;

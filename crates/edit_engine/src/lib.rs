//! Edit Engine - Command system, undo/redo, and find/replace
//!
//! This crate implements the command-based editing system the host editor
//! runs on, the capabilities it lends to the find/replace feature, and the
//! find/replace core itself: the match scanner, the search session state
//! machine, and the deferred visual effects queue.

mod command;
mod executor;
mod undo;
mod error;
mod host;
mod find_replace;
mod search_session;
mod deferred;
mod find_replace_commands;

pub use command::*;
pub use executor::*;
pub use undo::*;
pub use error::*;
pub use host::*;
pub use find_replace::*;
pub use search_session::*;
pub use deferred::*;
pub use find_replace_commands::*;

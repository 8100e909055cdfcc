//! Floor data: loading the TOML data file and watching it for changes.
//!
//! Editing floors and rooms happens outside this server; it only reads the file.

mod loader;
mod types;
mod watcher;

pub use loader::*;
pub use types::*;
pub use watcher::*;

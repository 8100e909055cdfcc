//! Types and helpers shared between the floorboard server and its display clients.
//!
//! This crate provides:
//! - The published endpoint file format and the well-known discovery constants
//! - Display configuration and its change events
//! - The floor/room data model served by the API
//! - Balanced distribution of an ordered collection across display screens
//! - IPv4 interface enumeration used for host advertisement and probe candidates

mod display;
mod distribute;
mod endpoint;
mod floors;
pub mod net;

pub use display::*;
pub use distribute::*;
pub use endpoint::*;
pub use floors::*;

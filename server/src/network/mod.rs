//! Endpoint self-configuration: securing a port, finding the address to advertise,
//! and deriving the CORS allow-list from it.

pub mod identify;
pub mod origins;
pub mod port;

pub use identify::detect_host;
pub use origins::{OriginOptions, OriginSet, generate_origins};
pub use port::{BindError, BoundListener, bind_free_port};

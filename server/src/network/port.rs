//! Finds the lowest free listening port at or above a preferred one.

use core::net::{IpAddr, SocketAddr};
use std::io;

use thiserror::Error as ThisError;
use tokio::net::TcpListener;
use tracing::{debug, info};

#[derive(Debug, ThisError)]
pub enum BindError {
    #[error("No available port at or above {preferred}")]
    PortExhausted { preferred: u16 },
    #[error("Failed to bind {addr}")]
    Refused {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("Invalid bind address: {0}")]
    InvalidAddress(String),
}

/// A listener secured by [`bind_free_port`].
#[derive(Debug)]
pub struct BoundListener {
    pub listener: TcpListener,
    /// Port actually bound.
    pub port: u16,
    /// Port that was asked for.
    pub preferred: u16,
}

impl BoundListener {
    /// Whether the preferred port was free.
    #[must_use]
    pub const fn is_default_port(&self) -> bool {
        self.port == self.preferred
    }
}

/// Binds `ip:preferred`, walking upward one port at a time while the port is in use.
///
/// # Errors
///
/// Returns [`BindError::PortExhausted`] once port 65535 was in use too, and
/// [`BindError::Refused`] without retrying on any failure other than "address in use".
pub async fn bind_free_port(ip: IpAddr, preferred: u16) -> Result<BoundListener, BindError> {
    let mut port = preferred;
    loop {
        let addr = SocketAddr::new(ip, port);
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                let bound = listener
                    .local_addr()
                    .map_err(|source| BindError::Refused { addr, source })?
                    .port();
                if bound != preferred {
                    info!(preferred, bound, "Preferred port was taken, moved up");
                }
                return Ok(BoundListener {
                    listener,
                    port: bound,
                    preferred,
                });
            }
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
                debug!(%addr, "Port in use, trying the next one");
                port = port
                    .checked_add(1)
                    .ok_or(BindError::PortExhausted { preferred })?;
            }
            Err(source) => return Err(BindError::Refused { addr, source }),
        }
    }
}

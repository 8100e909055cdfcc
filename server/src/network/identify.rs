//! Determines the address the server advertises to other machines.
//!
//! The listener itself stays on the wildcard address; this value is only used when
//! telling others where to reach the server.

use core::net::IpAddr;

use floorboard_common::net::{self, LOCALHOST};
use tracing::{debug, warn};

/// The first non-loopback IPv4 address of this machine, or `"localhost"` if there is none.
#[must_use]
pub fn detect_host() -> String {
    match net::local_ipv4_addresses() {
        Ok(addrs) => {
            debug!(?addrs, "Enumerated local IPv4 addresses");
            net::select_advertised_host(addrs.into_iter().map(IpAddr::V4))
        }
        Err(e) => {
            warn!("Failed to enumerate network interfaces, advertising {LOCALHOST}: {e}");
            LOCALHOST.to_string()
        }
    }
}

/// Every URL under which the server can be reached on `port`, for the startup log.
#[must_use]
pub fn reachable_urls(port: u16) -> Vec<String> {
    let mut urls = vec![format!("http://{LOCALHOST}:{port}")];
    if let Ok(addrs) = net::local_ipv4_addresses() {
        urls.extend(addrs.iter().map(|ip| format!("http://{ip}:{port}")));
    }
    urls
}

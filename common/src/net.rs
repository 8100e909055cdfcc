//! Local IPv4 address enumeration.

use core::net::{IpAddr, Ipv4Addr};
use std::io;

/// Advertised host when no non-loopback IPv4 address is available.
pub const LOCALHOST: &str = "localhost";

/// Loopback names clients always consider.
pub const LOOPBACK_HOSTS: [&str; 2] = [LOCALHOST, "127.0.0.1"];

/// Every non-loopback IPv4 address in `addrs`, in the given order.
pub fn non_loopback_ipv4<I: IntoIterator<Item = IpAddr>>(addrs: I) -> Vec<Ipv4Addr> {
    addrs
        .into_iter()
        .filter_map(|addr| match addr {
            IpAddr::V4(v4) if !v4.is_loopback() => Some(v4),
            IpAddr::V4(_) | IpAddr::V6(_) => None,
        })
        .collect()
}

/// The host to advertise: the first non-loopback IPv4 address, else [`LOCALHOST`].
#[must_use]
pub fn select_advertised_host<I: IntoIterator<Item = IpAddr>>(addrs: I) -> String {
    non_loopback_ipv4(addrs)
        .first()
        .map_or_else(|| LOCALHOST.to_string(), ToString::to_string)
}

/// Non-loopback IPv4 addresses of all local interfaces, in OS-reported interface order.
///
/// # Errors
///
/// Returns an error if the interfaces cannot be enumerated.
pub fn local_ipv4_addresses() -> io::Result<Vec<Ipv4Addr>> {
    let interfaces = if_addrs::get_if_addrs()?;
    Ok(non_loopback_ipv4(interfaces.iter().map(if_addrs::Interface::ip)))
}

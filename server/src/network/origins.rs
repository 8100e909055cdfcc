//! Builds the set of browser origins allowed to call the API.
//!
//! This is a best-effort allow-list for trusted local networks. Origin headers are
//! client-supplied, so access control rests on bearer-token authentication, not on this set.

use alloc::collections::BTreeSet;
use core::{net::Ipv4Addr, ops::RangeInclusive};

use floorboard_common::net::LOCALHOST;

/// Deduplicated `scheme://host:port` strings.
pub type OriginSet = BTreeSet<String>;

/// Ports front-end dev servers and the bundled dashboard conventionally run on.
pub const FRONTEND_PORTS: &[u16] = &[3000, 3001, 4173, 5173];

/// Last octets generated around an IPv4 host, to cover sibling devices on the same segment.
///
/// This is a fixed window, not a subnet computation.
pub const SIBLING_OCTET_WINDOW: RangeInclusive<u8> = 1..=10;

/// First three octets of private ranges assumed when no network address was detected.
pub const FALLBACK_PREFIXES: &[[u8; 3]] = &[[192, 168, 0], [192, 168, 1], [10, 0, 0], [172, 16, 0]];

/// Inputs of the origin heuristic that are fixed at build time by default.
#[derive(Debug, Clone)]
pub struct OriginOptions {
    pub frontend_ports: Vec<u16>,
    pub octet_window: RangeInclusive<u8>,
    pub fallback_prefixes: Vec<[u8; 3]>,
}

impl Default for OriginOptions {
    fn default() -> Self {
        Self {
            frontend_ports: FRONTEND_PORTS.to_vec(),
            octet_window: SIBLING_OCTET_WINDOW,
            fallback_prefixes: FALLBACK_PREFIXES.to_vec(),
        }
    }
}

impl OriginOptions {
    fn insert_host(&self, origins: &mut OriginSet, host: &str) {
        for port in &self.frontend_ports {
            origins.insert(format!("http://{host}:{port}"));
        }
    }

    fn insert_siblings(&self, origins: &mut OriginSet, [a, b, c]: [u8; 3]) {
        for d in self.octet_window.clone() {
            self.insert_host(origins, &Ipv4Addr::new(a, b, c, d).to_string());
        }
    }
}

/// Splits a comma-separated override list, trimming whitespace and skipping empty entries.
pub fn parse_overrides(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(ToString::to_string)
}

/// Builds the allow-list for a server advertising `detected_host`.
///
/// `detected_host` is `"localhost"` when no network address was found, in which case
/// the common private prefixes are expanded instead of the host's own segment.
#[must_use]
pub fn generate_origins(
    detected_host: &str,
    overrides: Option<&str>,
    options: &OriginOptions,
) -> OriginSet {
    let mut origins = OriginSet::new();

    options.insert_host(&mut origins, LOCALHOST);
    options.insert_host(&mut origins, "127.0.0.1");

    if detected_host == LOCALHOST {
        for prefix in &options.fallback_prefixes {
            options.insert_siblings(&mut origins, *prefix);
        }
    } else {
        options.insert_host(&mut origins, detected_host);
        if let Ok(ip) = detected_host.parse::<Ipv4Addr>() {
            let [a, b, c, _] = ip.octets();
            options.insert_siblings(&mut origins, [a, b, c]);
        }
    }

    if let Some(raw) = overrides {
        origins.extend(parse_overrides(raw));
    }

    origins
}

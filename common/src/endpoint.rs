//! The endpoint tuple the server publishes at boot, and where clients look for it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Port the server prefers and the client falls back to.
pub const DEFAULT_API_PORT: u16 = 1337;

/// Name of the published endpoint file, both on disk (relative to the server's working
/// directory) and as served over HTTP.
pub const ENDPOINT_FILE_NAME: &str = "server-info.json";

/// Route under which the running server serves the endpoint file.
pub const ENDPOINT_FILE_ROUTE: &str = "/server-info.json";

/// Path prefix of every API route.
pub const API_PREFIX: &str = "/api";

/// Cheap liveness route, relative to the API base URL.
pub const HEALTH_ROUTE: &str = "/health";

/// Ports clients probe when looking for the server, in probing order.
///
/// Starts at the default port and covers the first few ports the server walks to on conflict.
pub const PROBE_PORTS: &[u16] = &[1337, 1338, 1339, 1340, 1341, 3001, 8080];

/// Builds the API base URL for a host/port pair, e.g. `http://192.168.1.4:1337/api`.
#[must_use]
pub fn api_base_url(host: &str, port: u16) -> String {
    format!("http://{host}:{port}{API_PREFIX}")
}

/// Builds the liveness URL for an API base URL.
#[must_use]
pub fn health_url(api_base_url: &str) -> String {
    format!("{}{HEALTH_ROUTE}", api_base_url.trim_end_matches('/'))
}

/// The resolved server endpoint, as written to [`ENDPOINT_FILE_NAME`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointInfo {
    pub port: u16,
    pub host: String,
    pub api_url: String,
    /// When the tuple was resolved (ISO-8601 on the wire).
    pub timestamp: DateTime<Utc>,
    /// Whether the server got the port it asked for.
    pub is_default_port: bool,
    /// Whether the server runs embedded in the desktop wrapper.
    #[serde(default)]
    pub electron: bool,
}

impl EndpointInfo {
    /// Builds the tuple for a server that asked for `preferred_port` and ended up on `port`.
    #[must_use]
    pub fn new(host: String, port: u16, preferred_port: u16, electron: bool) -> Self {
        Self {
            api_url: api_base_url(&host, port),
            port,
            host,
            timestamp: Utc::now(),
            is_default_port: port == preferred_port,
            electron,
        }
    }
}

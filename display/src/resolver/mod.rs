//! Resolves the API base URL without being told where the server is.
//!
//! The strategies run in order and the first success wins:
//! 1. the explicit override, used verbatim;
//! 2. the endpoint file published by a server on this machine, verified before use;
//! 3. active probing of candidate hosts and ports;
//! 4. the static fallback `http://localhost:<default port>/api`.
//!
//! Within a strategy all candidates are probed concurrently, and the first candidate in
//! order that succeeded is taken, as soon as every candidate before it has failed. The result
//! is cached until [`EndpointResolver::refresh`].

mod candidates;
mod probe;

use core::fmt;

use chrono::{DateTime, Utc};
use floorboard_common::{DEFAULT_API_PORT, PROBE_PORTS, api_base_url, net::LOCALHOST};
use futures::{
    StreamExt as _,
    future,
    stream::FuturesOrdered,
};
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

pub use candidates::{endpoint_file_candidates, probe_candidates};
pub use probe::{HttpProbe, Probe};

/// Which strategy produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Explicit,
    PublishedFile,
    Probing,
    Fallback,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            Self::Explicit => "explicit override",
            Self::PublishedFile => "published endpoint file",
            Self::Probing => "active probing",
            Self::Fallback => "static fallback",
        })
    }
}

/// A resolved API base URL and how it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub api_url: String,
    pub strategy: Strategy,
    pub resolved_at: DateTime<Utc>,
}

/// Inputs of the strategy chain.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Operator-configured API base URL; skips every other strategy.
    pub explicit_url: Option<String>,
    /// Port of the static fallback.
    pub default_port: u16,
    /// Host the dashboard page was served from, if any.
    pub page_host: Option<String>,
    /// Addresses of this machine's interfaces.
    pub local_hosts: Vec<String>,
    /// Probe loopback aliases before network addresses.
    pub loopback_first: bool,
    /// Ports tried for every candidate host.
    pub ports: Vec<u16>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            explicit_url: None,
            default_port: DEFAULT_API_PORT,
            page_host: None,
            local_hosts: Vec::new(),
            loopback_first: true,
            ports: PROBE_PORTS.to_vec(),
        }
    }
}

/// Owns the process-wide API base URL. Construct once at startup and share by handle.
pub struct EndpointResolver<P> {
    config: ResolverConfig,
    probe: P,
    /// Held for a whole chain run, so concurrent callers share one attempt.
    in_flight: Mutex<()>,
    /// Last finished resolution, `None` until the first one finished or while refreshing.
    latest: watch::Sender<Option<Resolution>>,
}

impl<P: Probe> EndpointResolver<P> {
    pub fn new(config: ResolverConfig, probe: P) -> Self {
        Self {
            config,
            probe,
            in_flight: Mutex::new(()),
            latest: watch::Sender::new(None),
        }
    }

    fn cached_url(&self) -> Option<String> {
        self.latest
            .borrow()
            .as_ref()
            .map(|resolution| resolution.api_url.clone())
    }

    /// The API base URL, resolving it on first use.
    ///
    /// Concurrent callers wait for the same in-flight resolution instead of starting their own.
    pub async fn resolve(&self) -> String {
        if let Some(api_url) = self.cached_url() {
            return api_url;
        }
        let _in_flight = self.in_flight.lock().await;
        // another caller may have finished while we waited
        if let Some(api_url) = self.cached_url() {
            return api_url;
        }
        self.store(self.run_chain().await)
    }

    /// Drops the cached value and runs the strategy chain again.
    pub async fn refresh(&self) -> String {
        let _in_flight = self.in_flight.lock().await;
        if let Some(stale) = self.latest.send_replace(None) {
            info!(api_url = %stale.api_url, "Re-resolving API endpoint");
        }
        self.store(self.run_chain().await)
    }

    fn store(&self, resolution: Resolution) -> String {
        let api_url = resolution.api_url.clone();
        self.latest.send_replace(Some(resolution));
        api_url
    }

    /// The last finished resolution, if any. Never waits for an in-flight one.
    pub fn current_value(&self) -> Option<Resolution> {
        self.latest.borrow().clone()
    }

    async fn run_chain(&self) -> Resolution {
        let (api_url, strategy) = if let Some(ref url) = self.config.explicit_url {
            (url.clone(), Strategy::Explicit)
        } else if let Some(url) = self.from_published_file().await {
            (url, Strategy::PublishedFile)
        } else if let Some(url) = self.from_probing().await {
            (url, Strategy::Probing)
        } else {
            let url = api_base_url(LOCALHOST, self.config.default_port);
            warn!(%url, "No server found, continuing with the static fallback");
            (url, Strategy::Fallback)
        };
        info!(%api_url, %strategy, "Resolved API endpoint");
        Resolution {
            api_url,
            strategy,
            resolved_at: Utc::now(),
        }
    }

    async fn from_published_file(&self) -> Option<String> {
        let candidates = endpoint_file_candidates(&self.config.ports);
        // yields in candidate order, so later candidates only delay the result if none before
        // them served a file
        let fetched: FuturesOrdered<_> = candidates
            .iter()
            .map(|(host, port)| self.probe.fetch_endpoint_info(host, *port))
            .collect();
        let info = fetched.filter_map(future::ready).next().await?;
        debug!(api_url = %info.api_url, published = %info.timestamp, "Found published endpoint");
        if self.probe.is_live(&info.api_url).await {
            Some(info.api_url)
        } else {
            debug!(api_url = %info.api_url, "Published endpoint is stale");
            None
        }
    }

    async fn from_probing(&self) -> Option<String> {
        let urls: Vec<String> = probe_candidates(
            self.config.page_host.as_deref(),
            &self.config.local_hosts,
            self.config.loopback_first,
            &self.config.ports,
        )
        .into_iter()
        .map(|(host, port)| api_base_url(&host, port))
        .collect();
        let live: FuturesOrdered<_> = urls
            .iter()
            .map(|url| async move { self.probe.is_live(url).await.then_some(url) })
            .collect();
        live.filter_map(future::ready).next().await.cloned()
    }
}

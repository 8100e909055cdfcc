//! Liveness and endpoint-file requests against candidate addresses.

use core::time::Duration;

use floorboard_common::{ENDPOINT_FILE_ROUTE, EndpointInfo, health_url};
use tracing::debug;

/// Network operations the resolver needs. Failures and timeouts are reported as
/// `None`/`false`, never as errors.
pub trait Probe: Send + Sync {
    /// Fetches the published endpoint file from a running server at `host:port`.
    fn fetch_endpoint_info(
        &self,
        host: &str,
        port: u16,
    ) -> impl Future<Output = Option<EndpointInfo>> + Send;

    /// Whether the API at `api_url` answers its liveness route.
    fn is_live(&self, api_url: &str) -> impl Future<Output = bool> + Send;
}

/// [`Probe`] over HTTP with a fixed per-attempt timeout.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Probe for HttpProbe {
    async fn fetch_endpoint_info(&self, host: &str, port: u16) -> Option<EndpointInfo> {
        let url = format!("http://{host}:{port}{ENDPOINT_FILE_ROUTE}");
        let response = match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                debug!(%url, status = %response.status(), "Endpoint file not served");
                return None;
            }
            Err(e) => {
                debug!(%url, "Endpoint file fetch failed: {e}");
                return None;
            }
        };
        match response.json::<EndpointInfo>().await {
            Ok(info) => Some(info),
            Err(e) => {
                debug!(%url, "Endpoint file is malformed: {e}");
                None
            }
        }
    }

    async fn is_live(&self, api_url: &str) -> bool {
        let url = health_url(api_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(%url, "Liveness probe failed: {e}");
                false
            }
        }
    }
}

//! Client for the occupancy API, addressed through the endpoint resolver.

use alloc::sync::Arc;
use core::sync::atomic::{AtomicU32, Ordering};

use floorboard_common::{DisplayConfig, Floor, sort_floors};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error as ThisError;
use tracing::{debug, warn};

use crate::resolver::{EndpointResolver, Probe};

/// Consecutive failed requests after which the API endpoint is resolved again.
pub const REFRESH_AFTER_FAILURES: u32 = 3;

#[derive(Debug, ThisError)]
pub enum ApiError {
    #[error("Request to the occupancy API failed")]
    Request(#[from] reqwest::Error),
    #[error("{url} answered with {status}")]
    Status { url: String, status: StatusCode },
}

pub struct FloorClient<P> {
    resolver: Arc<EndpointResolver<P>>,
    http: reqwest::Client,
    consecutive_failures: AtomicU32,
}

impl<P: Probe> FloorClient<P> {
    pub const fn new(resolver: Arc<EndpointResolver<P>>, http: reqwest::Client) -> Self {
        Self {
            resolver,
            http,
            consecutive_failures: AtomicU32::new(0),
        }
    }

    pub const fn resolver(&self) -> &Arc<EndpointResolver<P>> {
        &self.resolver
    }

    /// All floors, in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API cannot be reached or answers with a failure status.
    pub async fn floors(&self) -> Result<Vec<Floor>, ApiError> {
        let mut floors: Vec<Floor> = self.get("/floors").await?;
        sort_floors(&mut floors);
        Ok(floors)
    }

    /// Display settings the server suggests when shared storage holds none.
    ///
    /// # Errors
    ///
    /// Returns an error if the API cannot be reached or answers with a failure status.
    pub async fn display_defaults(&self) -> Result<DisplayConfig, ApiError> {
        self.get("/display-defaults").await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let base = self.resolver.resolve().await;
        let url = format!("{base}{path}");
        let result = self.fetch(&url).await;
        match result {
            Ok(_) => self.consecutive_failures.store(0, Ordering::Relaxed),
            Err(ref e) => self.record_failure(&url, e).await,
        }
        result
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response.json().await?)
    }

    async fn record_failure(&self, url: &str, error: &ApiError) {
        let failures = self
            .consecutive_failures
            .fetch_add(1, Ordering::Relaxed)
            .saturating_add(1);
        debug!(%url, failures, "API request failed: {error}");
        if failures >= REFRESH_AFTER_FAILURES {
            warn!(failures, "API keeps failing, re-resolving the endpoint");
            self.consecutive_failures.store(0, Ordering::Relaxed);
            self.resolver.refresh().await;
        }
    }
}

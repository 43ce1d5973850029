//! Health tracking for interchangeable Overpass endpoints.
//!
//! Each endpoint is either healthy or unhealthy. Failed requests increment an
//! error counter and the endpoint becomes unhealthy once the counter reaches
//! [`MAX_ERRORS`]. Only a successful liveness probe makes it healthy again.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use log::{info, warn};

use super::error::QueryError;
use crate::config::EndpointUrl;

/// Recorded failures after which an endpoint is taken out of rotation.
pub const MAX_ERRORS: u32 = 5;

/// Point-in-time view of one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointStatus {
    pub url: EndpointUrl,
    /// Wall-clock time of the last successful request.
    pub last_used_at: Option<SystemTime>,
    pub error_count: u32,
    pub is_healthy: bool,
}

impl EndpointStatus {
    fn new(url: EndpointUrl) -> Self {
        Self {
            url,
            last_used_at: None,
            error_count: 0,
            is_healthy: true,
        }
    }
}

/// Shared registry of endpoint health.
///
/// All mutation happens under one mutex that is never held across an
/// `.await`, so request tasks and the background checker can share it.
#[derive(Debug)]
pub struct EndpointRegistry {
    endpoints: Mutex<Vec<EndpointStatus>>,
}

impl EndpointRegistry {
    /// Register `urls`, all healthy with no recorded errors.
    pub fn new<I>(urls: I) -> Self
    where
        I: IntoIterator<Item = EndpointUrl>,
    {
        Self {
            endpoints: Mutex::new(urls.into_iter().map(EndpointStatus::new).collect()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<EndpointStatus>> {
        self.endpoints.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Choose the healthy endpoint with the fewest recorded errors.
    ///
    /// Ties go to the endpoint registered first.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NoHealthyEndpoints`] when every endpoint is
    /// unhealthy or none are registered.
    pub fn select_endpoint(&self) -> Result<EndpointStatus, QueryError> {
        self.lock()
            .iter()
            .filter(|endpoint| endpoint.is_healthy)
            .min_by_key(|endpoint| endpoint.error_count)
            .cloned()
            .ok_or(QueryError::NoHealthyEndpoints)
    }

    /// Record a failed request against `url`.
    ///
    /// Returns `true` when this failure took the endpoint out of rotation.
    pub fn record_failure(&self, url: &EndpointUrl) -> bool {
        let mut endpoints = self.lock();
        let Some(endpoint) = endpoints.iter_mut().find(|endpoint| &endpoint.url == url) else {
            return false;
        };
        endpoint.error_count = endpoint.error_count.saturating_add(1);
        if endpoint.is_healthy && endpoint.error_count >= MAX_ERRORS {
            endpoint.is_healthy = false;
            warn!(
                "Overpass endpoint {url} marked unhealthy after {} errors",
                endpoint.error_count
            );
            return true;
        }
        false
    }

    /// Record a successful request against `url`.
    pub fn record_success(&self, url: &EndpointUrl) {
        if let Some(endpoint) = self.lock().iter_mut().find(|endpoint| &endpoint.url == url) {
            endpoint.last_used_at = Some(SystemTime::now());
        }
    }

    /// Apply a successful liveness probe: healthy again with no errors.
    ///
    /// Returns `true` when the endpoint was previously unhealthy.
    pub fn mark_probe_success(&self, url: &EndpointUrl) -> bool {
        let mut endpoints = self.lock();
        let Some(endpoint) = endpoints.iter_mut().find(|endpoint| &endpoint.url == url) else {
            return false;
        };
        let recovered = !endpoint.is_healthy;
        endpoint.error_count = 0;
        endpoint.is_healthy = true;
        if recovered {
            info!("Overpass endpoint {url} is healthy again");
        }
        recovered
    }

    /// Status of every endpoint in registration order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<EndpointStatus> {
        self.lock().clone()
    }

    /// URLs of every endpoint in registration order.
    #[must_use]
    pub fn urls(&self) -> Vec<EndpointUrl> {
        self.lock().iter().map(|endpoint| endpoint.url.clone()).collect()
    }
}

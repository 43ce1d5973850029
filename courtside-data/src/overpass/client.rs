//! Retrying Overpass client.
//!
//! [`OverpassClient`] owns the shared endpoint registry, rate limiter and
//! metrics collector, and drives one [`OverpassTransport`] through them.

use std::time::Duration;

use futures_util::future::join_all;
use log::{debug, warn};
use tokio::time::Instant;

use super::endpoints::{EndpointRegistry, EndpointStatus};
use super::error::QueryError;
use super::metrics::{Metrics, MetricsCollector};
use super::query::OverpassQuery;
use super::rate_limit::RateLimiter;
use super::response::{OverpassResponse, RawElement};
use super::transport::OverpassTransport;
use crate::config::{EndpointUrl, IngestionConfig};

/// Outcome of probing one endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome {
    pub url: EndpointUrl,
    pub result: Result<(), QueryError>,
}

/// Overpass client with endpoint failover, rate limiting and retries.
#[derive(Debug)]
pub struct OverpassClient<T> {
    transport: T,
    registry: EndpointRegistry,
    limiter: RateLimiter,
    metrics: MetricsCollector,
    request_timeout: Duration,
    probe_timeout: Duration,
    retries: u32,
    backoff_step: Duration,
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl<T: OverpassTransport> OverpassClient<T> {
    /// Build a client over `transport` using `config`'s endpoints and limits.
    pub fn new(config: &IngestionConfig, transport: T) -> Self {
        Self {
            transport,
            registry: EndpointRegistry::new(config.endpoints.iter().cloned()),
            limiter: RateLimiter::new(config.rate_limit_max_requests, config.rate_limit_window),
            metrics: MetricsCollector::new(),
            request_timeout: config.request_timeout,
            probe_timeout: config.probe_timeout,
            retries: config.retries,
            backoff_step: config.backoff_step,
        }
    }

    /// Run `query`, failing over and retrying within the retry budget.
    ///
    /// Each attempt selects the healthiest endpoint, waits for its rate-limit
    /// window, and posts the query under the request deadline. Failed
    /// attempts count against the endpoint and back off linearly before the
    /// next attempt.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NoHealthyEndpoints`] as soon as no endpoint is
    /// usable, or the last classified failure once retries are exhausted.
    pub async fn execute_query(&self, query: &OverpassQuery) -> Result<Vec<RawElement>, QueryError> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let endpoint = self.registry.select_endpoint()?.url;
            self.limiter.throttle(endpoint.as_str()).await;

            let started = Instant::now();
            let outcome = self.send(&endpoint, query).await;
            let elapsed = started.elapsed();

            match outcome {
                Ok(elements) => {
                    self.metrics.record_request(true, elapsed);
                    self.registry.record_success(&endpoint);
                    debug!(
                        "Overpass query on {endpoint} returned {} elements in {elapsed:?}",
                        elements.len()
                    );
                    return Ok(elements);
                }
                Err(err) => {
                    self.metrics.record_request(false, elapsed);
                    self.registry.record_failure(&endpoint);
                    if attempt > self.retries || !err.is_retryable() {
                        warn!("Overpass query failed after {attempt} attempt(s): {err}");
                        return Err(err);
                    }
                    let delay = self.backoff_step.saturating_mul(attempt);
                    warn!("Overpass attempt {attempt} failed: {err}; retrying in {delay:?}");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    async fn send(
        &self,
        endpoint: &EndpointUrl,
        query: &OverpassQuery,
    ) -> Result<Vec<RawElement>, QueryError> {
        let timeout_ms = millis(self.request_timeout);
        let response = match tokio::time::timeout(
            self.request_timeout,
            self.transport.execute(endpoint, query),
        )
        .await
        {
            Err(_) => {
                return Err(QueryError::Timeout {
                    endpoint: endpoint.to_string(),
                    timeout_ms,
                });
            }
            Ok(Err(err)) => return Err(QueryError::from_transport(err, timeout_ms)),
            Ok(Ok(response)) => response,
        };
        check_remark(endpoint, response)
    }

    /// Send a liveness probe to `endpoint` and apply a success to the
    /// registry. A failed probe leaves endpoint state untouched.
    ///
    /// Probes bypass the rate limiter and are not counted in [`Metrics`].
    ///
    /// # Errors
    ///
    /// Returns the classified probe failure.
    pub async fn probe(&self, endpoint: &EndpointUrl) -> Result<(), QueryError> {
        let timeout_ms = millis(self.probe_timeout);
        let liveness = OverpassQuery::liveness();
        let outcome =
            match tokio::time::timeout(self.probe_timeout, self.transport.execute(endpoint, &liveness))
                .await
            {
                Err(_) => Err(QueryError::Timeout {
                    endpoint: endpoint.to_string(),
                    timeout_ms,
                }),
                Ok(Err(err)) => Err(QueryError::from_transport(err, timeout_ms)),
                Ok(Ok(_)) => Ok(()),
            };
        match &outcome {
            Ok(()) => {
                self.registry.mark_probe_success(endpoint);
            }
            Err(err) => debug!("probe of {endpoint} failed: {err}"),
        }
        outcome
    }

    /// Probe every registered endpoint concurrently.
    pub async fn probe_all(&self) -> Vec<ProbeOutcome> {
        let urls = self.registry.urls();
        let results = join_all(urls.iter().map(|url| self.probe(url))).await;
        urls.into_iter()
            .zip(results)
            .map(|(url, result)| ProbeOutcome { url, result })
            .collect()
    }

    /// Status of every endpoint.
    #[must_use]
    pub fn endpoint_status(&self) -> Vec<EndpointStatus> {
        self.registry.snapshot()
    }

    /// Copy of the request counters.
    #[must_use]
    pub fn metrics(&self) -> Metrics {
        self.metrics.metrics()
    }

    /// Zero the request counters.
    pub fn reset_metrics(&self) {
        self.metrics.reset();
    }

    /// Shared endpoint registry.
    #[must_use]
    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    /// Underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

fn check_remark(
    endpoint: &EndpointUrl,
    response: OverpassResponse,
) -> Result<Vec<RawElement>, QueryError> {
    if response.reports_memory_exhaustion() {
        return Err(QueryError::UpstreamMemoryLimit {
            endpoint: endpoint.to_string(),
        });
    }
    if let Some(remark) = &response.remark {
        debug!("{endpoint} remarked: {remark}");
    }
    Ok(response.elements)
}

//! Overpass API access.
//!
//! The pieces fit together as follows:
//!
//! - [`build_query`] turns a bounding box into Overpass QL.
//! - [`OverpassClient`] picks a healthy endpoint from the
//!   [`EndpointRegistry`], waits on the [`RateLimiter`], and sends the query
//!   through an [`OverpassTransport`] under a hard deadline, retrying with
//!   linear backoff.
//! - [`MetricsCollector`] counts every attempt.
//! - [`spawn_health_checks`] periodically probes endpoints so unhealthy ones
//!   can return to rotation.
//!
//! # Example
//!
//! ```no_run
//! use courtside_core::calculate_bounds;
//! use courtside_data::IngestionConfig;
//! use courtside_data::overpass::{HttpOverpassTransport, OverpassClient, build_query};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = IngestionConfig::default();
//! let client = OverpassClient::new(&config, HttpOverpassTransport::from_config(&config)?);
//! let bounds = calculate_bounds(36.1627, -86.7816, 5.0)?;
//! let elements = client.execute_query(&build_query(&bounds, &config.sport)).await?;
//! println!("{} raw elements", elements.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod endpoints;
mod error;
mod health;
mod metrics;
mod query;
mod rate_limit;
mod response;
mod transport;

#[doc(hidden)]
pub mod test_support;

pub use client::{OverpassClient, ProbeOutcome};
pub use endpoints::{EndpointRegistry, EndpointStatus, MAX_ERRORS};
pub use error::{QueryError, TransportError};
pub use health::{
    HealthCheckHandle, MAX_HEALTH_CHECK_INTERVAL, MIN_HEALTH_CHECK_INTERVAL, spawn_health_checks,
};
pub use metrics::{Metrics, MetricsCollector};
pub use query::{OverpassQuery, QUERY_TIMEOUT_SECS, build_query};
pub use rate_limit::RateLimiter;
pub use response::{ElementTags, OverpassResponse, RawElement};
pub use transport::{HttpOverpassTransport, OverpassTransport, TransportBuildError};

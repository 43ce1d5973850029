//! Error types for Overpass requests.

use courtside_core::BoundsError;
use thiserror::Error;

/// Failure reported by an [`super::OverpassTransport`] for one request.
///
/// Transport errors are raw observations; the client classifies them into
/// [`QueryError`] before they reach callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The endpoint answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        url: String,
        status: u16,
        message: String,
    },
    /// The connection failed before a response arrived.
    #[error("network error contacting {url}: {message}")]
    Network { url: String, message: String },
    /// The HTTP client gave up waiting for a response.
    #[error("request to {url} timed out")]
    Timeout { url: String },
    /// The response body was not valid Overpass JSON.
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Classified failure of an Overpass search.
///
/// `InvalidInput` and `NoHealthyEndpoints` end the call immediately. The
/// remaining variants are retried within the configured budget before being
/// surfaced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// The search centre or radius was invalid.
    #[error(transparent)]
    InvalidInput(#[from] BoundsError),
    /// Every configured endpoint is marked unhealthy.
    #[error("no healthy Overpass endpoints are available")]
    NoHealthyEndpoints,
    /// The connection to the endpoint failed.
    #[error("network error contacting {endpoint}: {message}")]
    Network { endpoint: String, message: String },
    /// The request exceeded its deadline.
    #[error("request to {endpoint} timed out after {timeout_ms} ms")]
    Timeout { endpoint: String, timeout_ms: u64 },
    /// The endpoint throttled the client with HTTP 429.
    #[error("{endpoint} is rate limiting requests")]
    RateLimited { endpoint: String },
    /// The endpoint could not allocate enough memory to evaluate the query.
    #[error("{endpoint} ran out of memory evaluating the query")]
    UpstreamMemoryLimit { endpoint: String },
    /// Any other failure, including undecodable responses.
    #[error("request to {endpoint} failed: {message}")]
    Other { endpoint: String, message: String },
}

impl QueryError {
    /// Whether the client retries after this error.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::InvalidInput(_) | Self::NoHealthyEndpoints)
    }

    /// Classify a transport failure.
    pub(crate) fn from_transport(error: TransportError, timeout_ms: u64) -> Self {
        match error {
            TransportError::Timeout { url } => Self::Timeout {
                endpoint: url,
                timeout_ms,
            },
            TransportError::Network { url, message } => Self::Network {
                endpoint: url,
                message,
            },
            TransportError::Http { url, status: 429, .. } => Self::RateLimited { endpoint: url },
            TransportError::Http { url, status: 504, .. } => {
                Self::UpstreamMemoryLimit { endpoint: url }
            }
            TransportError::Http {
                url,
                status,
                message,
            } => Self::Other {
                endpoint: url,
                message: format!("HTTP {status}: {message}"),
            },
            TransportError::Decode { url, message } => Self::Other {
                endpoint: url,
                message,
            },
        }
    }
}

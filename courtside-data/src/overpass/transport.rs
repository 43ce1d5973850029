//! HTTP transport for Overpass interpreters.
//!
//! [`OverpassTransport`] is the seam between the retrying client and the
//! network. [`HttpOverpassTransport`] posts form-encoded queries with
//! `reqwest`; tests substitute
//! [`StubTransport`](super::test_support::StubTransport).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::error::TransportError;
use super::query::OverpassQuery;
use super::response::OverpassResponse;
use crate::config::{EndpointUrl, IngestionConfig};

/// Errors that can occur when constructing [`HttpOverpassTransport`].
#[derive(Debug, thiserror::Error)]
pub enum TransportBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Sends one Overpass query to one endpoint.
///
/// Implementations perform a single attempt. Retries, deadlines and endpoint
/// health are handled by [`super::OverpassClient`].
#[async_trait]
pub trait OverpassTransport: Send + Sync {
    /// Post `query` to `endpoint` and decode the response.
    async fn execute(
        &self,
        endpoint: &EndpointUrl,
        query: &OverpassQuery,
    ) -> Result<OverpassResponse, TransportError>;
}

/// `reqwest`-backed transport.
///
/// The query is sent as `application/x-www-form-urlencoded` with a single
/// `data` field, as Overpass interpreters expect.
#[derive(Debug, Clone)]
pub struct HttpOverpassTransport {
    client: Client,
}

impl HttpOverpassTransport {
    /// Build a transport identifying itself with `user_agent`.
    ///
    /// `timeout` bounds connection set-up and the whole exchange; the client
    /// applies its own deadline on top.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, TransportBuildError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(TransportBuildError::HttpClient)?;
        Ok(Self { client })
    }

    /// Build a transport from pipeline configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: &IngestionConfig) -> Result<Self, TransportBuildError> {
        Self::new(&config.user_agent, config.request_timeout)
    }
}

#[async_trait]
impl OverpassTransport for HttpOverpassTransport {
    async fn execute(
        &self,
        endpoint: &EndpointUrl,
        query: &OverpassQuery,
    ) -> Result<OverpassResponse, TransportError> {
        let url = endpoint.as_str();
        let response = self
            .client
            .post(url)
            .form(&[("data", query.as_str())])
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err, url))?
            .error_for_status()
            .map_err(|err| convert_reqwest_error(&err, url))?;

        response
            .json::<OverpassResponse>()
            .await
            .map_err(|err| TransportError::Decode {
                url: url.to_owned(),
                message: err.to_string(),
            })
    }
}

/// Convert a reqwest error to a [`TransportError`].
fn convert_reqwest_error(error: &reqwest::Error, url: &str) -> TransportError {
    if error.is_timeout() {
        return TransportError::Timeout {
            url: url.to_owned(),
        };
    }

    if let Some(status) = error.status() {
        return TransportError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }

    TransportError::Network {
        url: url.to_owned(),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn builds_from_default_config() {
        let transport = HttpOverpassTransport::from_config(&IngestionConfig::default());
        assert!(transport.is_ok());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_network_error() {
        let transport =
            HttpOverpassTransport::new("courtside-test/0.1", Duration::from_secs(2))
                .expect("transport builds");
        // Port 9 (discard) on loopback is closed in test environments.
        let endpoint = EndpointUrl::parse("http://127.0.0.1:9/api/interpreter")
            .expect("endpoint parses");

        let err = transport
            .execute(&endpoint, &OverpassQuery::liveness())
            .await
            .expect_err("nothing listens on the discard port");

        assert!(
            matches!(err, TransportError::Network { .. } | TransportError::Timeout { .. }),
            "unexpected error {err:?}"
        );
    }
}

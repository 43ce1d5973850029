//! Test utilities for the Overpass client.
//!
//! [`StubTransport`] is a scripted [`OverpassTransport`] that never touches
//! the network. Each query call consumes the next scripted reply; once the
//! script runs out the fallback reply is used. Liveness probes never consume
//! the script and succeed unless the endpoint has been taken down.

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::error::TransportError;
use super::query::OverpassQuery;
use super::response::{OverpassResponse, RawElement};
use super::transport::OverpassTransport;
use crate::config::EndpointUrl;

/// One scripted transport outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum StubReply {
    /// Successful response carrying these elements.
    Elements(Vec<RawElement>),
    /// Successful response with no elements and this remark.
    Remark(String),
    /// Non-success HTTP status.
    Status(u16),
    /// Connection failure.
    Unreachable,
    /// Never answers; exercises the client deadline.
    Stall,
}

/// A call observed by [`StubTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubCall {
    pub endpoint: EndpointUrl,
    pub query: OverpassQuery,
}

impl StubCall {
    /// Whether the call was a liveness probe.
    #[must_use]
    pub fn is_probe(&self) -> bool {
        self.query == OverpassQuery::liveness()
    }
}

/// Scripted `OverpassTransport` for tests.
///
/// # Example
///
/// ```
/// use courtside_data::overpass::test_support::{StubReply, StubTransport};
///
/// let transport = StubTransport::new()
///     .then(StubReply::Status(429))
///     .then(StubReply::Elements(Vec::new()));
/// assert!(transport.calls().is_empty());
/// ```
#[derive(Debug)]
pub struct StubTransport {
    script: Mutex<VecDeque<StubReply>>,
    fallback: StubReply,
    down: Mutex<HashSet<EndpointUrl>>,
    calls: Mutex<Vec<StubCall>>,
}

impl Default for StubTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl StubTransport {
    /// Transport answering every query with an empty element list.
    #[must_use]
    pub fn new() -> Self {
        Self::with_fallback(StubReply::Elements(Vec::new()))
    }

    /// Transport answering every unscripted query with `elements`.
    #[must_use]
    pub fn with_elements(elements: Vec<RawElement>) -> Self {
        Self::with_fallback(StubReply::Elements(elements))
    }

    /// Transport answering every unscripted query with `reply`.
    #[must_use]
    pub fn with_fallback(reply: StubReply) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: reply,
            down: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Append `reply` to the script.
    #[must_use]
    pub fn then(self, reply: StubReply) -> Self {
        lock(&self.script).push_back(reply);
        self
    }

    /// Make every call to `endpoint` fail as unreachable, probes included.
    pub fn take_down(&self, endpoint: &EndpointUrl) {
        lock(&self.down).insert(endpoint.clone());
    }

    /// Let calls to `endpoint` through again.
    pub fn bring_up(&self, endpoint: &EndpointUrl) {
        lock(&self.down).remove(endpoint);
    }

    /// Every call observed so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<StubCall> {
        lock(&self.calls).clone()
    }

    /// Endpoints that received search queries, in order. Probes are excluded.
    #[must_use]
    pub fn queried_endpoints(&self) -> Vec<EndpointUrl> {
        lock(&self.calls)
            .iter()
            .filter(|call| !call.is_probe())
            .map(|call| call.endpoint.clone())
            .collect()
    }

    fn next_reply(&self) -> StubReply {
        lock(&self.script)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl OverpassTransport for StubTransport {
    async fn execute(
        &self,
        endpoint: &EndpointUrl,
        query: &OverpassQuery,
    ) -> Result<OverpassResponse, TransportError> {
        let call = StubCall {
            endpoint: endpoint.clone(),
            query: query.clone(),
        };
        let probe = call.is_probe();
        lock(&self.calls).push(call);

        let url = endpoint.to_string();
        if lock(&self.down).contains(endpoint) {
            return Err(TransportError::Network {
                url,
                message: "connection refused".to_owned(),
            });
        }
        if probe {
            return Ok(OverpassResponse::default());
        }

        match self.next_reply() {
            StubReply::Elements(elements) => Ok(OverpassResponse::with_elements(elements)),
            StubReply::Remark(remark) => Ok(OverpassResponse {
                elements: Vec::new(),
                remark: Some(remark),
            }),
            StubReply::Status(status) => Err(TransportError::Http {
                url,
                status,
                message: format!("stub status {status}"),
            }),
            StubReply::Unreachable => Err(TransportError::Network {
                url,
                message: "connection refused".to_owned(),
            }),
            StubReply::Stall => std::future::pending().await,
        }
    }
}

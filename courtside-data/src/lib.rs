//! Data access and ingestion logic for the Courtside engine.
//!
//! Responsibilities:
//! - Query Overpass interpreters for sports facilities around a point.
//! - Track endpoint health, rate-limit requests and retry failures.
//! - Normalise raw OSM elements into [`courtside_core::FacilityRecord`]s.
//! - Cache results per bounding box and hand records to a
//!   [`courtside_core::FacilityStore`].
//!
//! Boundaries:
//! - Do not encode domain rules (live in `courtside-core`).
//! - Keep blocking I/O off async executors; prefer async-capable clients.
//!
//! Invariants:
//! - Thread-safe by default; locks are never held across `.await`.
//! - No global mutable state.

pub mod cache;
pub mod config;
pub mod geocode;
pub mod import;
pub mod normalize;
pub mod overpass;
pub mod pipeline;

#[doc(hidden)]
pub mod test_support;

pub use cache::{CacheKey, ResultCache};
pub use config::{ConfigError, EndpointUrl, IngestionConfig, SportProfile};
pub use geocode::Geocoder;
pub use import::{ImportOutcome, import_facilities};
pub use normalize::normalize;
pub use overpass::{EndpointStatus, Metrics, QueryError, build_query};
pub use pipeline::IngestionPipeline;

//! Address geocoding port.
//!
//! Geocoding happens upstream of bounds calculation. A miss is not an error:
//! [`crate::IngestionPipeline::search_address`] returns no facilities and
//! issues no query.

use async_trait::async_trait;
use geo::Coord;

/// Resolves a free-text address to a position.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Position of `address` (`x = longitude`, `y = latitude`), or `None`
    /// when the address cannot be resolved.
    async fn geocode(&self, address: &str) -> Option<Coord<f64>>;
}

//! Test doubles for the ports this crate consumes.
//!
//! The Overpass transport double lives in
//! [`crate::overpass::test_support`].

use std::collections::HashMap;

use async_trait::async_trait;
use geo::Coord;

use crate::geocode::Geocoder;

/// Geocoder backed by a fixed lookup table.
///
/// Lookups ignore surrounding whitespace and ASCII case.
///
/// # Examples
///
/// ```
/// use courtside_data::Geocoder;
/// use courtside_data::test_support::StaticGeocoder;
/// use geo::Coord;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let geocoder = StaticGeocoder::new([("Murfreesboro, TN", Coord { x: -86.3903, y: 35.8456 })]);
/// assert!(geocoder.geocode("murfreesboro, tn").await.is_some());
/// assert!(geocoder.geocode("Atlantis").await.is_none());
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    entries: HashMap<String, Coord<f64>>,
}

fn normalise_address(address: &str) -> String {
    address.trim().to_ascii_lowercase()
}

impl StaticGeocoder {
    /// Build a geocoder that knows `entries`.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Coord<f64>)>,
        S: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(address, location)| (normalise_address(address.as_ref()), location))
                .collect(),
        }
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, address: &str) -> Option<Coord<f64>> {
        self.entries.get(&normalise_address(address)).copied()
    }
}

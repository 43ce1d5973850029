//! Canonical, storage-ready representation of a sports facility.

use geo::Coord;

/// Provenance marker attached to every record produced by the ingestion
/// pipeline.
pub const EXTERNAL_IMPORT_SOURCE: &str = "external-import";

/// Placeholder name for facilities without a `name` tag.
pub const UNNAMED_FACILITY: &str = "Unnamed Sports Facility";

/// Placeholder address for facilities without a street tag.
pub const ADDRESS_NOT_AVAILABLE: &str = "Address not available";

/// On-site amenities reported by the upstream tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Amenities {
    /// Courts are floodlit (`lit=yes`).
    pub lights_available: bool,
    /// Toilets on site (`toilets=yes`).
    pub restrooms_available: bool,
    /// Drinking water on site (`drinking_water=yes`).
    pub water_fountain: bool,
}

/// A normalised facility ready for persistence.
///
/// `location` uses `x = longitude` and `y = latitude`; it serialises as a
/// `[lon, lat]` pair under the `coordinates` key.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use courtside_core::{EXTERNAL_IMPORT_SOURCE, FacilityRecord};
///
/// let record = FacilityRecord::external("Riverside Courts", Coord { x: -86.6, y: 35.9 });
/// assert_eq!(record.source, EXTERNAL_IMPORT_SOURCE);
/// assert!(!record.verified);
/// assert_eq!(record.number_of_courts, 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct FacilityRecord {
    /// Display name.
    pub name: String,
    /// `"{housenumber} {street}"` or [`ADDRESS_NOT_AVAILABLE`].
    pub address: String,
    /// State or region, empty when unknown.
    pub state: String,
    /// Postal code, empty when unknown.
    pub zip_code: String,
    /// Indoor facility.
    pub indoor: bool,
    /// Number of courts; at least one.
    pub number_of_courts: u32,
    /// On-site amenities.
    pub amenities: Amenities,
    /// WGS84 position.
    #[cfg_attr(feature = "serde", serde(rename = "coordinates", with = "lon_lat"))]
    pub location: Coord<f64>,
    /// Whether an administrator has verified the record.
    pub verified: bool,
    /// Provenance marker.
    pub source: String,
}

impl FacilityRecord {
    /// Construct an unverified externally imported record with default
    /// attributes.
    #[must_use]
    pub fn external(name: impl Into<String>, location: Coord<f64>) -> Self {
        Self {
            name: name.into(),
            address: ADDRESS_NOT_AVAILABLE.to_owned(),
            state: String::new(),
            zip_code: String::new(),
            indoor: false,
            number_of_courts: 1,
            amenities: Amenities::default(),
            location,
            verified: false,
            source: EXTERNAL_IMPORT_SOURCE.to_owned(),
        }
    }

    /// Position as a `(longitude, latitude)` pair.
    #[must_use]
    pub const fn coordinates(&self) -> (f64, f64) {
        (self.location.x, self.location.y)
    }
}

#[cfg(feature = "serde")]
mod lon_lat {
    use geo::Coord;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub(super) fn serialize<S>(location: &Coord<f64>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [location.x, location.y].serialize(serializer)
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Coord<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [x, y] = <[f64; 2]>::deserialize(deserializer)?;
        Ok(Coord { x, y })
    }
}

//! Search-area bounding boxes derived from a centre point and a radius.
//!
//! Coordinates follow the WGS84 convention used across the workspace: the
//! box is axis-aligned in latitude/longitude space and never crosses the
//! antimeridian. Edges are clamped into the valid coordinate ranges.

use geo::{Coord, Rect};
use thiserror::Error;

/// Kilometres spanned by one degree of latitude.
pub const KM_PER_DEGREE: f64 = 111.32;

const MAX_LAT: f64 = 90.0;
const MAX_LON: f64 = 180.0;

/// Rejected inputs for [`calculate_bounds`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundsError {
    /// Latitude was outside `[-90, 90]` or not a number.
    #[error("latitude {lat} must be a finite value within [-90, 90]")]
    InvalidLatitude {
        /// Rejected latitude.
        lat: f64,
    },
    /// Longitude was outside `[-180, 180]` or not a number.
    #[error("longitude {lng} must be a finite value within [-180, 180]")]
    InvalidLongitude {
        /// Rejected longitude.
        lng: f64,
    },
    /// Radius was zero, negative or not a number.
    #[error("radius {radius_km} km must be a finite positive value")]
    InvalidRadius {
        /// Rejected radius in kilometres.
        radius_km: f64,
    },
}

/// Rectangular latitude/longitude region used to scope a spatial query.
///
/// Invariants: all edges are finite, `min_lat < max_lat`, `min_lon <
/// max_lon`, latitudes lie within `[-90, 90]` and longitudes within
/// `[-180, 180]`. Field order is significant: it fixes the serialised
/// layout used for cache keys.
///
/// # Examples
/// ```
/// use courtside_core::calculate_bounds;
///
/// let bounds = calculate_bounds(51.5, -0.1, 5.0)?;
/// assert!(bounds.min_lat() < bounds.max_lat());
/// assert!(bounds.min_lon() < bounds.max_lon());
/// # Ok::<(), courtside_core::BoundsError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct BoundingBox {
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
}

impl BoundingBox {
    /// Southern edge in degrees.
    #[must_use]
    pub const fn min_lat(&self) -> f64 {
        self.min_lat
    }

    /// Northern edge in degrees.
    #[must_use]
    pub const fn max_lat(&self) -> f64 {
        self.max_lat
    }

    /// Western edge in degrees.
    #[must_use]
    pub const fn min_lon(&self) -> f64 {
        self.min_lon
    }

    /// Eastern edge in degrees.
    #[must_use]
    pub const fn max_lon(&self) -> f64 {
        self.max_lon
    }

    /// Latitude span in degrees.
    #[must_use]
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Longitude span in degrees.
    #[must_use]
    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// The box as a `geo` rectangle with `x = longitude`, `y = latitude`.
    #[must_use]
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            Coord {
                x: self.min_lon,
                y: self.min_lat,
            },
            Coord {
                x: self.max_lon,
                y: self.max_lat,
            },
        )
    }

    /// Returns true when `location` (`x = longitude`) lies inside the box.
    /// Boundary points count as inside.
    #[must_use]
    pub fn contains(&self, location: Coord<f64>) -> bool {
        (self.min_lon..=self.max_lon).contains(&location.x)
            && (self.min_lat..=self.max_lat).contains(&location.y)
    }
}

/// Compute the search box around `(lat, lng)` covering `radius_km`.
///
/// The latitude delta is `radius_km / 111.32`; the longitude delta widens
/// with latitude as `radius_km / (111.32 · cos(lat))`. Near the poles the
/// longitude span degenerates to the full `[-180, 180]` range.
///
/// # Errors
/// Returns [`BoundsError`] when any argument is NaN, infinite or out of
/// range, or when the radius is not positive.
///
/// # Examples
/// ```
/// use courtside_core::calculate_bounds;
///
/// let bounds = calculate_bounds(35.9523, -86.6694, 10.0)?;
/// assert!((bounds.lat_span() - 0.1797).abs() < 1.0e-4);
/// # Ok::<(), courtside_core::BoundsError>(())
/// ```
pub fn calculate_bounds(lat: f64, lng: f64, radius_km: f64) -> Result<BoundingBox, BoundsError> {
    if !lat.is_finite() || !(-MAX_LAT..=MAX_LAT).contains(&lat) {
        return Err(BoundsError::InvalidLatitude { lat });
    }
    if !lng.is_finite() || !(-MAX_LON..=MAX_LON).contains(&lng) {
        return Err(BoundsError::InvalidLongitude { lng });
    }
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(BoundsError::InvalidRadius { radius_km });
    }

    let lat_delta = radius_km / KM_PER_DEGREE;
    let lng_delta = radius_km / (KM_PER_DEGREE * lat.to_radians().cos());

    let (min_lon, max_lon) = if lng_delta.is_finite() && lng_delta > 0.0 {
        (
            (lng - lng_delta).max(-MAX_LON),
            (lng + lng_delta).min(MAX_LON),
        )
    } else {
        (-MAX_LON, MAX_LON)
    };

    Ok(BoundingBox {
        min_lat: (lat - lat_delta).max(-MAX_LAT),
        max_lat: (lat + lat_delta).min(MAX_LAT),
        min_lon,
        max_lon,
    })
}

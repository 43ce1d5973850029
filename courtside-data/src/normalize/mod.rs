//! Conversion of raw Overpass elements into facility records.
//!
//! Normalisation is total: elements that do not describe a facility are
//! dropped and tags that are missing or malformed fall back to defaults.
//! Node-derived records come first, followed by way-derived records, each
//! group in input order.
//!
//! Node coordinates are copied as given, except that a node outside WGS84
//! range (or with a non-finite coordinate) is dropped, both as a record and
//! as a way member. Such a record could not be stored anyway.

mod classify;
mod record;

use std::collections::HashMap;

use courtside_core::FacilityRecord;
use geo::{Centroid, Coord, MultiPoint, Point};
use log::debug;

use crate::config::SportProfile;
use crate::overpass::RawElement;

use classify::is_candidate;
use record::build_record;

/// Normalise `elements` into facility records for `sport`.
///
/// Ways are located at the centroid of the constituent nodes present in the
/// same response. Unresolvable node references are skipped; a way with none
/// resolvable is dropped.
///
/// # Examples
///
/// ```
/// use courtside_data::overpass::{ElementTags, RawElement};
/// use courtside_data::{SportProfile, normalize};
///
/// let elements = vec![RawElement::Node {
///     id: 1,
///     lat: 36.1,
///     lon: -86.7,
///     tags: ElementTags { sport: Some("pickleball".into()), ..ElementTags::default() },
/// }];
/// let records = normalize(&elements, &SportProfile::default());
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].coordinates(), (-86.7, 36.1));
/// ```
#[must_use]
pub fn normalize(elements: &[RawElement], sport: &SportProfile) -> Vec<FacilityRecord> {
    let nodes = index_nodes(elements);

    let mut node_records = Vec::new();
    let mut way_records = Vec::new();
    for element in elements {
        match element {
            RawElement::Node { id, lat, lon, tags } => {
                if !is_candidate(tags, sport) {
                    continue;
                }
                if let Some(location) = validated_coord(*lon, *lat) {
                    node_records.push(build_record(tags, location));
                } else {
                    debug!("skipping node {id} with invalid coordinates");
                }
            }
            RawElement::Way { id, node_ids, tags } => {
                if !is_candidate(tags, sport) {
                    continue;
                }
                if let Some(location) = way_centroid(node_ids, &nodes) {
                    way_records.push(build_record(tags, location));
                } else {
                    debug!("dropping way {id}: none of its nodes were returned");
                }
            }
            RawElement::Other => {}
        }
    }

    node_records.extend(way_records);
    node_records
}

fn index_nodes(elements: &[RawElement]) -> HashMap<i64, Coord<f64>> {
    elements
        .iter()
        .filter_map(|element| match element {
            RawElement::Node { id, lat, lon, .. } => {
                validated_coord(*lon, *lat).map(|location| (*id, location))
            }
            _ => None,
        })
        .collect()
}

fn way_centroid(node_ids: &[i64], nodes: &HashMap<i64, Coord<f64>>) -> Option<Coord<f64>> {
    let points: Vec<Point<f64>> = node_ids
        .iter()
        .filter_map(|id| nodes.get(id))
        .map(|coord| Point::from(*coord))
        .collect();
    MultiPoint::new(points).centroid().map(Coord::from)
}

fn validated_coord(lon: f64, lat: f64) -> Option<Coord<f64>> {
    let valid = lon.is_finite()
        && lat.is_finite()
        && (-180.0..=180.0).contains(&lon)
        && (-90.0..=90.0).contains(&lat);
    valid.then_some(Coord { x: lon, y: lat })
}

#[cfg(test)]
mod tests;

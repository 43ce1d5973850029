//! Unit tests for normalisation.

use super::*;
use crate::overpass::ElementTags;
use rstest::rstest;

fn node(id: i64, lat: f64, lon: f64, tags: ElementTags) -> RawElement {
    RawElement::Node { id, lat, lon, tags }
}

fn bare(id: i64, lat: f64, lon: f64) -> RawElement {
    node(id, lat, lon, ElementTags::default())
}

fn named(name: &str) -> ElementTags {
    ElementTags {
        name: Some(name.to_owned()),
        ..ElementTags::default()
    }
}

fn pitch() -> ElementTags {
    ElementTags {
        leisure: Some("pitch".to_owned()),
        ..ElementTags::default()
    }
}

fn assert_close(actual: f64, expected: f64) {
    let delta = (actual - expected).abs();
    assert!(delta <= 1.0e-3, "expected {expected}, got {actual}");
}

#[rstest]
fn tagged_node_without_address_uses_defaults() {
    let tags = ElementTags {
        name: Some("Central Park Pickleball".to_owned()),
        sport: Some("pickleball".to_owned()),
        ..ElementTags::default()
    };

    let records = normalize(&[node(1, 36.1, -86.7, tags)], &SportProfile::default());

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.address, "Address not available");
    assert!(!record.indoor);
    assert_eq!(record.number_of_courts, 1);
    assert_eq!(record.coordinates(), (-86.7, 36.1));
}

#[rstest]
fn way_is_located_at_node_centroid() {
    let elements = vec![
        bare(1, 10.0, 10.0),
        bare(2, 10.0, 12.0),
        bare(3, 12.0, 11.0),
        RawElement::Way {
            id: 10,
            node_ids: vec![1, 2, 3],
            tags: pitch(),
        },
    ];

    let records = normalize(&elements, &SportProfile::default());

    assert_eq!(records.len(), 1, "untagged constituent nodes are not facilities");
    let (lon, lat) = records[0].coordinates();
    assert_close(lon, 11.0);
    assert_close(lat, 10.667);
}

#[rstest]
fn unresolved_way_nodes_are_skipped() {
    let elements = vec![
        bare(1, 10.0, 10.0),
        bare(2, 12.0, 12.0),
        RawElement::Way {
            id: 10,
            node_ids: vec![1, 99, 2],
            tags: pitch(),
        },
    ];

    let records = normalize(&elements, &SportProfile::default());

    let (lon, lat) = records[0].coordinates();
    assert_close(lon, 11.0);
    assert_close(lat, 11.0);
}

#[rstest]
fn way_without_resolvable_nodes_is_dropped() {
    let elements = vec![RawElement::Way {
        id: 10,
        node_ids: vec![7, 8],
        tags: pitch(),
    }];

    assert!(normalize(&elements, &SportProfile::default()).is_empty());
}

#[rstest]
fn non_qualifying_elements_are_dropped() {
    let elements = vec![
        node(1, 36.0, -86.0, named("Eastside Pickleball")),
        node(2, 36.1, -86.1, named("Corner Bakery")),
        node(3, 36.2, -86.2, named("Westside Courts")),
    ];

    let records = normalize(&elements, &SportProfile::default());

    let names: Vec<&str> = records.iter().map(|record| record.name.as_str()).collect();
    assert_eq!(names, vec!["Eastside Pickleball", "Westside Courts"]);
}

#[rstest]
fn node_records_precede_way_records() {
    let elements = vec![
        bare(1, 10.0, 10.0),
        RawElement::Way {
            id: 10,
            node_ids: vec![1],
            tags: named("Way Courts"),
        },
        node(2, 20.0, 20.0, named("Node Courts")),
        RawElement::Other,
    ];

    let records = normalize(&elements, &SportProfile::default());

    let names: Vec<&str> = records.iter().map(|record| record.name.as_str()).collect();
    assert_eq!(names, vec!["Node Courts", "Way Courts"]);
}

#[rstest]
#[case(f64::NAN, 10.0)]
#[case(10.0, f64::INFINITY)]
#[case(95.0, 10.0)]
#[case(10.0, 190.0)]
fn nodes_with_invalid_coordinates_are_skipped(#[case] lat: f64, #[case] lon: f64) {
    let records = normalize(&[node(1, lat, lon, pitch())], &SportProfile::default());
    assert!(records.is_empty());
}

#[rstest]
#[case(90.0, 180.0)]
#[case(-90.0, -180.0)]
#[case(35.123_456_789, -86.987_654_321)]
fn in_range_node_coordinates_are_copied_verbatim(#[case] lat: f64, #[case] lon: f64) {
    let records = normalize(&[node(1, lat, lon, pitch())], &SportProfile::default());
    assert_eq!(records[0].coordinates(), (lon, lat));
}

#[rstest]
fn out_of_range_way_members_are_ignored() {
    let elements = vec![
        bare(1, 10.0, 10.0),
        bare(2, 95.0, 10.0),
        bare(3, 12.0, 12.0),
        RawElement::Way {
            id: 10,
            node_ids: vec![1, 2, 3],
            tags: pitch(),
        },
    ];

    let records = normalize(&elements, &SportProfile::default());

    let (lon, lat) = records[0].coordinates();
    assert_close(lon, 11.0);
    assert_close(lat, 11.0);
}

#[rstest]
fn sport_profile_controls_matching() {
    let tags = ElementTags {
        sport: Some("padel".to_owned()),
        ..ElementTags::default()
    };
    let elements = [node(1, 40.4, -3.7, tags)];

    let padel = SportProfile::new("padel").expect("valid sport");
    assert_eq!(normalize(&elements, &padel).len(), 1);
    assert!(normalize(&elements, &SportProfile::default()).is_empty());
}

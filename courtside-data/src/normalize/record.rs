//! Facility record extraction from tags.

use courtside_core::{ADDRESS_NOT_AVAILABLE, Amenities, FacilityRecord, UNNAMED_FACILITY};
use geo::Coord;

use crate::overpass::ElementTags;

/// Build a facility record at `location` from `tags`.
///
/// Missing or malformed tags never fail; each field falls back to its
/// default instead.
pub(crate) fn build_record(tags: &ElementTags, location: Coord<f64>) -> FacilityRecord {
    let mut record = FacilityRecord::external(
        tags.name.clone().unwrap_or_else(|| UNNAMED_FACILITY.to_owned()),
        location,
    );
    record.address = format_address(tags);
    record.state = tags.state.clone().unwrap_or_default();
    record.zip_code = tags.postcode.clone().unwrap_or_default();
    record.indoor = is_yes(tags.indoor.as_deref());
    record.number_of_courts = parse_courts(tags.courts.as_deref());
    record.amenities = Amenities {
        lights_available: is_yes(tags.lit.as_deref()),
        restrooms_available: is_yes(tags.toilets.as_deref()),
        water_fountain: is_yes(tags.drinking_water.as_deref()),
    };
    record
}

fn format_address(tags: &ElementTags) -> String {
    match tags.street.as_deref() {
        Some(street) => {
            let number = tags.housenumber.as_deref().unwrap_or_default();
            format!("{number} {street}").trim().to_owned()
        }
        None => ADDRESS_NOT_AVAILABLE.to_owned(),
    }
}

fn is_yes(value: Option<&str>) -> bool {
    value == Some("yes")
}

fn parse_courts(value: Option<&str>) -> u32 {
    value
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .filter(|count| *count > 0)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtside_core::EXTERNAL_IMPORT_SOURCE;
    use rstest::rstest;

    const HERE: Coord<f64> = Coord { x: -86.7, y: 36.1 };

    #[rstest]
    fn sparse_tags_use_defaults() {
        let tags = ElementTags {
            name: Some("Central Park Pickleball".into()),
            sport: Some("pickleball".into()),
            ..ElementTags::default()
        };

        let record = build_record(&tags, HERE);

        assert_eq!(record.name, "Central Park Pickleball");
        assert_eq!(record.address, "Address not available");
        assert_eq!(record.state, "");
        assert_eq!(record.zip_code, "");
        assert!(!record.indoor);
        assert_eq!(record.number_of_courts, 1);
        assert_eq!(record.amenities, Amenities::default());
        assert_eq!(record.location, HERE);
        assert!(!record.verified);
        assert_eq!(record.source, EXTERNAL_IMPORT_SOURCE);
    }

    #[rstest]
    fn full_tags_are_extracted() {
        let tags = ElementTags {
            housenumber: Some("12".into()),
            street: Some("Main Street".into()),
            state: Some("TN".into()),
            postcode: Some("37130".into()),
            indoor: Some("yes".into()),
            courts: Some("6".into()),
            lit: Some("yes".into()),
            toilets: Some("yes".into()),
            drinking_water: Some("no".into()),
            ..ElementTags::default()
        };

        let record = build_record(&tags, HERE);

        assert_eq!(record.name, "Unnamed Sports Facility");
        assert_eq!(record.address, "12 Main Street");
        assert_eq!(record.state, "TN");
        assert_eq!(record.zip_code, "37130");
        assert!(record.indoor);
        assert_eq!(record.number_of_courts, 6);
        assert!(record.amenities.lights_available);
        assert!(record.amenities.restrooms_available);
        assert!(!record.amenities.water_fountain);
    }

    #[rstest]
    #[case(None, "Address not available")]
    #[case(Some("Main Street"), "Main Street")]
    fn address_without_house_number(#[case] street: Option<&str>, #[case] expected: &str) {
        let tags = ElementTags {
            street: street.map(str::to_owned),
            housenumber: None,
            ..ElementTags::default()
        };
        assert_eq!(format_address(&tags), expected);
    }

    #[rstest]
    #[case(Some("yes"), true)]
    #[case(Some("Yes"), false)]
    #[case(Some("true"), false)]
    #[case(None, false)]
    fn only_literal_yes_is_true(#[case] value: Option<&str>, #[case] expected: bool) {
        assert_eq!(is_yes(value), expected);
    }

    #[rstest]
    #[case(Some("4"), 4)]
    #[case(Some(" 2 "), 2)]
    #[case(Some("several"), 1)]
    #[case(Some("0"), 1)]
    #[case(Some("-3"), 1)]
    #[case(None, 1)]
    fn court_counts_default_to_one(#[case] value: Option<&str>, #[case] expected: u32) {
        assert_eq!(parse_courts(value), expected);
    }
}

//! Candidate-facility predicate.

use crate::config::SportProfile;
use crate::overpass::ElementTags;

/// `leisure` or `amenity` values that always denote a sports facility.
pub(crate) const FACILITY_CATEGORIES: [&str; 6] = [
    "sports_centre",
    "pitch",
    "stadium",
    "fitness_centre",
    "park",
    "community_centre",
];

/// Words that mark a facility when they appear in a name or description.
const GENERIC_KEYWORDS: [&str; 2] = ["tennis", "court"];

/// Whether `tags` describe a facility for `sport`.
///
/// Matches when the `sport` tag lists the sport, when the `leisure` or
/// `amenity` tag is a facility category, or when the name or description
/// mentions the sport, tennis or "court" in any case.
pub(crate) fn is_candidate(tags: &ElementTags, sport: &SportProfile) -> bool {
    tags_sport(tags, sport)
        || has_facility_category(tags)
        || mentions_keyword(tags.name.as_deref(), sport)
        || mentions_keyword(tags.description.as_deref(), sport)
}

fn tags_sport(tags: &ElementTags, sport: &SportProfile) -> bool {
    tags.sport.as_deref().is_some_and(|value| {
        value
            .split(';')
            .any(|entry| entry.trim().eq_ignore_ascii_case(sport.keyword()))
    })
}

fn has_facility_category(tags: &ElementTags) -> bool {
    [tags.leisure.as_deref(), tags.amenity.as_deref()]
        .into_iter()
        .flatten()
        .any(|category| FACILITY_CATEGORIES.contains(&category))
}

fn mentions_keyword(text: Option<&str>, sport: &SportProfile) -> bool {
    let Some(text) = text else {
        return false;
    };
    let lowered = text.to_lowercase();
    lowered.contains(sport.keyword())
        || GENERIC_KEYWORDS
            .iter()
            .any(|keyword| lowered.contains(keyword))
}

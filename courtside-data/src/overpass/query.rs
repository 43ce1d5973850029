//! Overpass QL generation for facility searches.

use std::fmt;

use courtside_core::BoundingBox;

use crate::config::SportProfile;

/// Server-side evaluation limit requested in the query header, in seconds.
pub const QUERY_TIMEOUT_SECS: u64 = 25;

/// `leisure` values selected regardless of name.
const LEISURE_CATEGORIES: &str = "sports_centre|pitch|fitness_centre|park";

/// An Overpass QL program ready to be posted to an interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OverpassQuery(String);

impl OverpassQuery {
    /// Wrap hand-written Overpass QL.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Minimal program used for liveness probes.
    ///
    /// It evaluates nothing and returns an empty element list.
    #[must_use]
    pub fn liveness() -> Self {
        Self("[out:json][timeout:5];out;".to_owned())
    }

    /// Borrow the query text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OverpassQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the facility search query for `bounds`.
///
/// The query selects nodes and ways that carry the sport tag, mention the
/// sport or the word "court" in their name or description, or belong to a
/// generic sports category. Constituent nodes of matched ways are recursed
/// into so way centroids can be computed locally.
///
/// Output is deterministic for identical inputs.
///
/// # Examples
///
/// ```
/// use courtside_core::calculate_bounds;
/// use courtside_data::{SportProfile, build_query};
///
/// let bounds = calculate_bounds(35.9523, -86.6694, 10.0)?;
/// let query = build_query(&bounds, &SportProfile::default());
/// assert!(query.as_str().starts_with("[out:json][timeout:25];"));
/// assert!(query.as_str().contains(r#"node["sport"="pickleball"]"#));
/// # Ok::<(), courtside_core::BoundsError>(())
/// ```
#[must_use]
pub fn build_query(bounds: &BoundingBox, sport: &SportProfile) -> OverpassQuery {
    let bbox = format!(
        "({:.7},{:.7},{:.7},{:.7})",
        bounds.min_lat(),
        bounds.min_lon(),
        bounds.max_lat(),
        bounds.max_lon()
    );
    let keyword = sport.keyword();
    let filters = [
        format!(r#"["sport"="{keyword}"]"#),
        format!(r#"["name"~"{keyword}|court",i]"#),
        format!(r#"["description"~"{keyword}|court",i]"#),
        format!(r#"["leisure"~"^({LEISURE_CATEGORIES})$"]"#),
        r#"["amenity"="community_centre"]"#.to_owned(),
    ];

    let statements: String = filters
        .iter()
        .flat_map(|filter| ["node", "way"].map(|kind| format!("  {kind}{filter}{bbox};\n")))
        .collect();
    OverpassQuery(format!(
        "[out:json][timeout:{QUERY_TIMEOUT_SECS}];\n(\n{statements});\n(._;>;);\nout body;"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtside_core::calculate_bounds;
    use rstest::{fixture, rstest};

    #[fixture]
    fn bounds() -> BoundingBox {
        calculate_bounds(35.9523, -86.6694, 10.0).expect("valid bounds")
    }

    #[rstest]
    fn query_is_deterministic(bounds: BoundingBox) {
        let sport = SportProfile::default();
        assert_eq!(build_query(&bounds, &sport), build_query(&bounds, &sport));
    }

    #[rstest]
    fn bbox_uses_south_west_north_east_order(bounds: BoundingBox) {
        let query = build_query(&bounds, &SportProfile::default());
        let expected = format!(
            "({:.7},{:.7},{:.7},{:.7})",
            bounds.min_lat(),
            bounds.min_lon(),
            bounds.max_lat(),
            bounds.max_lon()
        );
        assert_eq!(query.as_str().matches(&expected).count(), 10);
        assert!(expected.starts_with("(35.8624"), "{expected}");
    }

    #[rstest]
    fn selects_every_facility_category(bounds: BoundingBox) {
        let query = build_query(&bounds, &SportProfile::new("tennis").expect("valid sport"));
        let text = query.as_str();
        for fragment in [
            r#"node["sport"="tennis"]"#,
            r#"way["sport"="tennis"]"#,
            r#"node["name"~"tennis|court",i]"#,
            r#"way["description"~"tennis|court",i]"#,
            r#"way["leisure"~"^(sports_centre|pitch|fitness_centre|park)$"]"#,
            r#"node["amenity"="community_centre"]"#,
        ] {
            assert!(text.contains(fragment), "missing {fragment} in {text}");
        }
    }

    #[rstest]
    fn emits_node_then_way_statement_per_filter(bounds: BoundingBox) {
        let query = build_query(&bounds, &SportProfile::default());
        let lines: Vec<&str> = query.as_str().lines().collect();

        assert_eq!(lines.len(), 15);
        assert_eq!(lines[0], "[out:json][timeout:25];");
        assert_eq!(lines[1], "(");
        assert!(lines[2].starts_with(r#"  node["sport"="pickleball"]("#), "{}", lines[2]);
        assert!(lines[3].starts_with(r#"  way["sport"="pickleball"]("#), "{}", lines[3]);
        assert!(lines[11].starts_with(r#"  way["amenity"="community_centre"]("#));
        assert!(lines[2..12].iter().all(|line| line.ends_with(");")));
        assert_eq!(lines[12], ");");
    }

    #[rstest]
    fn recurses_into_way_nodes(bounds: BoundingBox) {
        let query = build_query(&bounds, &SportProfile::default());
        assert!(query.as_str().ends_with("(._;>;);\nout body;"));
    }

    #[rstest]
    fn liveness_probe_is_minimal() {
        assert_eq!(OverpassQuery::liveness().as_str(), "[out:json][timeout:5];out;");
    }
}

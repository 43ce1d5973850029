//! Overpass JSON response types.
//!
//! Only the fields the normaliser reads are modelled. Tags are decoded into
//! [`ElementTags`], a fixed record of optional strings, and every other tag is
//! ignored.
//!
//! See: <https://wiki.openstreetmap.org/wiki/Overpass_API/Overpass_QL#JSON>

use serde::Deserialize;

/// Top-level Overpass response document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OverpassResponse {
    /// Elements matched by the query, in server order.
    #[serde(default)]
    pub elements: Vec<RawElement>,
    /// Diagnostic emitted when evaluation stopped early, e.g. on memory
    /// exhaustion.
    #[serde(default)]
    pub remark: Option<String>,
}

impl OverpassResponse {
    /// Response carrying `elements` and no remark.
    #[must_use]
    pub fn with_elements(elements: Vec<RawElement>) -> Self {
        Self {
            elements,
            remark: None,
        }
    }

    /// Whether the remark reports that the server ran out of memory.
    #[must_use]
    pub fn reports_memory_exhaustion(&self) -> bool {
        self.remark
            .as_deref()
            .is_some_and(|remark| remark.to_ascii_lowercase().contains("out of memory"))
    }
}

/// One element of an Overpass response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RawElement {
    /// A point with coordinates.
    Node {
        id: i64,
        lat: f64,
        lon: f64,
        #[serde(default)]
        tags: ElementTags,
    },
    /// An ordered list of node references.
    Way {
        id: i64,
        #[serde(default, rename = "nodes")]
        node_ids: Vec<i64>,
        #[serde(default)]
        tags: ElementTags,
    },
    /// Relations and any other element kinds; ignored.
    #[serde(other)]
    Other,
}

/// Tags the normaliser understands.
///
/// Every field is optional; absent tags fall back to documented defaults
/// when a facility record is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ElementTags {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sport: Option<String>,
    pub leisure: Option<String>,
    pub amenity: Option<String>,
    #[serde(rename = "addr:housenumber")]
    pub housenumber: Option<String>,
    #[serde(rename = "addr:street")]
    pub street: Option<String>,
    #[serde(rename = "addr:state")]
    pub state: Option<String>,
    #[serde(rename = "addr:postcode")]
    pub postcode: Option<String>,
    pub indoor: Option<String>,
    /// Number of courts, as free text.
    pub courts: Option<String>,
    /// Floodlighting.
    pub lit: Option<String>,
    pub toilets: Option<String>,
    pub drinking_water: Option<String>,
}

//! Test helpers for parsing invocations and building stubbed pipelines.

use super::*;
use courtside_data::overpass::test_support::StubTransport;
use courtside_data::overpass::{ElementTags, RawElement};
use courtside_data::IngestionPipeline;

pub(super) const PRIMARY: &str = "http://primary.example/api/interpreter";
pub(super) const SECONDARY: &str = "http://secondary.example/api/interpreter";

pub(super) const MURFREESBORO: SearchArea = SearchArea {
    lat: 35.9523,
    lng: -86.6694,
    radius_km: 10.0,
};

/// Parse `args` as they would appear after the binary name.
pub(super) fn parse_command(args: &[&str]) -> Result<Command, CliError> {
    let invocation = std::iter::once("courtside").chain(args.iter().copied());
    Cli::try_parse_from(invocation)
        .map(|cli| cli.command)
        .map_err(CliError::ArgumentParsing)
}

pub(super) fn court(id: i64, name: &str, lat: f64, lon: f64) -> RawElement {
    RawElement::Node {
        id,
        lat,
        lon,
        tags: ElementTags {
            name: Some(name.to_owned()),
            sport: Some("pickleball".to_owned()),
            ..ElementTags::default()
        },
    }
}

pub(super) fn bakery(id: i64) -> RawElement {
    RawElement::Node {
        id,
        lat: 35.95,
        lon: -86.66,
        tags: ElementTags {
            name: Some("Main Street Bakery".to_owned()),
            ..ElementTags::default()
        },
    }
}

pub(super) fn stub_pipeline(transport: StubTransport) -> IngestionPipeline<StubTransport> {
    let config = IngestionConfig::default()
        .with_endpoints([PRIMARY, SECONDARY])
        .expect("endpoints parse");
    IngestionPipeline::with_transport(config, transport)
}

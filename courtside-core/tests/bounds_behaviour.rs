//! Behavioural tests for `calculate_bounds`.

use courtside_core::{BoundingBox, BoundsError, calculate_bounds};
use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::{Cell, RefCell};

type BoundsResultCell = RefCell<Option<Result<BoundingBox, BoundsError>>>;

const MURFREESBORO: (f64, f64) = (35.9523, -86.6694);

#[fixture]
fn centre() -> Cell<(f64, f64, f64)> {
    Cell::new((0.0, 0.0, 1.0))
}

#[fixture]
fn result() -> BoundsResultCell {
    RefCell::new(None)
}

fn expect_bounds(result: &BoundsResultCell) -> BoundingBox {
    result
        .borrow()
        .as_ref()
        .expect("bounds were calculated")
        .as_ref()
        .copied()
        .expect("expected valid bounds")
}

#[given("a centre in Murfreesboro with a 10 km radius")]
fn murfreesboro(#[from(centre)] centre: &Cell<(f64, f64, f64)>) {
    centre.set((MURFREESBORO.0, MURFREESBORO.1, 10.0));
}

#[given("a centre at latitude 91")]
fn beyond_the_pole(#[from(centre)] centre: &Cell<(f64, f64, f64)>) {
    centre.set((91.0, 0.0, 10.0));
}

#[given("a centre in Murfreesboro with a zero radius")]
fn zero_radius(#[from(centre)] centre: &Cell<(f64, f64, f64)>) {
    centre.set((MURFREESBORO.0, MURFREESBORO.1, 0.0));
}

#[when("I calculate the bounds")]
fn calculate(
    #[from(centre)] centre: &Cell<(f64, f64, f64)>,
    #[from(result)] result: &BoundsResultCell,
) {
    let (lat, lng, radius) = centre.get();
    *result.borrow_mut() = Some(calculate_bounds(lat, lng, radius));
}

#[then("the latitude span is about 0.1797 degrees")]
fn latitude_span(#[from(result)] result: &BoundsResultCell) {
    let bounds = expect_bounds(result);
    let delta = (bounds.lat_span() - 0.1797).abs();
    assert!(delta <= 1.0e-4, "unexpected span {}", bounds.lat_span());
}

#[then("the box contains the centre")]
fn contains_centre(#[from(result)] result: &BoundsResultCell) {
    let bounds = expect_bounds(result);
    assert!(bounds.contains(Coord {
        x: MURFREESBORO.1,
        y: MURFREESBORO.0,
    }));
}

#[then("an invalid latitude error is returned")]
fn invalid_latitude(#[from(result)] result: &BoundsResultCell) {
    let borrowed = result.borrow();
    assert!(
        matches!(&*borrowed, Some(Err(BoundsError::InvalidLatitude { .. }))),
        "expected InvalidLatitude, got {borrowed:?}"
    );
}

#[then("an invalid radius error is returned")]
fn invalid_radius(#[from(result)] result: &BoundsResultCell) {
    let borrowed = result.borrow();
    assert!(
        matches!(&*borrowed, Some(Err(BoundsError::InvalidRadius { .. }))),
        "expected InvalidRadius, got {borrowed:?}"
    );
}

#[scenario(path = "tests/features/bounds.feature", index = 0)]
fn bounds_around_valid_centre(centre: Cell<(f64, f64, f64)>, result: BoundsResultCell) {
    let _ = (centre, result);
}

#[scenario(path = "tests/features/bounds.feature", index = 1)]
fn rejecting_latitude(centre: Cell<(f64, f64, f64)>, result: BoundsResultCell) {
    let _ = (centre, result);
}

#[scenario(path = "tests/features/bounds.feature", index = 2)]
fn rejecting_zero_radius(centre: Cell<(f64, f64, f64)>, result: BoundsResultCell) {
    let _ = (centre, result);
}

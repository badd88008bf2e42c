//! Semiring law checks for every built-in weight type.
//!
//! Each test drives the `WeightTester` harness with a seeded generator, so a
//! failure reproduces exactly. Set `WFST_SEED` to try a different sequence.
//!
//! Run: cargo test -p wfst-weight --test weight_laws

use wfst_weight::{
    BooleanWeight, DivisibleWeight, LeftStringWeight, LogWeight, LogWeight64, MinMaxWeight,
    MinMaxWeight64, ProductWeight, RandomWeight, RightStringWeight, SignedLogWeight,
    SignedLogWeight64, TextFormat, TropicalWeight, TropicalWeight64, WeightGenerate,
    WeightTester,
};

const REPEAT: usize = 1000;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn seed() -> u64 {
    std::env::var("WFST_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(403)
}

fn tester<W: RandomWeight>(allow_zero: bool) -> WeightTester<W, impl FnMut() -> W> {
    let mut generate = WeightGenerate::<W>::new(seed(), allow_zero);
    WeightTester::new(move || generate.generate())
}

fn run_with_division<W: RandomWeight + DivisibleWeight>(allow_zero: bool) {
    tester::<W>(allow_zero).test_with_division(REPEAT);
    tester::<W>(allow_zero)
        .with_format(TextFormat::with_parentheses('(', ')'))
        .test_with_division(REPEAT);
}

// ---------------------------------------------------------------------------
// Float weights
// ---------------------------------------------------------------------------

#[test]
fn tropical_without_division() {
    tester::<TropicalWeight>(true).test(REPEAT);
}

#[test]
fn tropical() {
    run_with_division::<TropicalWeight>(true);
    run_with_division::<TropicalWeight64>(true);
}

#[test]
fn log() {
    run_with_division::<LogWeight>(true);
    run_with_division::<LogWeight64>(true);
}

#[test]
fn signed_log() {
    run_with_division::<SignedLogWeight>(true);
    run_with_division::<SignedLogWeight64>(true);
}

#[test]
fn minmax() {
    run_with_division::<MinMaxWeight>(true);
    run_with_division::<MinMaxWeight64>(true);
}

// ---------------------------------------------------------------------------
// Discrete weights
// ---------------------------------------------------------------------------

#[test]
fn boolean() {
    run_with_division::<BooleanWeight>(true);
}

#[test]
fn left_string() {
    run_with_division::<LeftStringWeight>(true);
}

#[test]
fn right_string() {
    run_with_division::<RightStringWeight>(true);
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[test]
fn tropical_product() {
    run_with_division::<ProductWeight<TropicalWeight, TropicalWeight>>(true);
}

#[test]
fn string_tropical_product() {
    run_with_division::<ProductWeight<LeftStringWeight, TropicalWeight>>(false);
}

#[test]
fn nested_product() {
    type Nested = ProductWeight<ProductWeight<TropicalWeight, LogWeight>, MinMaxWeight>;
    run_with_division::<Nested>(true);
}

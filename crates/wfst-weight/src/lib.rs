//! Semiring weights for weighted finite-state transducers.
//!
//! A weight is a value of a semiring: two associative operations
//! ([`Weight::plus`] and [`Weight::times`]) with identities
//! ([`Weight::zero`] and [`Weight::one`]), where `times` distributes over
//! `plus` and `zero` annihilates `times`. Each weight type declares which
//! laws it satisfies through a [`properties`] bitmask, and the
//! [`tester::WeightTester`] checks those declarations against random samples.
//!
//! # Architecture
//!
//! - [`semiring`] -- The [`Weight`] and [`DivisibleWeight`] traits, `power`
//! - [`properties`] -- Algebraic property bits
//! - [`format`] -- Text format configuration shared by composite weights
//! - [`float`] -- Tropical, log, min-max and signed log weights over `f32`/`f64`
//! - [`boolean`] -- Boolean weight
//! - [`string`] -- Left and right string weights
//! - [`product`] -- Product of two weights
//! - [`adder`] -- Compensated summation of many weights
//! - [`convert`] -- Conversions between weight types
//! - [`generate`] -- Pseudo-random weight generation
//! - [`tester`] -- Semiring law verification harness

pub mod adder;
pub mod boolean;
pub mod convert;
pub mod float;
pub mod format;
pub mod generate;
pub mod product;
pub mod properties;
pub mod semiring;
pub mod string;
pub mod tester;

pub use adder::{Accumulate, Adder};
pub use boolean::BooleanWeight;
pub use convert::ConvertWeight;
pub use float::{
    FloatValue, LogWeight, LogWeight64, LogWeightTpl, MinMaxWeight, MinMaxWeight64,
    MinMaxWeightTpl, SignedLogWeight, SignedLogWeight64, SignedLogWeightTpl, TropicalWeight,
    TropicalWeight64, TropicalWeightTpl,
};
pub use format::TextFormat;
pub use generate::{RandomWeight, WeightGenerate};
pub use product::ProductWeight;
pub use semiring::{DivideType, DivisibleWeight, Weight, approx_equal, power};
pub use string::{LeftStringWeight, RightStringWeight, StringWeight};
pub use tester::WeightTester;

/// Default tolerance for [`Weight::approx_equal`].
pub const K_DELTA: f32 = 1.0 / 1024.0;

/// Error type for weight text parsing.
#[derive(Debug, thiserror::Error)]
pub enum WeightError {
    #[error("invalid {weight_type} weight: {text:?}")]
    InvalidText { weight_type: String, text: String },
    #[error("malformed composite weight {text:?}: {reason}")]
    MalformedComposite { text: String, reason: String },
}

impl WeightError {
    pub(crate) fn invalid<W: Weight>(text: &str) -> Self {
        WeightError::InvalidText {
            weight_type: W::weight_type(),
            text: text.to_string(),
        }
    }
}

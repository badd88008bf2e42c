// The Weight trait: semiring operations, validity, reversal and I/O.

use std::fmt;
use std::io::{self, Read, Write};

use crate::format::TextFormat;
use crate::{K_DELTA, WeightError};

/// A semiring value attached to arcs and final states.
///
/// Operations are total: an out-of-domain input never panics or returns an
/// error, it produces [`Weight::no_weight`], a non-member that poisons every
/// `plus` or `times` it takes part in. Callers check [`Weight::member`]
/// before trusting a result.
///
/// `ReverseWeight` is the type of reversed weights. Reversal is an
/// involution, so the reverse of the reverse type is `Self` again.
pub trait Weight: Clone + PartialEq + fmt::Debug + fmt::Display + Sized {
    type ReverseWeight: Weight<ReverseWeight = Self>;

    /// Additive identity; annihilates `times`.
    fn zero() -> Self;

    /// Multiplicative identity.
    fn one() -> Self;

    /// Sentinel non-member, distinct from `zero` and `one`.
    fn no_weight() -> Self;

    fn plus(&self, rhs: &Self) -> Self;

    fn times(&self, rhs: &Self) -> Self;

    /// Whether this value is a valid weight.
    fn member(&self) -> bool;

    /// Equality up to `delta`; exact equality for discrete weights.
    fn approx_equal(&self, other: &Self, delta: f32) -> bool;

    fn reverse(&self) -> Self::ReverseWeight;

    /// Bitmask of the laws this type satisfies, see [`crate::properties`].
    fn properties() -> u64;

    /// Stable type identifier stored in serialized transducers.
    fn weight_type() -> String;

    /// Write the exact binary encoding.
    fn write_binary<O: Write + ?Sized>(&self, out: &mut O) -> io::Result<()>;

    /// Read a value written by [`Weight::write_binary`].
    fn read_binary<I: Read + ?Sized>(input: &mut I) -> io::Result<Self>;

    /// Render as text under `format`.
    fn to_text(&self, format: &TextFormat) -> String;

    /// Parse text produced by [`Weight::to_text`] under the same `format`.
    fn parse_text(text: &str, format: &TextFormat) -> Result<Self, WeightError>;

    /// Number of separator-delimited fields in the unparenthesized text form.
    fn text_arity() -> usize {
        1
    }

    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    fn is_one(&self) -> bool {
        *self == Self::one()
    }
}

/// Side on which a division undoes `times`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DivideType {
    /// Find `d` with `divisor * d = dividend`.
    Left,
    /// Find `d` with `d * divisor = dividend`.
    Right,
    /// Either side; only meaningful for commutative weights.
    Any,
}

/// A weight with a partial inverse of `times`.
pub trait DivisibleWeight: Weight {
    /// Divide `self` by `rhs` on the given side.
    ///
    /// Returns [`Weight::no_weight`] when no valid quotient exists or when
    /// either operand is a non-member.
    fn divide(&self, rhs: &Self, side: DivideType) -> Self;
}

/// `w` multiplied by itself `n` times; `power(w, 0)` is `one()`.
///
/// Evaluated as `times(w, power(w, n - 1))`.
pub fn power<W: Weight>(w: &W, n: u32) -> W {
    let mut result = W::one();
    for _ in 0..n {
        result = w.times(&result);
    }
    result
}

/// [`Weight::approx_equal`] with the default tolerance [`K_DELTA`].
pub fn approx_equal<W: Weight>(a: &W, b: &W) -> bool {
    a.approx_equal(b, K_DELTA)
}

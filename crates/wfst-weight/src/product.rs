// Product of two weights with componentwise operations.

use std::fmt;
use std::io::{self, Read, Write};

use crate::WeightError;
use crate::format::TextFormat;
use crate::properties::{COMMUTATIVE, IDEMPOTENT, SEMIRING};
use crate::semiring::{DivideType, DivisibleWeight, Weight};

/// Pair of weights; every operation applies to both components.
///
/// The product is a member only when both components are. It inherits the
/// distributivity, commutativity and idempotence its components share, but
/// never the path property.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductWeight<W1, W2> {
    value1: W1,
    value2: W2,
}

impl<W1: Weight, W2: Weight> ProductWeight<W1, W2> {
    pub fn new(value1: W1, value2: W2) -> Self {
        Self { value1, value2 }
    }

    pub fn value1(&self) -> &W1 {
        &self.value1
    }

    pub fn value2(&self) -> &W2 {
        &self.value2
    }
}

impl<W1: Weight, W2: Weight> fmt::Display for ProductWeight<W1, W2> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text(&TextFormat::default()))
    }
}

impl<W1: Weight, W2: Weight> Weight for ProductWeight<W1, W2> {
    type ReverseWeight = ProductWeight<W1::ReverseWeight, W2::ReverseWeight>;

    fn zero() -> Self {
        Self::new(W1::zero(), W2::zero())
    }

    fn one() -> Self {
        Self::new(W1::one(), W2::one())
    }

    fn no_weight() -> Self {
        Self::new(W1::no_weight(), W2::no_weight())
    }

    fn plus(&self, rhs: &Self) -> Self {
        Self::new(self.value1.plus(&rhs.value1), self.value2.plus(&rhs.value2))
    }

    fn times(&self, rhs: &Self) -> Self {
        Self::new(
            self.value1.times(&rhs.value1),
            self.value2.times(&rhs.value2),
        )
    }

    fn member(&self) -> bool {
        self.value1.member() && self.value2.member()
    }

    fn approx_equal(&self, other: &Self, delta: f32) -> bool {
        self.value1.approx_equal(&other.value1, delta)
            && self.value2.approx_equal(&other.value2, delta)
    }

    fn reverse(&self) -> Self::ReverseWeight {
        ProductWeight::new(self.value1.reverse(), self.value2.reverse())
    }

    fn properties() -> u64 {
        W1::properties() & W2::properties() & (SEMIRING | COMMUTATIVE | IDEMPOTENT)
    }

    fn weight_type() -> String {
        format!("{}_X_{}", W1::weight_type(), W2::weight_type())
    }

    fn write_binary<O: Write + ?Sized>(&self, out: &mut O) -> io::Result<()> {
        self.value1.write_binary(out)?;
        self.value2.write_binary(out)
    }

    fn read_binary<I: Read + ?Sized>(input: &mut I) -> io::Result<Self> {
        let value1 = W1::read_binary(input)?;
        let value2 = W2::read_binary(input)?;
        Ok(Self::new(value1, value2))
    }

    fn to_text(&self, format: &TextFormat) -> String {
        format.join(&self.value1.to_text(format), &self.value2.to_text(format))
    }

    fn parse_text(text: &str, format: &TextFormat) -> Result<Self, WeightError> {
        let (left, right) = format.split(text, W1::text_arity())?;
        Ok(Self::new(
            W1::parse_text(left, format)?,
            W2::parse_text(right, format)?,
        ))
    }

    fn text_arity() -> usize {
        W1::text_arity() + W2::text_arity()
    }
}

impl<W1: DivisibleWeight, W2: DivisibleWeight> DivisibleWeight for ProductWeight<W1, W2> {
    fn divide(&self, rhs: &Self, side: DivideType) -> Self {
        Self::new(
            self.value1.divide(&rhs.value1, side),
            self.value2.divide(&rhs.value2, side),
        )
    }
}

// Boolean semiring: plus = or, times = and.

use std::fmt;
use std::io::{self, Read, Write};

use crate::WeightError;
use crate::format::TextFormat;
use crate::properties::{COMMUTATIVE, IDEMPOTENT, PATH, SEMIRING};
use crate::semiring::{DivideType, DivisibleWeight, Weight};

const BINARY_FALSE: u8 = 0;
const BINARY_TRUE: u8 = 1;
const BINARY_INVALID: u8 = 0xFF;

/// Boolean weight; `None` is the non-member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BooleanWeight(Option<bool>);

impl BooleanWeight {
    pub fn new(value: bool) -> Self {
        Self(Some(value))
    }

    /// The boolean value, or `None` for the non-member.
    pub fn value(&self) -> Option<bool> {
        self.0
    }
}

impl fmt::Display for BooleanWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self.0 {
            Some(true) => "1",
            Some(false) => "0",
            None => "BadBoolean",
        })
    }
}

impl Weight for BooleanWeight {
    type ReverseWeight = Self;

    fn zero() -> Self {
        Self(Some(false))
    }

    fn one() -> Self {
        Self(Some(true))
    }

    fn no_weight() -> Self {
        Self(None)
    }

    fn plus(&self, rhs: &Self) -> Self {
        match (self.0, rhs.0) {
            (Some(a), Some(b)) => Self(Some(a || b)),
            _ => Self::no_weight(),
        }
    }

    fn times(&self, rhs: &Self) -> Self {
        match (self.0, rhs.0) {
            (Some(a), Some(b)) => Self(Some(a && b)),
            _ => Self::no_weight(),
        }
    }

    fn member(&self) -> bool {
        self.0.is_some()
    }

    fn approx_equal(&self, other: &Self, _delta: f32) -> bool {
        self == other
    }

    fn reverse(&self) -> Self {
        *self
    }

    fn properties() -> u64 {
        SEMIRING | COMMUTATIVE | IDEMPOTENT | PATH
    }

    fn weight_type() -> String {
        "boolean".to_string()
    }

    fn write_binary<O: Write + ?Sized>(&self, out: &mut O) -> io::Result<()> {
        let byte = match self.0 {
            Some(true) => BINARY_TRUE,
            Some(false) => BINARY_FALSE,
            None => BINARY_INVALID,
        };
        out.write_all(&[byte])
    }

    fn read_binary<I: Read + ?Sized>(input: &mut I) -> io::Result<Self> {
        let mut byte = [0u8; 1];
        input.read_exact(&mut byte)?;
        match byte[0] {
            BINARY_TRUE => Ok(Self::one()),
            BINARY_FALSE => Ok(Self::zero()),
            BINARY_INVALID => Ok(Self::no_weight()),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid boolean weight byte {other:#04x}"),
            )),
        }
    }

    fn to_text(&self, _format: &TextFormat) -> String {
        self.to_string()
    }

    fn parse_text(text: &str, _format: &TextFormat) -> Result<Self, WeightError> {
        match text {
            "1" | "true" => Ok(Self::one()),
            "0" | "false" => Ok(Self::zero()),
            "BadBoolean" => Ok(Self::no_weight()),
            _ => Err(WeightError::invalid::<Self>(text)),
        }
    }
}

impl DivisibleWeight for BooleanWeight {
    /// `a / true = a`; division by `false` has no unique quotient.
    fn divide(&self, rhs: &Self, _side: DivideType) -> Self {
        match (self.0, rhs.0) {
            (Some(a), Some(true)) => Self(Some(a)),
            _ => Self::no_weight(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn or_and_semantics() {
        let t = BooleanWeight::one();
        let f = BooleanWeight::zero();
        assert_eq!(t.plus(&f), t);
        assert_eq!(f.plus(&f), f);
        assert_eq!(t.times(&f), f);
        assert_eq!(t.times(&t), t);
    }

    #[test]
    fn no_weight_is_absorbing() {
        let nw = BooleanWeight::no_weight();
        assert!(!nw.member());
        assert!(!nw.plus(&BooleanWeight::one()).member());
        assert!(!BooleanWeight::zero().times(&nw).member());
    }

    #[test]
    fn division_by_false_fails() {
        let t = BooleanWeight::one();
        let f = BooleanWeight::zero();
        assert_eq!(f.divide(&t, DivideType::Left), f);
        assert!(!t.divide(&f, DivideType::Right).member());
    }

    #[test]
    fn binary_rejects_unknown_byte() {
        let data = [7u8];
        assert!(BooleanWeight::read_binary(&mut &data[..]).is_err());
    }

    #[test]
    fn text_forms() {
        let fmt = TextFormat::default();
        assert_eq!(BooleanWeight::one().to_text(&fmt), "1");
        assert_eq!(BooleanWeight::parse_text("false", &fmt).unwrap(), BooleanWeight::zero());
        assert!(BooleanWeight::parse_text("2", &fmt).is_err());
    }
}

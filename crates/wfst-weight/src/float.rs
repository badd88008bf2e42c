// Floating-point weights: tropical, log, min-max and signed log semirings.
//
// Each weight is a thin wrapper over an `f32` or `f64` value. NaN is the
// non-member sentinel for all of them; negative infinity is additionally a
// non-member for the tropical and log families.

use std::fmt;
use std::io::{self, Read, Write};
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::WeightError;
use crate::format::TextFormat;
use crate::properties::{COMMUTATIVE, IDEMPOTENT, PATH, SEMIRING};
use crate::semiring::{DivideType, DivisibleWeight, Weight};

/// Floating-point representation behind the float weights.
pub trait FloatValue:
    Copy
    + PartialEq
    + PartialOrd
    + fmt::Debug
    + fmt::Display
    + FromStr
    + Add<Output = Self>
    + Sub<Output = Self>
    + Send
    + Sync
    + 'static
{
    const INFINITY: Self;
    const NEG_INFINITY: Self;
    const NAN: Self;
    const ZERO: Self;
    /// Appended to weight type names: empty for `f32`, `"64"` for `f64`.
    const TYPE_SUFFIX: &'static str;

    fn is_nan(self) -> bool;
    fn to_f64(self) -> f64;
    fn from_f64(value: f64) -> Self;
    fn write_le<O: Write + ?Sized>(self, out: &mut O) -> io::Result<()>;
    fn read_le<I: Read + ?Sized>(input: &mut I) -> io::Result<Self>;
}

macro_rules! impl_float_value {
    ($t:ty, $suffix:expr) => {
        impl FloatValue for $t {
            const INFINITY: Self = <$t>::INFINITY;
            const NEG_INFINITY: Self = <$t>::NEG_INFINITY;
            const NAN: Self = <$t>::NAN;
            const ZERO: Self = 0.0;
            const TYPE_SUFFIX: &'static str = $suffix;

            #[inline]
            fn is_nan(self) -> bool {
                <$t>::is_nan(self)
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(value: f64) -> Self {
                value as $t
            }

            fn write_le<O: Write + ?Sized>(self, out: &mut O) -> io::Result<()> {
                out.write_all(&self.to_le_bytes())
            }

            fn read_le<I: Read + ?Sized>(input: &mut I) -> io::Result<Self> {
                let mut buf = [0u8; size_of::<$t>()];
                input.read_exact(&mut buf)?;
                Ok(<$t>::from_le_bytes(buf))
            }
        }
    };
}

impl_float_value!(f32, "");
impl_float_value!(f64, "64");

fn float_to_text<T: FloatValue>(value: T) -> String {
    if value.is_nan() {
        "BadNumber".to_string()
    } else if value == T::INFINITY {
        "Infinity".to_string()
    } else if value == T::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        value.to_string()
    }
}

fn parse_float<T: FloatValue>(text: &str) -> Option<T> {
    match text {
        "Infinity" | "inf" => Some(T::INFINITY),
        "-Infinity" | "-inf" => Some(T::NEG_INFINITY),
        "BadNumber" => Some(T::NAN),
        _ => text.parse().ok(),
    }
}

#[inline]
fn float_approx_equal<T: FloatValue>(a: T, b: T, delta: f32) -> bool {
    let (a, b, delta) = (a.to_f64(), b.to_f64(), delta as f64);
    a <= b + delta && b <= a + delta
}

/// Stable `-log(exp(-a) + exp(-b))`.
fn log_plus<T: FloatValue>(a: T, b: T) -> T {
    if a == T::INFINITY {
        return b;
    }
    if b == T::INFINITY {
        return a;
    }
    let (lo, hi) = if a <= b {
        (a.to_f64(), b.to_f64())
    } else {
        (b.to_f64(), a.to_f64())
    };
    T::from_f64(lo - (lo - hi).exp().ln_1p())
}

macro_rules! float_weight_common {
    ($name:ident) => {
        impl<T: FloatValue> $name<T> {
            pub fn new(value: T) -> Self {
                Self(value)
            }

            pub fn value(&self) -> T {
                self.0
            }
        }

        impl<T: FloatValue> fmt::Display for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&float_to_text(self.0))
            }
        }

        impl<T: FloatValue> From<T> for $name<T> {
            fn from(value: T) -> Self {
                Self(value)
            }
        }
    };
}

macro_rules! float_weight_io {
    () => {
        fn approx_equal(&self, other: &Self, delta: f32) -> bool {
            float_approx_equal(self.0, other.0, delta)
        }

        fn write_binary<O: Write + ?Sized>(&self, out: &mut O) -> io::Result<()> {
            self.0.write_le(out)
        }

        fn read_binary<I: Read + ?Sized>(input: &mut I) -> io::Result<Self> {
            Ok(Self(T::read_le(input)?))
        }

        fn to_text(&self, _format: &TextFormat) -> String {
            float_to_text(self.0)
        }

        fn parse_text(text: &str, _format: &TextFormat) -> Result<Self, WeightError> {
            parse_float(text)
                .map(Self)
                .ok_or_else(|| WeightError::invalid::<Self>(text))
        }
    };
}

// ---------------------------------------------------------------------------
// Tropical
// ---------------------------------------------------------------------------

/// Tropical semiring: `plus = min`, `times = +`, `zero = +inf`, `one = 0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TropicalWeightTpl<T>(T);

pub type TropicalWeight = TropicalWeightTpl<f32>;
pub type TropicalWeight64 = TropicalWeightTpl<f64>;

float_weight_common!(TropicalWeightTpl);

impl<T: FloatValue> Weight for TropicalWeightTpl<T> {
    type ReverseWeight = Self;

    fn zero() -> Self {
        Self(T::INFINITY)
    }

    fn one() -> Self {
        Self(T::ZERO)
    }

    fn no_weight() -> Self {
        Self(T::NAN)
    }

    fn plus(&self, rhs: &Self) -> Self {
        if !self.member() || !rhs.member() {
            return Self::no_weight();
        }
        if self.0 < rhs.0 { *self } else { *rhs }
    }

    fn times(&self, rhs: &Self) -> Self {
        if !self.member() || !rhs.member() {
            return Self::no_weight();
        }
        if self.0 == T::INFINITY || rhs.0 == T::INFINITY {
            return Self::zero();
        }
        Self(self.0 + rhs.0)
    }

    fn member(&self) -> bool {
        !self.0.is_nan() && self.0 != T::NEG_INFINITY
    }

    fn reverse(&self) -> Self {
        *self
    }

    fn properties() -> u64 {
        SEMIRING | COMMUTATIVE | IDEMPOTENT | PATH
    }

    fn weight_type() -> String {
        format!("tropical{}", T::TYPE_SUFFIX)
    }

    float_weight_io!();
}

impl<T: FloatValue> DivisibleWeight for TropicalWeightTpl<T> {
    fn divide(&self, rhs: &Self, _side: DivideType) -> Self {
        if !self.member() || !rhs.member() || rhs.0 == T::INFINITY {
            return Self::no_weight();
        }
        if self.0 == T::INFINITY {
            return Self::zero();
        }
        Self(self.0 - rhs.0)
    }
}

// ---------------------------------------------------------------------------
// Log
// ---------------------------------------------------------------------------

/// Log semiring: `plus = -log(e^-a + e^-b)`, `times = +`, `zero = +inf`,
/// `one = 0`. Values are negative log probabilities.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct LogWeightTpl<T>(T);

pub type LogWeight = LogWeightTpl<f32>;
pub type LogWeight64 = LogWeightTpl<f64>;

float_weight_common!(LogWeightTpl);

impl<T: FloatValue> Weight for LogWeightTpl<T> {
    type ReverseWeight = Self;

    fn zero() -> Self {
        Self(T::INFINITY)
    }

    fn one() -> Self {
        Self(T::ZERO)
    }

    fn no_weight() -> Self {
        Self(T::NAN)
    }

    fn plus(&self, rhs: &Self) -> Self {
        if !self.member() || !rhs.member() {
            return Self::no_weight();
        }
        Self(log_plus(self.0, rhs.0))
    }

    fn times(&self, rhs: &Self) -> Self {
        if !self.member() || !rhs.member() {
            return Self::no_weight();
        }
        if self.0 == T::INFINITY || rhs.0 == T::INFINITY {
            return Self::zero();
        }
        Self(self.0 + rhs.0)
    }

    fn member(&self) -> bool {
        !self.0.is_nan() && self.0 != T::NEG_INFINITY
    }

    fn reverse(&self) -> Self {
        *self
    }

    fn properties() -> u64 {
        SEMIRING | COMMUTATIVE
    }

    fn weight_type() -> String {
        format!("log{}", T::TYPE_SUFFIX)
    }

    float_weight_io!();
}

impl<T: FloatValue> DivisibleWeight for LogWeightTpl<T> {
    fn divide(&self, rhs: &Self, _side: DivideType) -> Self {
        if !self.member() || !rhs.member() || rhs.0 == T::INFINITY {
            return Self::no_weight();
        }
        if self.0 == T::INFINITY {
            return Self::zero();
        }
        Self(self.0 - rhs.0)
    }
}

// ---------------------------------------------------------------------------
// Min-max
// ---------------------------------------------------------------------------

/// Min-max semiring: `plus = min`, `times = max`, `zero = +inf`,
/// `one = -inf`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct MinMaxWeightTpl<T>(T);

pub type MinMaxWeight = MinMaxWeightTpl<f32>;
pub type MinMaxWeight64 = MinMaxWeightTpl<f64>;

float_weight_common!(MinMaxWeightTpl);

impl<T: FloatValue> Weight for MinMaxWeightTpl<T> {
    type ReverseWeight = Self;

    fn zero() -> Self {
        Self(T::INFINITY)
    }

    fn one() -> Self {
        Self(T::NEG_INFINITY)
    }

    fn no_weight() -> Self {
        Self(T::NAN)
    }

    fn plus(&self, rhs: &Self) -> Self {
        if !self.member() || !rhs.member() {
            return Self::no_weight();
        }
        if self.0 < rhs.0 { *self } else { *rhs }
    }

    fn times(&self, rhs: &Self) -> Self {
        if !self.member() || !rhs.member() {
            return Self::no_weight();
        }
        if self.0 >= rhs.0 { *self } else { *rhs }
    }

    fn member(&self) -> bool {
        !self.0.is_nan()
    }

    fn reverse(&self) -> Self {
        *self
    }

    fn properties() -> u64 {
        SEMIRING | COMMUTATIVE | IDEMPOTENT | PATH
    }

    fn weight_type() -> String {
        format!("minmax{}", T::TYPE_SUFFIX)
    }

    float_weight_io!();
}

impl<T: FloatValue> DivisibleWeight for MinMaxWeightTpl<T> {
    fn divide(&self, rhs: &Self, _side: DivideType) -> Self {
        if !self.member() || !rhs.member() {
            return Self::no_weight();
        }
        if self.0 >= rhs.0 { *self } else { Self::no_weight() }
    }
}

// ---------------------------------------------------------------------------
// Signed log
// ---------------------------------------------------------------------------

/// `-log(e^-a - e^-b)` for `a < b`: the magnitude left when a smaller
/// linear value is taken away from a larger one.
fn log_minus<T: FloatValue>(a: T, b: T) -> T {
    let (a, b) = (a.to_f64(), b.to_f64());
    T::from_f64(a - (-(a - b).exp()).ln_1p())
}

/// Log semiring extended with a sign, so that values can be subtracted.
///
/// The magnitude is a negative log as in [`LogWeightTpl`]; `negative`
/// flips the sign of the linear value. Zero is always stored with a
/// positive sign, so derived equality treats every zero alike.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignedLogWeightTpl<T> {
    negative: bool,
    value: T,
}

pub type SignedLogWeight = SignedLogWeightTpl<f32>;
pub type SignedLogWeight64 = SignedLogWeightTpl<f64>;

impl<T: FloatValue> SignedLogWeightTpl<T> {
    pub fn new(negative: bool, value: T) -> Self {
        Self {
            negative: negative && value != T::INFINITY,
            value,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Magnitude in negative-log space.
    pub fn value(&self) -> T {
        self.value
    }

    pub fn negate(&self) -> Self {
        Self::new(!self.negative, self.value)
    }

    /// `self - rhs`.
    pub fn minus(&self, rhs: &Self) -> Self {
        self.plus(&rhs.negate())
    }

    fn sign_text(&self) -> &'static str {
        if self.negative { "-1" } else { "1" }
    }
}

impl<T: FloatValue> fmt::Display for SignedLogWeightTpl<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text(&TextFormat::default()))
    }
}

impl<T: FloatValue> From<LogWeightTpl<T>> for SignedLogWeightTpl<T> {
    fn from(w: LogWeightTpl<T>) -> Self {
        Self::new(false, w.value())
    }
}

impl<T: FloatValue> Weight for SignedLogWeightTpl<T> {
    type ReverseWeight = Self;

    fn zero() -> Self {
        Self::new(false, T::INFINITY)
    }

    fn one() -> Self {
        Self::new(false, T::ZERO)
    }

    fn no_weight() -> Self {
        Self::new(false, T::NAN)
    }

    fn plus(&self, rhs: &Self) -> Self {
        if !self.member() || !rhs.member() {
            return Self::no_weight();
        }
        if self.value == T::INFINITY {
            return *rhs;
        }
        if rhs.value == T::INFINITY {
            return *self;
        }
        if self.negative == rhs.negative {
            return Self::new(self.negative, log_plus(self.value, rhs.value));
        }
        if self.value == rhs.value {
            return Self::zero();
        }
        // The operand with the smaller negative log dominates the sign.
        let (big, small) = if self.value < rhs.value {
            (self, rhs)
        } else {
            (rhs, self)
        };
        Self::new(big.negative, log_minus(big.value, small.value))
    }

    fn times(&self, rhs: &Self) -> Self {
        if !self.member() || !rhs.member() {
            return Self::no_weight();
        }
        if self.value == T::INFINITY || rhs.value == T::INFINITY {
            return Self::zero();
        }
        Self::new(self.negative != rhs.negative, self.value + rhs.value)
    }

    fn member(&self) -> bool {
        !self.value.is_nan() && self.value != T::NEG_INFINITY
    }

    fn approx_equal(&self, other: &Self, delta: f32) -> bool {
        self.negative == other.negative && float_approx_equal(self.value, other.value, delta)
    }

    fn reverse(&self) -> Self {
        *self
    }

    fn properties() -> u64 {
        SEMIRING | COMMUTATIVE
    }

    fn weight_type() -> String {
        format!("signed_log{}", T::TYPE_SUFFIX)
    }

    /// Sign as a `+1`/`-1` float, then the magnitude.
    fn write_binary<O: Write + ?Sized>(&self, out: &mut O) -> io::Result<()> {
        let sign = if self.negative { -1.0 } else { 1.0 };
        T::from_f64(sign).write_le(out)?;
        self.value.write_le(out)
    }

    fn read_binary<I: Read + ?Sized>(input: &mut I) -> io::Result<Self> {
        let sign = T::read_le(input)?.to_f64();
        let value = T::read_le(input)?;
        if sign == 1.0 {
            Ok(Self::new(false, value))
        } else if sign == -1.0 {
            Ok(Self::new(true, value))
        } else {
            Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid signed log weight sign {sign}"),
            ))
        }
    }

    fn to_text(&self, format: &TextFormat) -> String {
        format.join(self.sign_text(), &float_to_text(self.value))
    }

    fn parse_text(text: &str, format: &TextFormat) -> Result<Self, WeightError> {
        let (sign, value) = format.split(text, 1)?;
        let negative = match sign {
            "1" => false,
            "-1" => true,
            _ => return Err(WeightError::invalid::<Self>(text)),
        };
        parse_float(value)
            .map(|value| Self::new(negative, value))
            .ok_or_else(|| WeightError::invalid::<Self>(text))
    }

    fn text_arity() -> usize {
        2
    }
}

impl<T: FloatValue> DivisibleWeight for SignedLogWeightTpl<T> {
    fn divide(&self, rhs: &Self, _side: DivideType) -> Self {
        if !self.member() || !rhs.member() || rhs.value == T::INFINITY {
            return Self::no_weight();
        }
        if self.value == T::INFINITY {
            return Self::zero();
        }
        Self::new(self.negative != rhs.negative, self.value - rhs.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semiring::approx_equal;

    #[test]
    fn tropical_plus_is_min() {
        let a = TropicalWeight::new(3.0);
        let b = TropicalWeight::new(1.0);
        assert_eq!(a.plus(&b), b);
        assert_eq!(b.plus(&a), b);
    }

    #[test]
    fn tropical_times_adds() {
        let a = TropicalWeight::new(3.0);
        let b = TropicalWeight::new(1.5);
        assert_eq!(a.times(&b), TropicalWeight::new(4.5));
        assert_eq!(a.times(&TropicalWeight::zero()), TropicalWeight::zero());
    }

    #[test]
    fn tropical_no_weight_poisons() {
        let nw = TropicalWeight::no_weight();
        let a = TropicalWeight::new(2.0);
        assert!(!nw.member());
        assert!(!a.plus(&nw).member());
        assert!(!nw.times(&a).member());
        assert!(!TropicalWeight::new(f32::NEG_INFINITY).member());
    }

    #[test]
    fn tropical_division() {
        let p = TropicalWeight::new(5.0);
        let d = TropicalWeight::new(2.0);
        assert_eq!(p.divide(&d, DivideType::Left), TropicalWeight::new(3.0));
        assert!(!p.divide(&TropicalWeight::zero(), DivideType::Any).member());
        assert_eq!(
            TropicalWeight::zero().divide(&d, DivideType::Right),
            TropicalWeight::zero()
        );
    }

    #[test]
    fn log_plus_combines_probabilities() {
        // -log(0.5 + 0.5) = 0
        let half = LogWeight64::new(std::f64::consts::LN_2);
        let sum = half.plus(&half);
        assert!(approx_equal(&sum, &LogWeight64::one()));
        assert_eq!(half.plus(&LogWeight64::zero()), half);
    }

    #[test]
    fn log_plus_is_stable_for_large_gaps() {
        let a = LogWeight::new(1.0);
        let b = LogWeight::new(1000.0);
        assert!(approx_equal(&a.plus(&b), &a));
    }

    #[test]
    fn minmax_operations() {
        let a = MinMaxWeight::new(1.0);
        let b = MinMaxWeight::new(4.0);
        assert_eq!(a.plus(&b), a);
        assert_eq!(a.times(&b), b);
        assert_eq!(a.times(&MinMaxWeight::one()), a);
        assert_eq!(b.divide(&a, DivideType::Left), b);
        assert!(!a.divide(&b, DivideType::Left).member());
    }

    #[test]
    fn signed_log_subtracts() {
        // 1 - 0.5 = 0.5, 0.5 - 1 = -0.5
        let one = SignedLogWeight64::one();
        let half = SignedLogWeight64::new(false, std::f64::consts::LN_2);
        let diff = one.minus(&half);
        assert!(!diff.is_negative());
        assert!(approx_equal(&diff, &half));
        let diff = half.minus(&one);
        assert!(diff.is_negative());
        assert!(approx_equal(&diff, &half.negate()));
        assert_eq!(one.minus(&one), SignedLogWeight64::zero());
    }

    #[test]
    fn signed_log_signs_multiply() {
        let a = SignedLogWeight::new(true, 1.0);
        let b = SignedLogWeight::new(true, 2.0);
        assert_eq!(a.times(&b), SignedLogWeight::new(false, 3.0));
        assert_eq!(a.times(&b.negate()), SignedLogWeight::new(true, 3.0));
        assert_eq!(a.times(&SignedLogWeight::zero()), SignedLogWeight::zero());
        assert_eq!(
            a.times(&b).divide(&a, DivideType::Any),
            SignedLogWeight::new(true, 2.0)
        );
    }

    #[test]
    fn signed_log_zero_has_one_sign() {
        assert_eq!(
            SignedLogWeight::new(true, f32::INFINITY),
            SignedLogWeight::zero()
        );
        assert_eq!(SignedLogWeight::zero().negate(), SignedLogWeight::zero());
    }

    #[test]
    fn signed_log_io() {
        let fmt = TextFormat::default();
        let w = SignedLogWeight::new(true, 2.5);
        assert_eq!(w.to_text(&fmt), "-1,2.5");
        assert_eq!(SignedLogWeight::parse_text("-1,2.5", &fmt).unwrap(), w);
        let paren = TextFormat::with_parentheses('(', ')');
        assert_eq!(w.to_text(&paren), "(-1,2.5)");
        assert!(SignedLogWeight::parse_text("2,2.5", &fmt).is_err());

        let mut buf = Vec::new();
        w.write_binary(&mut buf).unwrap();
        assert_eq!(buf.len(), 8);
        assert_eq!(SignedLogWeight::read_binary(&mut buf.as_slice()).unwrap(), w);
        buf[..4].copy_from_slice(&0.5f32.to_le_bytes());
        assert!(SignedLogWeight::read_binary(&mut buf.as_slice()).is_err());
        assert_eq!(SignedLogWeight64::weight_type(), "signed_log64");
    }

    #[test]
    fn type_names_include_precision() {
        assert_eq!(TropicalWeight::weight_type(), "tropical");
        assert_eq!(TropicalWeight64::weight_type(), "tropical64");
        assert_eq!(LogWeight::weight_type(), "log");
        assert_eq!(MinMaxWeight64::weight_type(), "minmax64");
    }

    #[test]
    fn text_special_values() {
        let fmt = TextFormat::default();
        assert_eq!(TropicalWeight::zero().to_text(&fmt), "Infinity");
        assert_eq!(MinMaxWeight::one().to_text(&fmt), "-Infinity");
        assert_eq!(TropicalWeight::no_weight().to_text(&fmt), "BadNumber");
        assert_eq!(TropicalWeight::new(2.5).to_string(), "2.5");
        assert_eq!(
            TropicalWeight::parse_text("Infinity", &fmt).unwrap(),
            TropicalWeight::zero()
        );
        assert_eq!(
            LogWeight64::parse_text("0.25", &fmt).unwrap(),
            LogWeight64::new(0.25)
        );
        assert!(TropicalWeight::parse_text("abc", &fmt).is_err());
    }

    #[test]
    fn binary_is_little_endian() {
        let mut buf = Vec::new();
        TropicalWeight::new(1.0).write_binary(&mut buf).unwrap();
        assert_eq!(buf, 1.0f32.to_le_bytes());
        let read = TropicalWeight::read_binary(&mut buf.as_slice()).unwrap();
        assert_eq!(read, TropicalWeight::new(1.0));
    }

    #[test]
    fn binary_rejects_short_input() {
        let buf = [0u8; 3];
        assert!(TropicalWeight::read_binary(&mut &buf[..]).is_err());
    }
}

// Summation of many weights.
//
// Repeated `plus` on floating-point weights accumulates rounding error. Log
// weights carry a Kahan compensation term between additions; every other
// weight simply folds with `plus`.

use crate::boolean::BooleanWeight;
use crate::float::{FloatValue, LogWeightTpl, MinMaxWeightTpl, SignedLogWeightTpl, TropicalWeightTpl};
use crate::product::ProductWeight;
use crate::semiring::Weight;
use crate::string::{StringSide, StringWeight};

/// A weight that knows how to add into a running sum.
pub trait Accumulate: Weight {
    /// State kept between additions.
    type Carry: Default + Clone + std::fmt::Debug;

    /// `sum + w`, updating `carry`.
    fn accumulate(sum: &Self, w: &Self, carry: &mut Self::Carry) -> Self;
}

/// Running sum of weights.
///
/// ```
/// use wfst_weight::{Adder, LogWeight, Weight};
///
/// let mut adder = Adder::new();
/// adder.add(&LogWeight::one());
/// adder.add(&LogWeight::one());
/// assert!((adder.sum().value() + 2f32.ln()).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct Adder<W: Accumulate> {
    sum: W,
    carry: W::Carry,
}

impl<W: Accumulate> Adder<W> {
    /// Start from `zero()`.
    pub fn new() -> Self {
        Self::with_sum(W::zero())
    }

    pub fn with_sum(sum: W) -> Self {
        Self {
            sum,
            carry: W::Carry::default(),
        }
    }

    /// Add `w` and return the new sum.
    pub fn add(&mut self, w: &W) -> &W {
        self.sum = W::accumulate(&self.sum, w, &mut self.carry);
        &self.sum
    }

    pub fn sum(&self) -> &W {
        &self.sum
    }

    /// Restart from `sum`, dropping any compensation.
    pub fn reset(&mut self, sum: W) {
        *self = Self::with_sum(sum);
    }
}

impl<W: Accumulate> Default for Adder<W> {
    fn default() -> Self {
        Self::new()
    }
}

/// Kahan-compensated log-space addition of two magnitudes.
fn kahan_log_plus<T: FloatValue>(a: T, b: T, carry: &mut T) -> T {
    if a == T::INFINITY {
        return b;
    }
    if b == T::INFINITY {
        return a;
    }
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let y = T::from_f64(-(lo.to_f64() - hi.to_f64()).exp().ln_1p()) - *carry;
    let t = lo + y;
    *carry = (t - lo) - y;
    t
}

impl<T: FloatValue + Default> Accumulate for LogWeightTpl<T> {
    type Carry = T;

    fn accumulate(sum: &Self, w: &Self, carry: &mut T) -> Self {
        if !sum.member() || !w.member() {
            return Self::no_weight();
        }
        Self::new(kahan_log_plus(sum.value(), w.value(), carry))
    }
}

macro_rules! plain_accumulate {
    ($(impl<$($p:ident: $bound:path),*> for $ty:ty;)*) => {
        $(
            impl<$($p: $bound),*> Accumulate for $ty {
                type Carry = ();

                fn accumulate(sum: &Self, w: &Self, _carry: &mut ()) -> Self {
                    sum.plus(w)
                }
            }
        )*
    };
}

plain_accumulate! {
    impl<T: FloatValue> for TropicalWeightTpl<T>;
    impl<T: FloatValue> for MinMaxWeightTpl<T>;
    impl<T: FloatValue> for SignedLogWeightTpl<T>;
    impl<S: StringSide> for StringWeight<S>;
    impl<W1: Weight, W2: Weight> for ProductWeight<W1, W2>;
}

impl Accumulate for BooleanWeight {
    type Carry = ();

    fn accumulate(sum: &Self, w: &Self, _carry: &mut ()) -> Self {
        sum.plus(w)
    }
}

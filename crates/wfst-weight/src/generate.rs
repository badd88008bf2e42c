// Pseudo-random weight generation for the property harness.
//
// Values are drawn from a small range so that sums and products stay exact
// enough for the associativity and distributivity checks.

use std::marker::PhantomData;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::boolean::BooleanWeight;
use crate::float::{FloatValue, LogWeightTpl, MinMaxWeightTpl, SignedLogWeightTpl, TropicalWeightTpl};
use crate::product::ProductWeight;
use crate::semiring::Weight;
use crate::string::{StringSide, StringWeight};

/// Number of distinct non-zero values a generator draws from.
pub const NUM_RANDOM_WEIGHTS: i32 = 5;

/// Maximum label count of a generated string weight.
pub const MAX_STRING_LENGTH: usize = 5;

/// Labels of generated string weights are drawn from `1..=ALPHABET_SIZE`.
pub const ALPHABET_SIZE: u32 = 5;

/// A weight type that can draw random members.
pub trait RandomWeight: Weight {
    /// Draw a member. `zero()` is only produced when `allow_zero` is set.
    fn random<R: Rng + ?Sized>(rng: &mut R, allow_zero: bool) -> Self;
}

fn random_integer_float<T: FloatValue, R: Rng + ?Sized>(rng: &mut R) -> Option<T> {
    let n = rng.gen_range(0..=NUM_RANDOM_WEIGHTS);
    (n < NUM_RANDOM_WEIGHTS).then(|| T::from_f64(n as f64))
}

impl<T: FloatValue> RandomWeight for TropicalWeightTpl<T> {
    fn random<R: Rng + ?Sized>(rng: &mut R, allow_zero: bool) -> Self {
        match random_integer_float(rng) {
            Some(value) => Self::new(value),
            None if allow_zero => Self::zero(),
            None => Self::new(T::from_f64(NUM_RANDOM_WEIGHTS as f64)),
        }
    }
}

impl<T: FloatValue> RandomWeight for LogWeightTpl<T> {
    fn random<R: Rng + ?Sized>(rng: &mut R, allow_zero: bool) -> Self {
        match random_integer_float(rng) {
            Some(value) => Self::new(value),
            None if allow_zero => Self::zero(),
            None => Self::new(T::from_f64(NUM_RANDOM_WEIGHTS as f64)),
        }
    }
}

impl<T: FloatValue> RandomWeight for SignedLogWeightTpl<T> {
    fn random<R: Rng + ?Sized>(rng: &mut R, allow_zero: bool) -> Self {
        let negative = rng.gen_bool(0.5);
        match random_integer_float(rng) {
            Some(value) => Self::new(negative, value),
            None if allow_zero => Self::zero(),
            None => Self::new(negative, T::from_f64(NUM_RANDOM_WEIGHTS as f64)),
        }
    }
}

impl<T: FloatValue> RandomWeight for MinMaxWeightTpl<T> {
    /// Draws from `-5..=5`; the lower end maps to `one()` and the upper end
    /// to `zero()` when allowed.
    fn random<R: Rng + ?Sized>(rng: &mut R, allow_zero: bool) -> Self {
        let n = rng.gen_range(-NUM_RANDOM_WEIGHTS..=NUM_RANDOM_WEIGHTS);
        if allow_zero && n == NUM_RANDOM_WEIGHTS {
            Self::zero()
        } else if n == -NUM_RANDOM_WEIGHTS {
            Self::one()
        } else {
            Self::new(T::from_f64(n as f64))
        }
    }
}

impl RandomWeight for BooleanWeight {
    fn random<R: Rng + ?Sized>(rng: &mut R, allow_zero: bool) -> Self {
        if allow_zero && rng.gen_bool(0.5) {
            Self::zero()
        } else {
            Self::one()
        }
    }
}

impl<S: StringSide> RandomWeight for StringWeight<S> {
    fn random<R: Rng + ?Sized>(rng: &mut R, allow_zero: bool) -> Self {
        let n = rng.gen_range(0..=MAX_STRING_LENGTH);
        if allow_zero && n == MAX_STRING_LENGTH {
            return Self::zero();
        }
        let labels = (0..n).map(|_| rng.gen_range(1..=ALPHABET_SIZE)).collect();
        Self::from_labels(labels)
    }
}

impl<W1: RandomWeight, W2: RandomWeight> RandomWeight for ProductWeight<W1, W2> {
    fn random<R: Rng + ?Sized>(rng: &mut R, allow_zero: bool) -> Self {
        let value1 = W1::random(rng, allow_zero);
        let value2 = W2::random(rng, allow_zero);
        Self::new(value1, value2)
    }
}

/// Seeded, reproducible source of random weights.
///
/// ```
/// use wfst_weight::{TropicalWeight, WeightGenerate, Weight};
///
/// let mut generate = WeightGenerate::<TropicalWeight>::new(7, false);
/// assert!(generate.generate().member());
/// ```
#[derive(Debug, Clone)]
pub struct WeightGenerate<W> {
    rng: StdRng,
    allow_zero: bool,
    weight: PhantomData<fn() -> W>,
}

impl<W: RandomWeight> WeightGenerate<W> {
    pub fn new(seed: u64, allow_zero: bool) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            allow_zero,
            weight: PhantomData,
        }
    }

    pub fn generate(&mut self) -> W {
        W::random(&mut self.rng, self.allow_zero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BooleanWeight, LeftStringWeight, MinMaxWeight, SignedLogWeight, TropicalWeight};

    #[test]
    fn same_seed_same_sequence() {
        let mut a = WeightGenerate::<TropicalWeight>::new(42, true);
        let mut b = WeightGenerate::<TropicalWeight>::new(42, true);
        for _ in 0..50 {
            assert_eq!(a.generate(), b.generate());
        }
    }

    #[test]
    fn zero_only_when_allowed() {
        let mut generate = WeightGenerate::<TropicalWeight>::new(1, false);
        for _ in 0..500 {
            let w = generate.generate();
            assert!(w.member());
            assert_ne!(w, TropicalWeight::zero());
        }
        let mut generate = WeightGenerate::<BooleanWeight>::new(1, false);
        for _ in 0..100 {
            assert_eq!(generate.generate(), BooleanWeight::one());
        }
    }

    #[test]
    fn zero_eventually_drawn() {
        let mut generate = WeightGenerate::<TropicalWeight>::new(3, true);
        assert!((0..500).any(|_| generate.generate().is_zero()));
    }

    #[test]
    fn minmax_draws_negative_values() {
        let mut generate = WeightGenerate::<MinMaxWeight>::new(5, true);
        assert!((0..500).any(|_| {
            let v = generate.generate().value();
            v < 0.0 && v.is_finite()
        }));
    }

    #[test]
    fn signed_log_draws_both_signs() {
        let mut generate = WeightGenerate::<SignedLogWeight>::new(11, false);
        let draws: Vec<_> = (0..200).map(|_| generate.generate()).collect();
        assert!(draws.iter().any(|w| w.is_negative()));
        assert!(draws.iter().any(|w| !w.is_negative()));
        assert!(draws.iter().all(|w| w.member() && !w.is_zero()));
    }

    #[test]
    fn strings_use_bounded_labels() {
        let mut generate = WeightGenerate::<LeftStringWeight>::new(9, false);
        for _ in 0..200 {
            let w = generate.generate();
            let labels = w.labels().unwrap();
            assert!(labels.len() <= MAX_STRING_LENGTH);
            assert!(labels.iter().all(|&l| (1..=ALPHABET_SIZE).contains(&l)));
        }
    }
}

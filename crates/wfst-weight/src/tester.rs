// Semiring law verification harness.
//
// Draws triples of weights from a generator and checks the laws implied by
// the weight type's declared properties. A violated law panics with the
// weight type, the law and the offending samples.

use std::marker::PhantomData;

use crate::format::TextFormat;
use crate::properties::{COMMUTATIVE, IDEMPOTENT, LEFT_SEMIRING, PATH, RIGHT_SEMIRING, SEMIRING};
use crate::semiring::{DivideType, DivisibleWeight, Weight, approx_equal, power};

/// Checks a weight type's laws against generated samples.
///
/// ```
/// use wfst_weight::{TropicalWeight, WeightGenerate, WeightTester};
///
/// let mut generate = WeightGenerate::<TropicalWeight>::new(1, true);
/// WeightTester::new(move || generate.generate()).test_with_division(100);
/// ```
pub struct WeightTester<W, G> {
    generator: G,
    format: TextFormat,
    weight: PhantomData<fn() -> W>,
}

impl<W: Weight, G: FnMut() -> W> WeightTester<W, G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            format: TextFormat::default(),
            weight: PhantomData,
        }
    }

    /// Use `format` for the text round trip.
    pub fn with_format(mut self, format: TextFormat) -> Self {
        self.format = format;
        self
    }

    /// Run `iterations` rounds of every check except division.
    pub fn test(&mut self, iterations: usize) {
        for round in 0..iterations {
            let [w1, w2, w3] = self.draw(round);
            test_semiring(&w1, &w2, &w3);
            self.test_rest(&w1, &w2, &w3);
        }
    }

    fn draw(&mut self, round: usize) -> [W; 3] {
        let samples = [(self.generator)(), (self.generator)(), (self.generator)()];
        tracing::debug!(
            weight_type = %W::weight_type(),
            round,
            w1 = %samples[0],
            w2 = %samples[1],
            w3 = %samples[2],
            "testing weights"
        );
        samples
    }

    fn test_rest(&self, w1: &W, w2: &W, w3: &W) {
        test_reverse(w1, w2);
        test_equality(w1, w2, w3);
        test_io(w1, &self.format);
        test_copy(w1);
    }
}

impl<W: DivisibleWeight, G: FnMut() -> W> WeightTester<W, G> {
    /// Run `iterations` rounds of every check, division included.
    pub fn test_with_division(&mut self, iterations: usize) {
        for round in 0..iterations {
            let [w1, w2, w3] = self.draw(round);
            test_semiring(&w1, &w2, &w3);
            test_division(&w1, &w2);
            self.test_rest(&w1, &w2, &w3);
        }
    }
}

fn check<W: Weight>(holds: bool, law: &str, samples: &[&W]) {
    if !holds {
        let samples: Vec<String> = samples.iter().map(|w| w.to_string()).collect();
        panic!(
            "{} weight violates {law} for [{}]",
            W::weight_type(),
            samples.join(", ")
        );
    }
}

fn test_semiring<W: Weight>(w1: &W, w2: &W, w3: &W) {
    let props = W::properties();
    let zero = W::zero();
    let one = W::one();
    let nw = W::no_weight();

    check(w1.plus(w2).member(), "closure of plus", &[w1, w2]);
    check(w1.times(w2).member(), "closure of times", &[w1, w2]);

    check(
        approx_equal(&w1.plus(&w2.plus(w3)), &w1.plus(w2).plus(w3)),
        "associativity of plus",
        &[w1, w2, w3],
    );
    check(
        approx_equal(&w1.times(&w2.times(w3)), &w1.times(w2).times(w3)),
        "associativity of times",
        &[w1, w2, w3],
    );

    check(w1.plus(&zero) == *w1, "right identity of plus", &[w1]);
    check(zero.plus(w1) == *w1, "left identity of plus", &[w1]);
    check(w1.times(&one) == *w1, "right identity of times", &[w1]);
    check(one.times(w1) == *w1, "left identity of times", &[w1]);

    check(!nw.member(), "no_weight is a non-member", &[w1]);
    check(!w1.plus(&nw).member(), "no_weight absorbs plus", &[w1]);
    check(!nw.plus(w1).member(), "no_weight absorbs plus", &[w1]);
    check(!w1.times(&nw).member(), "no_weight absorbs times", &[w1]);
    check(!nw.times(w1).member(), "no_weight absorbs times", &[w1]);

    check(
        approx_equal(&w1.plus(w2), &w2.plus(w1)),
        "commutativity of plus",
        &[w1, w2],
    );
    if props & COMMUTATIVE != 0 {
        check(
            approx_equal(&w1.times(w2), &w2.times(w1)),
            "commutativity of times",
            &[w1, w2],
        );
    }

    check(w1.times(&zero) == zero, "zero annihilates times", &[w1]);
    check(zero.times(w1) == zero, "zero annihilates times", &[w1]);

    check(power(w1, 0) == one, "power 0 is one", &[w1]);
    check(power(w1, 1) == *w1, "power 1 is identity", &[w1]);
    check(
        power(w1, 3) == w1.times(&w1.times(w1)),
        "power 3 is repeated times",
        &[w1],
    );

    if props & LEFT_SEMIRING != 0 {
        check(
            approx_equal(&w1.times(&w2.plus(w3)), &w1.times(w2).plus(&w1.times(w3))),
            "left distributivity",
            &[w1, w2, w3],
        );
    }
    if props & RIGHT_SEMIRING != 0 {
        check(
            approx_equal(&w1.plus(w2).times(w3), &w1.times(w3).plus(&w2.times(w3))),
            "right distributivity",
            &[w1, w2, w3],
        );
    }

    if props & IDEMPOTENT != 0 {
        check(w1.plus(w1) == *w1, "idempotence", &[w1]);
    }

    if props & PATH != 0 {
        let sum = w1.plus(w2);
        check(sum == *w1 || sum == *w2, "path property", &[w1, w2]);
    }

    check(
        props & (LEFT_SEMIRING | RIGHT_SEMIRING) != 0,
        "declaration of a left or right semiring",
        &[w1],
    );
    if props & COMMUTATIVE != 0 {
        check(
            props & SEMIRING == SEMIRING,
            "commutative implies semiring",
            &[w1],
        );
    }
}

fn test_division<W: DivisibleWeight>(w1: &W, w2: &W) {
    let props = W::properties();
    let p = w1.times(w2);
    let nw = W::no_weight();

    if props & LEFT_SEMIRING != 0 {
        let d = p.divide(w1, DivideType::Left);
        if d.member() {
            check(approx_equal(&p, &w1.times(&d)), "left division", &[w1, w2]);
        }
        check(
            !w1.divide(&nw, DivideType::Left).member(),
            "left division by no_weight",
            &[w1],
        );
        check(
            !nw.divide(w1, DivideType::Left).member(),
            "left division of no_weight",
            &[w1],
        );
    }

    if props & RIGHT_SEMIRING != 0 {
        let d = p.divide(w2, DivideType::Right);
        if d.member() {
            check(approx_equal(&p, &d.times(w2)), "right division", &[w1, w2]);
        }
        check(
            !w1.divide(&nw, DivideType::Right).member(),
            "right division by no_weight",
            &[w1],
        );
        check(
            !nw.divide(w1, DivideType::Right).member(),
            "right division of no_weight",
            &[w1],
        );
    }

    if props & COMMUTATIVE != 0 {
        let d = p.divide(w1, DivideType::Right);
        if d.member() {
            check(
                approx_equal(&p, &d.times(w1)),
                "commutative division",
                &[w1, w2],
            );
        }
    }
}

fn test_reverse<W: Weight>(w1: &W, w2: &W) {
    let rw1 = w1.reverse();
    let rw2 = w2.reverse();

    check(rw1.reverse() == *w1, "reverse involution", &[w1]);
    check(
        w1.plus(w2).reverse() == rw1.plus(&rw2),
        "reverse of plus",
        &[w1, w2],
    );
    check(
        w1.times(w2).reverse() == rw2.times(&rw1),
        "reverse of times",
        &[w1, w2],
    );
}

#[allow(clippy::eq_op)]
fn test_equality<W: Weight>(w1: &W, w2: &W, w3: &W) {
    check(w1 == w1, "reflexivity of equality", &[w1]);
    check((w1 == w2) == (w2 == w1), "symmetry of equality", &[w1, w2]);
    if w1 == w2 && w2 == w3 {
        check(w1 == w3, "transitivity of equality", &[w1, w2, w3]);
    }
}

fn test_io<W: Weight>(w: &W, format: &TextFormat) {
    let mut buf = Vec::new();
    check(w.write_binary(&mut buf).is_ok(), "binary write", &[w]);
    let mut input = buf.as_slice();
    let read = W::read_binary(&mut input);
    check(
        matches!(&read, Ok(v) if v == w) && input.is_empty(),
        "binary round trip",
        &[w],
    );

    let text = w.to_text(format);
    let parsed = W::parse_text(&text, format);
    check(
        matches!(&parsed, Ok(v) if approx_equal(v, w)),
        "text round trip",
        &[w],
    );
}

#[allow(clippy::redundant_clone)]
fn test_copy<W: Weight>(w: &W) {
    let mut x = w.clone();
    check(*w == x, "copy", &[w]);

    x = W::clone(w);
    check(*w == x, "assignment", &[w]);

    let same = x.clone();
    x = same;
    check(*w == x, "self-assignment", &[w]);
}

#[cfg(test)]
mod tests {
    use std::fmt;
    use std::io::{self, Read, Write};

    use super::*;
    use crate::WeightError;
    use crate::generate::WeightGenerate;
    use crate::{BooleanWeight, LeftStringWeight, TropicalWeight};

    /// Natural numbers under `+` and `*`, with a configurable property mask.
    #[derive(Debug, Clone, PartialEq)]
    struct CountWeight<const PROPS: u64>(Option<u64>);

    impl<const PROPS: u64> fmt::Display for CountWeight<PROPS> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self.0 {
                Some(n) => write!(f, "{n}"),
                None => f.write_str("BadCount"),
            }
        }
    }

    impl<const PROPS: u64> Weight for CountWeight<PROPS> {
        type ReverseWeight = Self;

        fn zero() -> Self {
            Self(Some(0))
        }

        fn one() -> Self {
            Self(Some(1))
        }

        fn no_weight() -> Self {
            Self(None)
        }

        fn plus(&self, rhs: &Self) -> Self {
            Self(self.0.zip(rhs.0).and_then(|(a, b)| a.checked_add(b)))
        }

        fn times(&self, rhs: &Self) -> Self {
            Self(self.0.zip(rhs.0).and_then(|(a, b)| a.checked_mul(b)))
        }

        fn member(&self) -> bool {
            self.0.is_some()
        }

        fn approx_equal(&self, other: &Self, _delta: f32) -> bool {
            self == other
        }

        fn reverse(&self) -> Self {
            self.clone()
        }

        fn properties() -> u64 {
            PROPS
        }

        fn weight_type() -> String {
            "count".to_string()
        }

        fn write_binary<O: Write + ?Sized>(&self, out: &mut O) -> io::Result<()> {
            out.write_all(&self.0.unwrap_or(u64::MAX).to_le_bytes())
        }

        fn read_binary<I: Read + ?Sized>(input: &mut I) -> io::Result<Self> {
            let mut buf = [0u8; 8];
            input.read_exact(&mut buf)?;
            let n = u64::from_le_bytes(buf);
            Ok(Self((n != u64::MAX).then_some(n)))
        }

        fn to_text(&self, _format: &TextFormat) -> String {
            self.to_string()
        }

        fn parse_text(text: &str, _format: &TextFormat) -> Result<Self, WeightError> {
            match text {
                "BadCount" => Ok(Self::no_weight()),
                _ => text
                    .parse()
                    .map(|n| Self(Some(n)))
                    .map_err(|_| WeightError::invalid::<Self>(text)),
            }
        }
    }

    fn counts<const PROPS: u64>() -> impl FnMut() -> CountWeight<PROPS> {
        let mut next = 0u64;
        move || {
            next += 1;
            CountWeight(Some(next % 4 + 1))
        }
    }

    #[test]
    fn honest_declaration_passes() {
        WeightTester::new(counts::<{ SEMIRING | COMMUTATIVE }>()).test(200);
    }

    #[test]
    #[should_panic(expected = "idempotence")]
    fn false_idempotence_is_caught() {
        WeightTester::new(counts::<{ SEMIRING | COMMUTATIVE | IDEMPOTENT }>()).test(10);
    }

    #[test]
    #[should_panic(expected = "path property")]
    fn false_path_property_is_caught() {
        WeightTester::new(counts::<{ SEMIRING | COMMUTATIVE | PATH }>()).test(10);
    }

    #[test]
    #[should_panic(expected = "left or right semiring")]
    fn missing_semiring_declaration_is_caught() {
        WeightTester::new(counts::<0>()).test(1);
    }

    #[test]
    fn builtin_weights_pass_a_short_run() {
        let mut tropical = WeightGenerate::<TropicalWeight>::new(11, true);
        WeightTester::new(move || tropical.generate()).test_with_division(100);

        let mut boolean = WeightGenerate::<BooleanWeight>::new(11, true);
        WeightTester::new(move || boolean.generate()).test_with_division(100);

        let mut string = WeightGenerate::<LeftStringWeight>::new(11, true);
        WeightTester::new(move || string.generate()).test_with_division(100);
    }

    #[test]
    fn failure_message_names_type_and_samples() {
        let result = std::panic::catch_unwind(|| {
            WeightTester::new(|| CountWeight::<{ SEMIRING | IDEMPOTENT }>(Some(2))).test(1);
        });
        let payload = result.unwrap_err();
        let message = payload
            .downcast_ref::<String>()
            .cloned()
            .unwrap_or_default();
        assert!(message.contains("count weight violates idempotence"));
        assert!(message.contains("[2]"));
    }
}

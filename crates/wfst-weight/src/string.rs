// String semirings over label sequences.
//
// `times` is concatenation and `one` is the empty string. The left string
// weight takes the longest common prefix as `plus` and is left
// distributive; the right string weight takes the longest common suffix and
// is right distributive. Reversing a left string yields a right string with
// the labels in reverse order.

use std::fmt;
use std::io::{self, Read, Write};
use std::marker::PhantomData;

use crate::WeightError;
use crate::format::TextFormat;
use crate::properties::{IDEMPOTENT, LEFT_SEMIRING, RIGHT_SEMIRING};
use crate::semiring::{DivideType, DivisibleWeight, Weight};

/// Separator between labels in the text form.
pub const LABEL_SEPARATOR: char = '_';

const BINARY_INFINITY: i32 = -1;
const BINARY_BAD: i32 = -2;

/// Which side a string weight is distributive on.
pub trait StringSide: fmt::Debug + Clone + Copy + PartialEq + Eq + 'static {
    type Reverse: StringSide<Reverse = Self>;
    const LEFT: bool;
    const TYPE_NAME: &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Left;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Right;

impl StringSide for Left {
    type Reverse = Right;
    const LEFT: bool = true;
    const TYPE_NAME: &'static str = "left_string";
}

impl StringSide for Right {
    type Reverse = Left;
    const LEFT: bool = false;
    const TYPE_NAME: &'static str = "right_string";
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Repr {
    Labels(Vec<u32>),
    /// The zero element; absorbs under concatenation.
    Infinity,
    /// The non-member.
    Bad,
}

/// A string of labels, the zero string, or the non-member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StringWeight<S> {
    repr: Repr,
    side: PhantomData<S>,
}

pub type LeftStringWeight = StringWeight<Left>;
pub type RightStringWeight = StringWeight<Right>;

impl<S: StringSide> StringWeight<S> {
    fn from_repr(repr: Repr) -> Self {
        Self {
            repr,
            side: PhantomData,
        }
    }

    pub fn from_labels(labels: Vec<u32>) -> Self {
        Self::from_repr(Repr::Labels(labels))
    }

    /// The label sequence, or `None` for the zero string and the non-member.
    pub fn labels(&self) -> Option<&[u32]> {
        match &self.repr {
            Repr::Labels(labels) => Some(labels),
            _ => None,
        }
    }
}

impl<S: StringSide> fmt::Display for StringWeight<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Infinity => f.write_str("Infinity"),
            Repr::Bad => f.write_str("BadString"),
            Repr::Labels(labels) if labels.is_empty() => f.write_str("Epsilon"),
            Repr::Labels(labels) => {
                for (i, label) in labels.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{LABEL_SEPARATOR}")?;
                    }
                    write!(f, "{label}")?;
                }
                Ok(())
            }
        }
    }
}

fn common_prefix(a: &[u32], b: &[u32]) -> Vec<u32> {
    a.iter()
        .zip(b)
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| *x)
        .collect()
}

fn common_suffix(a: &[u32], b: &[u32]) -> Vec<u32> {
    let len = a
        .iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    a[a.len() - len..].to_vec()
}

impl<S: StringSide> Weight for StringWeight<S> {
    type ReverseWeight = StringWeight<S::Reverse>;

    fn zero() -> Self {
        Self::from_repr(Repr::Infinity)
    }

    fn one() -> Self {
        Self::from_labels(Vec::new())
    }

    fn no_weight() -> Self {
        Self::from_repr(Repr::Bad)
    }

    fn plus(&self, rhs: &Self) -> Self {
        match (&self.repr, &rhs.repr) {
            (Repr::Bad, _) | (_, Repr::Bad) => Self::no_weight(),
            (Repr::Infinity, _) => rhs.clone(),
            (_, Repr::Infinity) => self.clone(),
            (Repr::Labels(a), Repr::Labels(b)) => {
                if S::LEFT {
                    Self::from_labels(common_prefix(a, b))
                } else {
                    Self::from_labels(common_suffix(a, b))
                }
            }
        }
    }

    fn times(&self, rhs: &Self) -> Self {
        match (&self.repr, &rhs.repr) {
            (Repr::Bad, _) | (_, Repr::Bad) => Self::no_weight(),
            (Repr::Infinity, _) | (_, Repr::Infinity) => Self::zero(),
            (Repr::Labels(a), Repr::Labels(b)) => {
                let mut labels = Vec::with_capacity(a.len() + b.len());
                labels.extend_from_slice(a);
                labels.extend_from_slice(b);
                Self::from_labels(labels)
            }
        }
    }

    fn member(&self) -> bool {
        self.repr != Repr::Bad
    }

    fn approx_equal(&self, other: &Self, _delta: f32) -> bool {
        self == other
    }

    fn reverse(&self) -> StringWeight<S::Reverse> {
        match &self.repr {
            Repr::Labels(labels) => {
                StringWeight::from_labels(labels.iter().rev().copied().collect())
            }
            Repr::Infinity => StringWeight::zero(),
            Repr::Bad => StringWeight::no_weight(),
        }
    }

    fn properties() -> u64 {
        if S::LEFT {
            LEFT_SEMIRING | IDEMPOTENT
        } else {
            RIGHT_SEMIRING | IDEMPOTENT
        }
    }

    fn weight_type() -> String {
        S::TYPE_NAME.to_string()
    }

    fn write_binary<O: Write + ?Sized>(&self, out: &mut O) -> io::Result<()> {
        match &self.repr {
            Repr::Infinity => out.write_all(&BINARY_INFINITY.to_le_bytes()),
            Repr::Bad => out.write_all(&BINARY_BAD.to_le_bytes()),
            Repr::Labels(labels) => {
                let len = i32::try_from(labels.len()).map_err(|_| {
                    io::Error::new(io::ErrorKind::InvalidInput, "string weight too long")
                })?;
                out.write_all(&len.to_le_bytes())?;
                for label in labels {
                    out.write_all(&label.to_le_bytes())?;
                }
                Ok(())
            }
        }
    }

    fn read_binary<I: Read + ?Sized>(input: &mut I) -> io::Result<Self> {
        let mut buf = [0u8; 4];
        input.read_exact(&mut buf)?;
        let len = i32::from_le_bytes(buf);
        match len {
            BINARY_INFINITY => Ok(Self::zero()),
            BINARY_BAD => Ok(Self::no_weight()),
            n if n < 0 => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid string weight length {n}"),
            )),
            n => {
                let n = n as usize;
                // Cap the up-front allocation; a lying length fails on read.
                let mut labels = Vec::with_capacity(n.min(1024));
                for _ in 0..n {
                    input.read_exact(&mut buf)?;
                    labels.push(u32::from_le_bytes(buf));
                }
                Ok(Self::from_labels(labels))
            }
        }
    }

    fn to_text(&self, _format: &TextFormat) -> String {
        self.to_string()
    }

    fn parse_text(text: &str, _format: &TextFormat) -> Result<Self, WeightError> {
        match text {
            "Infinity" => Ok(Self::zero()),
            "BadString" => Ok(Self::no_weight()),
            "Epsilon" => Ok(Self::one()),
            _ => text
                .split(LABEL_SEPARATOR)
                .map(|part| part.parse::<u32>())
                .collect::<Result<Vec<_>, _>>()
                .map(Self::from_labels)
                .map_err(|_| WeightError::invalid::<Self>(text)),
        }
    }
}

impl<S: StringSide> DivisibleWeight for StringWeight<S> {
    /// Left strings strip a prefix, right strings strip a suffix. Dividing
    /// on the other side, or by a string that is not a prefix (suffix),
    /// yields the non-member.
    fn divide(&self, rhs: &Self, side: DivideType) -> Self {
        match (&self.repr, &rhs.repr) {
            (Repr::Bad, _) | (_, Repr::Bad) | (_, Repr::Infinity) => Self::no_weight(),
            (Repr::Infinity, _) => Self::zero(),
            (Repr::Labels(a), Repr::Labels(b)) => {
                let rest = match side {
                    DivideType::Left if S::LEFT => a.strip_prefix(b.as_slice()),
                    DivideType::Right if !S::LEFT => a.strip_suffix(b.as_slice()),
                    _ => None,
                };
                match rest {
                    Some(rest) => Self::from_labels(rest.to_vec()),
                    None => Self::no_weight(),
                }
            }
        }
    }
}

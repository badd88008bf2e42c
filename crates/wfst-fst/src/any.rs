// Graphs whose weight type is selected at runtime.
//
// Serialized graphs name their weight type, so a tool that accepts any graph
// reads the name first and then loads the matching `VectorFst<W>`. All
// algorithms stay generic; this enum is only the dispatch boundary.

use std::io::Write;

use wfst_weight::{
    BooleanWeight, LeftStringWeight, LogWeight, LogWeight64, MinMaxWeight, MinMaxWeight64,
    RightStringWeight, SignedLogWeight, SignedLogWeight64, TropicalWeight, TropicalWeight64,
    Weight,
};

use crate::FstError;
use crate::arc::StateId;
use crate::fst::Fst;
use crate::symbols::SymbolTable;
use crate::vector_fst::VectorFst;
use crate::{format, text, topsort};

/// Weight type identifiers accepted by [`AnyFst`].
pub const WEIGHT_TYPES: [&str; 11] = [
    "tropical",
    "tropical64",
    "log",
    "log64",
    "signed_log",
    "signed_log64",
    "minmax",
    "minmax64",
    "boolean",
    "left_string",
    "right_string",
];

/// A vector graph over one of the built-in weight types.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyFst {
    Tropical(VectorFst<TropicalWeight>),
    Tropical64(VectorFst<TropicalWeight64>),
    Log(VectorFst<LogWeight>),
    Log64(VectorFst<LogWeight64>),
    SignedLog(VectorFst<SignedLogWeight>),
    SignedLog64(VectorFst<SignedLogWeight64>),
    MinMax(VectorFst<MinMaxWeight>),
    MinMax64(VectorFst<MinMaxWeight64>),
    Boolean(VectorFst<BooleanWeight>),
    LeftString(VectorFst<LeftStringWeight>),
    RightString(VectorFst<RightStringWeight>),
}

/// Evaluate `$body` with `$fst` bound to the inner graph of any variant.
macro_rules! with_fst {
    ($any:expr, $fst:ident => $body:expr) => {
        match $any {
            AnyFst::Tropical($fst) => $body,
            AnyFst::Tropical64($fst) => $body,
            AnyFst::Log($fst) => $body,
            AnyFst::Log64($fst) => $body,
            AnyFst::SignedLog($fst) => $body,
            AnyFst::SignedLog64($fst) => $body,
            AnyFst::MinMax($fst) => $body,
            AnyFst::MinMax64($fst) => $body,
            AnyFst::Boolean($fst) => $body,
            AnyFst::LeftString($fst) => $body,
            AnyFst::RightString($fst) => $body,
        }
    };
}

/// Evaluate `$body` with `$w` naming the weight type called `$name` and
/// `$wrap` the matching variant constructor.
macro_rules! with_weight_type {
    ($name:expr, $w:ident, $wrap:ident => $body:expr) => {
        match $name {
            "tropical" => {
                type $w = TropicalWeight;
                let $wrap = AnyFst::Tropical;
                $body
            }
            "tropical64" => {
                type $w = TropicalWeight64;
                let $wrap = AnyFst::Tropical64;
                $body
            }
            "log" => {
                type $w = LogWeight;
                let $wrap = AnyFst::Log;
                $body
            }
            "log64" => {
                type $w = LogWeight64;
                let $wrap = AnyFst::Log64;
                $body
            }
            "signed_log" => {
                type $w = SignedLogWeight;
                let $wrap = AnyFst::SignedLog;
                $body
            }
            "signed_log64" => {
                type $w = SignedLogWeight64;
                let $wrap = AnyFst::SignedLog64;
                $body
            }
            "minmax" => {
                type $w = MinMaxWeight;
                let $wrap = AnyFst::MinMax;
                $body
            }
            "minmax64" => {
                type $w = MinMaxWeight64;
                let $wrap = AnyFst::MinMax64;
                $body
            }
            "boolean" => {
                type $w = BooleanWeight;
                let $wrap = AnyFst::Boolean;
                $body
            }
            "left_string" => {
                type $w = LeftStringWeight;
                let $wrap = AnyFst::LeftString;
                $body
            }
            "right_string" => {
                type $w = RightStringWeight;
                let $wrap = AnyFst::RightString;
                $body
            }
            other => Err(FstError::UnknownWeightType(other.to_string())),
        }
    };
}

fn weight_type_of<F: Fst>(_fst: &F) -> String {
    <F::W as Weight>::weight_type()
}

impl AnyFst {
    /// Load a serialized graph of any built-in weight type.
    pub fn from_bytes(data: &[u8]) -> Result<Self, FstError> {
        let name = format::peek_weight_type(data)?;
        with_weight_type!(name.as_str(), W, wrap => {
            Ok(wrap(format::read_fst::<W>(data)?))
        })
    }

    /// Compile AT&T text into a graph with the named weight type.
    pub fn compile_text(
        weight_type: &str,
        source: &str,
        isymbols: Option<&SymbolTable>,
        osymbols: Option<&SymbolTable>,
    ) -> Result<Self, FstError> {
        with_weight_type!(weight_type, W, wrap => {
            Ok(wrap(text::compile_text::<W>(source, isymbols, osymbols)?))
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, FstError> {
        with_fst!(self, fst => format::to_bytes(fst))
    }

    pub fn write<O: Write + ?Sized>(&self, out: &mut O) -> Result<(), FstError> {
        with_fst!(self, fst => format::write_fst(fst, out))
    }

    pub fn print_text(
        &self,
        isymbols: Option<&SymbolTable>,
        osymbols: Option<&SymbolTable>,
    ) -> Result<String, FstError> {
        with_fst!(self, fst => text::print_text(fst, isymbols, osymbols))
    }

    /// Topologically sort in place; `Ok(false)` for a cyclic graph.
    pub fn top_sort(&mut self) -> Result<bool, FstError> {
        with_fst!(self, fst => topsort::top_sort(fst))
    }

    pub fn weight_type(&self) -> String {
        with_fst!(self, fst => weight_type_of(fst))
    }

    pub fn num_states(&self) -> usize {
        with_fst!(self, fst => fst.num_states())
    }

    pub fn total_arcs(&self) -> usize {
        with_fst!(self, fst => fst.total_arcs())
    }

    pub fn start(&self) -> Option<StateId> {
        with_fst!(self, fst => fst.start())
    }
}

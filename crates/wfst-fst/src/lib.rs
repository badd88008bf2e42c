//! Weighted finite-state transducer graphs.
//!
//! A transducer is a directed graph of dense integer states. Each arc carries
//! an input label, an output label, a semiring weight (see [`wfst_weight`])
//! and a destination state. This crate provides the graph model, its binary
//! and text formats, and topological sorting.
//!
//! # Architecture
//!
//! - [`arc`] -- Arc type and its fixed-size binary record
//! - [`fst`] -- Read ([`Fst`]) and mutation ([`MutableFst`]) contracts
//! - [`vector_fst`] -- Vector-backed mutable graph
//! - [`format`] -- Binary container header and (de)serialization
//! - [`symbols`] -- Label/string symbol tables
//! - [`text`] -- AT&T text format compiler and printer
//! - [`dfs`] -- Depth-first visitation with an explicit stack
//! - [`topsort`] -- Topological sort
//! - [`any`] -- Graphs whose weight type is chosen at runtime

pub mod any;
pub mod arc;
pub mod dfs;
pub mod format;
pub mod fst;
pub mod symbols;
pub mod text;
pub mod topsort;
pub mod vector_fst;

pub use any::AnyFst;
pub use arc::{Arc, EPSILON, Label, StateId};
pub use fst::{Fst, MutableFst, is_top_sorted};
pub use symbols::SymbolTable;
pub use topsort::{top_order, top_sort};
pub use vector_fst::VectorFst;

use wfst_weight::WeightError;

/// Error type for graph mutation, serialization and parsing.
#[derive(Debug, thiserror::Error)]
pub enum FstError {
    #[error("invalid state id {0}")]
    InvalidState(StateId),
    #[error("invalid arc index {index} for state {state}")]
    InvalidArc { state: StateId, index: usize },
    #[error("state order is not a permutation of the state ids")]
    InvalidPermutation,
    #[error("invalid magic number in transducer header")]
    InvalidMagic,
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u32),
    #[error("file too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },
    #[error("truncated transducer data")]
    Truncated,
    #[error("corrupt transducer data: {0}")]
    Corrupt(String),
    #[error("unknown weight type {0:?}")]
    UnknownWeightType(String),
    #[error("weight type mismatch: expected {expected}, got {actual}")]
    WeightTypeMismatch { expected: String, actual: String },
    #[error("invalid symbol table: {0}")]
    InvalidSymbolTable(String),
    #[error("start state {0} has no arcs and is not final, so it cannot be written as text")]
    UnprintableStart(StateId),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error(transparent)]
    Weight(#[from] WeightError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

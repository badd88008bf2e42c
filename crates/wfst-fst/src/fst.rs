// Read and mutation contracts for transducer graphs.

use std::ops::Range;
use std::slice;

use wfst_weight::Weight;

use crate::FstError;
use crate::arc::{Arc, StateId};

/// Read access to a transducer graph.
///
/// States are the dense ids `0..num_states()`. Accessors that take a state
/// id return [`FstError::InvalidState`] for ids outside that range.
pub trait Fst {
    type W: Weight;

    /// The start state, or `None` for a graph without one.
    fn start(&self) -> Option<StateId>;

    /// Final weight of `s`; `None` when `s` is not final.
    fn final_weight(&self, s: StateId) -> Result<Option<&Self::W>, FstError>;

    fn num_states(&self) -> usize;

    fn num_arcs(&self, s: StateId) -> Result<usize, FstError>;

    /// Outgoing arcs of `s` in insertion order.
    fn arcs(&self, s: StateId) -> Result<slice::Iter<'_, Arc<Self::W>>, FstError>;

    fn states(&self) -> Range<StateId> {
        0..self.num_states() as StateId
    }

    fn is_final(&self, s: StateId) -> Result<bool, FstError> {
        Ok(self.final_weight(s)?.is_some())
    }

    /// Number of arcs over all states.
    fn total_arcs(&self) -> usize {
        self.states()
            .map(|s| self.num_arcs(s).unwrap_or(0))
            .sum()
    }
}

/// In-place mutation of a transducer graph.
///
/// Every operation validates the state ids it names, including arc
/// destinations, and leaves the graph untouched when it returns an error.
pub trait MutableFst: Fst {
    /// Append a new non-final state without arcs and return its id.
    fn add_state(&mut self) -> StateId;

    /// Append `arc` to the arcs of `s`.
    fn add_arc(&mut self, s: StateId, arc: Arc<Self::W>) -> Result<(), FstError>;

    fn set_start(&mut self, s: StateId) -> Result<(), FstError>;

    /// Make `s` final with weight `w`. An explicit `zero()` weight still
    /// marks the state final.
    fn set_final(&mut self, s: StateId, w: Self::W) -> Result<(), FstError>;

    fn delete_final(&mut self, s: StateId) -> Result<(), FstError>;

    /// Delete the given states and every arc into them.
    ///
    /// Survivors are renumbered densely in their previous relative order.
    /// Deleting the start state leaves the graph without a start.
    fn delete_states(&mut self, ids: &[StateId]) -> Result<(), FstError>;

    fn delete_all_states(&mut self);

    /// Delete the arcs of `s` at `indices`, or all of them for `None`.
    fn delete_arcs(&mut self, s: StateId, indices: Option<&[usize]>) -> Result<(), FstError>;

    /// Renumber every state through `order[old] = new`.
    ///
    /// `order` must be a permutation of `0..num_states()`; otherwise
    /// [`FstError::InvalidPermutation`] is returned.
    fn state_sort(&mut self, order: &[StateId]) -> Result<(), FstError>;
}

/// Whether every arc leads from a smaller to a strictly larger state id.
pub fn is_top_sorted<F: Fst + ?Sized>(fst: &F) -> Result<bool, FstError> {
    for s in fst.states() {
        if fst.arcs(s)?.any(|arc| arc.nextstate <= s) {
            return Ok(false);
        }
    }
    Ok(true)
}

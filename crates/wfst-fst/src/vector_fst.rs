// Vector-backed mutable transducer.
//
// States live in a single `Vec` addressed by id and arcs refer to their
// destination by id, so renumbering states is a relabeling pass over the
// store with no pointer fixups.

use std::slice;

use wfst_weight::Weight;

use crate::FstError;
use crate::arc::{Arc, StateId};
use crate::fst::{Fst, MutableFst};

#[derive(Debug, Clone, PartialEq)]
struct VectorState<W> {
    final_weight: Option<W>,
    arcs: Vec<Arc<W>>,
}

impl<W> Default for VectorState<W> {
    fn default() -> Self {
        Self {
            final_weight: None,
            arcs: Vec::new(),
        }
    }
}

/// Mutable transducer storing states and arcs in vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorFst<W> {
    states: Vec<VectorState<W>>,
    start: Option<StateId>,
}

impl<W: Weight> Default for VectorFst<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Weight> VectorFst<W> {
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            start: None,
        }
    }

    /// Empty graph with room for `n` states.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            states: Vec::with_capacity(n),
            start: None,
        }
    }

    fn state(&self, s: StateId) -> Result<&VectorState<W>, FstError> {
        self.states
            .get(s as usize)
            .ok_or(FstError::InvalidState(s))
    }

    fn state_mut(&mut self, s: StateId) -> Result<&mut VectorState<W>, FstError> {
        self.states
            .get_mut(s as usize)
            .ok_or(FstError::InvalidState(s))
    }

    fn check_state(&self, s: StateId) -> Result<(), FstError> {
        self.state(s).map(|_| ())
    }
}

impl<W: Weight> Fst for VectorFst<W> {
    type W = W;

    fn start(&self) -> Option<StateId> {
        self.start
    }

    fn final_weight(&self, s: StateId) -> Result<Option<&W>, FstError> {
        Ok(self.state(s)?.final_weight.as_ref())
    }

    fn num_states(&self) -> usize {
        self.states.len()
    }

    fn num_arcs(&self, s: StateId) -> Result<usize, FstError> {
        Ok(self.state(s)?.arcs.len())
    }

    fn arcs(&self, s: StateId) -> Result<slice::Iter<'_, Arc<W>>, FstError> {
        Ok(self.state(s)?.arcs.iter())
    }

    fn total_arcs(&self) -> usize {
        self.states.iter().map(|state| state.arcs.len()).sum()
    }
}

impl<W: Weight> MutableFst for VectorFst<W> {
    fn add_state(&mut self) -> StateId {
        self.states.push(VectorState::default());
        (self.states.len() - 1) as StateId
    }

    fn add_arc(&mut self, s: StateId, arc: Arc<W>) -> Result<(), FstError> {
        self.check_state(arc.nextstate)?;
        self.state_mut(s)?.arcs.push(arc);
        Ok(())
    }

    fn set_start(&mut self, s: StateId) -> Result<(), FstError> {
        self.check_state(s)?;
        self.start = Some(s);
        Ok(())
    }

    fn set_final(&mut self, s: StateId, w: W) -> Result<(), FstError> {
        self.state_mut(s)?.final_weight = Some(w);
        Ok(())
    }

    fn delete_final(&mut self, s: StateId) -> Result<(), FstError> {
        self.state_mut(s)?.final_weight = None;
        Ok(())
    }

    fn delete_states(&mut self, ids: &[StateId]) -> Result<(), FstError> {
        for &s in ids {
            self.check_state(s)?;
        }

        let mut new_id: Vec<Option<StateId>> = vec![Some(0); self.states.len()];
        for &s in ids {
            new_id[s as usize] = None;
        }
        let mut next: StateId = 0;
        for id in new_id.iter_mut().flatten() {
            *id = next;
            next += 1;
        }

        let old_states = std::mem::take(&mut self.states);
        self.states = old_states
            .into_iter()
            .zip(&new_id)
            .filter(|(_, id)| id.is_some())
            .map(|(mut state, _)| {
                state.arcs.retain_mut(|arc| match new_id[arc.nextstate as usize] {
                    Some(dest) => {
                        arc.nextstate = dest;
                        true
                    }
                    None => false,
                });
                state
            })
            .collect();
        self.start = self.start.and_then(|s| new_id[s as usize]);

        tracing::debug!(
            deleted = new_id.len() - self.states.len(),
            remaining = self.states.len(),
            "deleted states"
        );
        Ok(())
    }

    fn delete_all_states(&mut self) {
        self.states.clear();
        self.start = None;
    }

    fn delete_arcs(&mut self, s: StateId, indices: Option<&[usize]>) -> Result<(), FstError> {
        let state = self.state_mut(s)?;
        let Some(indices) = indices else {
            state.arcs.clear();
            return Ok(());
        };

        let mut keep = vec![true; state.arcs.len()];
        for &index in indices {
            match keep.get_mut(index) {
                Some(slot) => *slot = false,
                None => return Err(FstError::InvalidArc { state: s, index }),
            }
        }
        let mut flags = keep.into_iter();
        state.arcs.retain(|_| flags.next().unwrap_or(true));
        Ok(())
    }

    fn state_sort(&mut self, order: &[StateId]) -> Result<(), FstError> {
        let n = self.states.len();
        if order.len() != n {
            return Err(FstError::InvalidPermutation);
        }
        let mut seen = vec![false; n];
        for &new in order {
            match seen.get_mut(new as usize) {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(FstError::InvalidPermutation),
            }
        }

        let mut sorted: Vec<VectorState<W>> = (0..n).map(|_| VectorState::default()).collect();
        for (old, mut state) in std::mem::take(&mut self.states).into_iter().enumerate() {
            for arc in &mut state.arcs {
                arc.nextstate = order[arc.nextstate as usize];
            }
            sorted[order[old] as usize] = state;
        }
        self.states = sorted;
        self.start = self.start.map(|s| order[s as usize]);
        Ok(())
    }
}

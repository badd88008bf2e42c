// Topological sort.
//
// A depth-first search records states in finishing order. If no back arc is
// seen the graph is acyclic and the reverse finishing order is a
// topological order, which is then applied by renumbering the states.

use wfst_weight::Weight;

use crate::FstError;
use crate::arc::{Arc, StateId};
use crate::dfs::{Visitor, dfs_visit};
use crate::fst::{Fst, MutableFst, is_top_sorted};

/// Collects finishing order and stops at the first back arc.
struct TopOrderVisitor {
    finished: Vec<StateId>,
    acyclic: bool,
}

impl TopOrderVisitor {
    fn new(num_states: usize) -> Self {
        Self {
            finished: Vec::with_capacity(num_states),
            acyclic: true,
        }
    }
}

impl<W: Weight> Visitor<W> for TopOrderVisitor {
    fn back_arc(&mut self, s: StateId, arc: &Arc<W>) -> bool {
        tracing::debug!(from = s, to = arc.nextstate, "back arc, graph is cyclic");
        self.acyclic = false;
        false
    }

    fn finish_state(&mut self, s: StateId, _parent: Option<StateId>) {
        self.finished.push(s);
    }
}

/// Topological rank of every state, indexed by state id.
///
/// Returns `None` when the graph has a cycle. The graph is not modified.
pub fn top_order<F: Fst + ?Sized>(fst: &F) -> Result<Option<Vec<StateId>>, FstError> {
    let mut visitor = TopOrderVisitor::new(fst.num_states());
    dfs_visit(fst, &mut visitor)?;
    if !visitor.acyclic {
        return Ok(None);
    }

    let n = visitor.finished.len();
    let mut order = vec![0; n];
    for (k, &s) in visitor.finished.iter().enumerate() {
        order[s as usize] = (n - 1 - k) as StateId;
    }
    Ok(Some(order))
}

/// Renumber the states of an acyclic graph so that every arc goes from a
/// smaller to a larger state id.
///
/// Returns `Ok(true)` when the graph is acyclic (and is now sorted) and
/// `Ok(false)` when it has a cycle, in which case the graph is left
/// untouched. A graph that is already sorted is not renumbered, so sorting
/// twice gives the same result as sorting once.
pub fn top_sort<F: MutableFst + ?Sized>(fst: &mut F) -> Result<bool, FstError> {
    if is_top_sorted(&*fst)? {
        tracing::debug!(states = fst.num_states(), "already sorted");
        return Ok(true);
    }

    match top_order(&*fst)? {
        Some(order) => {
            fst.state_sort(&order)?;
            tracing::debug!(states = fst.num_states(), "sorted states");
            Ok(true)
        }
        None => Ok(false),
    }
}

// Depth-first visitation with an explicit stack.
//
// States are coloured white (unvisited), grey (on the stack) or black
// (finished). Each arc is classified by the colour of its destination and
// reported to a `Visitor`. Roots are taken from the start state first, then
// from every remaining white state in id order, so disconnected parts of the
// graph are visited too.

use wfst_weight::Weight;

use crate::FstError;
use crate::arc::{Arc, StateId};
use crate::fst::Fst;

/// Callbacks for [`dfs_visit`].
///
/// Returning `false` from a hook stops the search. States still on the
/// stack are then finished before [`Visitor::finish_visit`] is called.
pub trait Visitor<W: Weight> {
    /// `s` is discovered, as part of the tree rooted at `root`.
    fn init_state(&mut self, _s: StateId, _root: StateId) -> bool {
        true
    }

    /// Arc to an undiscovered state.
    fn tree_arc(&mut self, _s: StateId, _arc: &Arc<W>) -> bool {
        true
    }

    /// Arc to a state on the current path (including self-loops).
    fn back_arc(&mut self, _s: StateId, _arc: &Arc<W>) -> bool {
        true
    }

    /// Arc to an already finished state.
    fn forward_or_cross_arc(&mut self, _s: StateId, _arc: &Arc<W>) -> bool {
        true
    }

    /// All arcs of `s` are explored. `parent` is the state that discovered
    /// it, `None` for a root.
    fn finish_state(&mut self, _s: StateId, _parent: Option<StateId>) {}

    fn finish_visit(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Grey,
    Black,
}

/// A state on the DFS stack and the index of its next unexplored arc.
#[derive(Debug, Clone, Copy)]
struct DfsFrame {
    state: StateId,
    next_arc: usize,
}

/// Visit every state of `fst` depth-first, reporting to `visitor`.
///
/// Runs in O(states + arcs) time with O(states) auxiliary space; the stack
/// lives on the heap, so graph depth is not limited by the call stack.
pub fn dfs_visit<F, V>(fst: &F, visitor: &mut V) -> Result<(), FstError>
where
    F: Fst + ?Sized,
    V: Visitor<F::W>,
{
    let mut color = vec![Color::White; fst.num_states()];
    let mut stack: Vec<DfsFrame> = Vec::new();
    let mut running = true;

    let roots = fst.start().into_iter().chain(fst.states());
    for root in roots {
        if !running {
            break;
        }
        if color_of(&color, root)? != Color::White {
            continue;
        }
        color[root as usize] = Color::Grey;
        if !visitor.init_state(root, root) {
            running = false;
        }
        stack.push(DfsFrame {
            state: root,
            next_arc: 0,
        });

        while let Some(&DfsFrame { state: s, next_arc }) = stack.last() {
            let arcs = fst.arcs(s)?.as_slice();
            let next = if running { arcs.get(next_arc) } else { None };
            let Some(arc) = next else {
                color[s as usize] = Color::Black;
                stack.pop();
                visitor.finish_state(s, stack.last().map(|frame| frame.state));
                continue;
            };

            if let Some(top) = stack.last_mut() {
                top.next_arc += 1;
            }

            match color_of(&color, arc.nextstate)? {
                Color::White => {
                    if !visitor.tree_arc(s, arc) {
                        running = false;
                        continue;
                    }
                    color[arc.nextstate as usize] = Color::Grey;
                    if !visitor.init_state(arc.nextstate, root) {
                        running = false;
                    }
                    stack.push(DfsFrame {
                        state: arc.nextstate,
                        next_arc: 0,
                    });
                }
                Color::Grey => running = visitor.back_arc(s, arc),
                Color::Black => running = visitor.forward_or_cross_arc(s, arc),
            }
        }
    }

    visitor.finish_visit();
    Ok(())
}

fn color_of(color: &[Color], s: StateId) -> Result<Color, FstError> {
    color.get(s as usize).copied().ok_or(FstError::InvalidState(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst::MutableFst;
    use crate::vector_fst::VectorFst;
    use wfst_weight::TropicalWeight;

    #[derive(Debug, Default, PartialEq)]
    struct Recorder {
        events: Vec<String>,
        stop_on_back_arc: bool,
    }

    impl Visitor<TropicalWeight> for Recorder {
        fn init_state(&mut self, s: StateId, root: StateId) -> bool {
            self.events.push(format!("init {s} root {root}"));
            true
        }

        fn tree_arc(&mut self, s: StateId, arc: &Arc<TropicalWeight>) -> bool {
            self.events.push(format!("tree {s}->{}", arc.nextstate));
            true
        }

        fn back_arc(&mut self, s: StateId, arc: &Arc<TropicalWeight>) -> bool {
            self.events.push(format!("back {s}->{}", arc.nextstate));
            !self.stop_on_back_arc
        }

        fn forward_or_cross_arc(&mut self, s: StateId, arc: &Arc<TropicalWeight>) -> bool {
            self.events.push(format!("cross {s}->{}", arc.nextstate));
            true
        }

        fn finish_state(&mut self, s: StateId, parent: Option<StateId>) {
            self.events.push(format!("finish {s} parent {parent:?}"));
        }

        fn finish_visit(&mut self) {
            self.events.push("done".to_string());
        }
    }

    fn graph(n: usize, start: Option<StateId>, arcs: &[(StateId, StateId)]) -> VectorFst<TropicalWeight> {
        let mut fst = VectorFst::new();
        for _ in 0..n {
            fst.add_state();
        }
        if let Some(s) = start {
            fst.set_start(s).unwrap();
        }
        for &(src, dst) in arcs {
            fst.add_arc(src, Arc::new(1, 1, TropicalWeight::one(), dst))
                .unwrap();
        }
        fst
    }

    #[test]
    fn classifies_arcs() {
        // 0 -> 1 -> 2, 0 -> 2 (forward), 2 -> 1 (back)
        let fst = graph(3, Some(0), &[(0, 1), (1, 2), (0, 2), (2, 1)]);
        let mut rec = Recorder::default();
        dfs_visit(&fst, &mut rec).unwrap();
        assert_eq!(
            rec.events,
            vec![
                "init 0 root 0",
                "tree 0->1",
                "init 1 root 0",
                "tree 1->2",
                "init 2 root 0",
                "back 2->1",
                "finish 2 parent Some(1)",
                "finish 1 parent Some(0)",
                "cross 0->2",
                "finish 0 parent None",
                "done",
            ]
        );
    }

    #[test]
    fn visits_start_first_then_remaining_states() {
        let fst = graph(3, Some(2), &[(0, 1)]);
        let mut rec = Recorder::default();
        dfs_visit(&fst, &mut rec).unwrap();
        let inits: Vec<_> = rec
            .events
            .iter()
            .filter(|e| e.starts_with("init"))
            .cloned()
            .collect();
        assert_eq!(inits, vec!["init 2 root 2", "init 0 root 0", "init 1 root 0"]);
    }

    #[test]
    fn self_loop_is_back_arc() {
        let fst = graph(1, None, &[(0, 0)]);
        let mut rec = Recorder::default();
        dfs_visit(&fst, &mut rec).unwrap();
        assert!(rec.events.contains(&"back 0->0".to_string()));
    }

    #[test]
    fn stopping_finishes_stack_and_skips_other_roots() {
        let fst = graph(4, Some(0), &[(0, 1), (1, 0), (1, 2)]);
        let mut rec = Recorder {
            stop_on_back_arc: true,
            ..Recorder::default()
        };
        dfs_visit(&fst, &mut rec).unwrap();
        assert_eq!(
            rec.events,
            vec![
                "init 0 root 0",
                "tree 0->1",
                "init 1 root 0",
                "back 1->0",
                "finish 1 parent Some(0)",
                "finish 0 parent None",
                "done",
            ]
        );
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        let n = 200_000;
        let arcs: Vec<_> = (1..n as StateId).map(|s| (s - 1, s)).collect();
        let fst = graph(n, Some(0), &arcs);
        let mut rec = Recorder::default();
        dfs_visit(&fst, &mut rec).unwrap();
        assert_eq!(rec.events.last().map(String::as_str), Some("done"));
    }
}

// AT&T text format.
//
// One line per arc (`src dst ilabel olabel [weight]`) or final state
// (`state [weight]`), fields separated by whitespace. The source of the first
// line is the start state and an omitted weight means `one()`. Labels are
// integers, or symbols when a symbol table is supplied. State ids in the
// text are names: the compiler numbers states densely in order of first
// mention.

use std::fmt::Write as _;

use hashbrown::HashMap;
use wfst_weight::{TextFormat, Weight};

use crate::FstError;
use crate::arc::{Arc, Label, StateId};
use crate::fst::{Fst, MutableFst};
use crate::symbols::SymbolTable;
use crate::vector_fst::VectorFst;

/// Compile AT&T text into a graph.
///
/// A state is created the first time its id appears, so the graph holds
/// exactly the states the text mentions and ids are renumbered from 0 in
/// order of appearance. The start state is therefore always state 0. Empty
/// text yields an empty graph without a start state.
pub fn compile_text<W: Weight>(
    text: &str,
    isymbols: Option<&SymbolTable>,
    osymbols: Option<&SymbolTable>,
) -> Result<VectorFst<W>, FstError> {
    let format = TextFormat::default();
    let mut fst = VectorFst::new();
    let mut states: HashMap<StateId, StateId> = HashMap::new();

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        let parse_error = |message: String| FstError::Parse {
            line: line_no,
            message,
        };

        let weight = |field: Option<&&str>| -> Result<W, FstError> {
            match field {
                Some(text) => W::parse_text(text, &format).map_err(|e| parse_error(e.to_string())),
                None => Ok(W::one()),
            }
        };

        match fields.len() {
            0 => continue,
            1 | 2 => {
                let s = parse_state(fields[0]).map_err(parse_error)?;
                let s = state_for(&mut fst, &mut states, s);
                if fst.start().is_none() {
                    fst.set_start(s)?;
                }
                fst.set_final(s, weight(fields.get(1))?)?;
            }
            4 | 5 => {
                let src = parse_state(fields[0]).map_err(parse_error)?;
                let dst = parse_state(fields[1]).map_err(parse_error)?;
                let ilabel = parse_label(fields[2], isymbols).map_err(parse_error)?;
                let olabel = parse_label(fields[3], osymbols).map_err(parse_error)?;
                let src = state_for(&mut fst, &mut states, src);
                let dst = state_for(&mut fst, &mut states, dst);
                if fst.start().is_none() {
                    fst.set_start(src)?;
                }
                fst.add_arc(src, Arc::new(ilabel, olabel, weight(fields.get(4))?, dst))?;
            }
            n => return Err(parse_error(format!("expected 1, 2, 4 or 5 fields, found {n}"))),
        }
    }

    tracing::debug!(
        states = fst.num_states(),
        arcs = fst.total_arcs(),
        "compiled text transducer"
    );
    Ok(fst)
}

/// Graph state for text id `name`, added on first sight.
fn state_for<W: Weight>(
    fst: &mut VectorFst<W>,
    states: &mut HashMap<StateId, StateId>,
    name: StateId,
) -> StateId {
    *states.entry(name).or_insert_with(|| fst.add_state())
}

fn parse_state(field: &str) -> Result<StateId, String> {
    field
        .parse()
        .map_err(|_| format!("invalid state id {field:?}"))
}

fn parse_label(field: &str, symbols: Option<&SymbolTable>) -> Result<Label, String> {
    match symbols {
        Some(table) => table
            .find_label(field)
            .ok_or_else(|| format!("symbol {field:?} not in symbol table")),
        None => field
            .parse()
            .map_err(|_| format!("invalid label {field:?}")),
    }
}

/// Print a graph in AT&T text form.
///
/// The start state is printed first, then the other states in id order.
/// Each state's arcs precede its final line. Weights equal to `one()` are
/// omitted. A graph without a start state prints as the empty string.
///
/// The first line names the start state, so a start state with no arcs that
/// is not final cannot be printed once any other state has a line:
/// [`FstError::UnprintableStart`]. If no state has a line the output is
/// empty.
pub fn print_text<F: Fst + ?Sized>(
    fst: &F,
    isymbols: Option<&SymbolTable>,
    osymbols: Option<&SymbolTable>,
) -> Result<String, FstError> {
    let mut out = String::new();
    let Some(start) = fst.start() else {
        return Ok(out);
    };
    let format = TextFormat::default();

    let order = std::iter::once(start).chain(fst.states().filter(|&s| s != start));
    let mut start_printed = false;
    for s in order {
        let before = out.len();
        for arc in fst.arcs(s)? {
            let ilabel = print_label(arc.ilabel, isymbols)?;
            let olabel = print_label(arc.olabel, osymbols)?;
            let _ = write!(out, "{s}\t{}\t{ilabel}\t{olabel}", arc.nextstate);
            if !arc.weight.is_one() {
                let _ = write!(out, "\t{}", arc.weight.to_text(&format));
            }
            out.push('\n');
        }
        if let Some(w) = fst.final_weight(s)? {
            let _ = write!(out, "{s}");
            if !w.is_one() {
                let _ = write!(out, "\t{}", w.to_text(&format));
            }
            out.push('\n');
        }
        if s == start {
            start_printed = out.len() > before;
        }
    }

    if !start_printed && !out.is_empty() {
        return Err(FstError::UnprintableStart(start));
    }
    Ok(out)
}

fn print_label(label: Label, symbols: Option<&SymbolTable>) -> Result<String, FstError> {
    match symbols {
        Some(table) => table
            .find_symbol(label)
            .map(str::to_string)
            .ok_or_else(|| FstError::InvalidSymbolTable(format!("label {label} has no symbol"))),
        None => Ok(label.to_string()),
    }
}

// Symbol tables: label-to-string and string-to-label mapping.

use std::io::{self, Write};

use hashbrown::HashMap;

use crate::FstError;
use crate::arc::Label;

/// Bidirectional mapping between labels and printable symbols.
///
/// The text form has one `symbol<whitespace>label` pair per line, for
/// example `<eps>	0`. Symbols may not contain whitespace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    /// Maps label to its symbol string.
    label_to_symbol: HashMap<Label, String>,
    /// Maps symbol string to its label.
    symbol_to_label: HashMap<String, Label>,
    /// Label handed out by the next [`SymbolTable::add_symbol`].
    available_label: Label,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `symbol` with the next free label, or return its existing label.
    pub fn add_symbol(&mut self, symbol: &str) -> Label {
        if let Some(&label) = self.symbol_to_label.get(symbol) {
            return label;
        }
        let label = self.available_label;
        self.insert(symbol, label);
        label
    }

    /// Add `symbol` under an explicit `label`.
    ///
    /// Re-adding an identical pair is a no-op. Binding a known symbol to a
    /// different label, or a used label to a different symbol, is an error.
    pub fn add_symbol_with_label(&mut self, symbol: &str, label: Label) -> Result<Label, FstError> {
        match (self.symbol_to_label.get(symbol), self.label_to_symbol.get(&label)) {
            (Some(&existing), _) if existing == label => Ok(label),
            (Some(&existing), _) => Err(FstError::InvalidSymbolTable(format!(
                "symbol {symbol:?} already has label {existing}"
            ))),
            (None, Some(other)) => Err(FstError::InvalidSymbolTable(format!(
                "label {label} already names {other:?}"
            ))),
            (None, None) => {
                self.insert(symbol, label);
                Ok(label)
            }
        }
    }

    fn insert(&mut self, symbol: &str, label: Label) {
        self.label_to_symbol.insert(label, symbol.to_string());
        self.symbol_to_label.insert(symbol.to_string(), label);
        if label >= self.available_label {
            self.available_label = label.saturating_add(1);
        }
    }

    pub fn find_label(&self, symbol: &str) -> Option<Label> {
        self.symbol_to_label.get(symbol).copied()
    }

    pub fn find_symbol(&self, label: Label) -> Option<&str> {
        self.label_to_symbol.get(&label).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.label_to_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.label_to_symbol.is_empty()
    }

    /// `(label, symbol)` pairs in increasing label order.
    pub fn entries(&self) -> Vec<(Label, &str)> {
        let mut entries: Vec<_> = self
            .label_to_symbol
            .iter()
            .map(|(&label, symbol)| (label, symbol.as_str()))
            .collect();
        entries.sort_unstable_by_key(|&(label, _)| label);
        entries
    }

    /// Parse the text form. Blank lines are skipped.
    pub fn read_text(text: &str) -> Result<Self, FstError> {
        let mut table = Self::new();
        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            let mut fields = line.split_whitespace();
            let (Some(symbol), label) = (fields.next(), fields.next()) else {
                continue;
            };
            let label = label
                .and_then(|l| l.parse::<Label>().ok())
                .ok_or_else(|| {
                    FstError::InvalidSymbolTable(format!("line {line_no}: expected `symbol label`"))
                })?;
            if fields.next().is_some() {
                return Err(FstError::InvalidSymbolTable(format!(
                    "line {line_no}: too many fields"
                )));
            }
            table.add_symbol_with_label(symbol, label)?;
        }
        Ok(table)
    }

    /// Write the text form in increasing label order.
    pub fn write_text<O: Write + ?Sized>(&self, out: &mut O) -> io::Result<()> {
        for (label, symbol) in self.entries() {
            writeln!(out, "{symbol}\t{label}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_symbol_assigns_sequential_labels() {
        let mut table = SymbolTable::new();
        assert_eq!(table.add_symbol("<eps>"), 0);
        assert_eq!(table.add_symbol("a"), 1);
        assert_eq!(table.add_symbol("b"), 2);
        assert_eq!(table.add_symbol("a"), 1);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn explicit_labels_move_the_counter() {
        let mut table = SymbolTable::new();
        table.add_symbol_with_label("x", 10).unwrap();
        assert_eq!(table.add_symbol("y"), 11);
        assert_eq!(table.add_symbol_with_label("x", 10).unwrap(), 10);
    }

    #[test]
    fn conflicting_bindings_are_rejected() {
        let mut table = SymbolTable::new();
        table.add_symbol_with_label("a", 1).unwrap();
        assert!(table.add_symbol_with_label("a", 2).is_err());
        assert!(table.add_symbol_with_label("b", 1).is_err());
    }

    #[test]
    fn lookups() {
        let mut table = SymbolTable::new();
        table.add_symbol("<eps>");
        table.add_symbol("\u{00e4}");
        assert_eq!(table.find_label("\u{00e4}"), Some(1));
        assert_eq!(table.find_symbol(0), Some("<eps>"));
        assert_eq!(table.find_symbol(7), None);
        assert_eq!(table.find_label("z"), None);
    }

    #[test]
    fn text_round_trip() {
        let text = "<eps>\t0\nb 2\n\na\t1\n";
        let table = SymbolTable::read_text(text).unwrap();
        assert_eq!(table.len(), 3);

        let mut out = Vec::new();
        table.write_text(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "<eps>\t0\na\t1\nb\t2\n");
    }

    #[test]
    fn reject_malformed_text() {
        assert!(SymbolTable::read_text("a\n").is_err());
        assert!(SymbolTable::read_text("a x\n").is_err());
        assert!(SymbolTable::read_text("a 1 2\n").is_err());
        assert!(SymbolTable::read_text("a 1\nb 1\n").is_err());
    }
}

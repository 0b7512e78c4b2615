//! Context-free grammar store.
//!
//! A `Grammar` is read-only after [`Grammar::load`]: the engine may share one
//! instance by reference across any number of independent parse runs.
//!
//! Alternatives carry a *globally* unique id, assigned by a single counter in
//! file-appearance order across the whole rule set (never restarted per
//! non-terminal). Backtracking order depends on this exact numbering, so it is
//! part of the grammar contract, not an implementation detail.
//!
//! Grammar file format:
//!
//! ```text
//! N = S, A          non-terminals
//! T = a, b          terminals
//! S = S             start symbol
//! P =               rule-section header (content ignored)
//! S -> a$A          one rule per line; rhs symbols joined by `$`,
//! A -> b | a$A      alternatives separated by `|`
//! ```
//!
//! A trailing comma on a symbol-list line declares the comma itself as a
//! symbol, so grammars over punctuation alphabets remain expressible.

use std::collections::HashMap;

use crate::errors::{to_error_source, DescentError, Span};

/// One right-hand-side choice for a non-terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternative {
    /// Globally unique, ascending id in file-appearance order.
    pub id: usize,
    /// Right-hand-side symbols, leftmost first. Never empty.
    pub rhs: Vec<String>,
}

/// A context-free grammar: symbol sets, start symbol, and the production
/// table keyed by non-terminal.
#[derive(Debug, Clone)]
pub struct Grammar {
    non_terminals: Vec<String>,
    terminals: Vec<String>,
    start_symbol: String,
    /// Each list is ordered by ascending alternative id.
    rules: HashMap<String, Vec<Alternative>>,
}

impl Grammar {
    /// Loads and validates a grammar file.
    pub fn load(path: &std::path::Path) -> Result<Self, DescentError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DescentError::io(path.display(), e))?;
        Self::from_source(&path.display().to_string(), &text)
    }

    /// Parses and validates grammar source text. All failures are
    /// `DescentError::Grammar` diagnostics with a span on the offending line.
    pub fn from_source(name: &str, text: &str) -> Result<Self, DescentError> {
        let src = to_error_source(name, text);
        let lines = line_spans(text);

        if lines.len() < 4 {
            return Err(DescentError::grammar(
                "grammar file must have non-terminal, terminal, start-symbol and rule-section lines",
                src,
                Span::new(0, text.len()),
            ));
        }

        let non_terminals = parse_symbol_list(&lines[0], &src)?;
        let terminals = parse_symbol_list(&lines[1], &src)?;
        let start_symbol = parse_start_symbol(&lines[2], &src)?;
        // lines[3] is the rule-section header; its content is ignored.

        if !non_terminals.contains(&start_symbol) {
            return Err(DescentError::grammar(
                format!("start symbol `{start_symbol}` is not a declared non-terminal"),
                src,
                lines[2].span(),
            ));
        }

        let mut rules: HashMap<String, Vec<Alternative>> = HashMap::new();
        let mut next_id = 1usize;

        for line in &lines[4..] {
            if line.text.trim().is_empty() {
                continue;
            }
            let (lhs, alternatives) = parse_rule(line, &non_terminals, &src)?;
            let entry = rules.entry(lhs).or_default();
            for rhs in alternatives {
                entry.push(Alternative { id: next_id, rhs });
                next_id += 1;
            }
        }

        for nt in &non_terminals {
            if rules.get(nt).map_or(true, Vec::is_empty) {
                return Err(DescentError::grammar(
                    format!("non-terminal `{nt}` has no production"),
                    src,
                    lines[0].span(),
                ));
            }
        }

        Ok(Self {
            non_terminals,
            terminals,
            start_symbol,
            rules,
        })
    }

    pub fn non_terminals(&self) -> &[String] {
        &self.non_terminals
    }

    pub fn terminals(&self) -> &[String] {
        &self.terminals
    }

    pub fn start_symbol(&self) -> &str {
        &self.start_symbol
    }

    pub fn is_non_terminal(&self, symbol: &str) -> bool {
        self.non_terminals.iter().any(|nt| nt == symbol)
    }

    /// The ordered (ascending-id) alternative list for a non-terminal.
    /// Validation guarantees a non-empty list for every declared non-terminal.
    pub fn alternatives_for(&self, non_terminal: &str) -> &[Alternative] {
        self.rules
            .get(non_terminal)
            .map_or(&[], |alternatives| alternatives.as_slice())
    }

    /// True iff `id` is not the last alternative in the non-terminal's list.
    pub fn has_next_alternative(&self, non_terminal: &str, id: usize) -> bool {
        self.alternatives_for(non_terminal)
            .last()
            .is_some_and(|last| last.id != id)
    }

    /// The alternative with exactly this id. `None` only on a caller bug;
    /// the engine maps it to an internal error.
    pub fn alternative_at(&self, non_terminal: &str, id: usize) -> Option<&Alternative> {
        self.alternatives_for(non_terminal)
            .iter()
            .find(|alternative| alternative.id == id)
    }

    /// The successor of `id` in the non-terminal's ordered list. Its id is
    /// the next-higher id belonging to that non-terminal.
    pub fn next_alternative(&self, non_terminal: &str, id: usize) -> Option<&Alternative> {
        let alternatives = self.alternatives_for(non_terminal);
        let position = alternatives.iter().position(|a| a.id == id)?;
        alternatives.get(position + 1)
    }

    /// Every production as `(lhs, alternative)`, ordered by global id.
    /// Used by the CLI grammar display.
    pub fn productions(&self) -> Vec<(&str, &Alternative)> {
        let mut all: Vec<(&str, &Alternative)> = self
            .rules
            .iter()
            .flat_map(|(lhs, alts)| alts.iter().map(move |a| (lhs.as_str(), a)))
            .collect();
        all.sort_by_key(|(_, alternative)| alternative.id);
        all
    }
}

/// A source line together with its byte offset, for diagnostic spans.
struct Line<'a> {
    text: &'a str,
    start: usize,
}

impl Line<'_> {
    fn span(&self) -> Span {
        Span::new(self.start, self.start + self.text.trim_end().len())
    }
}

fn line_spans(text: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;
    for raw in text.split('\n') {
        lines.push(Line { text: raw, start });
        start += raw.len() + 1;
    }
    lines
}

/// Parses a `X = a, b, c` header into its symbol list.
fn parse_symbol_list(
    line: &Line<'_>,
    src: &crate::errors::SourceArc,
) -> Result<Vec<String>, DescentError> {
    let Some((_, list)) = line.text.split_once('=') else {
        return Err(DescentError::grammar(
            "expected a `name = symbol, symbol, ...` header line",
            src.clone(),
            line.span(),
        ));
    };
    let mut symbols: Vec<String> = list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    // `N = a, b,` declares the comma itself as a symbol.
    if list.trim_end().ends_with(',') {
        symbols.push(",".to_string());
    }
    if symbols.is_empty() {
        return Err(DescentError::grammar(
            "symbol list is empty",
            src.clone(),
            line.span(),
        ));
    }
    Ok(symbols)
}

fn parse_start_symbol(
    line: &Line<'_>,
    src: &crate::errors::SourceArc,
) -> Result<String, DescentError> {
    let Some((_, start)) = line.text.split_once('=') else {
        return Err(DescentError::grammar(
            "expected a `S = symbol` start-symbol line",
            src.clone(),
            line.span(),
        ));
    };
    let start = start.trim();
    if start.is_empty() {
        return Err(DescentError::grammar(
            "start symbol is empty",
            src.clone(),
            line.span(),
        ));
    }
    Ok(start.to_string())
}

/// Parses one `LHS -> rhs | rhs` rule line into its LHS and the rhs symbol
/// sequences, in appearance order.
fn parse_rule(
    line: &Line<'_>,
    non_terminals: &[String],
    src: &crate::errors::SourceArc,
) -> Result<(String, Vec<Vec<String>>), DescentError> {
    let Some((lhs, rhs)) = line.text.split_once("->") else {
        return Err(DescentError::grammar(
            "expected a `LHS -> rhs` rule line",
            src.clone(),
            line.span(),
        ));
    };

    let lhs = lhs.trim();
    if !non_terminals.iter().any(|nt| nt == lhs) {
        return Err(DescentError::grammar(
            format!("left-hand side `{lhs}` must be a single declared non-terminal"),
            src.clone(),
            line.span(),
        ));
    }

    let mut alternatives = Vec::new();
    for alternative in rhs.split('|') {
        let symbols: Vec<String> = alternative
            .split('$')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if symbols.is_empty() {
            return Err(DescentError::grammar(
                format!("rule for `{lhs}` has an empty right-hand side"),
                src.clone(),
                line.span(),
            ));
        }
        alternatives.push(symbols);
    }
    Ok((lhs.to_string(), alternatives))
}

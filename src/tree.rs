//! Parse-tree reconstruction from a finished working-stack trace.
//!
//! The tree is a flat array of nodes linked by indices (father and
//! next-sibling), not a pointer structure: node 0 is the root and the array
//! order is exactly the trace order, a flattened pre-order walk. The array is
//! built in one pass after acceptance and never mutated afterward.
//!
//! The delicate part is child placement. A production's children do *not* sit
//! at fixed offsets after their father: every child that is itself an
//! expansion contributes its entire subtree to the array before the next
//! sibling begins, so child positions are found by accumulating recursively
//! computed subtree sizes left to right.

use serde::Serialize;

use crate::engine::StackEntry;
use crate::errors::DescentError;
use crate::grammar::Grammar;

/// One node of the flattened parse tree. Index fields use `-1` for "none".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseNode {
    /// Terminal token or non-terminal name.
    pub value: String,
    /// Global alternative id for expansions, `-1` for terminals.
    pub production: isize,
    /// Index of the father node, `-1` for the root.
    pub father: isize,
    /// Index of the next child in the same production, `-1` for the last.
    /// Reported as "Left Sibling" in the dump, keeping the classic column
    /// name for this link.
    pub sibling: isize,
}

/// The flattened parse tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseTree {
    nodes: Vec<ParseNode>,
}

impl ParseTree {
    /// Builds the tree from an accepted parse trace.
    ///
    /// Pass 1 creates one node per trace entry in order. Pass 2 links
    /// fathers and siblings with a father cursor and subtree-size
    /// accumulation. Grammar lookups only fail on traces that do not come
    /// from an accepting run over the same grammar; that is an internal
    /// error, not a user-facing one.
    pub fn from_trace(trace: &[StackEntry], grammar: &Grammar) -> Result<Self, DescentError> {
        let mut nodes: Vec<ParseNode> = trace
            .iter()
            .map(|entry| match entry {
                StackEntry::Terminal(value) => ParseNode {
                    value: value.clone(),
                    production: -1,
                    father: -1,
                    sibling: -1,
                },
                StackEntry::Expansion {
                    non_terminal,
                    alternative,
                } => ParseNode {
                    value: non_terminal.clone(),
                    production: *alternative as isize,
                    father: -1,
                    sibling: -1,
                },
            })
            .collect();

        let mut father: isize = -1;
        for position in 0..trace.len() {
            match &trace[position] {
                StackEntry::Expansion {
                    non_terminal,
                    alternative,
                } => {
                    if nodes[position].father == -1 {
                        nodes[position].father = father;
                    }
                    father = position as isize;

                    let rhs_len = rhs_len(grammar, non_terminal, *alternative)?;
                    let mut children = Vec::with_capacity(rhs_len);
                    let mut child = position + 1;
                    for _ in 0..rhs_len {
                        if child >= trace.len() {
                            return Err(DescentError::internal(format!(
                                "trace ends inside production {alternative} of `{non_terminal}`"
                            )));
                        }
                        children.push(child);
                        child += subtree_size(trace, grammar, child)?;
                    }
                    for (k, &child) in children.iter().enumerate() {
                        if nodes[child].father == -1 {
                            nodes[child].father = position as isize;
                        }
                        nodes[child].sibling = match children.get(k + 1) {
                            Some(&next) => next as isize,
                            None => -1,
                        };
                    }
                }
                StackEntry::Terminal(_) => {
                    if nodes[position].father == -1 {
                        nodes[position].father = father;
                    }
                    // Terminals never parent further nodes.
                    father = -1;
                }
            }
        }

        Ok(Self { nodes })
    }

    pub fn nodes(&self) -> &[ParseNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pre-order traversal using only the father and sibling links (array
    /// adjacency is deliberately not consulted). For a tree built from an
    /// accepted trace this reproduces `0..len()` exactly.
    pub fn preorder(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        if self.nodes.is_empty() {
            return order;
        }
        let mut stack = vec![0usize];
        while let Some(position) = stack.pop() {
            order.push(position);
            let children = self.children_of(position);
            for &child in children.iter().rev() {
                stack.push(child);
            }
        }
        order
    }

    /// The children of a node, ordered by the sibling chain.
    fn children_of(&self, position: usize) -> Vec<usize> {
        let father = position as isize;
        let candidates: Vec<usize> = (0..self.nodes.len())
            .filter(|&i| self.nodes[i].father == father)
            .collect();
        // The chain head is the one child no sibling link points to.
        let head = candidates.iter().copied().find(|&c| {
            !candidates
                .iter()
                .any(|&other| self.nodes[other].sibling == c as isize)
        });
        let mut chain = Vec::with_capacity(candidates.len());
        let mut current = head;
        while let Some(index) = current {
            chain.push(index);
            let next = self.nodes[index].sibling;
            current = if next >= 0 { Some(next as usize) } else { None };
        }
        chain
    }

    /// Renders the tabular dump: one row per node in trace order.
    pub fn render_table(&self) -> String {
        let headers = ["Index", "Value", "Parent", "Left Sibling"];
        let rows: Vec<[String; 4]> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                [
                    index.to_string(),
                    node.value.clone(),
                    node.father.to_string(),
                    node.sibling.to_string(),
                ]
            })
            .collect();

        let mut widths: [usize; 4] = headers.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.len());
            }
        }

        let mut out = String::new();
        out.push('|');
        for (header, width) in headers.iter().zip(widths.iter()) {
            out.push_str(&format!(" {header:<width$} |"));
        }
        out.push('\n');
        out.push('|');
        for (i, width) in widths.iter().enumerate() {
            out.push_str(&"-".repeat(width + 2));
            out.push(if i + 1 < widths.len() { '+' } else { '|' });
        }
        out.push('\n');
        for row in &rows {
            out.push('|');
            // Index and the two link columns are right-aligned, the value
            // column left-aligned.
            out.push_str(&format!(" {:>width$} |", row[0], width = widths[0]));
            out.push_str(&format!(" {:<width$} |", row[1], width = widths[1]));
            out.push_str(&format!(" {:>width$} |", row[2], width = widths[2]));
            out.push_str(&format!(" {:>width$} |", row[3], width = widths[3]));
            out.push('\n');
        }
        out
    }

    /// Serializes the node array as pretty JSON.
    pub fn to_json(&self) -> Result<String, DescentError> {
        serde_json::to_string_pretty(&self.nodes)
            .map_err(|e| DescentError::internal(format!("tree serialization failed: {e}")))
    }
}

fn rhs_len(
    grammar: &Grammar,
    non_terminal: &str,
    alternative: usize,
) -> Result<usize, DescentError> {
    grammar
        .alternative_at(non_terminal, alternative)
        .map(|a| a.rhs.len())
        .ok_or_else(|| {
            DescentError::internal(format!(
                "trace references unknown alternative {alternative} of `{non_terminal}`"
            ))
        })
}

/// Size of the subtree rooted at `position` in the trace: 1 for a terminal,
/// 1 plus the recursively computed sizes of all rhs-many children for an
/// expansion. Recursion depth equals the derivation depth.
fn subtree_size(
    trace: &[StackEntry],
    grammar: &Grammar,
    position: usize,
) -> Result<usize, DescentError> {
    match &trace[position] {
        StackEntry::Terminal(_) => Ok(1),
        StackEntry::Expansion {
            non_terminal,
            alternative,
        } => {
            let rhs_len = rhs_len(grammar, non_terminal, *alternative)?;
            let mut size = 1;
            let mut child = position + 1;
            for _ in 0..rhs_len {
                if child >= trace.len() {
                    return Err(DescentError::internal(format!(
                        "trace ends inside production {alternative} of `{non_terminal}`"
                    )));
                }
                let child_size = subtree_size(trace, grammar, child)?;
                size += child_size;
                child += child_size;
            }
            Ok(size)
        }
    }
}

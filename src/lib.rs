//! descent — a table-driven, backtracking top-down parser for context-free
//! grammars, with parse-tree reconstruction from the decision trace.
//!
//! Pipeline: [`grammar::Grammar`] + a token sequence → [`engine::ParserEngine`]
//! → on acceptance a decision trace → [`tree::ParseTree`] → tabular or JSON
//! dump. Every engine step is mirrored to a write-only [`trace::TraceSink`].

pub use crate::errors::{DescentError, ErrorContext, ErrorType};

pub mod cli;
pub mod engine;
pub mod errors;
pub mod grammar;
pub mod sequence;
pub mod trace;
pub mod tree;

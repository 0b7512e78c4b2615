//! Defines the command-line arguments and subcommands for the descent CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "descent",
    version,
    about = "A table-driven backtracking descendant parser with parse tree reconstruction."
)]
pub struct DescentArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Full pipeline: load the grammar, parse the sequence, write the step
    /// trace and (on acceptance) the parse-tree dump.
    Run {
        /// The path to the grammar file.
        #[arg(long)]
        grammar: PathBuf,
        /// The path to the input-sequence file.
        #[arg(long)]
        sequence: PathBuf,
        /// Where to write the step trace.
        #[arg(long, default_value = "trace.out")]
        trace: PathBuf,
        /// Where to write the parse-tree dump (acceptance only).
        #[arg(long, default_value = "tree.out")]
        tree: PathBuf,
        /// Treat the sequence file as a lexer PIF dump (token between the
        /// first and second quote of each record).
        #[arg(long)]
        pif: bool,
        /// Dump the tree as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Accept/reject verdict only; writes no files.
    Check {
        /// The path to the grammar file.
        #[arg(long)]
        grammar: PathBuf,
        /// The path to the input-sequence file.
        #[arg(long)]
        sequence: PathBuf,
        /// Treat the sequence file as a lexer PIF dump.
        #[arg(long)]
        pif: bool,
    },
    /// Load, validate, and display a grammar.
    Grammar {
        /// The path to the grammar file.
        #[arg(required = true)]
        file: PathBuf,
    },
}

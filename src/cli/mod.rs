//! The descent command-line interface.
//!
//! This module is the entry point for all CLI commands and orchestrates the
//! core library: grammar loading, sequence reading, the engine run, and the
//! trace/tree output files. All paths are parameters; nothing is hardcoded.

use std::path::Path;
use std::process;

use clap::Parser;

use crate::cli::args::{Command, DescentArgs};
use crate::engine::{ParseOutcome, ParserEngine};
use crate::errors::DescentError;
use crate::grammar::Grammar;
use crate::sequence::{read_sequence, SequenceFormat};
use crate::trace::{FileTraceSink, TraceBuffer};
use crate::tree::ParseTree;

pub mod args;
pub mod output;

/// The main entry point for the CLI. Exits 0 on acceptance, 1 on rejection
/// or any error; errors are rendered as miette reports on stderr.
pub fn run() {
    let args = DescentArgs::parse();

    let result = match args.command {
        Command::Run {
            grammar,
            sequence,
            trace,
            tree,
            pif,
            json,
        } => handle_run(&grammar, &sequence, &trace, &tree, format_for(pif), json),
        Command::Check {
            grammar,
            sequence,
            pif,
        } => handle_check(&grammar, &sequence, format_for(pif)),
        Command::Grammar { file } => handle_grammar(&file),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(error) => {
            let report = miette::Report::new(error);
            eprintln!("{report:?}");
            process::exit(1);
        }
    }
}

fn format_for(pif: bool) -> SequenceFormat {
    if pif {
        SequenceFormat::Pif
    } else {
        SequenceFormat::Plain
    }
}

/// Handles the `run` subcommand. A grammar load failure aborts before any
/// parse attempt and produces no output files; a rejection writes the trace
/// but no tree.
fn handle_run(
    grammar_path: &Path,
    sequence_path: &Path,
    trace_path: &Path,
    tree_path: &Path,
    format: SequenceFormat,
    json: bool,
) -> Result<i32, DescentError> {
    let grammar = Grammar::load(grammar_path)?;
    let sequence = read_sequence(sequence_path, format)?;

    let mut sink = FileTraceSink::create(trace_path)
        .map_err(|e| DescentError::io(trace_path.display(), e))?;
    let mut engine = ParserEngine::new(&grammar, sequence);
    let outcome = engine.run(&mut sink)?;
    sink.flush()
        .map_err(|e| DescentError::io(trace_path.display(), e))?;

    match outcome {
        ParseOutcome::Accepted { trace } => {
            let tree = ParseTree::from_trace(&trace, &grammar)?;
            let rendered = if json {
                tree.to_json()?
            } else {
                tree.render_table()
            };
            std::fs::write(tree_path, rendered)
                .map_err(|e| DescentError::io(tree_path.display(), e))?;
            output::print_accepted(engine.sequence());
            Ok(0)
        }
        ParseOutcome::Rejected { index } => {
            output::print_rejected(index);
            Ok(1)
        }
    }
}

/// Handles the `check` subcommand: verdict only, trace kept in memory.
fn handle_check(
    grammar_path: &Path,
    sequence_path: &Path,
    format: SequenceFormat,
) -> Result<i32, DescentError> {
    let grammar = Grammar::load(grammar_path)?;
    let sequence = read_sequence(sequence_path, format)?;

    let mut sink = TraceBuffer::new();
    let mut engine = ParserEngine::new(&grammar, sequence);
    match engine.run(&mut sink)? {
        ParseOutcome::Accepted { .. } => {
            output::print_accepted(engine.sequence());
            Ok(0)
        }
        ParseOutcome::Rejected { index } => {
            output::print_rejected(index);
            Ok(1)
        }
    }
}

/// Handles the `grammar` subcommand.
fn handle_grammar(file: &Path) -> Result<i32, DescentError> {
    let grammar = Grammar::load(file)?;
    output::print_grammar(&grammar);
    Ok(0)
}

//! Handles all user-facing output for the CLI.
//!
//! Centralizing the verdict and grammar printing here keeps the command
//! handlers free of formatting concerns and the coloring consistent.

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::grammar::Grammar;

fn print_colored(color: Color, verdict: &str, rest: &str) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(color)).set_bold(true);
    // Coloring is cosmetic; fall back to plain printing on any stream error.
    let _ = stdout.set_color(&spec);
    let _ = write_str(&mut stdout, verdict);
    let _ = stdout.reset();
    println!("{rest}");
}

fn write_str(stream: &mut StandardStream, text: &str) -> std::io::Result<()> {
    use std::io::Write;
    write!(stream, "{text}")
}

/// Prints the acceptance verdict.
pub fn print_accepted(sequence: &[String]) {
    print_colored(
        Color::Green,
        "accepted",
        &format!(": sequence {sequence:?} is accepted!"),
    );
}

/// Prints the rejection verdict with the failing position.
pub fn print_rejected(index: usize) {
    print_colored(
        Color::Red,
        "rejected",
        &format!(": error at index {index}!"),
    );
}

/// Prints a loaded grammar: symbol sets, start symbol, and the production
/// table with global alternative ids.
pub fn print_grammar(grammar: &Grammar) {
    println!("Non-terminals: {}", grammar.non_terminals().join(", "));
    println!("Terminals: {}", grammar.terminals().join(", "));
    println!("Start symbol: {}", grammar.start_symbol());
    println!("Productions:");
    for (lhs, alternative) in grammar.productions() {
        println!(
            "  {}: {} -> {}",
            alternative.id,
            lhs,
            alternative.rhs.join(" ")
        );
    }
}

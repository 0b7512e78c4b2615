//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use descent::grammar::Grammar;

/// The worked example grammar: `S -> a A` (id 1), `A -> b | a A` (ids 2, 3).
pub const SAMPLE_GRAMMAR: &str = "N = S, A
T = a, b
S = S
P =
S -> a$A
A -> b | a$A
";

pub fn sample_grammar() -> Grammar {
    Grammar::from_source("g1.txt", SAMPLE_GRAMMAR).unwrap()
}

pub fn tokens(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

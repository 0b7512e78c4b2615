// tests/grammar_tests.rs

use descent::grammar::Grammar;
use descent::ErrorType;

mod common;
use common::{sample_grammar, tokens};

// ---
// Loading and the global id contract
// ---

#[test]
fn loads_symbol_sets_and_start_symbol() {
    let grammar = sample_grammar();
    assert_eq!(grammar.non_terminals(), tokens(&["S", "A"]).as_slice());
    assert_eq!(grammar.terminals(), tokens(&["a", "b"]).as_slice());
    assert_eq!(grammar.start_symbol(), "S");
    assert!(grammar.is_non_terminal("S"));
    assert!(!grammar.is_non_terminal("a"));
}

#[test]
fn assigns_global_ids_in_file_order() {
    let grammar = sample_grammar();

    let s_alts = grammar.alternatives_for("S");
    assert_eq!(s_alts.len(), 1);
    assert_eq!(s_alts[0].id, 1);
    assert_eq!(s_alts[0].rhs, tokens(&["a", "A"]));

    // A's numbering continues the global counter; it is not restarted.
    let a_alts = grammar.alternatives_for("A");
    assert_eq!(a_alts.len(), 2);
    assert_eq!(a_alts[0].id, 2);
    assert_eq!(a_alts[0].rhs, tokens(&["b"]));
    assert_eq!(a_alts[1].id, 3);
    assert_eq!(a_alts[1].rhs, tokens(&["a", "A"]));
}

#[test]
fn alternative_lists_are_ordered_by_ascending_id() {
    let grammar = sample_grammar();
    for nt in grammar.non_terminals() {
        let alternatives = grammar.alternatives_for(nt);
        for pair in alternatives.windows(2) {
            assert!(pair[0].id < pair[1].id);
        }
    }
}

#[test]
fn has_next_alternative_is_false_only_on_the_last() {
    let grammar = sample_grammar();
    assert!(!grammar.has_next_alternative("S", 1));
    assert!(grammar.has_next_alternative("A", 2));
    assert!(!grammar.has_next_alternative("A", 3));
}

#[test]
fn alternative_at_finds_exact_ids() {
    let grammar = sample_grammar();
    assert_eq!(
        grammar.alternative_at("A", 3).unwrap().rhs,
        tokens(&["a", "A"])
    );
    assert!(grammar.alternative_at("A", 1).is_none());
    assert!(grammar.alternative_at("S", 7).is_none());
}

#[test]
fn next_alternative_is_the_list_successor() {
    let grammar = sample_grammar();
    assert_eq!(grammar.next_alternative("A", 2).unwrap().id, 3);
    assert!(grammar.next_alternative("A", 3).is_none());
    assert!(grammar.next_alternative("S", 1).is_none());
}

#[test]
fn split_rules_keep_ids_ascending_per_non_terminal() {
    // S's rules are split across two lines, so its ids are 1 and 3 while A
    // owns id 2 in between. The successor of 1 for S must be 3.
    let source = "N = S, A\nT = a, b\nS = S\nP =\nS -> a\nA -> b\nS -> a$A\n";
    let grammar = Grammar::from_source("split.txt", source).unwrap();

    let s_ids: Vec<usize> = grammar.alternatives_for("S").iter().map(|a| a.id).collect();
    assert_eq!(s_ids, vec![1, 3]);
    assert_eq!(grammar.next_alternative("S", 1).unwrap().id, 3);
    assert!(grammar.has_next_alternative("S", 1));
    assert!(!grammar.has_next_alternative("S", 3));
}

#[test]
fn productions_are_listed_in_global_id_order() {
    let grammar = sample_grammar();
    let ids: Vec<usize> = grammar.productions().iter().map(|(_, a)| a.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn trailing_comma_declares_the_comma_symbol() {
    let source = "N = S\nT = a,\nS = S\nP =\nS -> a\n";
    let grammar = Grammar::from_source("comma.txt", source).unwrap();
    assert_eq!(grammar.terminals(), tokens(&["a", ","]).as_slice());
}

// ---
// Load-time validation failures
// ---

fn expect_grammar_error(source: &str) {
    let error = Grammar::from_source("bad.txt", source).unwrap_err();
    assert_eq!(error.error_type(), ErrorType::Grammar);
}

#[test]
fn rejects_header_without_equals() {
    expect_grammar_error("N S, A\nT = a\nS = S\nP =\nS -> a\n");
}

#[test]
fn rejects_truncated_file() {
    expect_grammar_error("N = S\nT = a\n");
}

#[test]
fn rejects_rule_without_arrow() {
    expect_grammar_error("N = S\nT = a\nS = S\nP =\nS a\n");
}

#[test]
fn rejects_undeclared_left_hand_side() {
    expect_grammar_error("N = S\nT = a\nS = S\nP =\nB -> a\n");
}

#[test]
fn rejects_compound_left_hand_side() {
    // The LHS must be exactly one non-terminal.
    expect_grammar_error("N = S, A\nT = a\nS = S\nP =\nS | A -> a\n");
}

#[test]
fn rejects_undeclared_start_symbol() {
    expect_grammar_error("N = S\nT = a\nS = Q\nP =\nS -> a\n");
}

#[test]
fn rejects_non_terminal_without_productions() {
    expect_grammar_error("N = S, A\nT = a\nS = S\nP =\nS -> a\n");
}

#[test]
fn rejects_empty_right_hand_side() {
    expect_grammar_error("N = S\nT = a\nS = S\nP =\nS ->\n");
}

#[test]
fn rejects_empty_alternative_in_a_rule() {
    expect_grammar_error("N = S\nT = a\nS = S\nP =\nS -> a |\n");
}

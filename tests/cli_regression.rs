// Regression tests for the descent binary: end-to-end runs over real files.
// Requires: assert_cmd, predicates, temp-dir crates in [dev-dependencies].

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use temp_dir::TempDir;

const GRAMMAR: &str = "N = S, A\nT = a, b\nS = S\nP =\nS -> a$A\nA -> b | a$A\n";

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.child(name);
    fs::write(&path, content).unwrap();
    path
}

fn descent() -> Command {
    Command::cargo_bin("descent").unwrap()
}

#[test]
fn run_accepts_and_writes_trace_and_tree() {
    let dir = TempDir::new().unwrap();
    let grammar = write_file(&dir, "g.txt", GRAMMAR);
    let sequence = write_file(&dir, "seq.txt", "a\nb\n");
    let trace = dir.child("trace.out");
    let tree = dir.child("tree.out");

    descent()
        .arg("run")
        .arg("--grammar")
        .arg(&grammar)
        .arg("--sequence")
        .arg(&sequence)
        .arg("--trace")
        .arg(&trace)
        .arg("--tree")
        .arg(&tree)
        .assert()
        .success()
        .stdout(contains("accepted"));

    let trace_text = fs::read_to_string(&trace).unwrap();
    assert!(trace_text.contains("State: q Index: 0"));
    assert!(trace_text.contains("is accepted"));

    let tree_text = fs::read_to_string(&tree).unwrap();
    assert!(tree_text.contains("Left Sibling"));
    assert!(tree_text.contains("| S"));
}

#[test]
fn run_rejects_with_the_failing_index_and_writes_no_tree() {
    let dir = TempDir::new().unwrap();
    let grammar = write_file(&dir, "g.txt", GRAMMAR);
    let sequence = write_file(&dir, "seq.txt", "b\n");
    let trace = dir.child("trace.out");
    let tree = dir.child("tree.out");

    descent()
        .arg("run")
        .arg("--grammar")
        .arg(&grammar)
        .arg("--sequence")
        .arg(&sequence)
        .arg("--trace")
        .arg(&trace)
        .arg("--tree")
        .arg(&tree)
        .assert()
        .code(1)
        .stdout(contains("index 0"));

    assert!(trace.exists());
    assert!(!tree.exists());
}

#[test]
fn bad_grammar_aborts_with_a_diagnostic_and_no_output_files() {
    let dir = TempDir::new().unwrap();
    let grammar = write_file(&dir, "g.txt", "N = S\nT = a\nS = S\nP =\nS a\n");
    let sequence = write_file(&dir, "seq.txt", "a\n");
    let trace = dir.child("trace.out");
    let tree = dir.child("tree.out");

    descent()
        .arg("run")
        .arg("--grammar")
        .arg(&grammar)
        .arg("--sequence")
        .arg(&sequence)
        .arg("--trace")
        .arg(&trace)
        .arg("--tree")
        .arg(&tree)
        .assert()
        .failure()
        .stderr(contains("descent::grammar"));

    assert!(!trace.exists());
    assert!(!tree.exists());
}

#[test]
fn pif_records_supply_the_token_between_quotes() {
    let dir = TempDir::new().unwrap();
    let grammar = write_file(&dir, "g.txt", GRAMMAR);
    let sequence = write_file(&dir, "pif.out", "12 | 'a' | 0\n13 | 'b' | 1\n");

    descent()
        .arg("check")
        .arg("--grammar")
        .arg(&grammar)
        .arg("--sequence")
        .arg(&sequence)
        .arg("--pif")
        .assert()
        .success()
        .stdout(contains("accepted"));
}

#[test]
fn malformed_pif_record_is_a_sequence_diagnostic() {
    let dir = TempDir::new().unwrap();
    let grammar = write_file(&dir, "g.txt", GRAMMAR);
    let sequence = write_file(&dir, "pif.out", "12 | a | 0\n");

    descent()
        .arg("check")
        .arg("--grammar")
        .arg(&grammar)
        .arg("--sequence")
        .arg(&sequence)
        .arg("--pif")
        .assert()
        .failure()
        .stderr(contains("descent::sequence"));
}

#[test]
fn check_rejects_without_writing_files() {
    let dir = TempDir::new().unwrap();
    let grammar = write_file(&dir, "g.txt", GRAMMAR);
    let sequence = write_file(&dir, "seq.txt", "b\n");

    descent()
        .arg("check")
        .arg("--grammar")
        .arg(&grammar)
        .arg("--sequence")
        .arg(&sequence)
        .assert()
        .code(1)
        .stdout(contains("index 0"));
}

#[test]
fn grammar_subcommand_displays_the_production_table() {
    let dir = TempDir::new().unwrap();
    let grammar = write_file(&dir, "g.txt", GRAMMAR);

    descent()
        .arg("grammar")
        .arg(&grammar)
        .assert()
        .success()
        .stdout(
            contains("Non-terminals: S, A")
                .and(contains("Start symbol: S"))
                .and(contains("1: S -> a A"))
                .and(contains("3: A -> a A")),
        );
}

#[test]
fn json_flag_dumps_the_tree_as_json() {
    let dir = TempDir::new().unwrap();
    let grammar = write_file(&dir, "g.txt", GRAMMAR);
    let sequence = write_file(&dir, "seq.txt", "a\nb\n");
    let trace = dir.child("trace.out");
    let tree = dir.child("tree.json");

    descent()
        .arg("run")
        .arg("--grammar")
        .arg(&grammar)
        .arg("--sequence")
        .arg(&sequence)
        .arg("--trace")
        .arg(&trace)
        .arg("--tree")
        .arg(&tree)
        .arg("--json")
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&tree).unwrap()).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 4);
}

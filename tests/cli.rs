//! CLI integration tests
//!
//! Spawns the `srparse` binary and checks exit codes, stdout and stderr.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn srparse() -> Command {
    cargo_bin_cmd!("srparse")
}

#[test]
fn help_exits_0_with_description() {
    srparse()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Shift-reduce parser for tagged sentences"));
}

#[test]
fn parses_with_bundled_grammar() {
    srparse()
        .arg("The man ate the carrot")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "The man ate the carrot:\nS\n|\tNP\n|\t|\tART (The)\n|\t|\tN (man)\n|\tVP\n|\t|\tV (ate)\n",
        ))
        .stdout(predicate::str::contains("|\t|\t|\tN (carrot)\n"));
}

#[test]
fn failed_parse_exits_1_with_diagnostics() {
    srparse()
        .arg("ate the man")
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("ate the man:\n"))
        .stderr(predicate::str::contains("Parse failed: no shift or reduce possible at 'V'"))
        .stderr(predicate::str::contains("State tree:"));
}

#[test]
fn unknown_word_exits_1() {
    srparse()
        .arg("The zebra ate")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Tagging error: no tag known for word 'zebra'"));
}

#[test]
fn pretagged_input_goes_through_reduction() {
    srparse()
        .args(["--pretagged", "The/DT dog/NN barks/VBZ"])
        .assert()
        .success()
        .stdout(predicate::str::contains("|\t|\tN (dog)\n"))
        .stdout(predicate::str::contains("|\t|\tV (barks)\n"));
}

#[test]
fn json_output() {
    let output = srparse()
        .args(["--json", "dogs sleep"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["outcome"]["status"], "accept");
    assert_eq!(json["outcome"]["result"]["name"], "S");
    assert_eq!(json["trace"][0]["action"], "shift");
    assert_eq!(json["trace"][0]["value"], "dogs");
}

#[test]
fn verbose_prints_report_and_actions() {
    srparse()
        .args(["--verbose", "dogs sleep"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Grammar: 4 rules"))
        .stderr(predicate::str::contains("Tagged: dogs/N sleep/V"))
        .stderr(predicate::str::contains("Actions:"))
        .stderr(predicate::str::contains("1. shift N (dogs)"))
        .stderr(predicate::str::contains("accept S"));
}

#[test]
fn custom_grammar_and_lexicon_files() {
    let dir = TempDir::new().unwrap();
    let grammar = dir.path().join("grammar.json");
    let lexicon = dir.path().join("lexicon.json");
    fs::write(&grammar, r#"{"SENT": [["PRON", "V"]]}"#).unwrap();
    fs::write(&lexicon, r#"{"she": "PRON", "runs": "V"}"#).unwrap();

    srparse()
        .arg("She runs")
        .arg("--grammar")
        .arg(&grammar)
        .arg("--lexicon")
        .arg(&lexicon)
        .args(["--start", "SENT"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SENT\n|\tPRON (She)\n|\tV (runs)\n"));
}

#[test]
fn left_recursive_grammar_rejected() {
    let dir = TempDir::new().unwrap();
    let grammar = dir.path().join("grammar.json");
    fs::write(&grammar, r#"{"S": [["S", "N"], ["N"]]}"#).unwrap();

    srparse()
        .arg("man")
        .arg("--grammar")
        .arg(&grammar)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Grammar error: grammar is left-recursive through: S"));
}

#[test]
fn missing_grammar_file_rejected() {
    srparse()
        .args(["man", "--grammar", "/nonexistent/grammar.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Grammar error: IO error"));
}

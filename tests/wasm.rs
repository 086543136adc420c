//! WebAssembly binding tests, run with `wasm-pack test --node`.

#![cfg(target_arch = "wasm32")]

use srparse::{parse_tagged, version, SrParser};
use wasm_bindgen_test::*;

const GRAMMAR: &str = include_str!("../grammars/grammar.json");
const REDUCTION: &str = include_str!("../grammars/reduction.json");

#[wasm_bindgen_test]
fn parses_pretagged_text() {
    let result = parse_tagged(GRAMMAR, "The/ART man/N ate/V");
    assert!(result.success());
    assert!(result.output().starts_with("S\n|\tNP\n"));
    assert!(result.error().is_none());
}

#[wasm_bindgen_test]
fn reduction_table_applies() {
    let parser = SrParser::new(GRAMMAR, Some(REDUCTION.to_string()), None).unwrap();
    assert_eq!(parser.rule_count(), 4);

    let result = parser.parse("The/DT dog/NN barks/VBZ");
    assert!(result.success());
    assert!(result.output().contains("N (dog)"));
}

#[wasm_bindgen_test]
fn failure_carries_diagnostics() {
    let result = parse_tagged(GRAMMAR, "ate/V the/ART man/N");
    assert!(!result.success());
    assert!(result.error().unwrap().contains("Parse failed"));

    let result = parse_tagged(GRAMMAR, "man");
    assert!(result.error().unwrap().contains("malformed tagged token"));
}

#[wasm_bindgen_test]
fn reports_version() {
    assert_eq!(version(), env!("CARGO_PKG_VERSION"));
}

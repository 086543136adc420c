//! WebAssembly bindings for srparse
//!
//! JavaScript-friendly wrapper around [`SRParser`]. Input text is expected
//! pre-tagged (`The/ART man/N ate/V`). Only compiled when targeting wasm32.

#![cfg(target_arch = "wasm32")]

use crate::parse_tree::ParseOutcome;
use crate::tagger::{PreTagged, Tagger};
use crate::{Grammar, ReductionMap, SRParser, DEFAULT_START};
use wasm_bindgen::prelude::*;

// Set panic hook for better error messages in browser
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

// Use smaller allocator for WASM
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Result type for JavaScript interop
#[wasm_bindgen]
#[derive(Debug)]
pub struct ParseResult {
    success: bool,
    output: String,
    error: Option<String>,
}

#[wasm_bindgen]
impl ParseResult {
    #[wasm_bindgen(getter)]
    pub fn success(&self) -> bool {
        self.success
    }

    /// Indented tree, or the partial constituents on failure
    #[wasm_bindgen(getter)]
    pub fn output(&self) -> String {
        self.output.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn error(&self) -> Option<String> {
        self.error.clone()
    }
}

impl ParseResult {
    fn failed(error: String) -> Self {
        ParseResult {
            success: false,
            output: String::new(),
            error: Some(error),
        }
    }
}

/// Parser over a JSON grammar and optional JSON reduction table
#[wasm_bindgen]
pub struct SrParser {
    parser: SRParser,
}

#[wasm_bindgen]
impl SrParser {
    #[wasm_bindgen(constructor)]
    pub fn new(grammar: &str, reduction: Option<String>, start: Option<String>) -> Result<SrParser, JsValue> {
        #[cfg(feature = "console_error_panic_hook")]
        set_panic_hook();

        let start = start.as_deref().unwrap_or(DEFAULT_START);
        let grammar = Grammar::from_json_str(grammar, start)
            .map_err(|e| JsValue::from_str(&format!("Grammar error: {}", e)))?;

        let mut parser = SRParser::new(grammar);
        if let Some(reduction) = reduction {
            let map = ReductionMap::from_json_str(&reduction)
                .map_err(|e| JsValue::from_str(&format!("Reduction error: {}", e)))?;
            parser = parser.with_reduction(map);
        }

        Ok(SrParser { parser })
    }

    /// Parse `word/TAG` text
    pub fn parse(&self, input: &str) -> ParseResult {
        match self.outcome(input) {
            Ok(ParseOutcome::Accept(root)) => ParseResult {
                success: true,
                output: root.render_tree(),
                error: None,
            },
            Ok(outcome @ ParseOutcome::Fail(_)) => ParseResult {
                success: false,
                output: outcome.pretty_print(),
                error: outcome.partial().map(|partial| partial.diagnostics()),
            },
            Err(e) => ParseResult::failed(e),
        }
    }

    /// Parse `word/TAG` text and return the outcome as a JS object
    pub fn parse_json(&self, input: &str) -> Result<JsValue, JsValue> {
        let outcome = self.outcome(input).map_err(|e| JsValue::from_str(&e))?;
        serde_wasm_bindgen::to_value(&outcome).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Get the number of rules in the grammar (for debugging)
    pub fn rule_count(&self) -> usize {
        self.parser.grammar().rule_count()
    }
}

impl SrParser {
    fn outcome(&self, input: &str) -> Result<ParseOutcome, String> {
        let tokens = PreTagged.tag(input).map_err(|e| e.to_string())?;
        self.parser.parse(&tokens).map_err(|e| e.to_string())
    }
}

/// Convenience function: load grammar and parse input in one step
#[wasm_bindgen]
pub fn parse_tagged(grammar: &str, input: &str) -> ParseResult {
    match SrParser::new(grammar, None, None) {
        Ok(parser) => parser.parse(input),
        Err(e) => ParseResult::failed(format!("{:?}", e)),
    }
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

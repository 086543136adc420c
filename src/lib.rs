//! srparse - Multi-path shift-reduce parser
//!
//! Parses part-of-speech tagged sentences against a small context-free
//! grammar. Every derivation still consistent with the input is tracked at
//! once; shift wins over reduce, and dead branches are pruned as each token
//! arrives. Works natively in Rust and compiles to WebAssembly.
//!
//! # Quick Start
//!
//! ```rust
//! use srparse::{Grammar, Lexicon, SRParser, Tagger};
//!
//! let grammar = Grammar::from_json_str(
//!     r#"{ "S": [["NP", "VP"]], "NP": [["ART", "N"]], "VP": [["V", "N"]] }"#,
//!     "S",
//! ).expect("Invalid grammar");
//!
//! let lexicon = Lexicon::from_json_str(
//!     r#"{ "the": "ART", "man": "N", "ate": "V", "carrot": "N" }"#,
//! ).expect("Invalid lexicon");
//!
//! let tokens = lexicon.tag("The man ate carrot").expect("Unknown word");
//! let outcome = SRParser::new(grammar).parse(&tokens).expect("Parse aborted");
//!
//! assert_eq!(outcome.root().unwrap().bracketed(), "S(NP(ART N) VP(V N))");
//! print!("{}", outcome.pretty_print());
//! ```

pub mod error;
pub mod grammar;
pub mod grammar_analysis;
pub mod input_stream;
pub mod parse_context;
pub mod parse_tree;
pub mod reduction;
pub mod shift_reduce;
pub mod state_tree;
pub mod symbol;
pub mod tagger;

// WASM bindings (only when compiling for wasm32)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export main API
pub use error::{GrammarError, ParseError, TagError};
pub use grammar::{Grammar, DEFAULT_START};
pub use parse_context::{Action, ParserOptions};
pub use parse_tree::{FailReason, ParseOutcome, PartialParse, TracedParse};
pub use reduction::ReductionMap;
pub use shift_reduce::SRParser;
pub use symbol::{Symbol, SymbolId};
pub use tagger::{Lexicon, PreTagged, TaggedToken, Tagger};

#[cfg(target_arch = "wasm32")]
pub use wasm::*;

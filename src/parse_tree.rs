//! Parse results
//!
//! A parse either accepts, yielding the root [`Symbol`] of the derivation, or
//! fails with a [`PartialParse`]: whatever the engine had built when it ran
//! out of moves. Both render as the indented tree format the CLI prints.

use crate::parse_context::Action;
use crate::state_tree::FrameSnapshot;
use crate::symbol::Symbol;
use serde::Serialize;
use std::fmt;

/// Why a parse stopped short of the start symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailReason {
    /// There was nothing to parse.
    EmptyInput,

    /// Neither a shift nor a reduce was possible. `token` is the item that
    /// was next in line, if any input remained.
    NoAction { token: Option<String> },

    /// A tag that neither the reduction map nor the grammar knows.
    UnknownTag { tag: String, word: String },
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailReason::EmptyInput => f.write_str("empty input"),
            FailReason::NoAction { token: Some(token) } => {
                write!(f, "no shift or reduce possible at '{}'", token)
            }
            FailReason::NoAction { token: None } => {
                f.write_str("no shift or reduce possible at end of input")
            }
            FailReason::UnknownTag { tag, word } => {
                write!(f, "unknown tag '{}' for token '{}'", tag, word)
            }
        }
    }
}

/// State of the engine at the moment a parse failed.
#[derive(Debug, Clone, Serialize)]
pub struct PartialParse {
    pub reason: FailReason,

    /// Completed constituents, bottom first
    pub parse_stack: Vec<Symbol>,

    /// Unread input, next item first
    pub input_stack: Vec<Symbol>,

    /// Every frame still reachable in the state tree
    pub frames: Vec<FrameSnapshot>,
}

impl PartialParse {
    /// Multi-line dump of both stacks and the state tree.
    pub fn diagnostics(&self) -> String {
        let mut out = format!("Parse failed: {}\n", self.reason);

        out.push_str("Parse stack:\n");
        for sym in &self.parse_stack {
            out.push_str(&format!("  {}\n", sym.bracketed()));
        }

        out.push_str("Input stack:\n");
        for sym in &self.input_stack {
            match &sym.value {
                Some(value) => out.push_str(&format!("  {} ({})\n", sym, value)),
                None => out.push_str(&format!("  {}\n", sym.bracketed())),
            }
        }

        out.push_str("State tree:\n");
        for frame in &self.frames {
            out.push_str(&format!("  {}\n", frame));
        }
        out
    }
}

/// Result of one parse.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum ParseOutcome {
    Accept(Symbol),
    Fail(PartialParse),
}

impl ParseOutcome {
    pub fn is_accept(&self) -> bool {
        matches!(self, ParseOutcome::Accept(_))
    }

    pub fn root(&self) -> Option<&Symbol> {
        match self {
            ParseOutcome::Accept(root) => Some(root),
            ParseOutcome::Fail(_) => None,
        }
    }

    pub fn partial(&self) -> Option<&PartialParse> {
        match self {
            ParseOutcome::Accept(_) => None,
            ParseOutcome::Fail(partial) => Some(partial),
        }
    }

    /// The accepted tree, or each partial constituent on the parse stack in
    /// turn.
    pub fn pretty_print(&self) -> String {
        match self {
            ParseOutcome::Accept(root) => root.render_tree(),
            ParseOutcome::Fail(partial) => partial
                .parse_stack
                .iter()
                .map(Symbol::render_tree)
                .collect(),
        }
    }
}

/// An outcome together with every action the engine took to reach it.
#[derive(Debug, Clone, Serialize)]
pub struct TracedParse {
    pub outcome: ParseOutcome,
    pub trace: Vec<Action>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn np() -> Symbol {
        let mut np = Symbol::new("NP");
        np.components = vec![
            Symbol::with_value("ART", "The"),
            Symbol::with_value("N", "man"),
        ];
        np
    }

    #[test]
    fn test_pretty_print_accept() {
        let outcome = ParseOutcome::Accept(np());
        assert!(outcome.is_accept());
        assert_eq!(outcome.root().unwrap().name(), "NP");
        assert_eq!(outcome.pretty_print(), "NP\n|\tART (The)\n|\tN (man)\n");
    }

    #[test]
    fn test_pretty_print_partial_prints_each_stack_item() {
        let outcome = ParseOutcome::Fail(PartialParse {
            reason: FailReason::NoAction {
                token: Some("V".to_string()),
            },
            parse_stack: vec![np(), Symbol::with_value("ADV", "quickly")],
            input_stack: vec![Symbol::with_value("V", "ate")],
            frames: Vec::new(),
        });

        assert!(outcome.root().is_none());
        assert_eq!(
            outcome.pretty_print(),
            "NP\n|\tART (The)\n|\tN (man)\nADV (quickly)\n"
        );
    }

    #[test]
    fn test_diagnostics() {
        let partial = PartialParse {
            reason: FailReason::NoAction { token: None },
            parse_stack: vec![np()],
            input_stack: vec![Symbol::with_value("V", "ate")],
            frames: Vec::new(),
        };

        let text = partial.diagnostics();
        assert!(text.starts_with("Parse failed: no shift or reduce possible at end of input\n"));
        assert!(text.contains("  NP(ART N)\n"));
        assert!(text.contains("  V (ate)\n"));
    }

    #[test]
    fn test_outcome_json() {
        let json = serde_json::to_value(ParseOutcome::Accept(np())).unwrap();
        assert_eq!(json["status"], "accept");
        assert_eq!(json["result"]["name"], "NP");
        assert_eq!(json["result"]["components"][1]["value"], "man");

        let reason = serde_json::to_value(FailReason::EmptyInput).unwrap();
        assert_eq!(reason["kind"], "empty_input");
    }
}

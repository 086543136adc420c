//! Error types for grammar loading, tagging and parsing
//!
//! A failed parse is not an error: it comes back as
//! [`ParseOutcome::Fail`](crate::parse_tree::ParseOutcome::Fail). The types
//! here cover load-time faults and invariant violations that abort a parse.

use thiserror::Error;

/// Errors raised while building a [`Grammar`](crate::grammar::Grammar) or a
/// [`ReductionMap`](crate::reduction::ReductionMap). These are fatal: no
/// parse can start from a table that failed to load.
#[derive(Debug, Error)]
pub enum GrammarError {
    /// The source file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The source was not valid JSON of the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The rule table has no nonterminals at all.
    #[error("grammar defines no rules")]
    Empty,

    /// A nonterminal declares a production with no symbols.
    #[error("rule '{rule}' has an empty production at index {index}")]
    EmptyProduction { rule: String, index: usize },

    /// The start symbol is not defined by any rule.
    #[error("start symbol '{0}' is not defined by the grammar")]
    UndefinedStart(String),

    /// A nonterminal can derive itself at its leftmost position.
    #[error("grammar is left-recursive through: {}", .rules.join(", "))]
    LeftRecursion { rules: Vec<String> },
}

/// Errors raised while parsing a token sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The tagger produced a tag that neither the reduction map nor the
    /// grammar knows about.
    #[error("unknown tag '{tag}' for token '{word}'")]
    UnknownTag { tag: String, word: String },

    /// A completed production matched no rule in the grammar table.
    #[error("could not reduce pattern [{}]", .pattern.join(" "))]
    ReductionMismatch { pattern: Vec<String> },

    /// Fewer symbols on the parse stack than the production being reduced.
    #[error("parse stack holds {available} symbols but rule '{rule}' needs {needed}")]
    StackUnderflow {
        rule: String,
        needed: usize,
        available: usize,
    },

    /// Frontier expansion went deeper than the configured bound.
    #[error("expansion of '{symbol}' exceeded depth {limit}")]
    ExpansionDepthExceeded { symbol: String, limit: usize },

    /// A chain of freshly expanded frames revisited the same production
    /// without consuming input.
    #[error("expansion cycle through rule '{symbol}' production {rule}")]
    ExpansionCycle { symbol: String, rule: usize },

    /// The engine ran more shift/reduce iterations than allowed.
    #[error("step limit exceeded: {steps} / {limit}")]
    StepLimitExceeded { steps: usize, limit: usize },
}

/// Errors raised by a [`Tagger`](crate::tagger::Tagger).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// The lexicon has no entry for a word.
    #[error("no tag known for word '{word}' at line {line}, column {column}")]
    UnknownWord {
        word: String,
        line: usize,
        column: usize,
    },

    /// A pre-tagged token is not of the form `word/TAG`.
    #[error("malformed tagged token '{0}', expected word/TAG")]
    Malformed(String),
}

//! Parse context for the shift-reduce engine
//!
//! Holds the working memory of one parse: the parse stack of completed
//! constituents, the input stack of tokens still to read, the step counter
//! that bounds the main loop, and the trace of every action taken.

use crate::error::ParseError;
use crate::symbol::Symbol;
use crate::tagger::TaggedToken;
use serde::Serialize;
use std::fmt;

/// When a token can be shifted and a frame can be reduced, shift.
pub const SHIFT_OVER_REDUCE: bool = true;

/// Tunables for a parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Deepest chain of frames one expansion may build
    pub max_expansion_depth: usize,

    /// Most shift/reduce iterations one parse may run
    pub max_steps: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            max_expansion_depth: 64,
            max_steps: 100_000,
        }
    }
}

/// An entry of the input stack.
#[derive(Debug, Clone, PartialEq)]
pub enum InputItem {
    /// Straight from the tagger, not yet normalized
    Tagged(TaggedToken),
    /// A grammar symbol: a requeued token or the product of a reduction
    Symbol(Symbol),
}

impl InputItem {
    /// Symbol view of this item, without applying any reduction.
    pub fn to_symbol(&self) -> Symbol {
        match self {
            InputItem::Tagged(token) => token.to_symbol(),
            InputItem::Symbol(symbol) => symbol.clone(),
        }
    }
}

/// One step of the engine, recorded for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Shift {
        symbol: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        /// Frames that advanced on this token
        advanced: usize,
    },
    Reduce {
        produced: String,
        /// Production index of the reduced frame
        rule: usize,
        popped: usize,
        /// Tied sibling frames abandoned along with the reduced one
        #[serde(skip_serializing_if = "Vec::is_empty")]
        discarded: Vec<String>,
    },
    Accept {
        symbol: String,
    },
    Fail {
        reason: String,
    },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Shift {
                symbol,
                value,
                advanced,
            } => {
                write!(f, "shift {}", symbol)?;
                if let Some(value) = value {
                    write!(f, " ({})", value)?;
                }
                write!(f, " [{} frame(s)]", advanced)
            }
            Action::Reduce {
                produced,
                rule,
                popped,
                discarded,
            } => {
                write!(f, "reduce {} rule {} ({} symbol(s))", produced, rule, popped)?;
                if !discarded.is_empty() {
                    write!(f, ", discarded tied {}", discarded.join(", "))?;
                }
                Ok(())
            }
            Action::Accept { symbol } => write!(f, "accept {}", symbol),
            Action::Fail { reason } => write!(f, "fail: {}", reason),
        }
    }
}

/// Working memory of a single parse.
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// Completed constituents, bottom first
    pub parse_stack: Vec<Symbol>,

    /// Unread input, next item last
    pub input_stack: Vec<InputItem>,

    /// Iterations run so far
    pub steps: usize,

    pub trace: Vec<Action>,

    options: ParserOptions,
}

impl ParseContext {
    /// Create a context that will read `items` in order.
    pub fn new(items: impl IntoIterator<Item = InputItem>, options: ParserOptions) -> Self {
        let mut input_stack: Vec<InputItem> = items.into_iter().collect();
        input_stack.reverse();

        ParseContext {
            parse_stack: Vec::new(),
            input_stack,
            steps: 0,
            trace: Vec::new(),
            options,
        }
    }

    pub fn options(&self) -> ParserOptions {
        self.options
    }

    /// Count one iteration of the main loop.
    pub fn tick(&mut self) -> Result<(), ParseError> {
        self.steps += 1;
        if self.steps > self.options.max_steps {
            return Err(ParseError::StepLimitExceeded {
                steps: self.steps,
                limit: self.options.max_steps,
            });
        }
        Ok(())
    }

    pub fn next_input(&mut self) -> Option<InputItem> {
        self.input_stack.pop()
    }

    /// Put a symbol back so that it is read next.
    pub fn requeue(&mut self, symbol: Symbol) {
        self.input_stack.push(InputItem::Symbol(symbol));
    }

    /// Pop `count` symbols off the parse stack, in their original order.
    pub fn pop_pattern(&mut self, count: usize, rule: &Symbol) -> Result<Vec<Symbol>, ParseError> {
        let available = self.parse_stack.len();
        if available < count {
            return Err(ParseError::StackUnderflow {
                rule: rule.name(),
                needed: count,
                available,
            });
        }
        Ok(self.parse_stack.split_off(available - count))
    }

    /// Accept once only the start symbol remains, fully reduced.
    pub fn is_accepted(&self, start: &Symbol) -> bool {
        self.parse_stack.is_empty()
            && matches!(self.input_stack.as_slice(), [InputItem::Symbol(sym)] if sym == start)
    }

    /// Pop the parse root if the parse is accepted.
    pub fn take_accepted(&mut self, start: &Symbol) -> Option<Symbol> {
        if !self.is_accepted(start) {
            return None;
        }
        match self.input_stack.pop() {
            Some(InputItem::Symbol(root)) => Some(root),
            _ => None,
        }
    }

    /// Unread input in reading order, next item first.
    pub fn pending_input(&self) -> Vec<Symbol> {
        self.input_stack.iter().rev().map(InputItem::to_symbol).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(pairs: &[(&str, &str)]) -> Vec<InputItem> {
        pairs
            .iter()
            .map(|(text, tag)| InputItem::Tagged(TaggedToken::new(*text, *tag)))
            .collect()
    }

    #[test]
    fn test_context_reads_in_order() {
        let mut ctx = ParseContext::new(
            tokens(&[("The", "ART"), ("man", "N")]),
            ParserOptions::default(),
        );

        let pending: Vec<_> = ctx.pending_input().iter().map(Symbol::name).collect();
        assert_eq!(pending, vec!["ART", "N"]);

        assert_eq!(ctx.next_input().unwrap().to_symbol().value.as_deref(), Some("The"));
        ctx.requeue(Symbol::with_value("ART", "The"));
        assert_eq!(ctx.input_stack.len(), 2);
        assert!(matches!(ctx.next_input(), Some(InputItem::Symbol(_))));
    }

    #[test]
    fn test_pop_pattern_preserves_order() {
        let mut ctx = ParseContext::new(Vec::new(), ParserOptions::default());
        ctx.parse_stack = vec![
            Symbol::new("NP"),
            Symbol::with_value("V", "ate"),
            Symbol::with_value("N", "carrot"),
        ];

        let popped = ctx.pop_pattern(2, &Symbol::new("VP")).unwrap();

        let names: Vec<_> = popped.iter().map(Symbol::name).collect();
        assert_eq!(names, vec!["V", "N"]);
        assert_eq!(ctx.parse_stack, vec![Symbol::new("NP")]);
    }

    #[test]
    fn test_pop_pattern_underflow() {
        let mut ctx = ParseContext::new(Vec::new(), ParserOptions::default());
        ctx.parse_stack.push(Symbol::new("V"));

        let err = ctx.pop_pattern(2, &Symbol::new("VP")).unwrap_err();
        assert_eq!(
            err,
            ParseError::StackUnderflow {
                rule: "VP".to_string(),
                needed: 2,
                available: 1
            }
        );
    }

    #[test]
    fn test_step_limit() {
        let options = ParserOptions {
            max_steps: 2,
            ..ParserOptions::default()
        };
        let mut ctx = ParseContext::new(Vec::new(), options);

        assert!(ctx.tick().is_ok());
        assert!(ctx.tick().is_ok());
        assert_eq!(
            ctx.tick().unwrap_err(),
            ParseError::StepLimitExceeded { steps: 3, limit: 2 }
        );
    }

    #[test]
    fn test_is_accepted_requires_reduced_start() {
        let start = Symbol::new("S");
        let mut ctx = ParseContext::new(Vec::new(), ParserOptions::default());
        assert!(!ctx.is_accepted(&start));

        ctx.requeue(Symbol::new("NP"));
        assert!(!ctx.is_accepted(&start));

        ctx.input_stack.clear();
        ctx.requeue(Symbol::new("S"));
        assert!(ctx.is_accepted(&start));

        ctx.parse_stack.push(Symbol::new("X"));
        assert!(!ctx.is_accepted(&start));
        assert!(ctx.take_accepted(&start).is_none());

        ctx.parse_stack.clear();
        let root = ctx.take_accepted(&start).unwrap();
        assert_eq!(root.name(), "S");
        assert!(ctx.input_stack.is_empty());
    }

    #[test]
    fn test_action_display() {
        let shift = Action::Shift {
            symbol: "N".to_string(),
            value: Some("man".to_string()),
            advanced: 2,
        };
        assert_eq!(shift.to_string(), "shift N (man) [2 frame(s)]");

        let reduce = Action::Reduce {
            produced: "NP".to_string(),
            rule: 0,
            popped: 2,
            discarded: vec!["NP/1".to_string()],
        };
        assert_eq!(
            reduce.to_string(),
            "reduce NP rule 0 (2 symbol(s)), discarded tied NP/1"
        );
    }
}

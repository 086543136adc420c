//! Shift-reduce engine
//!
//! Reads tagged tokens one at a time against a [`StateTree`] that tracks every
//! derivation still consistent with the input. Each iteration either shifts
//! the next token, reduces a completed production, or gives up:
//!
//! 1. Normalize the next input item to a grammar terminal.
//! 2. If some frame expects it, shift: push it onto the parse stack, advance
//!    the matching frames, prune the rest and expand the new frontier.
//! 3. Otherwise, if some frame is complete, put the token back and reduce:
//!    pop the production's symbols, build the nonterminal and feed it back
//!    in as the next input.
//! 4. Otherwise fail with a snapshot of the stacks and the tree.
//!
//! The parse accepts once the parse stack is empty and the only input left
//! is the fully reduced start symbol.

use crate::error::ParseError;
use crate::grammar::Grammar;
use crate::parse_context::{Action, InputItem, ParseContext, ParserOptions, SHIFT_OVER_REDUCE};
use crate::parse_tree::{FailReason, ParseOutcome, PartialParse, TracedParse};
use crate::reduction::ReductionMap;
use crate::state_tree::{ReduceChoice, StateTree};
use crate::symbol::Symbol;
use crate::tagger::TaggedToken;
use std::sync::Arc;

/// Parser over one grammar, optionally with a tag reduction map.
///
/// The grammar and map are shared read-only; each call to
/// [`parse`](SRParser::parse) owns its own state tree and stacks, so one
/// parser can serve any number of threads.
#[derive(Debug, Clone)]
pub struct SRParser {
    grammar: Arc<Grammar>,
    reduction: Option<Arc<ReductionMap>>,
    options: ParserOptions,
}

impl SRParser {
    pub fn new(grammar: impl Into<Arc<Grammar>>) -> Self {
        SRParser {
            grammar: grammar.into(),
            reduction: None,
            options: ParserOptions::default(),
        }
    }

    /// Normalize tagger output through `reduction` before parsing.
    pub fn with_reduction(mut self, reduction: impl Into<Arc<ReductionMap>>) -> Self {
        self.reduction = Some(reduction.into());
        self
    }

    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn reduction(&self) -> Option<&ReductionMap> {
        self.reduction.as_deref()
    }

    pub fn options(&self) -> ParserOptions {
        self.options
    }

    /// Parse a tagged sentence.
    ///
    /// A sentence the grammar does not cover is `Ok(ParseOutcome::Fail)`.
    /// `Err` means the parse was aborted: a bound was hit or the grammar and
    /// the engine disagree.
    pub fn parse(&self, tokens: &[TaggedToken]) -> Result<ParseOutcome, ParseError> {
        self.parse_traced(tokens).map(|traced| traced.outcome)
    }

    /// Like [`parse`](SRParser::parse), also returning every action taken.
    pub fn parse_traced(&self, tokens: &[TaggedToken]) -> Result<TracedParse, ParseError> {
        self.run(tokens.iter().cloned().map(InputItem::Tagged))
    }

    /// Parse symbols that are already grammar terminals. No reduction map
    /// or tag check is applied.
    pub fn parse_symbols(
        &self,
        symbols: impl IntoIterator<Item = Symbol>,
    ) -> Result<ParseOutcome, ParseError> {
        self.run(symbols.into_iter().map(InputItem::Symbol))
            .map(|traced| traced.outcome)
    }

    fn run(&self, items: impl IntoIterator<Item = InputItem>) -> Result<TracedParse, ParseError> {
        let grammar: &Grammar = &self.grammar;
        let mut ctx = ParseContext::new(items, self.options);
        let mut tree = StateTree::new(grammar, self.options.max_expansion_depth);
        let root = tree.root();

        if ctx.input_stack.is_empty() {
            return Ok(fail(ctx, &tree, FailReason::EmptyInput));
        }

        tree.expand(root, true)?;
        let start = grammar.start_symbol();

        loop {
            if let Some(parsed) = ctx.take_accepted(start) {
                tracing::debug!(steps = ctx.steps, root = %parsed.bracketed(), "accept");
                ctx.trace.push(Action::Accept {
                    symbol: parsed.name(),
                });
                return Ok(TracedParse {
                    outcome: ParseOutcome::Accept(parsed),
                    trace: ctx.trace,
                });
            }
            ctx.tick()?;

            let token = match ctx.next_input().map(|item| self.normalize(item)) {
                None => None,
                Some(Ok(token)) => Some(token),
                Some(Err(ParseError::UnknownTag { tag, word })) => {
                    ctx.requeue(Symbol::with_value(tag.clone(), word.clone()));
                    return Ok(fail(ctx, &tree, FailReason::UnknownTag { tag, word }));
                }
                Some(Err(err)) => return Err(err),
            };

            let can_shift = matches!(&token, Some(token) if tree.can_shift(token, root));
            let choice = if tree.can_reduce(root) {
                tree.select_reduction()
            } else {
                None
            };

            match token {
                Some(token) if can_shift && (SHIFT_OVER_REDUCE || choice.is_none()) => {
                    shift(&mut ctx, &mut tree, token)?;
                }
                token => {
                    let Some(choice) = choice else {
                        let reason = FailReason::NoAction {
                            token: token.as_ref().map(Symbol::name),
                        };
                        if let Some(token) = token {
                            ctx.requeue(token);
                        }
                        return Ok(fail(ctx, &tree, reason));
                    };

                    // The token was only peeked at.
                    if let Some(token) = token {
                        ctx.requeue(token);
                    }
                    self.reduce(&mut ctx, &mut tree, choice)?;
                }
            }
        }
    }

    /// Turn an input item into a grammar terminal, keeping its surface text.
    ///
    /// Tags covered by the reduction map are mapped. Tags the grammar names
    /// directly pass through. Anything else is an unknown tag.
    fn normalize(&self, item: InputItem) -> Result<Symbol, ParseError> {
        let token = match item {
            InputItem::Symbol(symbol) => return Ok(symbol),
            InputItem::Tagged(token) => token,
        };

        let symbol = token.to_symbol();
        if let Some(reduction) = &self.reduction {
            if reduction.contains(&symbol) {
                return reduction.reduce(&symbol);
            }
        }
        if self.grammar.is_known(&symbol) {
            return Ok(symbol);
        }

        Err(ParseError::UnknownTag {
            tag: token.tag,
            word: token.text,
        })
    }

    fn reduce(
        &self,
        ctx: &mut ParseContext,
        tree: &mut StateTree<'_>,
        choice: ReduceChoice,
    ) -> Result<(), ParseError> {
        let frame = tree.frame(choice.frame);
        let (from_sym, rule) = (frame.from_sym, frame.rule);
        let length = frame.to_sym.len();

        let popped = ctx.pop_pattern(length, from_sym)?;
        let mut produced = self.grammar.match_pattern(&popped).ok_or_else(|| {
            ParseError::ReductionMismatch {
                pattern: popped.iter().map(Symbol::name).collect(),
            }
        })?;
        produced.components = popped;

        let discarded: Vec<String> = choice
            .tied
            .iter()
            .map(|id| {
                let tied = tree.frame(*id);
                format!("{}/{}", tied.from_sym, tied.rule)
            })
            .collect();
        if !discarded.is_empty() {
            tracing::warn!(
                produced = %produced,
                rule,
                discarded = ?discarded,
                "several productions completed together, keeping the first"
            );
        }

        // Every frame waiting on this nonterminal drops its alternatives and
        // takes the reduced symbol on the next shift.
        let parents = tree.parents_expecting(choice.frame);
        let removed: usize = parents
            .iter()
            .map(|parent| tree.discard_children(*parent))
            .sum();
        tracing::debug!(
            produced = %produced,
            rule,
            popped = length,
            parents = parents.len(),
            removed,
            "reduce"
        );

        ctx.trace.push(Action::Reduce {
            produced: produced.name(),
            rule,
            popped: length,
            discarded,
        });
        ctx.requeue(produced);
        Ok(())
    }
}

fn shift(ctx: &mut ParseContext, tree: &mut StateTree<'_>, token: Symbol) -> Result<(), ParseError> {
    let root = tree.root();
    let advanced = tree.shift(&token, root);
    tree.prune(root);
    tree.expand(root, false)?;

    tracing::debug!(symbol = %token, value = ?token.value, advanced, "shift");
    ctx.trace.push(Action::Shift {
        symbol: token.name(),
        value: token.value.clone(),
        advanced,
    });
    ctx.parse_stack.push(token);
    Ok(())
}

fn fail(mut ctx: ParseContext, tree: &StateTree<'_>, reason: FailReason) -> TracedParse {
    tracing::debug!(steps = ctx.steps, %reason, "fail");
    ctx.trace.push(Action::Fail {
        reason: reason.to_string(),
    });

    let input_stack = ctx.pending_input();
    TracedParse {
        outcome: ParseOutcome::Fail(PartialParse {
            reason,
            parse_stack: ctx.parse_stack,
            input_stack,
            frames: tree.snapshot(),
        }),
        trace: ctx.trace,
    }
}

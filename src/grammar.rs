//! Context-free grammar tables
//!
//! Rules are loaded from a JSON object mapping each nonterminal to its list
//! of productions:
//!
//! ```text
//! { "S": [["NP", "VP"]], "NP": [["ART", "N"]], "VP": [["V", "N"]] }
//! ```
//!
//! Key order is preserved and defines which nonterminal wins when two rules
//! share an identical production.

use crate::error::GrammarError;
use crate::grammar_analysis::GrammarAnalysis;
use crate::symbol::{Symbol, SymbolId};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Start symbol used when none is given.
pub const DEFAULT_START: &str = "S";

/// When several nonterminals share one production, the first declared wins.
pub const FIRST_PRODUCTION_WINS: bool = true;

/// An ordered right-hand side.
pub type Production = Vec<Symbol>;

/// Raw rule table as read from JSON: nonterminal name to productions.
pub type RuleTable = IndexMap<String, Vec<Vec<String>>>;

/// Immutable grammar shared read-only by every parse.
#[derive(Debug, Clone)]
pub struct Grammar {
    start: Symbol,
    root_rules: Vec<Production>,
    rules: IndexMap<SymbolId, Vec<Production>>,
    terminals: IndexSet<SymbolId>,
    patterns: HashMap<Vec<SymbolId>, SymbolId>,
    analysis: GrammarAnalysis,
    root: Symbol,
    rule_end: Symbol,
}

impl Grammar {
    /// Build a grammar from an in-memory rule table.
    pub fn new(table: RuleTable, start_symbol: &str) -> Result<Self, GrammarError> {
        if table.is_empty() {
            return Err(GrammarError::Empty);
        }

        let mut rules: IndexMap<SymbolId, Vec<Production>> = IndexMap::new();
        for (name, productions) in table {
            let mut converted = Vec::with_capacity(productions.len());
            for (index, production) in productions.into_iter().enumerate() {
                if production.is_empty() {
                    return Err(GrammarError::EmptyProduction { rule: name, index });
                }
                converted.push(production.into_iter().map(Symbol::new).collect());
            }
            rules.entry(SymbolId::Named(name)).or_default().extend(converted);
        }

        let start = Symbol::new(start_symbol);
        if !rules.contains_key(start.id()) {
            return Err(GrammarError::UndefinedStart(start_symbol.to_string()));
        }

        let analysis = GrammarAnalysis::analyze(&rules, start.id());
        if !analysis.left_recursive_rules.is_empty() {
            return Err(GrammarError::LeftRecursion {
                rules: analysis.left_recursive_rules.iter().map(|id| id.to_string()).collect(),
            });
        }

        let terminals = rules
            .values()
            .flatten()
            .flatten()
            .map(|sym| sym.id().clone())
            .filter(|id| !rules.contains_key(id))
            .collect();

        let mut patterns = HashMap::new();
        for (from, productions) in &rules {
            for production in productions {
                let key: Vec<SymbolId> = production.iter().map(|s| s.id().clone()).collect();
                if FIRST_PRODUCTION_WINS {
                    patterns.entry(key).or_insert_with(|| from.clone());
                } else {
                    patterns.insert(key, from.clone());
                }
            }
        }

        tracing::debug!(
            rules = rules.len(),
            terminals = analysis.terminal_count,
            start = %start,
            "grammar loaded"
        );

        Ok(Grammar {
            root_rules: vec![vec![start.clone()]],
            start,
            rules,
            terminals,
            patterns,
            analysis,
            root: Symbol::root(),
            rule_end: Symbol::rule_end(),
        })
    }

    /// Parse a grammar from JSON text.
    pub fn from_json_str(json: &str, start_symbol: &str) -> Result<Self, GrammarError> {
        let table: RuleTable = serde_json::from_str(json)?;
        Grammar::new(table, start_symbol)
    }

    /// Read and parse a grammar file.
    pub fn load(path: impl AsRef<Path>, start_symbol: &str) -> Result<Self, GrammarError> {
        let text = fs::read_to_string(path)?;
        Grammar::from_json_str(&text, start_symbol)
    }

    /// Productions of `symbol`, empty for terminals and unknown symbols.
    pub fn productions_of(&self, symbol: &Symbol) -> &[Production] {
        match symbol.id() {
            SymbolId::Root => &self.root_rules,
            SymbolId::RuleEnd => &[],
            id => self.rules.get(id).map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    /// Fresh copy of the first nonterminal whose production equals `pattern`.
    ///
    /// Only symbol identity is compared. The synthetic ROOT rule is never
    /// matched.
    pub fn match_pattern(&self, pattern: &[Symbol]) -> Option<Symbol> {
        let key: Vec<SymbolId> = pattern.iter().map(|s| s.id().clone()).collect();
        self.patterns.get(&key).cloned().map(Symbol::from_id)
    }

    pub fn start_symbol(&self) -> &Symbol {
        &self.start
    }

    /// The synthetic symbol whose only production is `[start_symbol]`.
    pub fn root_symbol(&self) -> &Symbol {
        &self.root
    }

    /// `[start_symbol]`, the only production of ROOT.
    pub fn root_production(&self) -> &[Symbol] {
        self.root_rules.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// The sentinel returned for cursor positions past a production's end.
    pub fn rule_end(&self) -> &Symbol {
        &self.rule_end
    }

    pub fn is_nonterminal(&self, symbol: &Symbol) -> bool {
        !self.productions_of(symbol).is_empty()
    }

    pub fn is_terminal(&self, symbol: &Symbol) -> bool {
        !symbol.id().is_sentinel() && !self.is_nonterminal(symbol)
    }

    /// Whether the symbol appears anywhere in the grammar.
    pub fn is_known(&self, symbol: &Symbol) -> bool {
        self.rules.contains_key(symbol.id()) || self.terminals.contains(symbol.id())
    }

    pub fn terminals(&self) -> impl Iterator<Item = &SymbolId> {
        self.terminals.iter()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn analysis(&self) -> &GrammarAnalysis {
        &self.analysis
    }
}

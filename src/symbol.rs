//! Grammar symbols and the parse trees built from them
//!
//! A [`Symbol`] is identified by its [`SymbolId`] alone. Surface values and
//! reduced components ride along for output but never take part in equality
//! or hashing, so a shifted `N("carrot")` still matches the grammar's `N`.

use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Name of a grammar symbol.
///
/// The two sentinels are their own variants so that no grammar-supplied name
/// can ever collide with them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolId {
    /// Synthetic root whose only production is `[start_symbol]`.
    Root,
    /// Returned when a cursor is past the end of its production.
    RuleEnd,
    /// Any terminal or nonterminal named by the grammar or a tagger.
    Named(String),
}

impl SymbolId {
    pub fn named(name: impl Into<String>) -> Self {
        SymbolId::Named(name.into())
    }

    pub fn is_sentinel(&self) -> bool {
        !matches!(self, SymbolId::Named(_))
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolId::Root => f.write_str("ROOT"),
            SymbolId::RuleEnd => f.write_str("EOF"),
            SymbolId::Named(name) => f.write_str(name),
        }
    }
}

impl Serialize for SymbolId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A terminal or nonterminal occurrence.
///
/// `Clone` is a deep copy: two derivations that reuse the same grammar
/// symbol never see each other's `value` or `components`.
#[derive(Debug, Clone, Serialize)]
pub struct Symbol {
    #[serde(rename = "name")]
    id: SymbolId,

    /// Surface text, set on shifted terminals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Children, set when this symbol is the product of a reduction
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Symbol>,
}

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Symbol::from_id(SymbolId::named(name))
    }

    pub fn from_id(id: SymbolId) -> Self {
        Symbol {
            id,
            value: None,
            components: Vec::new(),
        }
    }

    /// A terminal instance carrying surface text.
    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut sym = Symbol::new(name);
        sym.value = Some(value.into());
        sym
    }

    pub fn root() -> Self {
        Symbol::from_id(SymbolId::Root)
    }

    pub fn rule_end() -> Self {
        Symbol::from_id(SymbolId::RuleEnd)
    }

    pub fn id(&self) -> &SymbolId {
        &self.id
    }

    pub fn name(&self) -> String {
        self.id.to_string()
    }

    /// Terminal leaves of this tree in left-to-right order.
    pub fn leaves(&self) -> Vec<&Symbol> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Symbol>) {
        if self.components.is_empty() {
            out.push(self);
        } else {
            for child in &self.components {
                child.collect_leaves(out);
            }
        }
    }

    /// Depth-first rendering, one symbol per line, `|\t` per level of depth.
    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        out.push_str(&"|\t".repeat(depth));
        out.push_str(&self.id.to_string());
        if let Some(value) = &self.value {
            out.push_str(&format!(" ({})", value));
        }
        out.push('\n');
        for child in &self.components {
            child.render_into(out, depth + 1);
        }
    }

    /// Compact one-line form, e.g. `S(NP(ART N) VP(V N))`.
    pub fn bracketed(&self) -> String {
        if self.components.is_empty() {
            return self.id.to_string();
        }
        let inner: Vec<String> = self.components.iter().map(Symbol::bracketed).collect();
        format!("{}({})", self.id, inner.join(" "))
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

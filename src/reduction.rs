//! Tag reductions
//!
//! Taggers tend to emit fine-grained tags (`NN`, `NNS`, `VBD`) while small
//! grammars speak in coarse terminals (`N`, `V`). A reduction source maps
//! each coarse terminal to the fine tags it covers:
//!
//! ```text
//! { "N": ["NN", "NNS"], "V": ["VB", "VBD"] }
//! ```
//!
//! and is inverted at load time into fine tag → coarse terminal.

use crate::error::{GrammarError, ParseError};
use crate::symbol::{Symbol, SymbolId};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Raw reduction table as read from JSON: coarse tag to fine tags.
pub type ReductionTable = IndexMap<String, Vec<String>>;

#[derive(Debug, Clone, Default)]
pub struct ReductionMap {
    data: HashMap<SymbolId, SymbolId>,
}

impl ReductionMap {
    /// Invert a coarse → fine table. A fine tag listed under several coarse
    /// tags keeps the first one.
    pub fn new(table: ReductionTable) -> Self {
        let mut data = HashMap::new();
        for (coarse, fine_tags) in table {
            let coarse = SymbolId::Named(coarse);
            for fine in fine_tags {
                data.entry(SymbolId::Named(fine))
                    .or_insert_with(|| coarse.clone());
            }
        }
        ReductionMap { data }
    }

    pub fn from_json_str(json: &str) -> Result<Self, GrammarError> {
        let table: ReductionTable = serde_json::from_str(json)?;
        Ok(ReductionMap::new(table))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GrammarError> {
        let text = fs::read_to_string(path)?;
        ReductionMap::from_json_str(&text)
    }

    /// Map a tagged symbol to its grammar terminal, keeping its surface value.
    pub fn reduce(&self, tag: &Symbol) -> Result<Symbol, ParseError> {
        let coarse = self.data.get(tag.id()).ok_or_else(|| ParseError::UnknownTag {
            tag: tag.name(),
            word: tag.value.clone().unwrap_or_default(),
        })?;

        let mut reduced = Symbol::from_id(coarse.clone());
        reduced.value = tag.value.clone();
        Ok(reduced)
    }

    pub fn contains(&self, tag: &Symbol) -> bool {
        self.data.contains_key(tag.id())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

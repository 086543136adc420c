//! Multi-path parser state
//!
//! Every derivation the parser is still considering is a [`StateFrame`]: a
//! nonterminal, the index of the production being followed, and a cursor
//! into that production. A frame's children expand the symbol under its
//! cursor, one child per production of that symbol. Leaves are the frontier,
//! the frames waiting for a terminal.
//!
//! Frames live in an arena and refer to each other by [`FrameId`]. Detaching
//! a subtree only edits the parent's child list; detached frames stay in the
//! arena until the tree is dropped at the end of the parse.

use crate::error::ParseError;
use crate::grammar::{Grammar, Production};
use crate::symbol::{Symbol, SymbolId};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

/// Handle to a frame in a [`StateTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(usize);

/// One candidate derivation.
#[derive(Debug, Clone)]
pub struct StateFrame<'g> {
    /// Nonterminal being expanded
    pub from_sym: &'g Symbol,
    /// Index of the production of `from_sym` being followed
    pub rule: usize,
    /// That production's right-hand side
    pub to_sym: &'g [Symbol],
    /// Number of symbols of `to_sym` matched so far
    pub constituent: usize,
    pub parent: Option<FrameId>,
    pub children: Vec<FrameId>,
    pub to_delete: bool,
}

impl<'g> StateFrame<'g> {
    pub fn is_complete(&self) -> bool {
        self.constituent == self.to_sym.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Result of choosing which complete frame to reduce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReduceChoice {
    /// The frame whose production will be reduced
    pub frame: FrameId,
    /// Siblings that completed at the same cursor and are discarded with it
    pub tied: Vec<FrameId>,
}

/// Arena-backed tree of [`StateFrame`]s rooted at the synthetic ROOT rule.
#[derive(Debug, Clone)]
pub struct StateTree<'g> {
    grammar: &'g Grammar,
    frames: Vec<StateFrame<'g>>,
    root: FrameId,
    max_depth: usize,
}

impl<'g> StateTree<'g> {
    /// A tree holding only the root frame `ROOT -> • start`.
    pub fn new(grammar: &'g Grammar, max_depth: usize) -> Self {
        let root_sym = grammar.root_symbol();
        let root_rule: &'g [Production] = grammar.productions_of(root_sym);
        let root = StateFrame {
            from_sym: root_sym,
            rule: 0,
            to_sym: root_rule.first().map(Vec::as_slice).unwrap_or(&[]),
            constituent: 0,
            parent: None,
            children: Vec::new(),
            to_delete: false,
        };

        StateTree {
            grammar,
            frames: vec![root],
            root: FrameId(0),
            max_depth,
        }
    }

    pub fn root(&self) -> FrameId {
        self.root
    }

    pub fn frame(&self, id: FrameId) -> &StateFrame<'g> {
        &self.frames[id.0]
    }

    /// Symbol under the frame's cursor, or the rule-end sentinel.
    pub fn expected(&self, id: FrameId) -> &'g Symbol {
        let grammar: &'g Grammar = self.grammar;
        let frame = &self.frames[id.0];
        let to_sym: &'g [Symbol] = frame.to_sym;
        to_sym.get(frame.constituent).unwrap_or(grammar.rule_end())
    }

    /// Add one child per production of the symbol under each frame's cursor.
    ///
    /// Productions already represented among a frame's children are skipped.
    /// With `create_all` false only leaves grow new children; existing
    /// interior frames are just descended through.
    pub fn expand(&mut self, id: FrameId, create_all: bool) -> Result<(), ParseError> {
        let mut chain = Vec::new();
        self.expand_from(id, create_all, 0, &mut chain)
    }

    fn expand_from(
        &mut self,
        id: FrameId,
        create_all: bool,
        depth: usize,
        chain: &mut Vec<(SymbolId, usize)>,
    ) -> Result<(), ParseError> {
        let expected = self.expected(id);
        if depth > self.max_depth {
            return Err(ParseError::ExpansionDepthExceeded {
                symbol: expected.name(),
                limit: self.max_depth,
            });
        }

        if create_all || self.frames[id.0].is_leaf() {
            let grammar: &'g Grammar = self.grammar;
            let productions: &'g [Production] = grammar.productions_of(expected);
            for (rule, production) in productions.iter().enumerate() {
                let represented = self.frames[id.0].children.iter().any(|child| {
                    let child = &self.frames[child.0];
                    child.from_sym == expected && child.rule == rule
                });
                if !represented {
                    let child = self.attach(id, expected, rule, production);
                    tracing::trace!(parent = id.0, child = child.0, %expected, rule, "expanded");
                }
            }
        }

        let children = self.frames[id.0].children.clone();
        for child in children {
            let frame = &self.frames[child.0];
            let key = (frame.from_sym.id().clone(), frame.rule);

            // Frames at cursor 0 form a chain that consumed nothing; a repeat
            // in that chain would expand forever.
            if frame.constituent == 0 {
                if chain.contains(&key) {
                    return Err(ParseError::ExpansionCycle {
                        symbol: key.0.to_string(),
                        rule: key.1,
                    });
                }
                chain.push(key);
                self.expand_from(child, create_all, depth + 1, chain)?;
                chain.pop();
            } else {
                self.expand_from(child, create_all, depth + 1, &mut Vec::new())?;
            }
        }

        Ok(())
    }

    fn attach(
        &mut self,
        parent: FrameId,
        from_sym: &'g Symbol,
        rule: usize,
        to_sym: &'g [Symbol],
    ) -> FrameId {
        let id = FrameId(self.frames.len());
        self.frames.push(StateFrame {
            from_sym,
            rule,
            to_sym,
            constituent: 0,
            parent: Some(parent),
            children: Vec::new(),
            to_delete: false,
        });
        self.frames[parent.0].children.push(id);
        id
    }

    /// Whether the frame can take `token` as its next symbol.
    ///
    /// Leaves match on their expected symbol. An interior frame matches only
    /// when its expected symbol is itself a terminal equal to the token.
    fn accepts(&self, id: FrameId, token: &Symbol) -> bool {
        let expected = self.expected(id);
        expected == token
            && (self.frames[id.0].is_leaf() || self.grammar.is_terminal(expected))
    }

    /// Whether any frame under `id` can shift `token`.
    pub fn can_shift(&self, token: &Symbol, id: FrameId) -> bool {
        if self.accepts(id, token) {
            return true;
        }
        self.frames[id.0]
            .children
            .iter()
            .any(|child| self.can_shift(token, *child))
    }

    /// Advance every frame under `id` that accepts `token` and mark every
    /// other leaf for deletion. Returns the number of frames advanced.
    pub fn shift(&mut self, token: &Symbol, id: FrameId) -> usize {
        if self.accepts(id, token) {
            let frame = &mut self.frames[id.0];
            frame.constituent += 1;
            frame.children.clear();
            return 1;
        }

        if self.frames[id.0].is_leaf() {
            self.frames[id.0].to_delete = true;
            return 0;
        }

        let children = self.frames[id.0].children.clone();
        children.into_iter().map(|child| self.shift(token, child)).sum()
    }

    /// Remove marked frames bottom-up until no pass marks anything new.
    ///
    /// A frame that loses every child is itself marked.
    pub fn prune(&mut self, id: FrameId) {
        let mut passes = 0;
        while self.prune_pass(id) {
            passes += 1;
        }
        tracing::trace!(passes, "pruned");
    }

    fn prune_pass(&mut self, id: FrameId) -> bool {
        let children = self.frames[id.0].children.clone();
        if children.is_empty() {
            return false;
        }

        let mut dirty = false;
        for child in &children {
            dirty |= self.prune_pass(*child);
        }

        let kept: Vec<FrameId> = children
            .into_iter()
            .filter(|child| !self.frames[child.0].to_delete)
            .collect();

        let frame = &mut self.frames[id.0];
        if kept.is_empty() && !frame.to_delete {
            frame.to_delete = true;
            dirty = true;
        }
        frame.children = kept;
        dirty
    }

    /// Whether `id` or any descendant is complete. The root never counts:
    /// ROOT is not a symbol the engine ever produces.
    pub fn can_reduce(&self, id: FrameId) -> bool {
        let frame = &self.frames[id.0];
        if id != self.root && frame.is_complete() {
            return true;
        }
        frame.children.iter().any(|child| self.can_reduce(*child))
    }

    /// Breadth-first list of every frame reachable from `id`.
    pub fn traverse(&self, id: FrameId) -> Vec<FrameId> {
        let mut order = Vec::new();
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            order.push(current);
            queue.extend(self.frames[current.0].children.iter().copied());
        }
        order
    }

    /// Pick the complete frame to reduce.
    ///
    /// The greatest cursor wins. Among equal cursors the first frame in
    /// breadth-first order wins, which is the shallowest one and, among
    /// siblings, the lowest production index. Siblings tied with the winner
    /// are reported so the caller can record them.
    pub fn select_reduction(&self) -> Option<ReduceChoice> {
        let complete: Vec<FrameId> = self
            .traverse(self.root)
            .into_iter()
            .filter(|id| *id != self.root && self.frames[id.0].is_complete())
            .collect();

        let mut best: Option<FrameId> = None;
        for id in &complete {
            match best {
                Some(current) if self.frames[id.0].constituent <= self.frames[current.0].constituent => {}
                _ => best = Some(*id),
            }
        }
        let frame = best?;

        let chosen = &self.frames[frame.0];
        let tied = complete
            .into_iter()
            .filter(|id| {
                let other = &self.frames[id.0];
                *id != frame
                    && other.parent == chosen.parent
                    && other.constituent == chosen.constituent
            })
            .collect();

        Some(ReduceChoice { frame, tied })
    }

    /// Parents holding a complete copy of the derivation `id` follows.
    ///
    /// Frames that expect the same nonterminal in different places each get
    /// their own child for it. Complete frames are leaves matching the top of
    /// the parse stack, so every complete frame with the same rule and
    /// production as `id` covers the same symbols, and each of their parents
    /// takes the reduced nonterminal next.
    pub fn parents_expecting(&self, id: FrameId) -> Vec<FrameId> {
        let chosen = &self.frames[id.0];
        let mut parents = Vec::new();

        for other in self.traverse(self.root) {
            let frame = &self.frames[other.0];
            if other == self.root
                || !frame.is_complete()
                || frame.from_sym != chosen.from_sym
                || frame.rule != chosen.rule
            {
                continue;
            }
            if let Some(parent) = frame.parent {
                if !parents.contains(&parent) {
                    parents.push(parent);
                }
            }
        }

        parents
    }

    /// Detach every child of `id`.
    pub fn discard_children(&mut self, id: FrameId) -> usize {
        let removed = std::mem::take(&mut self.frames[id.0].children);
        removed.len()
    }

    /// Frames currently waiting for a terminal.
    pub fn frontier(&self) -> Vec<FrameId> {
        self.traverse(self.root)
            .into_iter()
            .filter(|id| self.frames[id.0].is_leaf())
            .collect()
    }

    /// Depth-first dump of every reachable frame, for diagnostics.
    pub fn snapshot(&self) -> Vec<FrameSnapshot> {
        let mut out = Vec::new();
        self.snapshot_into(self.root, 0, &mut out);
        out
    }

    fn snapshot_into(&self, id: FrameId, depth: usize, out: &mut Vec<FrameSnapshot>) {
        let frame = &self.frames[id.0];
        out.push(FrameSnapshot {
            depth,
            from_sym: frame.from_sym.name(),
            rule: frame.rule,
            constituent: frame.constituent,
            production: frame.to_sym.iter().map(Symbol::name).collect(),
        });
        for child in &frame.children {
            self.snapshot_into(*child, depth + 1, out);
        }
    }
}

/// Owned copy of one frame, detached from the grammar's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameSnapshot {
    pub depth: usize,
    pub from_sym: String,
    pub rule: usize,
    pub constituent: usize,
    pub production: Vec<String>,
}

impl fmt::Display for FrameSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({} -> {} {}) {} ->",
            "  ".repeat(self.depth),
            self.from_sym,
            self.rule,
            self.constituent,
            self.from_sym
        )?;
        for (i, sym) in self.production.iter().enumerate() {
            if i == self.constituent {
                f.write_str(" •")?;
            }
            write!(f, " {}", sym)?;
        }
        if self.constituent >= self.production.len() {
            f.write_str(" •")?;
        }
        Ok(())
    }
}

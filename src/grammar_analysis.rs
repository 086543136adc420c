//! Grammar Analysis
//!
//! Inspects a rule table without modifying it. Left recursion is fatal for
//! the shift-reduce engine (frontier expansion would never bottom out), so
//! [`Grammar::new`](crate::grammar::Grammar::new) rejects any grammar this
//! analysis flags as left-recursive. Everything else is informational.

use crate::grammar::Production;
use crate::symbol::SymbolId;
use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Analysis results for a rule table
#[derive(Debug, Clone, Default)]
pub struct GrammarAnalysis {
    /// Rules that can derive themselves (directly or indirectly)
    pub recursive_rules: BTreeSet<SymbolId>,

    /// Rules that can derive themselves at the leftmost position
    pub left_recursive_rules: BTreeSet<SymbolId>,

    /// Rules never reached from the start symbol
    pub unreachable_rules: BTreeSet<SymbolId>,

    /// Productions claimed by more than one nonterminal, with their claimants
    /// in declaration order. Only the first claimant is ever produced.
    pub shared_productions: Vec<(Vec<SymbolId>, Vec<SymbolId>)>,

    /// Number of alternatives plus total production length, per rule
    pub complexity_scores: BTreeMap<SymbolId, usize>,

    /// Number of distinct terminals
    pub terminal_count: usize,
}

impl GrammarAnalysis {
    /// Analyze a rule table
    pub fn analyze(rules: &IndexMap<SymbolId, Vec<Production>>, start: &SymbolId) -> Self {
        let recursive_rules = rules
            .keys()
            .filter(|name| is_recursive(name, rules))
            .cloned()
            .collect();

        let left_recursive_rules = rules
            .keys()
            .filter(|name| left_reachable(name, rules).contains(*name))
            .cloned()
            .collect();

        let reachable = reachable_from(start, rules);
        let unreachable_rules = rules
            .keys()
            .filter(|name| !reachable.contains(*name))
            .cloned()
            .collect();

        let complexity_scores = rules
            .iter()
            .map(|(name, productions)| {
                let score = productions.len() + productions.iter().map(Vec::len).sum::<usize>();
                (name.clone(), score)
            })
            .collect();

        let terminal_count = rules
            .values()
            .flatten()
            .flatten()
            .map(|sym| sym.id())
            .filter(|id| !rules.contains_key(*id))
            .collect::<HashSet<_>>()
            .len();

        GrammarAnalysis {
            recursive_rules,
            left_recursive_rules,
            unreachable_rules,
            shared_productions: find_shared_productions(rules),
            complexity_scores,
            terminal_count,
        }
    }

    pub fn is_recursive(&self, rule: &SymbolId) -> bool {
        self.recursive_rules.contains(rule)
    }

    pub fn is_left_recursive(&self, rule: &SymbolId) -> bool {
        self.left_recursive_rules.contains(rule)
    }

    pub fn complexity(&self, rule: &SymbolId) -> usize {
        self.complexity_scores.get(rule).copied().unwrap_or(0)
    }

    /// Whether reduction lookups can be ambiguous for this grammar
    pub fn is_potentially_ambiguous(&self) -> bool {
        !self.shared_productions.is_empty()
    }

    /// Human-readable report of grammar issues
    pub fn report(&self) -> String {
        let mut report = String::new();

        if !self.left_recursive_rules.is_empty() {
            report.push_str("⚠️  Left-recursive rules (rejected by the parser):\n");
            for rule in &self.left_recursive_rules {
                report.push_str(&format!("   - {}\n", rule));
            }
            report.push('\n');
        }

        if !self.shared_productions.is_empty() {
            report.push_str("⚠️  Productions shared by several rules (first one wins):\n");
            for (production, owners) in &self.shared_productions {
                let production: Vec<String> = production.iter().map(|s| s.to_string()).collect();
                let owners: Vec<String> = owners.iter().map(|s| s.to_string()).collect();
                report.push_str(&format!(
                    "   - [{}] claimed by {}\n",
                    production.join(" "),
                    owners.join(", ")
                ));
            }
            report.push('\n');
        }

        if !self.unreachable_rules.is_empty() {
            report.push_str("ℹ️  Rules unreachable from the start symbol:\n");
            for rule in &self.unreachable_rules {
                report.push_str(&format!("   - {}\n", rule));
            }
            report.push('\n');
        }

        let recursive: Vec<_> = self
            .recursive_rules
            .iter()
            .filter(|rule| !self.left_recursive_rules.contains(*rule))
            .collect();
        if !recursive.is_empty() {
            report.push_str("ℹ️  Recursive rules:\n");
            for rule in recursive {
                report.push_str(&format!("   - {}\n", rule));
            }
            report.push('\n');
        }

        if report.is_empty() {
            report.push_str("✅ No issues detected\n");
        }

        report
    }
}

/// Check if a rule can derive itself (explicit work stack, no recursion)
fn is_recursive(rule: &SymbolId, rules: &IndexMap<SymbolId, Vec<Production>>) -> bool {
    let mut visited: HashSet<&SymbolId> = HashSet::new();
    let mut work_stack: Vec<&SymbolId> = successors(rule, rules).collect();

    while let Some(current) = work_stack.pop() {
        if current == rule {
            return true;
        }
        if !visited.insert(current) {
            continue;
        }
        work_stack.extend(successors(current, rules));
    }

    false
}

/// Every symbol named in any production of `rule`
fn successors<'a>(
    rule: &SymbolId,
    rules: &'a IndexMap<SymbolId, Vec<Production>>,
) -> impl Iterator<Item = &'a SymbolId> {
    rules
        .get(rule)
        .into_iter()
        .flatten()
        .flatten()
        .map(|sym| sym.id())
}

/// Nonterminals that can appear leftmost in a derivation from `rule`.
///
/// Productions are never empty, so only the first symbol of each production
/// is left-reachable. Computed by fixpoint iteration.
fn left_reachable(
    rule: &SymbolId,
    rules: &IndexMap<SymbolId, Vec<Production>>,
) -> HashSet<SymbolId> {
    let mut reachable: HashSet<SymbolId> = HashSet::new();
    let mut frontier = vec![rule.clone()];

    while let Some(current) = frontier.pop() {
        let Some(productions) = rules.get(&current) else {
            continue;
        };
        for production in productions {
            if let Some(first) = production.first() {
                let id = first.id();
                if rules.contains_key(id) && reachable.insert(id.clone()) {
                    frontier.push(id.clone());
                }
            }
        }
    }

    reachable
}

/// Nonterminals reachable from the start symbol, including itself
fn reachable_from(
    start: &SymbolId,
    rules: &IndexMap<SymbolId, Vec<Production>>,
) -> HashSet<SymbolId> {
    let mut reachable = HashSet::new();
    let mut work_stack = vec![start.clone()];

    while let Some(current) = work_stack.pop() {
        if !rules.contains_key(&current) || !reachable.insert(current.clone()) {
            continue;
        }
        work_stack.extend(successors(&current, rules).cloned());
    }

    reachable
}

fn find_shared_productions(
    rules: &IndexMap<SymbolId, Vec<Production>>,
) -> Vec<(Vec<SymbolId>, Vec<SymbolId>)> {
    let mut owners: IndexMap<Vec<SymbolId>, Vec<SymbolId>> = IndexMap::new();

    for (name, productions) in rules {
        for production in productions {
            let key: Vec<SymbolId> = production.iter().map(|s| s.id().clone()).collect();
            let claimants = owners.entry(key).or_default();
            if !claimants.contains(name) {
                claimants.push(name.clone());
            }
        }
    }

    owners
        .into_iter()
        .filter(|(_, claimants)| claimants.len() > 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Symbol;

    fn table(rules: Vec<(&str, Vec<Vec<&str>>)>) -> IndexMap<SymbolId, Vec<Production>> {
        rules
            .into_iter()
            .map(|(name, productions)| {
                let productions = productions
                    .into_iter()
                    .map(|p| p.into_iter().map(Symbol::new).collect())
                    .collect();
                (SymbolId::named(name), productions)
            })
            .collect()
    }

    fn id(name: &str) -> SymbolId {
        SymbolId::named(name)
    }

    #[test]
    fn test_detect_left_recursion() {
        // EXPR -> EXPR PLUS TERM | TERM
        let rules = table(vec![
            ("EXPR", vec![vec!["EXPR", "PLUS", "TERM"], vec!["TERM"]]),
            ("TERM", vec![vec!["NUM"]]),
        ]);

        let analysis = GrammarAnalysis::analyze(&rules, &id("EXPR"));

        assert!(analysis.is_left_recursive(&id("EXPR")));
        assert!(!analysis.is_left_recursive(&id("TERM")));
        assert!(analysis.is_recursive(&id("EXPR")));
    }

    #[test]
    fn test_indirect_left_recursion() {
        let rules = table(vec![("A", vec![vec!["B", "X"]]), ("B", vec![vec!["A", "Y"], vec!["Z"]])]);

        let analysis = GrammarAnalysis::analyze(&rules, &id("A"));

        assert!(analysis.is_left_recursive(&id("A")));
        assert!(analysis.is_left_recursive(&id("B")));
    }

    #[test]
    fn test_right_recursion_is_allowed() {
        // NP -> N | N PP ; PP -> P NP
        let rules = table(vec![("NP", vec![vec!["N"], vec!["N", "PP"]]), ("PP", vec![vec!["P", "NP"]])]);

        let analysis = GrammarAnalysis::analyze(&rules, &id("NP"));

        assert!(analysis.left_recursive_rules.is_empty());
        assert!(analysis.is_recursive(&id("NP")));
        assert!(analysis.is_recursive(&id("PP")));
    }

    #[test]
    fn test_unreachable_and_shared() {
        let rules = table(vec![
            ("S", vec![vec!["A"]]),
            ("A", vec![vec!["X", "Y"]]),
            ("B", vec![vec!["X", "Y"]]),
        ]);

        let analysis = GrammarAnalysis::analyze(&rules, &id("S"));

        assert_eq!(analysis.unreachable_rules.iter().collect::<Vec<_>>(), vec![&id("B")]);
        assert!(analysis.is_potentially_ambiguous());
        assert_eq!(
            analysis.shared_productions,
            vec![(vec![id("X"), id("Y")], vec![id("A"), id("B")])]
        );
        assert!(analysis.report().contains("claimed by A, B"));
        assert_eq!(analysis.terminal_count, 2);
    }

    #[test]
    fn test_complexity_calculation() {
        let rules = table(vec![("VP", vec![vec!["V"], vec!["V", "NP"]])]);

        let analysis = GrammarAnalysis::analyze(&rules, &id("VP"));

        // 2 alternatives + 1 + 2 symbols
        assert_eq!(analysis.complexity(&id("VP")), 5);
        assert_eq!(analysis.report(), "✅ No issues detected\n");
    }
}

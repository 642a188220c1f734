//! Occurrence matching for extract-variable
//!
//! Two expressions are the same occurrence when their trees are structurally
//! equal and every identifier in them refers to the same binding.

use std::str::FromStr;
use serde::{Deserialize, Serialize};
use tree_sitter::Node;
use crate::{Error, Result};
use crate::scope::{NameResolver, ScopeTree};
use crate::syntax::Span;
use crate::syntax::javascript::{is_assignment_target, is_identifier, is_statement_list, significant_children};

/// Which occurrences to replace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OccurrenceMode {
    /// Only the earliest occurrence
    First,
    /// Every occurrence in the boundary
    #[default]
    All,
}

impl OccurrenceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OccurrenceMode::First => "first",
            OccurrenceMode::All => "all",
        }
    }
}

impl FromStr for OccurrenceMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "first" => Ok(OccurrenceMode::First),
            "all" => Ok(OccurrenceMode::All),
            _ => Err(Error::InvalidSelection(format!("Unknown occurrence mode: {}", s))),
        }
    }
}

impl std::fmt::Display for OccurrenceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Node of the innermost scope enclosing `node` (a function-like node is
/// enclosed by the scope around it, not its own)
pub fn scope_boundary<'tree>(tree: &ScopeTree<'tree>, node: Node<'tree>) -> Node<'tree> {
    let scope = tree.scope_of(node);
    if tree.scope(scope).node == node {
        if let Some(parent) = tree.parent(scope) {
            return tree.scope(parent).node;
        }
    }
    tree.scope(scope).node
}

/// Find the expressions equivalent to `selected` inside `boundary`, in
/// source order
pub fn find_occurrences<'tree>(
    tree: &ScopeTree<'tree>,
    selected: Node<'tree>,
    boundary: Node<'tree>,
    mode: OccurrenceMode,
) -> Vec<Node<'tree>> {
    let matcher = Matcher {
        tree,
        resolver: NameResolver::new(tree),
    };
    let mut found = Vec::new();
    matcher.collect(boundary, selected, &mut found);

    if !found.contains(&selected) {
        found.push(selected);
        found.sort_by_key(|n| n.start_byte());
    }
    if mode == OccurrenceMode::First {
        found.truncate(1);
    }
    tracing::debug!(count = found.len(), mode = %mode, "matched occurrences");
    found
}

struct Matcher<'a, 'tree> {
    tree: &'a ScopeTree<'tree>,
    resolver: NameResolver<'a, 'tree>,
}

impl<'a, 'tree> Matcher<'a, 'tree> {
    fn collect(&self, node: Node<'tree>, selected: Node<'tree>, found: &mut Vec<Node<'tree>>) {
        if node.kind() == selected.kind() && !is_assignment_target(node) && self.equivalent(node, selected) {
            found.push(node);
            return;
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect(child, selected, found);
        }
    }

    fn equivalent(&self, a: Node<'tree>, b: Node<'tree>) -> bool {
        if a.kind() != b.kind() {
            return false;
        }
        let syntax = self.tree.syntax();
        if is_identifier(a) {
            return syntax.text(a) == syntax.text(b)
                && self.resolver.resolve_node(a) == self.resolver.resolve_node(b);
        }
        let left = significant_children(a);
        let right = significant_children(b);
        if left.is_empty() || right.is_empty() {
            return left.len() == right.len() && syntax.text(a) == syntax.text(b);
        }
        left.len() == right.len()
            && left.iter().zip(&right).all(|(x, y)| self.equivalent(*x, *y))
    }
}

/// Statement before which a declaration covering all `occurrences` can be
/// inserted: the statement containing the first occurrence, in the innermost
/// statement list that holds every occurrence
pub fn insertion_point<'tree>(occurrences: &[Node<'tree>]) -> Option<Node<'tree>> {
    let first = *occurrences.first()?;
    let mut current = first;
    while let Some(parent) = current.parent() {
        if is_statement_list(parent) {
            let list = Span::of(parent);
            if occurrences.iter().all(|o| list.contains(Span::of(*o))) {
                return Some(current);
            }
        }
        current = parent;
    }
    None
}

//! Name Resolver - Resolves identifier occurrences to bindings
//!
//! Resolution algorithm:
//! 1. Start at the innermost scope enclosing the occurrence
//! 2. Pick the latest binding of the name visible at the occurrence
//! 3. If none, walk outward to the parent scope
//! 4. No binding anywhere → free name (implicit global)
//!
//! Visibility: inside the occurrence's own function a `let`/`const`/class/
//! parameter binding is visible only from its declaration onward, so a later
//! re-declaration in an inner block does not capture earlier occurrences.
//! Once the walk leaves a function the code runs deferred and every binding
//! of the outer scopes is visible.

use tree_sitter::Node;
use crate::binding::BindingId;
use super::tree::{ScopeId, ScopeKind, ScopeTree};

/// Name resolver over a scope tree
pub struct NameResolver<'a, 'tree> {
    tree: &'a ScopeTree<'tree>,
}

impl<'a, 'tree> NameResolver<'a, 'tree> {
    pub fn new(tree: &'a ScopeTree<'tree>) -> Self {
        Self { tree }
    }

    /// Resolve `name` used at `offset`, starting in `scope`
    pub fn resolve(&self, scope: ScopeId, name: &str, offset: usize) -> Option<BindingId> {
        let mut deferred = false;
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(binding) = self.visible_in(id, name, offset, deferred) {
                return Some(binding);
            }
            let scope = self.tree.scope(id);
            if scope.kind == ScopeKind::Function {
                deferred = true;
            }
            current = scope.parent;
        }
        None
    }

    /// Resolve an identifier node. Declaring identifiers resolve to the
    /// binding they declare.
    pub fn resolve_node(&self, node: Node<'_>) -> Option<BindingId> {
        if let Some(binding) = self.tree.declaration_of(node) {
            return Some(binding);
        }
        let name = self.tree.syntax().text(node);
        let offset = node.start_byte();
        self.resolve(self.tree.scope_at(offset), name, offset)
    }

    /// Latest binding of `name` in one scope that is visible at `offset`
    pub fn visible_in(&self, scope: ScopeId, name: &str, offset: usize, deferred: bool) -> Option<BindingId> {
        self.tree
            .scope(scope)
            .bindings_named(name)
            .iter()
            .rev()
            .copied()
            .find(|&id| deferred || self.tree.binding(id).is_visible_at(offset))
    }
}

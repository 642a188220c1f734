//! Reference finding
//!
//! Re-walks the subtree of a binding's scope and keeps every identifier
//! occurrence that resolves back to the binding. Occurrences absorbed by a
//! closer re-declaration resolve elsewhere and are skipped.

use tree_sitter::Node;
use crate::binding::{BindingId, Reference, ReferenceKind};
use crate::syntax::Span;
use crate::syntax::javascript::{usage, walk_identifiers, Usage};
use super::resolver::NameResolver;
use super::tree::ScopeTree;

impl<'tree> ScopeTree<'tree> {
    /// References of a binding in source order, declaration excluded.
    ///
    /// Computed on first use and cached on the binding.
    pub fn references(&self, binding: BindingId) -> &[Reference<'tree>] {
        self.binding(binding)
            .references
            .get_or_init(|| self.collect_references(binding))
    }

    /// References of a binding in source order, optionally including the
    /// declaring identifier.
    pub fn find_references(&self, binding: BindingId, include_declaration: bool) -> Vec<Reference<'tree>> {
        let mut references = self.references(binding).to_vec();
        if include_declaration {
            let declaration = self.binding(binding).node;
            references.push(Reference {
                node: declaration,
                span: Span::of(declaration),
                kind: ReferenceKind::Declaration,
                binding,
            });
            references.sort_by_key(|r| r.span.start);
        }
        references
    }

    fn collect_references(&self, id: BindingId) -> Vec<Reference<'tree>> {
        let binding = self.binding(id);
        let resolver = NameResolver::new(self);
        let source = self.syntax();
        let mut found = Vec::new();

        let mut visit = |node: Node<'tree>| {
            if source.text(node) != binding.name || self.declaration_of(node).is_some() {
                return;
            }
            if resolver.resolve_node(node) == Some(id) {
                let kind = match usage(node) {
                    Usage::Read => ReferenceKind::Read,
                    Usage::Write => ReferenceKind::Write,
                    Usage::Update => ReferenceKind::Update,
                };
                found.push(Reference {
                    node,
                    span: Span::of(node),
                    kind,
                    binding: id,
                });
            }
        };
        walk_identifiers(self.scope(binding.scope).node, &mut visit);

        tracing::debug!(name = %binding.name, count = found.len(), "collected references");
        found
    }
}

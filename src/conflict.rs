//! Rename conflict detection
//!
//! A rename is safe when no occurrence changes the binding it resolves to.
//! Three things can go wrong, checked in this order:
//! 1. the owning scope already declares the new name
//! 2. an identifier inside the scope that refers to an outer (or global)
//!    name would be captured by the renamed binding
//! 3. a reference of the binding would be captured by a declaration of the
//!    new name in a scope between it and the binding's scope

use serde::{Deserialize, Serialize};
use crate::{Error, Result};
use crate::binding::{BindingId, BindingKind};
use crate::scope::{NameResolver, ScopeId, ScopeTree};
use crate::syntax::{Span, SyntaxTree};
use crate::syntax::javascript::walk_identifiers;

/// Why a name cannot be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictReason {
    /// The owning scope already binds the name
    SameScopeCollision,
    /// An occurrence of an outer name would be captured by the binding
    AncestorCapture,
    /// A reference of the binding would be captured by an inner declaration
    DescendantCapture,
}

impl ConflictReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictReason::SameScopeCollision => "same-scope-collision",
            ConflictReason::AncestorCapture => "ancestor-capture",
            ConflictReason::DescendantCapture => "descendant-capture",
        }
    }
}

impl std::fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A detected conflict and the occurrence that triggered it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub reason: ConflictReason,
    pub name: String,
    pub span: Span,
}

/// Outcome of a conflict check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ConflictReport {
    Clear,
    Conflict(Conflict),
}

impl ConflictReport {
    pub fn is_clear(&self) -> bool {
        matches!(self, ConflictReport::Clear)
    }

    /// Turn a conflict into `Error::RenameConflict`
    pub fn into_result(self, syntax: &SyntaxTree) -> Result<()> {
        match self {
            ConflictReport::Clear => Ok(()),
            ConflictReport::Conflict(conflict) => {
                let position = syntax.position(conflict.span.start);
                Err(Error::RenameConflict {
                    reason: conflict.reason,
                    name: conflict.name,
                    line: position.line,
                    column: position.column,
                })
            }
        }
    }
}

fn conflict(reason: ConflictReason, name: &str, span: Span) -> ConflictReport {
    ConflictReport::Conflict(Conflict {
        reason,
        name: name.to_string(),
        span,
    })
}

/// Check whether renaming `binding` to `new_name` preserves every resolution
pub fn check_rename(tree: &ScopeTree<'_>, binding: BindingId, new_name: &str) -> ConflictReport {
    let target = tree.binding(binding);
    if target.name == new_name {
        return ConflictReport::Clear;
    }
    if target.kind == BindingKind::Var {
        // A block between the `var` and its function that binds the new name
        // would clash with the hoisted declaration
        let mut current = Some(tree.scope_of(target.node));
        while let Some(scope) = current.filter(|&s| s != target.scope) {
            if let Some(&existing) = tree.scope(scope).bindings_named(new_name).first() {
                return conflict(ConflictReason::SameScopeCollision, new_name, tree.binding(existing).span());
            }
            current = tree.parent(scope);
        }
    }
    let sites: Vec<usize> = tree
        .find_references(binding, true)
        .iter()
        .map(|r| r.span.start)
        .collect();
    check_introduce(tree, target.scope, new_name, &sites)
}

/// Check whether a new binding `new_name` in `scope`, referred to from
/// `sites` (byte offsets), preserves every existing resolution
pub fn check_introduce(tree: &ScopeTree<'_>, scope: ScopeId, new_name: &str, sites: &[usize]) -> ConflictReport {
    if let Some(&existing) = tree.scope(scope).bindings_named(new_name).first() {
        return conflict(ConflictReason::SameScopeCollision, new_name, tree.binding(existing).span());
    }

    let resolver = NameResolver::new(tree);
    let syntax = tree.syntax();

    let mut captured = None;
    walk_identifiers(tree.scope(scope).node, &mut |node| {
        if captured.is_some() || syntax.text(node) != new_name || tree.declaration_of(node).is_some() {
            return;
        }
        let outer = match resolver.resolve_node(node) {
            None => true,
            Some(found) => {
                let owner = tree.binding(found).scope;
                owner != scope && tree.encloses(owner, scope)
            }
        };
        if outer {
            captured = Some(Span::of(node));
        }
    });
    if let Some(span) = captured {
        return conflict(ConflictReason::AncestorCapture, new_name, span);
    }

    for &site in sites {
        let Some(found) = resolver.resolve(tree.scope_at(site), new_name, site) else {
            continue;
        };
        let owner = tree.binding(found).scope;
        if owner != scope && tree.encloses(scope, owner) {
            let width = syntax.source()[site..]
                .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
                .unwrap_or(syntax.source().len() - site);
            return conflict(ConflictReason::DescendantCapture, new_name, Span::new(site, site + width));
        }
    }

    ConflictReport::Clear
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SyntaxTree;

    fn rename_report(source: &str, name: &str, new_name: &str) -> ConflictReport {
        let syntax = SyntaxTree::parse(source).unwrap();
        let tree = ScopeTree::build(&syntax);
        let binding = tree.bindings().iter().find(|b| b.name == name).unwrap().id;
        check_rename(&tree, binding, new_name)
    }

    fn reason(report: ConflictReport) -> Option<ConflictReason> {
        match report {
            ConflictReport::Clear => None,
            ConflictReport::Conflict(conflict) => Some(conflict.reason),
        }
    }

    #[test]
    fn test_same_scope_collision() {
        let report = rename_report("function f(a, b) { return a + b; }", "a", "b");
        assert_eq!(reason(report), Some(ConflictReason::SameScopeCollision));
    }

    #[test]
    fn test_block_var_collides_with_block_binding() {
        let source = "function f(c) {\n  if (c) { var x = 1; let y = 2; }\n  return x;\n}";
        let report = rename_report(source, "x", "y");
        assert_eq!(reason(report), Some(ConflictReason::SameScopeCollision));
    }

    #[test]
    fn test_ancestor_capture() {
        let source = "let count = 0;\nfunction inc(n) { return n + count; }";
        let report = rename_report(source, "n", "count");
        assert_eq!(reason(report), Some(ConflictReason::AncestorCapture));
    }

    #[test]
    fn test_free_name_capture() {
        let report = rename_report("function log(msg) { console.log(msg); }", "msg", "console");
        assert_eq!(reason(report), Some(ConflictReason::AncestorCapture));
    }

    #[test]
    fn test_descendant_capture() {
        let source = "function f(a) {\n  function g() { let b = 1; return a + b; }\n}";
        let report = rename_report(source, "a", "b");
        match report {
            ConflictReport::Conflict(conflict) => {
                assert_eq!(conflict.reason, ConflictReason::DescendantCapture);
                let syntax = SyntaxTree::parse(source).unwrap();
                assert_eq!(syntax.slice(conflict.span), "a");
            }
            ConflictReport::Clear => panic!("expected a conflict"),
        }
    }

    #[test]
    fn test_sibling_scope_is_clear() {
        let report = rename_report("let a = 1; { let b = 2; } use(a);", "a", "b");
        assert!(report.is_clear());
    }

    #[test]
    fn test_same_name_is_clear() {
        let report = rename_report("let a = 1; use(a);", "a", "a");
        assert!(report.is_clear());
    }

    #[test]
    fn test_conflict_into_error() {
        let source = "function f(a, b) { return a + b; }";
        let syntax = SyntaxTree::parse(source).unwrap();
        let tree = ScopeTree::build(&syntax);
        let a = tree.bindings().iter().find(|b| b.name == "a").unwrap().id;

        let err = check_rename(&tree, a, "b").into_result(&syntax).unwrap_err();
        match err {
            Error::RenameConflict { reason, name, line, column } => {
                assert_eq!(reason, ConflictReason::SameScopeCollision);
                assert_eq!(name, "b");
                assert_eq!((line, column), (1, 15));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_introduce_checks_sites() {
        let source = "function f(x) {\n  { let v = 1; use(x * 2); }\n}";
        let syntax = SyntaxTree::parse(source).unwrap();
        let tree = ScopeTree::build(&syntax);
        let site = source.find("x * 2").unwrap();
        let function = tree.scope_at(source.find("x)").unwrap());

        let report = check_introduce(&tree, function, "v", &[site]);
        assert_eq!(reason(report), Some(ConflictReason::DescendantCapture));
        assert!(check_introduce(&tree, function, "w", &[site]).is_clear());
    }
}

//! Scope tree data structure
//!
//! The scope tree tracks:
//! - Scope hierarchy (parent/child relationships)
//! - Bindings declared in each scope
//! - Which identifier nodes are declarations

use std::collections::HashMap;
use tree_sitter::Node;
use crate::{Error, Result};
use crate::binding::{Binding, BindingId, BindingKind};
use crate::syntax::{Span, SyntaxTree};
use super::builder::ScopeBuilder;
use super::resolver::NameResolver;

/// Unique identifier for a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

impl ScopeId {
    /// The module scope
    pub fn root() -> Self {
        Self(0)
    }
}

/// The kind of scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Module/file level scope
    Module,
    /// Function, arrow or method: parameters and body
    Function,
    /// Block scope (if, for, while, switch, bare blocks)
    Block,
    /// Catch clause: the caught binding and the handler body
    Catch,
}

impl ScopeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeKind::Module => "module",
            ScopeKind::Function => "function",
            ScopeKind::Block => "block",
            ScopeKind::Catch => "catch",
        }
    }
}

impl std::fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One lexical region
#[derive(Debug)]
pub struct Scope<'tree> {
    pub id: ScopeId,
    pub kind: ScopeKind,
    /// Syntax node that opened the scope
    pub node: Node<'tree>,
    pub parent: Option<ScopeId>,
    /// Child scopes in source order
    pub children: Vec<ScopeId>,
    /// Bindings by name, in declaration order
    bindings: HashMap<String, Vec<BindingId>>,
}

impl<'tree> Scope<'tree> {
    pub fn span(&self) -> Span {
        Span::of(self.node)
    }

    /// Bindings declared under `name` in this scope (more than one only for
    /// re-declarations)
    pub fn bindings_named(&self, name: &str) -> &[BindingId] {
        self.bindings.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn binds(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// All bindings of this scope, sorted by id (declaration order)
    pub fn binding_ids(&self) -> Vec<BindingId> {
        let mut ids: Vec<BindingId> = self.bindings.values().flatten().copied().collect();
        ids.sort();
        ids
    }
}

/// Scope tree for one syntax tree snapshot
#[derive(Debug)]
pub struct ScopeTree<'tree> {
    syntax: &'tree SyntaxTree,
    scopes: Vec<Scope<'tree>>,
    bindings: Vec<Binding<'tree>>,
    /// Declaring identifier node id → binding
    declarations: HashMap<usize, BindingId>,
}

impl<'tree> ScopeTree<'tree> {
    /// Build the scope tree of a whole file
    pub fn build(syntax: &'tree SyntaxTree) -> Self {
        ScopeBuilder::new(syntax).build()
    }

    /// Create a tree holding only the module scope
    pub(crate) fn new(syntax: &'tree SyntaxTree) -> Self {
        let root = Scope {
            id: ScopeId::root(),
            kind: ScopeKind::Module,
            node: syntax.root(),
            parent: None,
            children: Vec::new(),
            bindings: HashMap::new(),
        };
        Self {
            syntax,
            scopes: vec![root],
            bindings: Vec::new(),
            declarations: HashMap::new(),
        }
    }

    /// Create a new child scope
    pub(crate) fn add_scope(&mut self, parent: ScopeId, kind: ScopeKind, node: Node<'tree>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            id,
            kind,
            node,
            parent: Some(parent),
            children: Vec::new(),
            bindings: HashMap::new(),
        });
        self.scopes[parent.0 as usize].children.push(id);
        id
    }

    /// Add a binding to a scope
    pub(crate) fn add_binding(&mut self, scope: ScopeId, kind: BindingKind, node: Node<'tree>) -> BindingId {
        let id = BindingId(self.bindings.len() as u32);
        let name = self.syntax.text(node).to_string();
        self.scopes[scope.0 as usize]
            .bindings
            .entry(name.clone())
            .or_default()
            .push(id);
        self.declarations.insert(node.id(), id);
        self.bindings.push(Binding::new(id, name, kind, scope, node));
        id
    }

    pub fn syntax(&self) -> &'tree SyntaxTree {
        self.syntax
    }

    pub fn root(&self) -> ScopeId {
        ScopeId::root()
    }

    pub fn scope(&self, id: ScopeId) -> &Scope<'tree> {
        &self.scopes[id.0 as usize]
    }

    pub fn binding(&self, id: BindingId) -> &Binding<'tree> {
        &self.bindings[id.0 as usize]
    }

    pub fn scopes(&self) -> &[Scope<'tree>] {
        &self.scopes
    }

    pub fn bindings(&self) -> &[Binding<'tree>] {
        &self.bindings
    }

    /// Get the parent of a scope
    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scope(scope).parent
    }

    /// Get scope chain from a scope up to root
    pub fn scope_chain(&self, scope: ScopeId) -> Vec<ScopeId> {
        let mut chain = vec![scope];
        let mut current = scope;
        while let Some(parent) = self.parent(current) {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Check if `outer` is `inner` or one of its ancestors
    pub fn encloses(&self, outer: ScopeId, inner: ScopeId) -> bool {
        let mut current = Some(inner);
        while let Some(scope) = current {
            if scope == outer {
                return true;
            }
            current = self.parent(scope);
        }
        false
    }

    /// Innermost scope containing a byte offset
    pub fn scope_at(&self, offset: usize) -> ScopeId {
        let mut current = ScopeId::root();
        'descend: loop {
            for &child in &self.scope(current).children {
                if self.scope(child).span().contains_offset(offset) {
                    current = child;
                    continue 'descend;
                }
            }
            return current;
        }
    }

    /// Innermost scope enclosing a node
    pub fn scope_of(&self, node: Node<'_>) -> ScopeId {
        self.scope_at(node.start_byte())
    }

    /// Binding declared by an identifier node, if it is a declaration
    pub fn declaration_of(&self, node: Node<'_>) -> Option<BindingId> {
        self.declarations.get(&node.id()).copied()
    }

    /// Binding an identifier node declares or refers to
    pub fn binding_at(&self, node: Node<'tree>) -> Result<BindingId> {
        NameResolver::new(self)
            .resolve_node(node)
            .ok_or_else(|| Error::UnresolvedBinding {
                name: self.syntax.text(node).to_string(),
            })
    }

    /// Names declared more than once in the same scope, in scope order
    pub fn redeclarations(&self) -> Vec<(ScopeId, &str, Vec<BindingId>)> {
        let mut found: Vec<(ScopeId, &str, Vec<BindingId>)> = self
            .scopes
            .iter()
            .flat_map(|scope| {
                scope
                    .bindings
                    .iter()
                    .filter(|(_, ids)| ids.len() > 1)
                    .map(move |(name, ids)| (scope.id, name.as_str(), ids.clone()))
            })
            .collect();
        found.sort_by_key(|(scope, _, ids)| (*scope, ids[0]));
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_at<'t>(syntax: &'t SyntaxTree, needle: &str, nth: usize) -> Node<'t> {
        let start = syntax.source().match_indices(needle).nth(nth).unwrap().0;
        syntax
            .root()
            .descendant_for_byte_range(start, start + needle.len())
            .unwrap()
    }

    #[test]
    fn test_scope_hierarchy() {
        let syntax = SyntaxTree::parse("function f() { if (a) { let x; } }").unwrap();
        let mut tree = ScopeTree::new(&syntax);

        let function = tree.add_scope(ScopeId::root(), ScopeKind::Function, node_at(&syntax, "function", 0));
        let block = tree.add_scope(function, ScopeKind::Block, node_at(&syntax, "{ let x; }", 0));

        assert_eq!(tree.parent(block), Some(function));
        assert_eq!(tree.parent(function), Some(ScopeId::root()));
        assert_eq!(tree.parent(ScopeId::root()), None);
        assert_eq!(tree.scope_chain(block), vec![block, function, ScopeId::root()]);
        assert!(tree.encloses(function, block));
        assert!(!tree.encloses(block, function));
    }

    #[test]
    fn test_scope_at_offset() {
        let syntax = SyntaxTree::parse("let a; { let b; } { let c; }").unwrap();
        let tree = ScopeTree::build(&syntax);

        let b = syntax.source().find('b').unwrap();
        let c = syntax.source().find('c').unwrap();
        let first = tree.scope_at(b);
        let second = tree.scope_at(c);

        assert_ne!(first, second);
        assert_eq!(tree.parent(first), Some(ScopeId::root()));
        assert_eq!(tree.parent(second), Some(ScopeId::root()));
        assert_eq!(tree.scope_at(0), ScopeId::root());
    }

    #[test]
    fn test_redeclarations_are_recorded() {
        let syntax = SyntaxTree::parse("var x = 1; var x = 2; let y;").unwrap();
        let tree = ScopeTree::build(&syntax);

        let redeclared = tree.redeclarations();
        assert_eq!(redeclared.len(), 1);
        let (scope, name, ids) = &redeclared[0];
        assert_eq!(*scope, ScopeId::root());
        assert_eq!(*name, "x");
        assert_eq!(ids.len(), 2);
        assert_eq!(tree.scope(ScopeId::root()).bindings_named("y").len(), 1);
    }
}

//! Bindings and references
//!
//! Every declared name maps onto one of a small set of binding kinds:
//! - `Var`, `Let`, `Const`: variable declarators (including destructuring)
//! - `Param`: function, arrow and method parameters
//! - `Function`, `Class`: declaration names
//! - `CatchParam`: the `catch (e)` binding
//! - `Import`: names introduced by `import` statements

use crate::{Error, Result};
use crate::scope::ScopeId;
use crate::syntax::Span;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::str::FromStr;
use tree_sitter::Node;

/// Index of a binding in its scope tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub u32);

/// What kind of declaration introduced a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingKind {
    Var,
    Let,
    Const,
    Param,
    Function,
    Class,
    CatchParam,
    Import,
}

impl BindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BindingKind::Var => "var",
            BindingKind::Let => "let",
            BindingKind::Const => "const",
            BindingKind::Param => "param",
            BindingKind::Function => "function",
            BindingKind::Class => "class",
            BindingKind::CatchParam => "catch_param",
            BindingKind::Import => "import",
        }
    }

    pub fn all() -> &'static [BindingKind] {
        &[
            BindingKind::Var,
            BindingKind::Let,
            BindingKind::Const,
            BindingKind::Param,
            BindingKind::Function,
            BindingKind::Class,
            BindingKind::CatchParam,
            BindingKind::Import,
        ]
    }

    /// Hoisted bindings are visible throughout their scope, not only after
    /// the declaration.
    pub fn is_hoisted(&self) -> bool {
        matches!(self, BindingKind::Var | BindingKind::Function | BindingKind::Import)
    }

    /// Declared by a `var`/`let`/`const` declarator
    pub fn is_variable(&self) -> bool {
        matches!(self, BindingKind::Var | BindingKind::Let | BindingKind::Const)
    }
}

impl FromStr for BindingKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "var" => Ok(BindingKind::Var),
            "let" => Ok(BindingKind::Let),
            "const" => Ok(BindingKind::Const),
            "param" | "parameter" => Ok(BindingKind::Param),
            "function" | "fn" => Ok(BindingKind::Function),
            "class" => Ok(BindingKind::Class),
            "catch_param" | "catch" => Ok(BindingKind::CatchParam),
            "import" => Ok(BindingKind::Import),
            _ => Err(Error::InvalidName(format!("Unknown binding kind: {}", s))),
        }
    }
}

impl std::fmt::Display for BindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One declared name within a scope.
///
/// The owning scope is a plain index; the scope tree owns both sides.
#[derive(Debug)]
pub struct Binding<'tree> {
    pub id: BindingId,
    pub name: String,
    pub kind: BindingKind,
    /// Scope the declaration was registered in
    pub scope: ScopeId,
    /// The declaring identifier
    pub node: Node<'tree>,
    /// Filled on first call to `ScopeTree::references`
    pub(crate) references: OnceCell<Vec<Reference<'tree>>>,
}

impl<'tree> Binding<'tree> {
    pub(crate) fn new(id: BindingId, name: String, kind: BindingKind, scope: ScopeId, node: Node<'tree>) -> Self {
        Self {
            id,
            name,
            kind,
            scope,
            node,
            references: OnceCell::new(),
        }
    }

    /// Byte offset of the declaring identifier
    pub fn declared_at(&self) -> usize {
        self.node.start_byte()
    }

    pub fn span(&self) -> Span {
        Span::of(self.node)
    }

    /// Check if the binding is visible at `offset` from code that runs
    /// in the same function (no closure in between).
    pub fn is_visible_at(&self, offset: usize) -> bool {
        self.kind.is_hoisted() || self.declared_at() <= offset
    }
}

/// How a reference uses its binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// The declaring identifier itself
    Declaration,
    Read,
    /// Plain assignment target
    Write,
    /// Compound assignment or increment/decrement
    Update,
}

impl ReferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Declaration => "declaration",
            ReferenceKind::Read => "read",
            ReferenceKind::Write => "write",
            ReferenceKind::Update => "update",
        }
    }

    /// Check if the reference changes the binding's value
    pub fn is_write(&self) -> bool {
        matches!(self, ReferenceKind::Write | ReferenceKind::Update)
    }
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An occurrence of a binding's name that resolves to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference<'tree> {
    pub node: Node<'tree>,
    pub span: Span,
    pub kind: ReferenceKind,
    pub binding: BindingId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_kind_roundtrip() {
        for kind in BindingKind::all() {
            let parsed: BindingKind = kind.as_str().parse().unwrap();
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn test_hoisting() {
        assert!(BindingKind::Function.is_hoisted());
        assert!(BindingKind::Var.is_hoisted());
        assert!(!BindingKind::Let.is_hoisted());
        assert!(!BindingKind::Param.is_hoisted());
    }

    #[test]
    fn test_write_kinds() {
        assert!(ReferenceKind::Write.is_write());
        assert!(ReferenceKind::Update.is_write());
        assert!(!ReferenceKind::Read.is_write());
        assert!(!ReferenceKind::Declaration.is_write());
    }
}

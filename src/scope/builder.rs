//! Scope tree construction
//!
//! A single top-down walk. Scopes open at function-like nodes, catch clauses,
//! `for` heads, `switch` bodies and statement blocks; each declaration is
//! registered in the innermost scope open at that point, except `var`, which
//! goes to the enclosing function or module.

use tree_sitter::Node;
use crate::binding::BindingKind;
use crate::syntax::SyntaxTree;
use crate::syntax::javascript::{is_field, is_function_like};
use super::tree::{ScopeId, ScopeKind, ScopeTree};

/// Walks a syntax tree once and produces its scope tree
pub struct ScopeBuilder<'tree> {
    syntax: &'tree SyntaxTree,
    tree: ScopeTree<'tree>,
    current: ScopeId,
}

impl<'tree> ScopeBuilder<'tree> {
    pub fn new(syntax: &'tree SyntaxTree) -> Self {
        Self {
            syntax,
            tree: ScopeTree::new(syntax),
            current: ScopeId::root(),
        }
    }

    pub fn build(mut self) -> ScopeTree<'tree> {
        let root = self.syntax.root();
        self.visit_children(root);
        tracing::debug!(
            scopes = self.tree.scopes().len(),
            bindings = self.tree.bindings().len(),
            "built scope tree"
        );
        self.tree
    }

    fn enter_scope(&mut self, kind: ScopeKind, node: Node<'tree>) {
        self.current = self.tree.add_scope(self.current, kind, node);
    }

    fn exit_scope(&mut self) {
        if let Some(parent) = self.tree.parent(self.current) {
            self.current = parent;
        }
    }

    fn declare(&mut self, node: Node<'tree>, kind: BindingKind) {
        let scope = if kind == BindingKind::Var {
            self.var_scope()
        } else {
            self.current
        };
        let name = self.syntax.text(node);
        if self.tree.scope(scope).binds(name) {
            tracing::debug!(name, scope = scope.0, "name re-declared in the same scope");
        }
        self.tree.add_binding(scope, kind, node);
    }

    /// `var` belongs to the nearest function or module, whatever block it is
    /// written in
    fn var_scope(&self) -> ScopeId {
        let mut scope = self.current;
        while matches!(self.tree.scope(scope).kind, ScopeKind::Block | ScopeKind::Catch) {
            match self.tree.parent(scope) {
                Some(parent) => scope = parent,
                None => break,
            }
        }
        scope
    }

    fn visit_children(&mut self, node: Node<'tree>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit(child);
        }
    }

    fn visit(&mut self, node: Node<'tree>) {
        match node.kind() {
            "function_declaration" | "generator_function_declaration" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.declare(name, BindingKind::Function);
                }
                self.visit_function(node, None);
            }
            "function_expression" | "generator_function" | "function" if node.is_named() => {
                // A named function expression sees its own name, nobody else does
                self.visit_function(node, node.child_by_field_name("name"));
            }
            "arrow_function" | "method_definition" => self.visit_function(node, None),
            "class_declaration" => {
                let name = node.child_by_field_name("name");
                if let Some(name) = name {
                    self.declare(name, BindingKind::Class);
                }
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    if Some(child) != name {
                        self.visit(child);
                    }
                }
            }
            "lexical_declaration" | "variable_declaration" => {
                let kind = self.declaration_kind(node);
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    if child.kind() == "variable_declarator" {
                        self.visit_declarator(child, kind);
                    } else {
                        self.visit(child);
                    }
                }
            }
            "catch_clause" => {
                self.enter_scope(ScopeKind::Catch, node);
                if let Some(parameter) = node.child_by_field_name("parameter") {
                    self.declare_pattern(parameter, BindingKind::CatchParam);
                }
                if let Some(body) = node.child_by_field_name("body") {
                    self.visit_children(body);
                }
                self.exit_scope();
            }
            "for_statement" | "switch_body" | "statement_block" => {
                self.enter_scope(ScopeKind::Block, node);
                self.visit_children(node);
                self.exit_scope();
            }
            "for_in_statement" => {
                self.enter_scope(ScopeKind::Block, node);
                let declared = node
                    .child_by_field_name("kind")
                    .map(|kind| self.keyword_kind(kind));
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    match declared {
                        Some(kind) if is_field(node, "left", child) => self.declare_pattern(child, kind),
                        _ => self.visit(child),
                    }
                }
                self.exit_scope();
            }
            "import_specifier" => {
                let local = node
                    .child_by_field_name("alias")
                    .or_else(|| node.child_by_field_name("name"));
                if let Some(local) = local.filter(|n| n.kind() == "identifier") {
                    self.declare(local, BindingKind::Import);
                }
            }
            "import_clause" | "namespace_import" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    if child.kind() == "identifier" {
                        self.declare(child, BindingKind::Import);
                    } else {
                        self.visit(child);
                    }
                }
            }
            _ => self.visit_children(node),
        }
    }

    /// Open the function scope, bind parameters, walk the body. The body
    /// block shares the function scope.
    fn visit_function(&mut self, node: Node<'tree>, own_name: Option<Node<'tree>>) {
        if node.kind() == "method_definition" {
            // Computed keys are evaluated outside the method
            if let Some(key) = node.child_by_field_name("name") {
                self.visit(key);
            }
        }

        self.enter_scope(ScopeKind::Function, node);
        if let Some(name) = own_name {
            self.declare(name, BindingKind::Function);
        }
        if let Some(parameter) = node.child_by_field_name("parameter") {
            self.declare_pattern(parameter, BindingKind::Param);
        }
        if let Some(parameters) = node.child_by_field_name("parameters") {
            let mut cursor = parameters.walk();
            for parameter in parameters.named_children(&mut cursor) {
                self.declare_pattern(parameter, BindingKind::Param);
            }
        }
        if let Some(body) = node.child_by_field_name("body") {
            if body.kind() == "statement_block" {
                self.visit_children(body);
            } else {
                self.visit(body);
            }
        }
        self.exit_scope();
    }

    fn visit_declarator(&mut self, declarator: Node<'tree>, kind: BindingKind) {
        if let Some(name) = declarator.child_by_field_name("name") {
            self.declare_pattern(name, kind);
        }
        if let Some(value) = declarator.child_by_field_name("value") {
            self.visit(value);
        }
    }

    /// Bind every name in a (possibly destructuring) pattern; default values
    /// and computed keys are ordinary expressions.
    fn declare_pattern(&mut self, node: Node<'tree>, kind: BindingKind) {
        match node.kind() {
            "identifier" | "shorthand_property_identifier_pattern" => self.declare(node, kind),
            "assignment_pattern" | "object_assignment_pattern" => {
                if let Some(left) = node.child_by_field_name("left") {
                    self.declare_pattern(left, kind);
                }
                if let Some(right) = node.child_by_field_name("right") {
                    self.visit(right);
                }
            }
            "pair_pattern" => {
                if let Some(key) = node.child_by_field_name("key") {
                    self.visit(key);
                }
                if let Some(value) = node.child_by_field_name("value") {
                    self.declare_pattern(value, kind);
                }
            }
            "object_pattern" | "array_pattern" | "rest_pattern" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    self.declare_pattern(child, kind);
                }
            }
            "comment" => {}
            _ => self.visit(node),
        }
    }

    fn declaration_kind(&self, node: Node<'tree>) -> BindingKind {
        if node.kind() == "variable_declaration" {
            return BindingKind::Var;
        }
        node.child_by_field_name("kind")
            .map(|kind| self.keyword_kind(kind))
            .unwrap_or(BindingKind::Let)
    }

    fn keyword_kind(&self, keyword: Node<'tree>) -> BindingKind {
        match self.syntax.text(keyword) {
            "const" => BindingKind::Const,
            "var" => BindingKind::Var,
            _ => BindingKind::Let,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::BindingKind;

    fn names(tree: &ScopeTree<'_>, scope: ScopeId) -> Vec<(String, BindingKind)> {
        tree.scope(scope)
            .binding_ids()
            .into_iter()
            .map(|id| (tree.binding(id).name.clone(), tree.binding(id).kind))
            .collect()
    }

    #[test]
    fn test_function_scope_holds_parameters_and_body() {
        let syntax = SyntaxTree::parse("function f(a, { b, c: d }, ...e) { const x = a; }").unwrap();
        let tree = ScopeTree::build(&syntax);

        assert_eq!(names(&tree, ScopeId::root()), vec![("f".to_string(), BindingKind::Function)]);

        let function = tree.scope(ScopeId::root()).children[0];
        assert_eq!(tree.scope(function).kind, ScopeKind::Function);
        // The body block does not open a second scope
        assert!(tree.scope(function).children.is_empty());

        let declared: Vec<String> = names(&tree, function).into_iter().map(|(n, _)| n).collect();
        assert_eq!(declared, vec!["a", "b", "d", "e", "x"]);
        assert_eq!(names(&tree, function)[4].1, BindingKind::Const);
    }

    #[test]
    fn test_sibling_blocks_are_sibling_scopes() {
        let syntax = SyntaxTree::parse("if (a) { let x = 1; } if (b) { let x = 2; }").unwrap();
        let tree = ScopeTree::build(&syntax);

        let children = &tree.scope(ScopeId::root()).children;
        assert_eq!(children.len(), 2);
        for &child in children {
            assert_eq!(tree.scope(child).kind, ScopeKind::Block);
            assert_eq!(tree.parent(child), Some(ScopeId::root()));
            assert_eq!(tree.scope(child).bindings_named("x").len(), 1);
        }
        assert!(tree.redeclarations().is_empty());
    }

    #[test]
    fn test_loop_and_catch_bindings() {
        let source = "for (let i = 0; i < n; i++) { let j = i; }\n\
                      for (const k of ks) {}\n\
                      try { run(); } catch (err) { log(err); }";
        let syntax = SyntaxTree::parse(source).unwrap();
        let tree = ScopeTree::build(&syntax);

        let root_children = &tree.scope(ScopeId::root()).children;
        assert_eq!(root_children.len(), 4);

        let loop_head = root_children[0];
        assert_eq!(names(&tree, loop_head), vec![("i".to_string(), BindingKind::Let)]);
        let loop_body = tree.scope(loop_head).children[0];
        assert_eq!(names(&tree, loop_body), vec![("j".to_string(), BindingKind::Let)]);

        let for_of = root_children[1];
        assert_eq!(names(&tree, for_of), vec![("k".to_string(), BindingKind::Const)]);

        let catch = root_children[3];
        assert_eq!(tree.scope(catch).kind, ScopeKind::Catch);
        assert_eq!(names(&tree, catch), vec![("err".to_string(), BindingKind::CatchParam)]);
    }

    #[test]
    fn test_named_function_expression_binds_inside() {
        let syntax = SyntaxTree::parse("const f = function g(n) { return g(n - 1); };").unwrap();
        let tree = ScopeTree::build(&syntax);

        assert_eq!(names(&tree, ScopeId::root()), vec![("f".to_string(), BindingKind::Const)]);
        let function = tree.scope(ScopeId::root()).children[0];
        let declared: Vec<String> = names(&tree, function).into_iter().map(|(n, _)| n).collect();
        assert_eq!(declared, vec!["g", "n"]);
    }

    #[test]
    fn test_imports_and_classes() {
        let syntax = SyntaxTree::parse(
            "import def, { a, b as c } from 'm';\nimport * as ns from 'n';\nclass K {}",
        )
        .unwrap();
        let tree = ScopeTree::build(&syntax);

        let declared = names(&tree, ScopeId::root());
        let expected = vec![
            ("def".to_string(), BindingKind::Import),
            ("a".to_string(), BindingKind::Import),
            ("c".to_string(), BindingKind::Import),
            ("ns".to_string(), BindingKind::Import),
            ("K".to_string(), BindingKind::Class),
        ];
        assert_eq!(declared, expected);
    }

    #[test]
    fn test_arrow_function_parameters() {
        let syntax = SyntaxTree::parse("const inc = x => x + 1; const add = (a, b = a) => a + b;").unwrap();
        let tree = ScopeTree::build(&syntax);

        let arrows = &tree.scope(ScopeId::root()).children;
        assert_eq!(arrows.len(), 2);
        assert_eq!(names(&tree, arrows[0]), vec![("x".to_string(), BindingKind::Param)]);
        let declared: Vec<String> = names(&tree, arrows[1]).into_iter().map(|(n, _)| n).collect();
        assert_eq!(declared, vec!["a", "b"]);
    }

    #[test]
    fn test_var_belongs_to_enclosing_function() {
        let source = "function f(c) {\n  if (c) { var x = 1; }\n  for (var i = 0; i < 2; i++) {}\n  try {} catch (e) { var y; }\n}";
        let syntax = SyntaxTree::parse(source).unwrap();
        let tree = ScopeTree::build(&syntax);

        let function = tree.scope(ScopeId::root()).children[0];
        let declared: Vec<String> = names(&tree, function).into_iter().map(|(n, _)| n).collect();
        assert_eq!(declared, vec!["c", "x", "i", "y"]);
        for &block in &tree.scope(function).children {
            let kept: Vec<String> = names(&tree, block).into_iter().map(|(n, _)| n).collect();
            assert!(kept.is_empty() || kept == vec!["e"]);
        }
    }
}

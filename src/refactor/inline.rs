//! Inline a variable: replace every reference with the initializer and drop
//! the declaration

use tree_sitter::Node;
use crate::{Error, Result};
use crate::binding::{BindingId, BindingKind};
use crate::edit::{EditPlan, TextEdit};
use crate::locate::locate;
use crate::scope::{NameResolver, ScopeTree};
use crate::selection::Selection;
use crate::syntax::{Span, SyntaxTree};
use crate::syntax::javascript::{
    enclosing_function, has_side_effects, is_field, is_function_like, is_identifier, is_loop,
    is_shorthand, is_statement_list, needs_parentheses, walk_identifiers,
};

/// Plan the inlining of the variable at `selection`
pub fn inline_variable(tree: &ScopeTree<'_>, selection: &Selection) -> Result<EditPlan> {
    let syntax = tree.syntax();
    let node = locate(syntax, selection)?;
    if !is_identifier(node) {
        return Err(Error::InvalidSelection(format!(
            "inline needs a variable name, found {}",
            node.kind()
        )));
    }

    let id = tree.binding_at(node)?;
    let binding = tree.binding(id);
    let name = binding.name.as_str();
    if !binding.kind.is_variable() {
        return Err(Error::InlineRejected(format!("`{}` is a {} binding", name, binding.kind)));
    }
    if tree.scope(binding.scope).bindings_named(name).len() > 1 {
        return Err(Error::Redeclared { name: name.to_string() });
    }

    let declarator = binding
        .node
        .parent()
        .filter(|p| p.kind() == "variable_declarator" && is_field(*p, "name", binding.node))
        .ok_or_else(|| Error::InlineRejected(format!("`{}` is declared by a destructuring pattern", name)))?;
    let init = declarator
        .child_by_field_name("value")
        .ok_or_else(|| Error::InlineRejected(format!("`{}` has no initializer", name)))?;
    let declaration = declarator
        .parent()
        .ok_or_else(|| Error::InlineRejected(format!("`{}` has no declaration statement", name)))?;
    match declaration.parent() {
        Some(parent) if parent.kind() == "export_statement" => {
            return Err(Error::InlineRejected(format!("`{}` is exported", name)));
        }
        Some(parent) if is_statement_list(parent) => {}
        _ => {
            return Err(Error::InlineRejected(format!(
                "the declaration of `{}` is not a standalone statement",
                name
            )));
        }
    }

    let references = tree.references(id);
    if references.iter().any(|r| r.kind.is_write()) {
        return Err(Error::InlineRejected(format!("`{}` is assigned after its declaration", name)));
    }
    let declaration_span = Span::of(declaration);
    if references.iter().any(|r| declaration_span.contains(r.span)) {
        return Err(Error::InlineRejected(format!("`{}` is used in its own declaration", name)));
    }
    if binding.kind == BindingKind::Var && references.iter().any(|r| r.span.start < declaration_span.start) {
        return Err(Error::InlineRejected(format!("`{}` is used before its declaration", name)));
    }
    let source = syntax.source().as_bytes();
    if has_side_effects(init, source) {
        if references.len() != 1 {
            return Err(Error::InlineRejected(format!(
                "the initializer of `{}` has side effects and {} references",
                name,
                references.len()
            )));
        }
        if references.iter().any(|r| runs_repeatedly(r.node, declaration)) {
            return Err(Error::InlineRejected(format!(
                "the initializer of `{}` has side effects and its use is in a loop or function",
                name
            )));
        }
    }
    check_dependency_writes(tree, init, declaration)?;
    check_captures(tree, init, references.iter().map(|r| r.span.start))?;

    let mut plan = EditPlan::new(format!("inline {}", name));
    let value = syntax.text(init);
    for reference in references {
        let wrap = needs_parentheses(init, reference.node, source)
            || (starts_expression_statement(reference.node) && opens_with_brace_or_keyword(init));
        let text = if wrap {
            format!("({})", value)
        } else {
            value.to_string()
        };
        let text = if is_shorthand(reference.node) {
            format!("{}: {}", name, text)
        } else {
            text
        };
        plan.push(TextEdit::replace(reference.span, text));
    }
    plan.push(TextEdit::delete(removal_span(syntax, declaration, declarator)));

    tracing::info!(name, references = references.len(), "planned inline");
    Ok(plan)
}

/// Every identifier of the initializer must resolve to the same binding at
/// each reference site
fn check_captures(tree: &ScopeTree<'_>, init: Node<'_>, sites: impl Iterator<Item = usize> + Clone) -> Result<()> {
    let syntax = tree.syntax();
    let resolver = NameResolver::new(tree);
    let inside = Span::of(init);
    let mut captured: Option<String> = None;

    walk_identifiers(init, &mut |node| {
        if captured.is_some() {
            return;
        }
        let target: Option<BindingId> = resolver.resolve_node(node);
        if target.is_some_and(|id| inside.contains(tree.binding(id).span())) {
            return;
        }
        let name = syntax.text(node);
        let moved = sites
            .clone()
            .any(|site| resolver.resolve(tree.scope_at(site), name, site) != target);
        if moved {
            captured = Some(name.to_string());
        }
    });

    match captured {
        Some(name) => Err(Error::InlineCapture { name }),
        None => Ok(()),
    }
}

/// Bindings the initializer reads must hold the same value at every use:
/// no writes after the declaration, and none from another function
fn check_dependency_writes(tree: &ScopeTree<'_>, init: Node<'_>, declaration: Node<'_>) -> Result<()> {
    let resolver = NameResolver::new(tree);
    let inside = Span::of(init);
    let home = enclosing_function(declaration).map(|f| f.id());
    let after = declaration.end_byte();
    let mut mutated: Option<String> = None;

    walk_identifiers(init, &mut |node| {
        if mutated.is_some() {
            return;
        }
        let Some(id) = resolver.resolve_node(node) else {
            return;
        };
        if inside.contains(tree.binding(id).span()) {
            return;
        }
        let written = tree
            .references(id)
            .iter()
            .filter(|r| r.kind.is_write())
            .any(|r| r.span.start >= after || enclosing_function(r.node).map(|f| f.id()) != home);
        if written {
            mutated = Some(tree.binding(id).name.clone());
        }
    });

    match mutated {
        Some(dependency) => Err(Error::InlineRejected(format!(
            "`{}` is assigned after the initializer reads it",
            dependency
        ))),
        None => Ok(()),
    }
}

/// Check if code at `site` may run a different number of times than the
/// declaration: a loop or function between them
fn runs_repeatedly(site: Node<'_>, declaration: Node<'_>) -> bool {
    let outer = Span::of(declaration);
    let mut current = site.parent();
    while let Some(node) = current {
        if Span::of(node).contains(outer) {
            return false;
        }
        if is_loop(node) || is_function_like(node) {
            return true;
        }
        current = node.parent();
    }
    false
}

/// Range to delete: the declarator and one separating comma when the
/// statement declares several names, else the statement, and its whole line
/// when nothing else shares it
fn removal_span(syntax: &SyntaxTree, declaration: Node<'_>, declarator: Node<'_>) -> Span {
    if let Some(next) = declarator.next_named_sibling().filter(|n| n.kind() == "variable_declarator") {
        return Span::new(declarator.start_byte(), next.start_byte());
    }
    if let Some(previous) = declarator.prev_named_sibling().filter(|n| n.kind() == "variable_declarator") {
        return Span::new(previous.end_byte(), declarator.end_byte());
    }

    let text = syntax.source();
    let (start, end) = (declaration.start_byte(), declaration.end_byte());
    let line_start = syntax.line_start(start);
    let line_end = syntax.line_end(end);
    if text[line_start..start].trim().is_empty() && text[end..line_end].trim().is_empty() {
        let past_newline = (line_end + 1).min(text.len());
        return Span::new(line_start, past_newline);
    }
    let trailing = text[end..line_end].len() - text[end..line_end].trim_start_matches([' ', '\t']).len();
    Span::new(start, end + trailing)
}

/// Check if an expression statement begins at `node`
fn starts_expression_statement(node: Node<'_>) -> bool {
    let mut current = node;
    while let Some(parent) = current.parent() {
        if parent.start_byte() != node.start_byte() {
            return false;
        }
        if parent.kind() == "expression_statement" {
            return true;
        }
        current = parent;
    }
    false
}

/// Expressions a statement cannot start with
fn opens_with_brace_or_keyword(node: Node<'_>) -> bool {
    matches!(node.kind(), "object" | "function_expression" | "function" | "class")
}

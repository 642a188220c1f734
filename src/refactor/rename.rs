//! Rename a binding and every reference to it

use tree_sitter::Node;
use crate::{Error, Result};
use crate::conflict::check_rename;
use crate::edit::{EditPlan, TextEdit};
use crate::locate::locate;
use crate::scope::ScopeTree;
use crate::selection::Selection;
use crate::syntax::Span;
use crate::syntax::javascript::{is_identifier, is_shorthand, is_unaliased_specifier};
use super::naming::validate_name;

/// Plan the rename of the binding at `selection` to `new_name`
pub fn rename(tree: &ScopeTree<'_>, selection: &Selection, new_name: &str) -> Result<EditPlan> {
    let syntax = tree.syntax();
    let node = locate(syntax, selection)?;
    if !is_identifier(node) {
        return Err(Error::InvalidSelection(format!(
            "rename needs an identifier, found {}",
            node.kind()
        )));
    }

    let id = tree.binding_at(node)?;
    let binding = tree.binding(id);
    if tree.scope(binding.scope).bindings_named(&binding.name).len() > 1 {
        return Err(Error::Redeclared {
            name: binding.name.clone(),
        });
    }
    validate_name(new_name)?;
    check_rename(tree, id, new_name).into_result(syntax)?;

    let mut plan = EditPlan::new(format!("rename {} to {}", binding.name, new_name));
    if binding.name == new_name {
        return Ok(plan);
    }
    for reference in tree.find_references(id, true) {
        let text = replacement(reference.node, &binding.name, new_name);
        plan.push(TextEdit::replace(Span::of(reference.node), text));
    }

    tracing::info!(from = %binding.name, to = new_name, edits = plan.len(), "planned rename");
    Ok(plan)
}

/// Text for one renamed occurrence. Names that double as property keys or
/// module names keep the old name in that role.
fn replacement(node: Node<'_>, old: &str, new: &str) -> String {
    if is_shorthand(node) {
        return format!("{}: {}", old, new);
    }
    if is_unaliased_specifier(node) {
        let imported = node.parent().is_some_and(|p| p.kind() == "import_specifier");
        return if imported {
            format!("{} as {}", old, new)
        } else {
            format!("{} as {}", new, old)
        };
    }
    new.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::ConflictReason;
    use crate::syntax::SyntaxTree;

    fn run(source: &str, at: &str, new_name: &str) -> Result<String> {
        let syntax = SyntaxTree::parse(source).unwrap();
        let tree = ScopeTree::build(&syntax);
        let plan = rename(&tree, &Selection::parse(at).unwrap(), new_name)?;
        plan.apply(syntax.source())
    }

    #[test]
    fn test_rename_respects_shadowing() {
        let source = "let x = 1;\nfunction f() { let x = 2; return x; }\nuse(x);";
        let renamed = run(source, "1:5", "y").unwrap();
        assert_eq!(renamed, "let y = 1;\nfunction f() { let x = 2; return x; }\nuse(y);");
    }

    #[test]
    fn test_rename_from_reference() {
        let source = "function area(w, h) {\n  return w * h;\n}";
        let renamed = run(source, "2:10", "width").unwrap();
        assert_eq!(renamed, "function area(width, h) {\n  return width * h;\n}");
    }

    #[test]
    fn test_rename_expands_shorthand() {
        let renamed = run("const id = 1; const o = { id };", "1:7", "key").unwrap();
        assert_eq!(renamed, "const key = 1; const o = { id: key };");

        let renamed = run("const { a } = o; use(a);", "1:9", "b").unwrap();
        assert_eq!(renamed, "const { a: b } = o; use(b);");
    }

    #[test]
    fn test_rename_keeps_module_names() {
        let renamed = run("import { a } from 'm';\na();\nexport { a };", "2:1", "b").unwrap();
        assert_eq!(renamed, "import { a as b } from 'm';\nb();\nexport { b as a };");
    }

    #[test]
    fn test_rename_block_var_used_outside_block() {
        let source = "function f(c) {\n  if (c) { var x = 1; }\n  return x;\n}";
        let renamed = run(source, "2:16", "y").unwrap();
        assert_eq!(renamed, "function f(c) {\n  if (c) { var y = 1; }\n  return y;\n}");

        let renamed = run(source, "3:10", "y").unwrap();
        assert_eq!(renamed, "function f(c) {\n  if (c) { var y = 1; }\n  return y;\n}");
    }

    #[test]
    fn test_same_scope_collision_rejected() {
        let err = run("let a = 1;\nlet b = 2;\nuse(a, b);", "1:5", "b").unwrap_err();
        assert!(matches!(
            err,
            Error::RenameConflict { reason: ConflictReason::SameScopeCollision, .. }
        ));
    }

    #[test]
    fn test_ancestor_capture_rejected() {
        let source = "let total = 0;\nfunction add(n) { total += n; }";
        let err = run(source, "2:14", "total").unwrap_err();
        assert!(matches!(
            err,
            Error::RenameConflict { reason: ConflictReason::AncestorCapture, .. }
        ));
    }

    #[test]
    fn test_rejected_inputs() {
        assert!(matches!(
            run("var x = 1; var x = 2; use(x);", "1:27", "y"),
            Err(Error::Redeclared { .. })
        ));
        assert!(matches!(run("let a = 1;", "1:5", "for"), Err(Error::InvalidName(_))));
        assert!(matches!(run("console.log(1);", "1:1", "c"), Err(Error::UnresolvedBinding { .. })));
        assert!(matches!(run("let a = 10;", "1:9", "b"), Err(Error::InvalidSelection(_))));
    }
}

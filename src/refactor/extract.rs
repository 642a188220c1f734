//! Extract an expression into a new variable

use std::str::FromStr;
use serde::{Deserialize, Serialize};
use tree_sitter::Node;
use crate::{Error, Result};
use crate::conflict::check_introduce;
use crate::edit::{EditPlan, TextEdit};
use crate::locate::{locate_span, selection_span};
use crate::occurrence::{find_occurrences, insertion_point, scope_boundary, OccurrenceMode};
use crate::scope::{NameResolver, ScopeTree};
use crate::selection::Selection;
use crate::syntax::Span;
use crate::syntax::javascript::{has_side_effects, is_assignment_target, is_expression, walk_identifiers};
use super::naming::{unique_name, validate_name};

/// Keyword of the introduced declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKeyword {
    #[default]
    Const,
    Let,
}

impl DeclarationKeyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKeyword::Const => "const",
            DeclarationKeyword::Let => "let",
        }
    }
}

impl FromStr for DeclarationKeyword {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "const" => Ok(DeclarationKeyword::Const),
            "let" => Ok(DeclarationKeyword::Let),
            _ => Err(Error::InvalidName(format!("Unknown declaration keyword: {}", s))),
        }
    }
}

impl std::fmt::Display for DeclarationKeyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Options for extract-variable
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Name of the new variable
    pub name: String,
    /// Treat `name` as a base and pick the first free `name`, `name1`, ...
    pub fresh: bool,
    pub mode: OccurrenceMode,
    pub keyword: DeclarationKeyword,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            name: "extracted".to_string(),
            fresh: true,
            mode: OccurrenceMode::All,
            keyword: DeclarationKeyword::Const,
        }
    }
}

/// Plan the extraction of the expression at `selection` into a variable
pub fn extract_variable(tree: &ScopeTree<'_>, selection: &Selection, options: &ExtractOptions) -> Result<EditPlan> {
    let syntax = tree.syntax();
    let span = selection_span(syntax, selection)?;
    let selected = locate_span(syntax, span)?;
    if Span::of(selected) != span || !is_expression(selected) {
        return Err(Error::InvalidSelection(format!(
            "`{}` is not a complete expression",
            syntax.slice(span)
        )));
    }
    if is_assignment_target(selected) {
        return Err(Error::InvalidSelection("cannot extract an assignment target".to_string()));
    }
    validate_name(&options.name)?;

    let boundary = scope_boundary(tree, selected);
    let mut occurrences = find_occurrences(tree, selected, boundary, options.mode);
    if occurrences.len() > 1 && has_side_effects(selected, syntax.source().as_bytes()) {
        // Each copy runs separately; only the selected one can be shared
        tracing::debug!(matches = occurrences.len(), "side effects, extracting the selection only");
        occurrences = vec![selected];
    }
    let statement = insertion_point(&occurrences).ok_or_else(|| {
        Error::InvalidSelection("no statement to place the declaration before".to_string())
    })?;
    let insert_at = statement.start_byte();
    let scope = match statement.parent() {
        Some(list) if list.kind() != "program" => tree.scope_at(list.start_byte()),
        _ => tree.root(),
    };

    check_dependencies(tree, selected, scope, insert_at)?;

    let sites: Vec<usize> = occurrences.iter().map(|o| o.start_byte()).collect();
    let name = if options.fresh {
        unique_name(tree, scope, &options.name, &sites)
    } else {
        check_introduce(tree, scope, &options.name, &sites).into_result(syntax)?;
        options.name.clone()
    };

    let line_start = syntax.line_start(insert_at);
    let indent = &syntax.source()[line_start..insert_at];
    let separator = if indent.trim().is_empty() {
        format!("\n{}", indent)
    } else {
        " ".to_string()
    };
    let declaration = format!(
        "{} {} = {};{}",
        options.keyword,
        name,
        syntax.text(selected),
        separator
    );

    let mut plan = EditPlan::new(format!("extract {}", name));
    plan.push(TextEdit::insert(insert_at, declaration));
    for occurrence in &occurrences {
        plan.push(TextEdit::replace(Span::of(*occurrence), name.clone()));
    }

    tracing::info!(name = %name, occurrences = occurrences.len(), "planned extract");
    Ok(plan)
}

/// Every identifier the expression uses must mean the same thing at the
/// insertion point
fn check_dependencies(
    tree: &ScopeTree<'_>,
    selected: Node<'_>,
    scope: crate::scope::ScopeId,
    insert_at: usize,
) -> Result<()> {
    let syntax = tree.syntax();
    let resolver = NameResolver::new(tree);
    let inside = Span::of(selected);
    let mut failure = None;

    walk_identifiers(selected, &mut |node| {
        if failure.is_some() {
            return;
        }
        let here = resolver.resolve_node(node);
        let local = here.is_some_and(|id| inside.contains(tree.binding(id).span()));
        if local {
            return;
        }
        let name = syntax.text(node);
        if resolver.resolve(scope, name, insert_at) != here {
            failure = Some(name.to_string());
        }
    });

    match failure {
        Some(name) => Err(Error::InvalidSelection(format!(
            "`{}` does not refer to the same declaration where the variable would be declared",
            name
        ))),
        None => Ok(()),
    }
}

use crate::{emit_success, OutputMode};
use anyhow::Context;
use owo_colors::OwoColorize;
use rescope::binding::ReferenceKind;
use rescope::config::{default_config_path, load_config, write_config, RescopeConfig};
use rescope::occurrence::OccurrenceMode;
use rescope::output::is_quiet;
use rescope::refactor::{extract_variable, inline_variable, rename, DeclarationKeyword};
use rescope::scope::NameResolver;
use rescope::syntax::javascript::is_identifier;
use rescope::ui::{
    file_modified, header, info, name, plan_summary, position, references_table, scopes_table,
    section, success, theme, warn, ReferenceRow, ScopeRow, TableBuilder,
};
use rescope::{locate, EditPlan, ScopeTree, Selection, Span, SyntaxTree};
use std::path::{Path, PathBuf};

/// Extract flags as given on the command line
pub struct ExtractRequest {
    pub name: Option<String>,
    pub keyword: Option<DeclarationKeyword>,
    pub mode: Option<OccurrenceMode>,
    pub write: bool,
}

fn load(file: &Path) -> anyhow::Result<SyntaxTree> {
    SyntaxTree::read(file).with_context(|| format!("cannot read {}", file.display()))
}

fn range_text(syntax: &SyntaxTree, span: Span) -> String {
    format!("{}-{}", syntax.position(span.start), syntax.position(span.end))
}

/// First line of a snippet, shortened for tables
fn snippet(text: &str) -> String {
    let line = text.lines().next().unwrap_or("").trim();
    if line.chars().count() > 60 {
        let cut: String = line.chars().take(57).collect();
        format!("{}...", cut)
    } else if text.contains('\n') {
        format!("{} ...", line)
    } else {
        line.to_string()
    }
}

pub fn run_locate(file: &Path, selection: &Selection, output_mode: OutputMode) -> anyhow::Result<()> {
    let syntax = load(file)?;
    let tree = ScopeTree::build(&syntax);
    let node = locate(&syntax, selection)?;
    let span = Span::of(node);
    let binding = is_identifier(node)
        .then(|| NameResolver::new(&tree).resolve_node(node))
        .flatten()
        .map(|id| tree.binding(id));

    if output_mode.is_human() {
        let mut table = TableBuilder::new();
        table.add_row("Node", node.kind());
        table.add_row("Range", &range_text(&syntax, span));
        table.add_row("Text", &snippet(syntax.text(node)));
        if is_identifier(node) {
            let described = match binding {
                Some(b) => format!(
                    "{} ({}) declared at {}",
                    b.name,
                    b.kind,
                    syntax.position(b.declared_at())
                ),
                None => "free name (no declaration in this file)".to_string(),
            };
            table.add_row("Binding", &described);
        }
        println!("{}", table.build());
    } else {
        let data = serde_json::json!({
            "kind": node.kind(),
            "span": span,
            "start": syntax.position(span.start),
            "end": syntax.position(span.end),
            "text": syntax.text(node),
            "binding": binding.map(|b| serde_json::json!({
                "name": b.name,
                "kind": b.kind.as_str(),
                "declared_at": syntax.position(b.declared_at()),
            })),
        });
        emit_success(output_mode, "locate", data)?;
    }
    Ok(())
}

pub fn run_scopes(file: &Path, output_mode: OutputMode) -> anyhow::Result<()> {
    let syntax = load(file)?;
    let tree = ScopeTree::build(&syntax);

    if output_mode.is_human() {
        if !is_quiet() {
            header(&format!("Scopes of {}", file.display()));
        }
        let rows: Vec<ScopeRow> = tree
            .scopes()
            .iter()
            .map(|scope| ScopeRow {
                id: scope.id.0,
                kind: scope.kind.to_string(),
                parent: scope.parent.map(|p| p.0.to_string()).unwrap_or_else(|| "-".to_string()),
                range: range_text(&syntax, scope.span()),
                bindings: scope
                    .binding_ids()
                    .into_iter()
                    .map(|id| {
                        let b = tree.binding(id);
                        format!("{} ({})", b.name, b.kind)
                    })
                    .collect::<Vec<_>>()
                    .join(", "),
            })
            .collect();
        println!("{}", scopes_table(&rows));

        for (_, redeclared, ids) in tree.redeclarations() {
            let positions: Vec<String> = ids
                .iter()
                .map(|id| position(&syntax.position(tree.binding(*id).declared_at()).to_string()))
                .collect();
            warn(&format!("`{}` is declared more than once: {}", redeclared, positions.join(", ")));
        }
    } else {
        let scopes: Vec<serde_json::Value> = tree
            .scopes()
            .iter()
            .map(|scope| {
                let bindings: Vec<serde_json::Value> = scope
                    .binding_ids()
                    .into_iter()
                    .map(|id| {
                        let b = tree.binding(id);
                        serde_json::json!({
                            "name": b.name,
                            "kind": b.kind.as_str(),
                            "declared_at": syntax.position(b.declared_at()),
                        })
                    })
                    .collect();
                serde_json::json!({
                    "id": scope.id.0,
                    "kind": scope.kind.as_str(),
                    "parent": scope.parent.map(|p| p.0),
                    "span": scope.span(),
                    "bindings": bindings,
                })
            })
            .collect();
        let redeclared: Vec<&str> = tree.redeclarations().into_iter().map(|(_, name, _)| name).collect();
        emit_success(
            output_mode,
            "scopes",
            serde_json::json!({ "scopes": scopes, "redeclared": redeclared }),
        )?;
    }
    Ok(())
}

pub fn run_references(
    file: &Path,
    selection: &Selection,
    include_declaration: bool,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let syntax = load(file)?;
    let tree = ScopeTree::build(&syntax);
    let node = locate(&syntax, selection)?;
    if !is_identifier(node) {
        anyhow::bail!("no name at {} (found {})", selection, node.kind());
    }
    let id = tree.binding_at(node)?;
    let binding = tree.binding(id);
    let references = tree.find_references(id, include_declaration);

    if output_mode.is_human() {
        if !is_quiet() {
            header(&format!("References to {} ({})", name(&binding.name), binding.kind));
        }
        if references.is_empty() {
            info("References", "none");
            return Ok(());
        }
        let rows: Vec<ReferenceRow> = references
            .iter()
            .map(|r| {
                let line = Span::new(syntax.line_start(r.span.start), syntax.line_end(r.span.start));
                ReferenceRow {
                    position: syntax.position(r.span.start).to_string(),
                    kind: r.kind.to_string(),
                    line: snippet(syntax.slice(line)),
                }
            })
            .collect();
        println!("{}", references_table(&rows));

        let writes = references.iter().filter(|r| r.kind.is_write()).count();
        let summary = format!(
            "{} ({} {})",
            references.len(),
            writes,
            "writes".style(theme().reference(ReferenceKind::Write))
        );
        info("References", &summary);
    } else {
        let items: Vec<serde_json::Value> = references
            .iter()
            .map(|r| {
                serde_json::json!({
                    "position": syntax.position(r.span.start),
                    "span": r.span,
                    "kind": r.kind,
                })
            })
            .collect();
        let data = serde_json::json!({
            "binding": {
                "name": binding.name,
                "kind": binding.kind.as_str(),
                "declared_at": syntax.position(binding.declared_at()),
            },
            "references": items,
        });
        emit_success(output_mode, "references", data)?;
    }
    Ok(())
}

/// Apply a plan and either rewrite the file or print the new text
fn finish_plan(
    command: &str,
    file: &Path,
    syntax: &SyntaxTree,
    plan: &EditPlan,
    write: bool,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let updated = plan.apply(syntax.source())?;
    if write {
        std::fs::write(file, &updated)?;
        tracing::info!(file = %file.display(), edits = plan.len(), "{}", plan.label);
    }

    if output_mode.is_human() {
        if write {
            if !is_quiet() {
                plan_summary(&plan.label, plan.len());
                file_modified(&file.display().to_string());
            }
        } else {
            print!("{}", updated);
        }
    } else {
        let data = serde_json::json!({
            "label": plan.label,
            "edits": plan.edits,
            "written": write,
            "text": if write { None } else { Some(updated) },
        });
        emit_success(output_mode, command, data)?;
    }
    Ok(())
}

pub fn run_rename(
    file: &Path,
    selection: &Selection,
    new_name: &str,
    write: bool,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let syntax = load(file)?;
    let tree = ScopeTree::build(&syntax);
    let plan = rename(&tree, selection, new_name)?;
    finish_plan("rename", file, &syntax, &plan, write, output_mode)
}

pub fn run_extract(
    file: &Path,
    selection: &Selection,
    request: ExtractRequest,
    config_path: Option<&Path>,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?.unwrap_or_default();
    let mut options = config.extract.options();
    if let Some(name) = request.name {
        options.name = name;
        options.fresh = false;
    }
    if let Some(keyword) = request.keyword {
        options.keyword = keyword;
    }
    if let Some(mode) = request.mode {
        options.mode = mode;
    }

    let syntax = load(file)?;
    let tree = ScopeTree::build(&syntax);
    let plan = extract_variable(&tree, selection, &options)?;
    finish_plan("extract", file, &syntax, &plan, request.write, output_mode)
}

pub fn run_inline(file: &Path, selection: &Selection, write: bool, output_mode: OutputMode) -> anyhow::Result<()> {
    let syntax = load(file)?;
    let tree = ScopeTree::build(&syntax);
    let plan = inline_variable(&tree, selection)?;
    finish_plan("inline", file, &syntax, &plan, write, output_mode)
}

pub fn run_init(path: Option<PathBuf>, force: bool, output_mode: OutputMode) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(default_config_path);
    let config = RescopeConfig::default();
    write_config(&path, &config, force)?;

    if output_mode.is_human() {
        if !is_quiet() {
            success(&format!("Wrote {}", path.display()));
            section("Extract defaults");
            println!("  name    {}", config.extract.name);
            println!("  keyword {}", config.extract.keyword);
            println!("  mode    {}", config.extract.mode);
        }
    } else {
        emit_success(
            output_mode,
            "init",
            serde_json::json!({ "path": path.display().to_string(), "config": config }),
        )?;
    }
    Ok(())
}

//! Rescope CLI - Scope-aware rename, extract and inline for JavaScript

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use rescope::occurrence::OccurrenceMode;
use rescope::refactor::DeclarationKeyword;
use rescope::Selection;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "rescope")]
#[command(version)]
#[command(about = "Scope-aware refactoring for JavaScript - rename, extract and inline without changing what names mean")]
#[command(long_about = r#"
Rescope resolves every name in a file to its declaration and refuses edits
that would make a name refer to something else:
  • Rename a variable, parameter, function, class or import
  • Extract an expression into a const/let declaration
  • Inline a variable back into its uses

Selections are 1-based LINE:COLUMN, or LINE:COLUMN-LINE:COLUMN for a range
(end exclusive, LINE:COLUMN-COLUMN on one line).

Example usage:
  rescope references src/app.js 12:9
  rescope rename src/app.js 12:9 total --write
  rescope extract src/app.js 4:10-4:25 --name price
  rescope inline src/app.js 3:9
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only print results, no status lines (also RESCOPE_QUIET=1)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    /// Path to the config file (defaults to ./rescope.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the syntax node and binding at a position
    Locate {
        /// JavaScript source file
        file: PathBuf,

        /// Position or range
        selection: Selection,
    },

    /// List the scopes of a file and the names they declare
    Scopes {
        /// JavaScript source file
        file: PathBuf,
    },

    /// List the references of the binding at a position
    References {
        /// JavaScript source file
        file: PathBuf,

        /// Position of the name
        selection: Selection,

        /// Include the declaration itself
        #[arg(short, long)]
        declaration: bool,
    },

    /// Rename the binding at a position
    Rename {
        /// JavaScript source file
        file: PathBuf,

        /// Position of the name
        selection: Selection,

        /// New name
        new_name: String,

        /// Rewrite the file instead of printing the result
        #[arg(short, long)]
        write: bool,
    },

    /// Extract the selected expression into a variable
    Extract {
        /// JavaScript source file
        file: PathBuf,

        /// Range of the expression
        selection: Selection,

        /// Variable name (defaults to the configured base name, made unique)
        #[arg(short, long)]
        name: Option<String>,

        /// Declaration keyword (const, let)
        #[arg(short, long)]
        keyword: Option<DeclarationKeyword>,

        /// Occurrences to replace (first, all)
        #[arg(short, long)]
        mode: Option<OccurrenceMode>,

        /// Rewrite the file instead of printing the result
        #[arg(short, long)]
        write: bool,
    },

    /// Inline the variable at a position into its references
    Inline {
        /// JavaScript source file
        file: PathBuf,

        /// Position of the variable name
        selection: Selection,

        /// Rewrite the file instead of printing the result
        #[arg(short, long)]
        write: bool,
    },

    /// Write a default rescope.toml
    Init {
        /// Where to write the config (defaults to ./rescope.toml)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Locate { .. } => "locate",
            Commands::Scopes { .. } => "scopes",
            Commands::References { .. } => "references",
            Commands::Rename { .. } => "rename",
            Commands::Extract { .. } => "extract",
            Commands::Inline { .. } => "inline",
            Commands::Init { .. } => "init",
        }
    }
}

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(&self) -> bool {
        matches!(self, OutputMode::Human)
    }
}

/// Print a JSON success envelope (no-op in human mode)
pub fn emit_success(output_mode: OutputMode, command: &str, data: serde_json::Value) -> anyhow::Result<()> {
    if output_mode == OutputMode::Json {
        let envelope = serde_json::json!({
            "ok": true,
            "command": command,
            "data": data,
        });
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    }
    Ok(())
}

fn emit_error(output_mode: OutputMode, command: &str, err: &anyhow::Error) {
    match output_mode {
        OutputMode::Human => rescope::ui::error(&format!("{:#}", err)),
        OutputMode::Json => {
            let envelope = serde_json::json!({
                "ok": false,
                "command": command,
                "error": format!("{:#}", err),
            });
            println!("{}", envelope);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    rescope::output::set_quiet(cli.quiet);

    // Initialize logging
    let default_filter = if cli.verbose {
        "debug"
    } else if rescope::output::is_quiet() {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let output_mode = if cli.json { OutputMode::Json } else { OutputMode::Human };
    let command_name = cli.command.name();
    let config = cli.config;

    let result = match cli.command {
        Commands::Locate { file, selection } => commands::run_locate(&file, &selection, output_mode),
        Commands::Scopes { file } => commands::run_scopes(&file, output_mode),
        Commands::References { file, selection, declaration } => {
            commands::run_references(&file, &selection, declaration, output_mode)
        }
        Commands::Rename { file, selection, new_name, write } => {
            commands::run_rename(&file, &selection, &new_name, write, output_mode)
        }
        Commands::Extract { file, selection, name, keyword, mode, write } => {
            let request = commands::ExtractRequest { name, keyword, mode, write };
            commands::run_extract(&file, &selection, request, config.as_deref(), output_mode)
        }
        Commands::Inline { file, selection, write } => {
            commands::run_inline(&file, &selection, write, output_mode)
        }
        Commands::Init { path, force } => {
            commands::run_init(path.or(config), force, output_mode)
        }
    };

    if let Err(err) = result {
        tracing::debug!(command = command_name, "command failed: {:?}", err);
        emit_error(output_mode, command_name, &err);
        std::process::exit(1);
    }
}

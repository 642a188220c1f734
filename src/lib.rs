//! # Rescope - Scope-aware refactoring engine
//!
//! Resolves a source position to the binding it denotes and rewrites the
//! program without changing what any name refers to.
//!
//! Rescope provides:
//! - Tree-sitter based parsing of JavaScript sources
//! - A lexical scope tree with shadowing-aware name resolution
//! - Reference finding and rename conflict detection (collision and capture)
//! - Structural occurrence matching for extract-variable / inline-variable
//! - A compute-then-commit edit plan applied in a single pass

pub mod syntax;
pub mod selection;
pub mod locate;
pub mod binding;
pub mod scope;
pub mod conflict;
pub mod occurrence;
pub mod edit;
pub mod refactor;
pub mod output;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use syntax::{SyntaxTree, Span};
pub use selection::{Position, Selection};
pub use locate::locate;
pub use binding::{Binding, BindingId, BindingKind, Reference, ReferenceKind};
pub use scope::{ScopeTree, ScopeId, ScopeKind};
pub use conflict::{check_rename, ConflictReason, ConflictReport};
pub use occurrence::{find_occurrences, OccurrenceMode};
pub use edit::{apply, EditPlan, TextEdit};

/// Result type alias for Rescope operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Rescope operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No syntax node at {line}:{column}")]
    NoNodeAtPosition { line: u32, column: u32 },

    #[error("No declaration found for `{name}`")]
    UnresolvedBinding { name: String },

    #[error("Cannot use `{name}`: {reason} at {line}:{column}")]
    RenameConflict {
        reason: ConflictReason,
        name: String,
        line: u32,
        column: u32,
    },

    #[error("Overlapping edits {first} and {second}")]
    OverlappingEdits { first: Span, second: Span },

    #[error("Edit {span} is outside the source text")]
    EditOutOfBounds { span: Span },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("`{name}` is declared more than once in the same scope")]
    Redeclared { name: String },

    #[error("Cannot inline: {0}")]
    InlineRejected(String),

    #[error("Cannot inline: `{name}` would refer to a different declaration at a use site")]
    InlineCapture { name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

//! Syntax layer
//!
//! Wraps the tree-sitter JavaScript grammar. The tree is owned together with
//! its source text and is never mutated after parsing; every other component
//! only reads from it.

pub mod tree;
pub mod line_index;
pub mod javascript;

pub use tree::{SyntaxTree, Span};
pub use line_index::LineIndex;

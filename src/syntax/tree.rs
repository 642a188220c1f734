//! Parsed syntax tree and byte spans

use crate::{Error, Result};
use crate::selection::Position;
use super::line_index::LineIndex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

/// Half-open byte range `[start, end)` in the original source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `offset`
    pub fn empty(offset: usize) -> Self {
        Self { start: offset, end: offset }
    }

    /// Span covered by a syntax node
    pub fn of(node: Node<'_>) -> Self {
        Self { start: node.start_byte(), end: node.end_byte() }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if `other` lies entirely inside this span
    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn contains_offset(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Check if the two spans share at least one byte
    pub fn intersects(&self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// A parsed JavaScript source file.
///
/// Node identity (`Node::id`) is stable for the lifetime of this value, which
/// is one command invocation.
pub struct SyntaxTree {
    source: String,
    tree: Tree,
    lines: LineIndex,
}

impl SyntaxTree {
    /// Parse JavaScript source text
    pub fn parse(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_javascript::LANGUAGE.into())
            .map_err(|e| Error::Parse(format!("Failed to set language: {}", e)))?;

        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| Error::Parse("Failed to parse source".to_string()))?;

        if tree.root_node().has_error() {
            tracing::warn!("source contains syntax errors; results near them may be incomplete");
        }

        let lines = LineIndex::new(&source);
        Ok(Self { source, tree, lines })
    }

    /// Read and parse a file
    pub fn read(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), bytes = source.len(), "read source");
        Self::parse(source)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text of a node
    pub fn text(&self, node: Node<'_>) -> &str {
        &self.source[node.byte_range()]
    }

    pub fn slice(&self, span: Span) -> &str {
        &self.source[span.start..span.end]
    }

    pub fn lines(&self) -> &LineIndex {
        &self.lines
    }

    /// Byte offset of a 1-based position
    pub fn offset(&self, position: Position) -> Option<usize> {
        self.lines.offset(&self.source, position)
    }

    /// 1-based position of a byte offset
    pub fn position(&self, offset: usize) -> Position {
        self.lines.position(&self.source, offset)
    }

    /// Byte offset where the line containing `offset` starts
    pub fn line_start(&self, offset: usize) -> usize {
        self.lines.line_start(offset)
    }

    /// Byte offset of the newline ending the line containing `offset`
    /// (or the end of the text)
    pub fn line_end(&self, offset: usize) -> usize {
        self.source[offset..]
            .find('\n')
            .map(|i| offset + i)
            .unwrap_or(self.source.len())
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("len", &self.source.len())
            .field("lines", &self.lines.line_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_javascript() {
        let tree = SyntaxTree::parse("function f(x) { return x + 1; }").unwrap();
        assert_eq!(tree.root().kind(), "program");
        assert!(!tree.root().has_error());

        let function = tree.root().named_child(0).unwrap();
        assert_eq!(function.kind(), "function_declaration");
        let name = function.child_by_field_name("name").unwrap();
        assert_eq!(tree.text(name), "f");
    }

    #[test]
    fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.js");
        std::fs::write(&path, "let a = 1;\n").unwrap();

        let tree = SyntaxTree::read(&path).unwrap();
        assert_eq!(tree.source(), "let a = 1;\n");
        assert!(matches!(
            SyntaxTree::read(&dir.path().join("missing.js")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_span_relations() {
        let outer = Span::new(0, 10);
        let inner = Span::new(2, 5);
        assert!(outer.contains(inner));
        assert!(!inner.contains(outer));
        assert!(outer.intersects(inner));

        // Adjacent ranges touch but do not intersect
        assert!(!Span::new(0, 5).intersects(Span::new(5, 9)));
        assert!(Span::new(0, 5).intersects(Span::new(3, 9)));
    }

    #[test]
    fn test_line_bounds() {
        let tree = SyntaxTree::parse("let a = 1;\nlet b = 2;\n").unwrap();
        let b = tree.source().find('b').unwrap();
        assert_eq!(tree.line_start(b), 11);
        assert_eq!(tree.line_end(b), 21);
    }
}

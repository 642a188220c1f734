//! Position Locator
//!
//! Maps a line/column selection onto the syntax node it denotes.

use tree_sitter::Node;
use crate::{Error, Result};
use crate::selection::Selection;
use crate::syntax::{Span, SyntaxTree};

/// Byte range of a selection with surrounding whitespace trimmed
pub fn selection_span(syntax: &SyntaxTree, selection: &Selection) -> Result<Span> {
    let no_node = || Error::NoNodeAtPosition {
        line: selection.start.line,
        column: selection.start.column,
    };
    let start = syntax.offset(selection.start).ok_or_else(no_node)?;
    let end = syntax.offset(selection.end).ok_or_else(no_node)?;
    if selection.is_cursor() {
        return Ok(Span::empty(start));
    }
    if end < start {
        return Err(no_node());
    }

    let text = syntax.slice(Span::new(start, end));
    let leading = text.len() - text.trim_start().len();
    let trailing = text.len() - text.trim_end().len();
    if leading == text.len() {
        return Err(no_node());
    }
    Ok(Span::new(start + leading, end - trailing))
}

/// Locate the node a selection denotes
pub fn locate<'t>(syntax: &'t SyntaxTree, selection: &Selection) -> Result<Node<'t>> {
    let span = selection_span(syntax, selection)?;
    locate_span(syntax, span).map_err(|_| Error::NoNodeAtPosition {
        line: selection.start.line,
        column: selection.start.column,
    })
}

/// Locate the node covering a byte range.
///
/// Returns the deepest node whose span equals the range, else the deepest
/// node containing it. An empty range selects the deepest node touching the
/// offset.
pub fn locate_span(syntax: &SyntaxTree, span: Span) -> Result<Node<'_>> {
    let root = syntax.root();
    let mut current = root;
    let mut exact = (Span::of(root) == span).then_some(root);

    while let Some(child) = covering_child(current, span) {
        if Span::of(child) == span {
            exact = Some(child);
        }
        current = child;
    }

    let found = exact.unwrap_or(current);
    if found == root || found.kind() == "comment" {
        let position = syntax.position(span.start);
        return Err(Error::NoNodeAtPosition {
            line: position.line,
            column: position.column,
        });
    }
    tracing::debug!(kind = found.kind(), start = span.start, end = span.end, "located node");
    Ok(found)
}

/// Named child covering `span`; earliest start wins, then smallest span
fn covering_child<'t>(node: Node<'t>, span: Span) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.start_byte() < child.end_byte())
        .filter(|child| covers(Span::of(*child), span))
        .min_by_key(|child| (child.start_byte(), child.end_byte() - child.start_byte()))
}

fn covers(outer: Span, inner: Span) -> bool {
    if inner.is_empty() {
        outer.start <= inner.start && inner.start <= outer.end
    } else {
        outer.contains(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> SyntaxTree {
        SyntaxTree::parse(source).unwrap()
    }

    #[test]
    fn test_cursor_on_identifier() {
        let syntax = parse("let total = price * qty;");
        let node = locate(&syntax, &Selection::parse("1:14").unwrap()).unwrap();
        assert_eq!(node.kind(), "identifier");
        assert_eq!(syntax.text(node), "price");
    }

    #[test]
    fn test_cursor_prefers_earliest_start() {
        // Column 2 sits between `f` and `(`
        let syntax = parse("f(a);");
        let node = locate(&syntax, &Selection::parse("1:2").unwrap()).unwrap();
        assert_eq!(syntax.text(node), "f");
    }

    #[test]
    fn test_range_exact_match() {
        let syntax = parse("function f(x,y){ return x*y - 10 + x*y; }");
        let node = locate(&syntax, &Selection::parse("1:25-1:28").unwrap()).unwrap();
        assert_eq!(node.kind(), "binary_expression");
        assert_eq!(syntax.text(node), "x*y");
    }

    #[test]
    fn test_range_trims_whitespace() {
        let syntax = parse("a = b +  c ;");
        let node = locate(&syntax, &Selection::parse("1:4-1:12").unwrap()).unwrap();
        assert_eq!(syntax.text(node), "b +  c");
    }

    #[test]
    fn test_range_without_exact_match_returns_container() {
        let syntax = parse("let v = a + b + c;");
        // `b + c` is not a node: `a + b` groups first
        let node = locate(&syntax, &Selection::parse("1:13-1:18").unwrap()).unwrap();
        assert_eq!(syntax.text(node), "a + b + c");
    }

    #[test]
    fn test_no_node_in_comment_or_whitespace() {
        let syntax = parse("// note\nlet a = 1;\n\n   \n");
        assert!(matches!(
            locate(&syntax, &Selection::parse("1:4").unwrap()),
            Err(Error::NoNodeAtPosition { line: 1, column: 4 })
        ));
        assert!(matches!(
            locate(&syntax, &Selection::parse("4:1-4:4").unwrap()),
            Err(Error::NoNodeAtPosition { .. })
        ));
        assert!(matches!(
            locate(&syntax, &Selection::parse("9:1").unwrap()),
            Err(Error::NoNodeAtPosition { .. })
        ));
    }

    #[test]
    fn test_multiline_range() {
        let syntax = parse("const o = {\n  a: 1,\n};\n");
        let node = locate(&syntax, &Selection::parse("1:11-3:2").unwrap()).unwrap();
        assert_eq!(node.kind(), "object");
    }
}

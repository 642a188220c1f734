//! Edit plans
//!
//! Refactorings compute every text edit first and apply them in one pass.
//! A plan either applies completely or not at all.

use serde::Serialize;
use crate::{Error, Result};
use crate::syntax::Span;

/// Replace the text of `span` with `replacement`. An empty span inserts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    pub span: Span,
    pub replacement: String,
}

impl TextEdit {
    pub fn new(span: Span, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
        }
    }

    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(Span::empty(offset), text)
    }

    pub fn replace(span: Span, text: impl Into<String>) -> Self {
        Self::new(span, text)
    }

    pub fn delete(span: Span) -> Self {
        Self::new(span, String::new())
    }

    pub fn is_insertion(&self) -> bool {
        self.span.is_empty()
    }
}

/// A labelled set of edits against one source text
#[derive(Debug, Clone, Default, Serialize)]
pub struct EditPlan {
    pub label: String,
    pub edits: Vec<TextEdit>,
}

impl EditPlan {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            edits: Vec::new(),
        }
    }

    pub fn push(&mut self, edit: TextEdit) {
        self.edits.push(edit);
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Check the plan against `source` without applying it
    pub fn validate(&self, source: &str) -> Result<()> {
        validate(source, &self.edits)
    }

    /// Apply the plan to `source`
    pub fn apply(&self, source: &str) -> Result<String> {
        apply(source, &self.edits)
    }
}

/// Reject overlapping or out-of-range edits
pub fn validate(source: &str, edits: &[TextEdit]) -> Result<()> {
    for edit in edits {
        let span = edit.span;
        if span.start > span.end
            || span.end > source.len()
            || !source.is_char_boundary(span.start)
            || !source.is_char_boundary(span.end)
        {
            return Err(Error::EditOutOfBounds { span });
        }
    }

    let mut spans: Vec<Span> = edits.iter().map(|e| e.span).collect();
    spans.sort();
    for pair in spans.windows(2) {
        let (first, second) = (pair[0], pair[1]);
        let ambiguous = first.is_empty() && second.is_empty() && first.start == second.start;
        if ambiguous || first.end > second.start {
            return Err(Error::OverlappingEdits { first, second });
        }
    }
    Ok(())
}

/// Apply edits to `source`, back to front
pub fn apply(source: &str, edits: &[TextEdit]) -> Result<String> {
    validate(source, edits)?;

    let mut ordered: Vec<&TextEdit> = edits.iter().collect();
    // Wider range first on ties so an insertion at the same start lands
    // before the replaced text
    ordered.sort_by(|a, b| {
        b.span.start
            .cmp(&a.span.start)
            .then(b.span.end.cmp(&a.span.end))
    });

    let mut result = source.to_string();
    for edit in ordered {
        result.replace_range(edit.span.start..edit.span.end, &edit.replacement);
    }
    tracing::debug!(edits = edits.len(), "applied edits");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "hello world";

    #[test]
    fn test_adjacent_edits_in_any_order() {
        let a = TextEdit::replace(Span::new(0, 5), "HELLO");
        let b = TextEdit::replace(Span::new(5, 9), "-WOR");

        let forward = apply(SOURCE, &[a.clone(), b.clone()]).unwrap();
        let backward = apply(SOURCE, &[b, a]).unwrap();
        assert_eq!(forward, "HELLO-WORld");
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_overlapping_edits_rejected() {
        let a = TextEdit::replace(Span::new(0, 5), "x");
        let b = TextEdit::replace(Span::new(3, 9), "y");

        match apply(SOURCE, &[a, b]) {
            Err(Error::OverlappingEdits { first, second }) => {
                assert_eq!(first, Span::new(0, 5));
                assert_eq!(second, Span::new(3, 9));
            }
            other => panic!("expected overlap, got {other:?}"),
        }
    }

    #[test]
    fn test_insertion_before_replacement() {
        let insert = TextEdit::insert(6, "big ");
        let replace = TextEdit::replace(Span::new(6, 11), "planet");

        assert_eq!(apply(SOURCE, &[replace, insert]).unwrap(), "hello big planet");
    }

    #[test]
    fn test_duplicate_insertions_rejected() {
        let edits = [TextEdit::insert(5, "a"), TextEdit::insert(5, "b")];
        assert!(matches!(apply(SOURCE, &edits), Err(Error::OverlappingEdits { .. })));
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let edits = [TextEdit::delete(Span::new(8, 20))];
        assert!(matches!(apply(SOURCE, &edits), Err(Error::EditOutOfBounds { .. })));

        // Inside a multi-byte character
        let edits = [TextEdit::delete(Span::new(1, 2))];
        assert!(matches!(apply("é", &edits), Err(Error::EditOutOfBounds { .. })));
    }

    #[test]
    fn test_plan_applies_in_one_pass() {
        let mut plan = EditPlan::new("rename");
        plan.push(TextEdit::replace(Span::new(0, 5), "howdy"));
        plan.push(TextEdit::delete(Span::new(5, 11)));
        assert_eq!(plan.len(), 2);
        assert!(plan.validate(SOURCE).is_ok());
        assert_eq!(plan.apply(SOURCE).unwrap(), "howdy");
    }
}

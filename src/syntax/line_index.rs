//! Offset <-> line/column conversion

use crate::selection::Position;

/// Start offsets of every line in a text.
///
/// Columns are counted in Unicode scalar values so positions match what an
/// editor displays, while offsets stay byte-based like tree-sitter spans.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset where the line containing `offset` starts
    pub fn line_start(&self, offset: usize) -> usize {
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        self.line_starts[line]
    }

    /// Byte offset of a 1-based position. A column one past the last
    /// character addresses the end of the line.
    pub fn offset(&self, text: &str, position: Position) -> Option<usize> {
        if position.line == 0 || position.column == 0 {
            return None;
        }
        let line = position.line as usize - 1;
        let start = *self.line_starts.get(line)?;
        let end = self
            .line_starts
            .get(line + 1)
            .map(|next| next - 1)
            .unwrap_or(text.len());

        let wanted = position.column as usize - 1;
        let line_text = &text[start..end];
        let mut chars = 0;
        for (i, _) in line_text.char_indices() {
            if chars == wanted {
                return Some(start + i);
            }
            chars += 1;
        }
        (chars == wanted).then_some(end)
    }

    /// 1-based position of a byte offset
    pub fn position(&self, text: &str, offset: usize) -> Position {
        let offset = offset.min(text.len());
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let start = self.line_starts[line];
        let column = text[start..offset].chars().count() + 1;
        Position::new(line as u32 + 1, column as u32)
    }
}

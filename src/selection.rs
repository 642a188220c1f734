//! Source positions and selections
//!
//! Format: `<line>:<column>` for a cursor, `<line>:<column>-<line>:<column>`
//! for a range (`<line>:<column>-<column>` when both ends share a line).
//! Lines and columns are 1-based; the end of a range is exclusive.
//!
//! Examples:
//! - `3:14`: cursor before the 14th character of line 3
//! - `1:25-1:28`: the three characters starting at line 1, column 25

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 1-based line/column position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Parse `<line>:<column>`
    pub fn parse(text: &str) -> Result<Self> {
        let (line, column) = text
            .trim()
            .split_once(':')
            .ok_or_else(|| Error::InvalidSelection(format!("Expected line:column, got `{}`", text)))?;
        let line = parse_component(line, "line")?;
        let column = parse_component(column, "column")?;
        Ok(Self { line, column })
    }
}

fn parse_component(text: &str, what: &str) -> Result<u32> {
    let value: u32 = text
        .trim()
        .parse()
        .map_err(|_| Error::InvalidSelection(format!("Invalid {}: {}", what, text)))?;
    if value == 0 {
        return Err(Error::InvalidSelection(format!("{} numbers start at 1", what)));
    }
    Ok(value)
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A selected range of source text (end exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub start: Position,
    pub end: Position,
}

impl Selection {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Empty selection at a position
    pub fn cursor(position: Position) -> Self {
        Self { start: position, end: position }
    }

    /// Selection from 1-based coordinates
    pub fn range(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
        Self {
            start: Position::new(start_line, start_column),
            end: Position::new(end_line, end_column),
        }
    }

    pub fn is_cursor(&self) -> bool {
        self.start == self.end
    }

    /// Parse a selection string
    pub fn parse(text: &str) -> Result<Self> {
        let Some((start, end)) = text.trim().split_once('-') else {
            return Ok(Self::cursor(Position::parse(text)?));
        };
        let start = Position::parse(start)?;
        let end = if end.contains(':') {
            Position::parse(end)?
        } else {
            Position::new(start.line, parse_component(end, "column")?)
        };
        if end < start {
            return Err(Error::InvalidSelection(format!(
                "Selection ends ({}) before it starts ({})",
                end, start
            )));
        }
        Ok(Self { start, end })
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_cursor() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl FromStr for Selection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

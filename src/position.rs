//! Source locations for tokens and differences.
//!
//! Lines are 1-based so they read naturally in messages. Columns are 0-based
//! char indices within the line, and lengths are counted in chars.

use std::fmt;

use ropey::Rope;

/// The location of a span of text: line, column and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineColumn {
    pub line: usize,
    pub column: usize,
    pub len: usize,
}

impl LineColumn {
    /// Create a new location.
    pub fn new(line: usize, column: usize, len: usize) -> Self {
        Self { line, column, len }
    }

    /// Location of `len` chars starting at char offset `char_idx` in `rope`.
    pub fn in_rope(rope: &Rope, char_idx: usize, len: usize) -> Self {
        let line = rope.char_to_line(char_idx);
        let column = char_idx - rope.line_to_char(line);
        Self::new(line + 1, column, len)
    }

    /// A zero-length location immediately after this one.
    pub fn just_after(&self) -> Self {
        Self::new(self.line, self.column + self.len, 0)
    }
}

impl fmt::Display for LineColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

//! Position-tracking input for the evaluator
//!
//! [`Input`] borrows the text being parsed and tracks a byte offset plus a
//! 1-based line and column. Saving a position for backtracking is O(1) via
//! [`Input::checkpoint`], and restoring it is O(1) via [`Input::reset`].
//!
//! Input is treated as a byte stream: lines are delimited by `\n` only, and
//! `\r` is an ordinary byte.

use std::fmt;

/// The borrowed input of a single parse, with the current position.
///
/// Constructed by [`Parser::parse`][crate::Parser::parse]; user code only
/// sees it through error positions.
pub(crate) struct Input<'i> {
    bytes: &'i [u8],
    filename: String,
    offset: usize,
    line: usize,
    column: usize,
}

/// A saved [`Input`] position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Checkpoint {
    pub(crate) offset: usize,
    line: usize,
    column: usize,
}

/// A (line, column, offset) triple, 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Position {
    pub(crate) line: usize,
    pub(crate) column: usize,
    pub(crate) offset: usize,
}

impl<'i> Input<'i> {
    pub(crate) fn new(filename: &str, input: &'i str) -> Self {
        Self {
            bytes: input.as_bytes(),
            filename: filename.to_owned(),
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// The byte at the current position, or `None` at end of input.
    #[inline]
    pub(crate) fn peek(&self) -> Option<u8> {
        self.bytes.get(self.offset).copied()
    }

    /// The unconsumed remainder of the input.
    #[inline]
    pub(crate) fn rest(&self) -> &'i [u8] {
        &self.bytes[self.offset..]
    }

    #[inline]
    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub(crate) fn at_start(&self) -> bool {
        self.offset == 0
    }

    pub(crate) fn filename(&self) -> &str {
        &self.filename
    }

    /// Consume `n` bytes, updating line and column from the consumed slice.
    ///
    /// The caller checks availability first; consuming past the end is a bug.
    pub(crate) fn advance(&mut self, n: usize) {
        debug_assert!(
            self.offset + n <= self.bytes.len(),
            "advance({n}) past end of input"
        );
        let consumed = &self.bytes[self.offset..self.offset + n];
        match memchr::memrchr(b'\n', consumed) {
            Some(last_nl) => {
                self.line += memchr::memchr_iter(b'\n', consumed).count();
                self.column = consumed.len() - last_nl;
            }
            None => self.column += consumed.len(),
        }
        self.offset += n;
    }

    #[inline]
    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }

    #[inline]
    pub(crate) fn reset(&mut self, checkpoint: Checkpoint) {
        self.offset = checkpoint.offset;
        self.line = checkpoint.line;
        self.column = checkpoint.column;
    }

    #[inline]
    pub(crate) fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }
}

impl fmt::Debug for Input<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Input")
            .field("filename", &self.filename)
            .field("offset", &self.offset)
            .field("line", &self.line)
            .field("column", &self.column)
            .finish()
    }
}

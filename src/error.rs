//! Parse errors and error merging
//!
//! A failed parse produces a [`ParseError`]: the position of the failure, the
//! byte that was found there, and the set of token descriptions that would
//! have allowed parsing to proceed. When several alternatives fail, their
//! errors are merged: the failure that got further into the input wins, and
//! failures at the same position pool their expectations. This is what turns
//! a tree of failed branches into a single message like
//!
//! ```text
//! <stdin>:1:3: error: expected digit or ')' at ';'
//! ```
//!
//! Errors raised by the [`fail`][crate::token::fail] primitive carry a free
//! form message instead of an expected set.

use std::fmt;

use crate::stream::Input;
use crate::stream::Position;

/// The error value returned by a failed parse.
///
/// # Example
///
/// ```rust
/// use thresh::token::char;
///
/// let err = char('a').parse("<test>", "b").unwrap_err();
/// assert_eq!(err.line(), 1);
/// assert_eq!(err.column(), 1);
/// assert_eq!(err.unexpected(), Some('b'));
/// assert_eq!(err.expected(), ["a"]);
/// assert_eq!(err.to_string(), "<test>:1:1: error: expected a at 'b'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    filename: String,
    line: usize,
    column: usize,
    offset: usize,
    unexpected: Option<u8>,
    expected: Vec<String>,
    failure: Option<String>,
    // Unrecoverable: alternation and repetition must not swallow this error.
    // Set for configuration errors (left recursion, undefined rules).
    cut: bool,
}

impl ParseError {
    pub(crate) fn expecting(input: &Input<'_>, label: impl Into<String>) -> Self {
        let Position { line, column, offset } = input.position();
        Self {
            filename: input.filename().to_owned(),
            line,
            column,
            offset,
            unexpected: input.peek(),
            expected: vec![label.into()],
            failure: None,
            cut: false,
        }
    }

    pub(crate) fn failure(input: &Input<'_>, message: impl Into<String>) -> Self {
        let Position { line, column, offset } = input.position();
        Self {
            filename: input.filename().to_owned(),
            line,
            column,
            offset,
            unexpected: input.peek(),
            expected: Vec::new(),
            failure: Some(message.into()),
            cut: false,
        }
    }

    /// A failure that is not tied to a position in the input, e.g. an
    /// unreadable file.
    pub(crate) fn failure_at_start(filename: &str, message: impl Into<String>) -> Self {
        Self {
            filename: filename.to_owned(),
            line: 1,
            column: 1,
            offset: 0,
            unexpected: None,
            expected: Vec::new(),
            failure: Some(message.into()),
            cut: false,
        }
    }

    /// A failure that alternation and repetition must propagate instead of
    /// recovering from.
    pub(crate) fn cut(input: &Input<'_>, message: impl Into<String>) -> Self {
        let mut e = Self::failure(input, message);
        e.cut = true;
        e
    }

    pub(crate) fn is_cut(&self) -> bool {
        self.cut
    }

    /// The filename label given to [`Parser::parse`][crate::Parser::parse].
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// 1-based line of the failure.
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based column of the failure.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Byte offset of the failure.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The byte found at the failure position, or `None` at end of input.
    pub fn unexpected(&self) -> Option<char> {
        self.unexpected.map(char::from)
    }

    /// The descriptions of the tokens that would have allowed parsing to
    /// proceed, in the order they were first reported.
    ///
    /// Empty only for errors produced by [`fail`][crate::token::fail] and for
    /// resource-level failures, which carry a message instead.
    pub fn expected(&self) -> &[String] {
        &self.expected
    }

    /// The free-form message of a `fail`-produced error, if any.
    pub fn failure_message(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Replace the expected set with a single description.
    ///
    /// This is how [`expect`][crate::combinator::expect] rewrites messages.
    pub(crate) fn set_expected(&mut self, label: impl Into<String>) {
        self.expected.clear();
        self.expected.push(label.into());
        self.failure = None;
    }

    /// Merge two failures into one.
    ///
    /// The error at the greater offset supersedes; at equal offsets the
    /// expected sets are unioned and the position is shared (the two agree).
    pub(crate) fn merge(mut self, other: ParseError) -> ParseError {
        use std::cmp::Ordering;
        match self.offset.cmp(&other.offset) {
            Ordering::Greater => self,
            Ordering::Less => other,
            Ordering::Equal => {
                for label in other.expected {
                    if !self.expected.contains(&label) {
                        self.expected.push(label);
                    }
                }
                if self.expected.is_empty() {
                    self.failure = self.failure.or(other.failure);
                } else {
                    self.failure = None;
                }
                self
            }
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}: error: ", self.filename, self.line, self.column)?;
        if let Some(message) = &self.failure {
            return f.write_str(message);
        }
        f.write_str("expected ")?;
        for (i, label) in self.expected.iter().enumerate() {
            if i > 0 {
                f.write_str(if i + 1 == self.expected.len() { " or " } else { ", " })?;
            }
            f.write_str(label)?;
        }
        match self.unexpected {
            Some(b) => write!(f, " at '{}'", escape_byte(b)),
            None => f.write_str(" at end of input"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Render a byte for use in messages, escaping the non-printable.
pub(crate) fn escape_byte(b: u8) -> String {
    match b {
        b'\n' => "\\n".to_owned(),
        b'\t' => "\\t".to_owned(),
        b'\r' => "\\r".to_owned(),
        b'\0' => "\\0".to_owned(),
        b'\\' => "\\\\".to_owned(),
        0x20..=0x7e => char::from(b).to_string(),
        _ => format!("\\x{b:02x}"),
    }
}

/// Render a string for use in messages, escaping the non-printable.
pub(crate) fn escape_str(s: &str) -> String {
    s.bytes().map(|b| match b {
        0x20..=0x7e if b != b'\\' => char::from(b).to_string(),
        _ => escape_byte(b),
    }).collect()
}

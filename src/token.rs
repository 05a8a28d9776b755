//! Primitive matchers
//!
//! The leaves of a parser tree. Each single-byte matcher succeeds by
//! consuming one byte and yielding it as a freshly allocated one-character
//! [`Value::Str`]; [`string`] consumes and yields a whole literal. The
//! zero-width primitives ([`pass`], [`fail`], [`lift`], [`soi`], [`eoi`])
//! consume nothing.
//!
//! Input is a byte stream read with ASCII semantics; see the crate docs.

use crate::parser::Kind;
use crate::parser::Parser;
use crate::value::Value;

/// Match any single byte.
///
/// # Example
///
/// ```rust
/// use thresh::token::any;
///
/// assert_eq!(any().parse("<test>", "x").unwrap().as_str(), Some("x"));
/// assert!(any().parse("<test>", "").is_err());
/// ```
pub fn any() -> Parser {
    Parser::from_kind(Kind::Any)
}

/// Match the character `c`.
///
/// # Example
///
/// ```rust
/// use thresh::token::char;
///
/// let p = char('a');
/// assert_eq!(p.parse("<test>", "abc").unwrap().as_str(), Some("a"));
/// let err = p.parse("<test>", "xyz").unwrap_err();
/// assert_eq!(err.expected(), ["a"]);
/// ```
pub fn char(c: char) -> Parser {
    Parser::from_kind(Kind::Char(ascii(c)))
}

/// Match any character in `lo..=hi`.
///
/// # Example
///
/// ```rust
/// use thresh::token::range;
///
/// let p = range('0', '9');
/// assert_eq!(p.parse("<test>", "7").unwrap().as_str(), Some("7"));
/// assert!(p.parse("<test>", "x").is_err());
/// ```
pub fn range(lo: char, hi: char) -> Parser {
    Parser::from_kind(Kind::Range(ascii(lo), ascii(hi)))
}

/// Match any character appearing in `set`.
///
/// # Example
///
/// ```rust
/// use thresh::token::one_of;
///
/// let p = one_of("+-");
/// assert_eq!(p.parse("<test>", "-1").unwrap().as_str(), Some("-"));
/// let err = p.parse("<test>", "*1").unwrap_err();
/// assert_eq!(err.expected(), ["one of '+-'"]);
/// ```
pub fn one_of(set: &str) -> Parser {
    Parser::from_kind(Kind::OneOf(set.as_bytes().to_vec()))
}

/// Match any character *not* appearing in `set`.
///
/// # Example
///
/// ```rust
/// use thresh::token::none_of;
///
/// let p = none_of("\"");
/// assert_eq!(p.parse("<test>", "a").unwrap().as_str(), Some("a"));
/// assert!(p.parse("<test>", "\"").is_err());
/// ```
pub fn none_of(set: &str) -> Parser {
    Parser::from_kind(Kind::NoneOf(set.as_bytes().to_vec()))
}

/// Match any character for which `pred` returns true.
///
/// Bytes outside the ASCII range are passed to `pred` as the corresponding
/// `char` in `U+0080..=U+00FF`.
///
/// # Example
///
/// ```rust
/// use thresh::token::satisfy;
///
/// let p = satisfy(|c| c.is_ascii_uppercase());
/// assert_eq!(p.parse("<test>", "Q").unwrap().as_str(), Some("Q"));
/// assert!(p.parse("<test>", "q").is_err());
/// ```
pub fn satisfy(pred: impl Fn(char) -> bool + 'static) -> Parser {
    Parser::from_kind(Kind::Satisfy(Box::new(pred)))
}

/// Match the literal `text` exactly.
///
/// A partial match consumes nothing: the input is left at the position the
/// attempt started from.
///
/// # Example
///
/// ```rust
/// use thresh::token::string;
///
/// let p = string("null");
/// assert_eq!(p.parse("<test>", "null!").unwrap().as_str(), Some("null"));
/// let err = p.parse("<test>", "nul!").unwrap_err();
/// assert_eq!(err.expected(), ["\"null\""]);
/// assert_eq!(err.column(), 1);
/// ```
pub fn string(text: &str) -> Parser {
    Parser::from_kind(Kind::Literal(text.to_owned()))
}

/// Succeed without consuming anything, yielding [`Value::Unit`].
pub fn pass() -> Parser {
    Parser::from_kind(Kind::Pass)
}

/// Fail without consuming anything, reporting `message`.
///
/// The resulting error carries the message instead of an expected set.
///
/// # Example
///
/// ```rust
/// use thresh::token::fail;
///
/// let err = fail("integers may not start with 0").parse("<test>", "007").unwrap_err();
/// assert_eq!(err.failure_message(), Some("integers may not start with 0"));
/// ```
pub fn fail(message: impl Into<String>) -> Parser {
    Parser::from_kind(Kind::Fail(message.into()))
}

/// Succeed without consuming anything, yielding a fresh value from `ctor`.
///
/// # Example
///
/// ```rust
/// use thresh::token::lift;
/// use thresh::Value;
///
/// let p = lift(|| Value::Int(0));
/// assert_eq!(p.parse("<test>", "anything").unwrap(), Value::Int(0));
/// ```
pub fn lift(ctor: impl Fn() -> Value + 'static) -> Parser {
    Parser::from_kind(Kind::Lift(Box::new(ctor)))
}

/// Succeed without consuming anything, yielding a clone of `value`.
///
/// # Example
///
/// ```rust
/// use thresh::token::lift_val;
///
/// let p = lift_val("default");
/// assert_eq!(p.parse("<test>", "").unwrap().as_str(), Some("default"));
/// ```
pub fn lift_val(value: impl Into<Value> + Clone + 'static) -> Parser {
    lift(move || value.clone().into())
}

/// Succeed only at the start of the input, yielding [`Value::Unit`].
pub fn soi() -> Parser {
    Parser::from_kind(Kind::Soi)
}

/// Succeed only at the end of the input, yielding [`Value::Unit`].
///
/// # Example
///
/// ```rust
/// use thresh::combinator::{also, fold};
/// use thresh::token::{eoi, string};
///
/// let p = also(string("done"), eoi(), fold::fst);
/// assert!(p.parse("<test>", "done").is_ok());
/// assert!(p.parse("<test>", "done...").is_err());
/// ```
pub fn eoi() -> Parser {
    Parser::from_kind(Kind::Eoi)
}

/// The current byte offset as a [`Value::Int`], consuming nothing.
///
/// Lets the grammar compiler's folds position the construction failures they
/// notice mid-parse.
pub(crate) fn mark() -> Parser {
    Parser::from_kind(Kind::Mark)
}

#[track_caller]
fn ascii(c: char) -> u8 {
    debug_assert!(c as u32 <= 0xff, "'{c}' is not a single byte");
    c as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_byte_matchers() {
        assert_eq!(char('a').parse("<t>", "a").unwrap().as_str(), Some("a"));
        assert_eq!(range('a', 'f').parse("<t>", "c").unwrap().as_str(), Some("c"));
        assert!(range('a', 'f').parse("<t>", "g").is_err());
        assert_eq!(one_of("xyz").parse("<t>", "y").unwrap().as_str(), Some("y"));
        assert!(none_of("xyz").parse("<t>", "y").is_err());
        assert_eq!(satisfy(|c| c == ' ').parse("<t>", " ").unwrap().as_str(), Some(" "));
    }

    #[test]
    fn matchers_fail_cleanly_at_end_of_input() {
        for p in [any(), char('a'), range('a', 'z'), one_of("abc"), string("a")] {
            let err = p.parse("<t>", "").unwrap_err();
            assert_eq!(err.unexpected(), None);
            assert_eq!((err.line(), err.column()), (1, 1));
        }
    }

    #[test]
    fn zero_width_primitives() {
        assert!(pass().parse("<t>", "x").unwrap().is_unit());
        assert!(soi().parse("<t>", "x").unwrap().is_unit());
        assert!(eoi().parse("<t>", "").unwrap().is_unit());
        assert!(eoi().parse("<t>", "x").is_err());
        assert_eq!(
            fail("nope").parse("<t>", "x").unwrap_err().failure_message(),
            Some("nope")
        );
    }

    #[test]
    fn expected_labels_escape_control_characters() {
        let err = char('\n').parse("<t>", "x").unwrap_err();
        assert_eq!(err.expected(), ["\\n"]);
        let err = string("a\tb").parse("<t>", "x").unwrap_err();
        assert_eq!(err.expected(), ["\"a\\tb\""]);
    }
}

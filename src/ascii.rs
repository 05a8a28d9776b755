//! Character-class and lexeme parsers
//!
//! The usual single-character classes (each wrapped in
//! [`expect`][crate::combinator::expect] so failures read as `expected digit`
//! rather than a character range), plus the composite lexemes real grammars
//! keep rebuilding: identifiers, integers, reals, and quoted literals.
//!
//! Classes are ASCII; bytes outside the ASCII range belong to none of them.

use crate::combinator::also;
use crate::combinator::between;
use crate::combinator::expect;
use crate::combinator::fold;
use crate::combinator::many;
use crate::combinator::many1;
use crate::combinator::maybe;
use crate::combinator::or;
use crate::combinator::skip_many;
use crate::parser::Parser;
use crate::token::any;
use crate::token::char;
use crate::token::none_of;
use crate::token::one_of;
use crate::token::range;
use crate::token::satisfy;

/// A single whitespace character (space, tab, newline, carriage return, form
/// feed or vertical tab).
pub fn space() -> Parser {
    expect(one_of(" \t\n\r\x0c\x0b"), "space")
}

/// Zero or more whitespace characters, discarded.
///
/// This is the whitespace skipped by [`tok`][crate::combinator::tok] and
/// [`strip`][crate::combinator::strip].
pub fn whitespace() -> Parser {
    skip_many(space())
}

/// The newline character.
pub fn newline() -> Parser {
    expect(char('\n'), "newline")
}

/// The tab character.
pub fn tab() -> Parser {
    expect(char('\t'), "tab")
}

/// A decimal digit.
///
/// # Example
///
/// ```rust
/// use thresh::ascii::digit;
///
/// let err = digit().parse("<test>", "x").unwrap_err();
/// assert_eq!(err.to_string(), "<test>:1:1: error: expected digit at 'x'");
/// ```
pub fn digit() -> Parser {
    expect(range('0', '9'), "digit")
}

/// A hexadecimal digit, either case.
pub fn hexdigit() -> Parser {
    expect(one_of("0123456789ABCDEFabcdef"), "hex digit")
}

/// An octal digit.
pub fn octdigit() -> Parser {
    expect(range('0', '7'), "oct digit")
}

/// A lowercase letter.
pub fn lower() -> Parser {
    expect(range('a', 'z'), "lowercase letter")
}

/// An uppercase letter.
pub fn upper() -> Parser {
    expect(range('A', 'Z'), "uppercase letter")
}

/// A letter of either case.
pub fn alpha() -> Parser {
    expect(or([range('a', 'z'), range('A', 'Z')]), "alpha")
}

/// The underscore.
pub fn underscore() -> Parser {
    expect(char('_'), "underscore")
}

/// A letter, digit or underscore.
pub fn alphanum() -> Parser {
    expect(
        satisfy(|c| c.is_ascii_alphanumeric() || c == '_'),
        "alphanumeric",
    )
}

/// One or more decimal digits as a single string.
pub fn digits() -> Parser {
    expect(many1(range('0', '9'), fold::concat), "digits")
}

/// An identifier: a letter or underscore, then letters, digits and
/// underscores.
///
/// # Example
///
/// ```rust
/// use thresh::ascii::ident;
///
/// let p = ident();
/// assert_eq!(p.parse("<test>", "foo_bar123").unwrap().as_str(), Some("foo_bar123"));
///
/// let err = p.parse("<test>", "3bad").unwrap_err();
/// assert_eq!((err.line(), err.column()), (1, 1));
/// assert_eq!(err.expected(), ["alpha", "underscore"]);
/// ```
pub fn ident() -> Parser {
    also(
        or([alpha(), underscore()]),
        many(alphanum(), fold::concat),
        fold::concat,
    )
}

/// An optionally signed decimal integer, as the matched string.
pub fn int() -> Parser {
    expect(
        also(maybe(one_of("+-")), many1(range('0', '9'), fold::concat), fold::concat),
        "integer",
    )
}

/// An optionally signed decimal number with optional fraction and exponent,
/// as the matched string.
pub fn real() -> Parser {
    let sign = || maybe(one_of("+-"));
    let digits = || many1(range('0', '9'), fold::concat);
    let fraction = maybe(also(char('.'), digits(), fold::concat));
    let exponent = maybe(also(
        one_of("eE"),
        also(sign(), digits(), fold::concat),
        fold::concat,
    ));
    expect(
        also(
            also(sign(), digits(), fold::concat),
            also(fraction, exponent, fold::concat),
            fold::concat,
        ),
        "real",
    )
}

/// A single-quoted character literal. The value is the raw inner text with
/// any escape sequence left intact.
pub fn char_lit() -> Parser {
    expect(
        between(or([escape_pair(), none_of("'")]), "'", "'"),
        "character literal",
    )
}

/// A double-quoted string literal. The value is the raw inner text with
/// escape sequences left intact.
///
/// # Example
///
/// ```rust
/// use thresh::ascii::string_lit;
///
/// let v = string_lit().parse("<test>", r#""say \"hi\"""#).unwrap();
/// assert_eq!(v.as_str(), Some(r#"say \"hi\""#));
/// ```
pub fn string_lit() -> Parser {
    expect(
        between(
            many(or([escape_pair(), none_of("\"")]), fold::concat),
            "\"",
            "\"",
        ),
        "string literal",
    )
}

/// A slash-delimited regex literal. The value is the raw pattern with escape
/// sequences left intact.
pub fn regex_lit() -> Parser {
    expect(
        between(
            many(or([escape_pair(), none_of("/")]), fold::concat),
            "/",
            "/",
        ),
        "regex literal",
    )
}

/// A backslash followed by any character, as a two-character string.
fn escape_pair() -> Parser {
    also(char('\\'), any(), fold::concat)
}

/// Interpret the escape sequences of a quoted literal's raw text.
///
/// `\n`, `\t`, `\r` and `\0` become their control characters; any other
/// escaped character stands for itself.
pub(crate) fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut bytes = raw.bytes();
    while let Some(b) = bytes.next() {
        if b != b'\\' {
            out.push(char::from(b));
            continue;
        }
        match bytes.next() {
            Some(b'n') => out.push('\n'),
            Some(b't') => out.push('\t'),
            Some(b'r') => out.push('\r'),
            Some(b'0') => out.push('\0'),
            Some(other) => out.push(char::from(other)),
            None => out.push('\\'),
        }
    }
    out
}

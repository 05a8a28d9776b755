//! Regex front-end
//!
//! [`re`] compiles a pattern string into an ordinary parser tree. The
//! compiler is itself written with the core combinators: the regex grammar is
//! a parser whose *result values* are parsers, and the folds at each level of
//! the grammar assemble the final tree. A malformed pattern therefore fails
//! the same way any other parse does, with a position inside the pattern.
//!
//! Supported syntax:
//!
//! - literal characters, with `\` escaping the metacharacters and `\n`,
//!   `\t`, `\r` their usual selves;
//! - `.` for any character except newline;
//! - character classes `[...]`, with `^` negation and `a-z` ranges;
//! - `^` and `$` anchoring the start and end of input;
//! - postfix `*`, `+` and `?`;
//! - alternation `|` (lowest precedence) and grouping `(...)`.
//!
//! The compiled parser yields the matched text as a single string; there are
//! no capture groups, and classes have ASCII semantics.

use crate::combinator::also;
use crate::combinator::end;
use crate::combinator::expect;
use crate::combinator::fold;
use crate::combinator::many1;
use crate::combinator::many_else;
use crate::combinator::maybe;
use crate::combinator::maybe_else;
use crate::combinator::or;
use crate::combinator::parens;
use crate::error::ParseError;
use crate::parser::Parser;
use crate::token;
use crate::token::any;
use crate::token::char;
use crate::token::eoi;
use crate::token::none_of;
use crate::token::one_of;
use crate::token::range;
use crate::token::soi;
use crate::value::Value;
use crate::Rule;

/// Compile `pattern` into a parser accepting the same language.
///
/// # Example
///
/// ```rust
/// use thresh::regex::re;
///
/// let number = re(r"[0-9]+\.[0-9]+").unwrap();
/// assert_eq!(number.parse("<test>", "3.14").unwrap().as_str(), Some("3.14"));
///
/// let err = number.parse("<test>", "3.").unwrap_err();
/// assert_eq!((err.line(), err.column()), (1, 3));
/// assert_eq!(err.expected(), ["digit"]);
/// ```
///
/// A malformed pattern is a parse failure positioned inside the pattern:
///
/// ```rust
/// use thresh::regex::re;
///
/// let err = re("(ab").unwrap_err();
/// assert_eq!(err.filename(), "<regex>");
/// assert_eq!(err.column(), 4);
/// ```
pub fn re(pattern: &str) -> Result<Parser, ParseError> {
    let regex = Rule::new("regex");

    let base = or([
        parens(regex.parser()),
        class(),
        escaped(),
        dot(),
        anchor('^', soi),
        anchor('$', eoi),
        literal(),
    ]);

    let factor = also(base, maybe(one_of("*+?")), |base, suffix| {
        let base = parser_value(base);
        match suffix.as_str() {
            Some("*") => many_else(base, fold::concat, empty_match).into(),
            Some("+") => many1(base, fold::concat).into(),
            Some("?") => maybe_else(base, empty_match).into(),
            _ => base.into(),
        }
    });

    let term = many_else(factor, seq_fold, || Value::Unit).map(|term| match term {
        // The empty pattern matches the empty string.
        Value::Unit => token::lift(empty_match).into(),
        term => term,
    });

    regex.define(also(
        term,
        maybe(also(char('|'), regex.parser(), fold::snd)),
        |left, right| match right {
            Value::Unit => left,
            right => or([parser_value(left), parser_value(right)]).into(),
        },
    ));

    let compiled = end(regex.parser())
        .parse("<regex>", pattern)
        .map(parser_value);
    regex.undefine();
    compiled
}

fn seq_fold(acc: Value, next: Value) -> Value {
    match acc {
        Value::Unit => next,
        acc => also(parser_value(acc), parser_value(next), fold::concat).into(),
    }
}

fn empty_match() -> Value {
    Value::Str(String::new())
}

/// `[...]`, with `^` negation, `a-z` ranges, and `\` escapes.
fn class() -> Parser {
    let item = or([escape_pair(), none_of("]")]);
    let body = many1(item, fold::concat);
    also(also(char('['), body, fold::snd), char(']'), fold::fst)
        .map(|raw| compile_class(&raw.into_string().unwrap_or_default()).into())
}

/// `\x` for a metacharacter or control-character escape.
fn escaped() -> Parser {
    also(char('\\'), any(), fold::snd).map(|v| {
        let c = match v.as_str().and_then(|s| s.chars().next()) {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some(c) => c,
            None => '\\',
        };
        char(c).into()
    })
}

/// `.`: any character except newline.
fn dot() -> Parser {
    char('.').map(|_| expect(none_of("\n"), "any character").into())
}

/// `^` and `$` compile to the input anchors.
fn anchor(c: char, parser: fn() -> Parser) -> Parser {
    char(c).map(move |_| parser().into())
}

/// Any character that is not a metacharacter matches itself.
fn literal() -> Parser {
    none_of(".|()[]*+?^$\\").map(|v| {
        let c = v.as_str().and_then(|s| s.chars().next()).unwrap_or('\0');
        char(c).into()
    })
}

/// A backslash followed by any character, kept raw for [`compile_class`].
fn escape_pair() -> Parser {
    also(char('\\'), any(), fold::concat)
}

#[derive(Clone, Copy)]
enum ClassItem {
    Single(char),
    Span(char, char),
}

/// Expand a class body into a matcher.
///
/// A class that is exactly one well-known range keeps that range's friendly
/// description (`[0-9]` fails with `expected digit`).
fn compile_class(raw: &str) -> Parser {
    let (negated, body) = match raw.strip_prefix('^') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };

    let mut items = Vec::new();
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        let c = if c == '\\' {
            match chars.next() {
                Some('n') => '\n',
                Some('t') => '\t',
                Some('r') => '\r',
                Some(other) => other,
                None => '\\',
            }
        } else {
            c
        };
        if chars.peek() == Some(&'-') {
            let mut lookahead = chars.clone();
            lookahead.next();
            if let Some(hi) = lookahead.next() {
                if hi != '\\' {
                    chars = lookahead;
                    items.push(ClassItem::Span(c, hi));
                    continue;
                }
            }
        }
        items.push(ClassItem::Single(c));
    }

    if !negated {
        if let [ClassItem::Span(lo, hi)] = items[..] {
            let matcher = range(lo, hi);
            return match (lo, hi) {
                ('0', '9') => expect(matcher, "digit"),
                ('a', 'z') => expect(matcher, "lowercase letter"),
                ('A', 'Z') => expect(matcher, "uppercase letter"),
                _ => matcher,
            };
        }
    }

    let mut set = String::new();
    for item in items {
        match item {
            ClassItem::Single(c) => set.push(c),
            ClassItem::Span(lo, hi) => {
                for b in lo as u8..=hi as u8 {
                    set.push(char::from(b));
                }
            }
        }
    }
    if negated {
        none_of(&set)
    } else {
        one_of(&set)
    }
}

fn parser_value(value: Value) -> Parser {
    match value {
        Value::Parser(parser) => parser,
        _ => {
            debug_assert!(false, "regex fold produced a non-parser value");
            token::fail("malformed regex")
        }
    }
}

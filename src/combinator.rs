//! Combinators and the derived convenience parsers
//!
//! Everything here takes parsers by value and returns a new parser owning
//! them. Repetition and sequencing combinators take a *fold* that combines
//! the collected values; the common folds live in [`fold`].
//!
//! The second half of the module is the derived vocabulary every real grammar
//! ends up needing: whitespace stripping ([`strip`], [`tok`], [`sym`]),
//! delimiters ([`between`], [`parens`], ...) and whole-input anchoring
//! ([`total`]).
//!
//! # Backtracking
//!
//! A parser that fails leaves the input where it was when the attempt
//! started, with one documented exception: the direct operands of [`also`],
//! [`and`], [`many`] and [`count`] keep whatever input the failed attempt
//! consumed. This makes [`or`] committed-choice — an alternative that fails
//! after consuming input ends the alternation — which keeps error messages
//! anchored to where parsing actually went wrong. [`maybe`] and [`not`] mark
//! the input before their attempt and restore it unconditionally, so they
//! are the explicit backtracking points; left-factor or wrap an ambiguous
//! prefix in [`maybe`] to try alternatives that share it.

use crate::ascii::whitespace;
use crate::parser::Kind;
use crate::parser::Parser;
use crate::token::eoi;
use crate::token::soi;
use crate::token::string;
use crate::value::Value;

/// Run `parser`; on failure, report `expected <label>` instead of whatever
/// the parser would have reported.
///
/// # Example
///
/// ```rust
/// use thresh::combinator::expect;
/// use thresh::token::one_of;
///
/// let p = expect(one_of("0123456789abcdef"), "hex digit");
/// let err = p.parse("<test>", "g").unwrap_err();
/// assert_eq!(err.expected(), ["hex digit"]);
/// ```
pub fn expect(parser: Parser, label: impl Into<String>) -> Parser {
    Parser::from_kind(Kind::Expect(Box::new(parser), label.into()))
}

/// Run `parser`; on success, transform its value through `f`.
///
/// `f` owns the value it is given. Side context wanted by the
/// transformation is captured by the closure.
///
/// # Example
///
/// ```rust
/// use thresh::combinator::apply;
/// use thresh::token::string;
/// use thresh::Value;
///
/// let p = apply(string("yes"), |v| {
///     Value::Int(if v.as_str() == Some("yes") { 1 } else { 0 })
/// });
/// assert_eq!(p.parse("<test>", "yes").unwrap(), Value::Int(1));
/// ```
pub fn apply(parser: Parser, f: impl Fn(Value) -> Value + 'static) -> Parser {
    Parser::from_kind(Kind::Apply(Box::new(parser), Box::new(f)))
}

/// Negative lookahead: succeed with [`Value::Unit`] iff `parser` fails,
/// consuming nothing either way.
///
/// # Example
///
/// ```rust
/// use thresh::combinator::{also, fold, not};
/// use thresh::token::{any, string};
///
/// // any character that does not open a comment
/// let p = also(not(string("//")), any(), fold::snd);
/// assert!(p.parse("<test>", "x").is_ok());
/// assert!(p.parse("<test>", "// x").is_err());
/// ```
pub fn not(parser: Parser) -> Parser {
    not_else(parser, || Value::Unit)
}

/// [`not`], yielding `ctor()` instead of [`Value::Unit`] on success.
pub fn not_else(parser: Parser, ctor: impl Fn() -> Value + 'static) -> Parser {
    Parser::from_kind(Kind::Not(Box::new(parser), Box::new(ctor)))
}

/// Run `parser`; on failure restore the input and succeed with
/// [`Value::Unit`].
///
/// This is the explicit backtracking point: the attempt is undone even if it
/// consumed input before failing.
///
/// # Example
///
/// ```rust
/// use thresh::combinator::maybe;
/// use thresh::token::char;
///
/// let sign = maybe(char('-'));
/// assert_eq!(sign.parse("<test>", "-3").unwrap().as_str(), Some("-"));
/// assert!(sign.parse("<test>", "3").unwrap().is_unit());
/// ```
pub fn maybe(parser: Parser) -> Parser {
    maybe_else(parser, || Value::Unit)
}

/// [`maybe`], yielding `ctor()` instead of [`Value::Unit`] on failure.
pub fn maybe_else(parser: Parser, ctor: impl Fn() -> Value + 'static) -> Parser {
    Parser::from_kind(Kind::Maybe(Box::new(parser), Box::new(ctor)))
}

/// Zero-or-more repetitions of `parser`, folded left-to-right.
///
/// The accumulator starts as [`Value::Unit`] and is replaced by
/// `fold(acc, element)` after every match. The repetition stops at the first
/// failure that consumed no input; a failure that did consume input fails the
/// whole repetition (wrap the item in [`maybe`] to backtrack instead).
///
/// # Example
///
/// ```rust
/// use thresh::combinator::{fold, many};
/// use thresh::token::range;
///
/// let digits = many(range('0', '9'), fold::concat);
/// assert_eq!(digits.parse("<test>", "42x").unwrap().as_str(), Some("42"));
/// assert!(digits.parse("<test>", "x").unwrap().is_unit());
/// ```
pub fn many(parser: Parser, fold: impl Fn(Value, Value) -> Value + 'static) -> Parser {
    Parser::from_kind(Kind::Many {
        min: 0,
        item: Box::new(parser),
        fold: Box::new(fold),
        init: Box::new(|| Value::Unit),
    })
}

/// [`many`] with the accumulator seeded from `init` instead of
/// [`Value::Unit`].
pub fn many_else(
    parser: Parser,
    fold: impl Fn(Value, Value) -> Value + 'static,
    init: impl Fn() -> Value + 'static,
) -> Parser {
    Parser::from_kind(Kind::Many {
        min: 0,
        item: Box::new(parser),
        fold: Box::new(fold),
        init: Box::new(init),
    })
}

/// One-or-more repetitions of `parser`; otherwise as [`many`].
pub fn many1(parser: Parser, fold: impl Fn(Value, Value) -> Value + 'static) -> Parser {
    Parser::from_kind(Kind::Many {
        min: 1,
        item: Box::new(parser),
        fold: Box::new(fold),
        init: Box::new(|| Value::Unit),
    })
}

/// Exactly `n` repetitions of `parser`, folded left-to-right.
///
/// Fewer than `n` matches fails the whole repetition; the partial
/// accumulator is dropped. If the final failed attempt consumed no input the
/// repetition restores the input to where it started.
///
/// # Example
///
/// ```rust
/// use thresh::combinator::{count, fold};
/// use thresh::token::range;
///
/// let octet_pair = count(2, range('0', '7'), fold::concat);
/// assert_eq!(octet_pair.parse("<test>", "17x").unwrap().as_str(), Some("17"));
/// assert!(octet_pair.parse("<test>", "1x").is_err());
/// ```
pub fn count(n: usize, parser: Parser, fold: impl Fn(Value, Value) -> Value + 'static) -> Parser {
    Parser::from_kind(Kind::Count {
        n,
        item: Box::new(parser),
        fold: Box::new(fold),
        init: Box::new(|| Value::Unit),
    })
}

/// [`count`] with the accumulator seeded from `init`.
pub fn count_else(
    n: usize,
    parser: Parser,
    fold: impl Fn(Value, Value) -> Value + 'static,
    init: impl Fn() -> Value + 'static,
) -> Parser {
    Parser::from_kind(Kind::Count {
        n,
        item: Box::new(parser),
        fold: Box::new(fold),
        init: Box::new(init),
    })
}

/// Try each alternative in order, returning the first success.
///
/// Alternation is committed-choice: an alternative that fails *after
/// consuming input* ends the alternation without trying the rest. When every
/// alternative fails, the errors are merged — the rightmost failure wins, and
/// failures at the same position pool their expected sets.
///
/// # Example
///
/// ```rust
/// use thresh::combinator::or;
/// use thresh::token::string;
///
/// let keyword = or([string("let"), string("const"), string("var")]);
/// assert!(keyword.parse("<test>", "const").is_ok());
/// let err = keyword.parse("<test>", "fn").unwrap_err();
/// assert_eq!(err.expected(), ["\"let\"", "\"const\"", "\"var\""]);
/// ```
pub fn or(alternatives: impl IntoIterator<Item = Parser>) -> Parser {
    let alternatives: Vec<Parser> = alternatives.into_iter().collect();
    debug_assert!(!alternatives.is_empty(), "or() needs at least one alternative");
    Parser::from_kind(Kind::Or(alternatives))
}

/// Run `first` then `second`, combining their values with `fold`.
///
/// If `second` fails, `first`'s value is dropped and the sequence fails with
/// the input left where `second` failed (committed; see the
/// [module docs][self]).
///
/// # Example
///
/// ```rust
/// use thresh::combinator::{also, fold};
/// use thresh::token::{char, string};
///
/// let p = also(char('$'), string("HOME"), fold::snd);
/// assert_eq!(p.parse("<test>", "$HOME").unwrap().as_str(), Some("HOME"));
/// ```
pub fn also(first: Parser, second: Parser, fold: impl Fn(Value, Value) -> Value + 'static) -> Parser {
    Parser::from_kind(Kind::Also {
        first: Box::new(first),
        second: Box::new(second),
        fold: Box::new(fold),
    })
}

/// Alias of [`also`], kept for symmetry with applicative/monadic styles.
pub fn bind(first: Parser, second: Parser, fold: impl Fn(Value, Value) -> Value + 'static) -> Parser {
    also(first, second, fold)
}

/// Run every parser in sequence and combine the collected values with
/// `fold`, which owns the array.
///
/// If the k-th parser fails, the first k-1 values are dropped and the
/// sequence fails.
///
/// # Example
///
/// ```rust
/// use thresh::combinator::and;
/// use thresh::token::{char, string};
/// use thresh::Value;
///
/// let p = and(
///     vec![char('<'), string("html"), char('>')],
///     |mut values| values.swap_remove(1),
/// );
/// assert_eq!(p.parse("<test>", "<html>").unwrap().as_str(), Some("html"));
/// ```
pub fn and(parsers: Vec<Parser>, fold: impl Fn(Vec<Value>) -> Value + 'static) -> Parser {
    Parser::from_kind(Kind::And {
        items: parsers,
        fold: Box::new(fold),
    })
}

/// Common folds for [`also`], [`many`] and friends.
///
/// All of these take their operands by value and drop whatever they do not
/// return.
pub mod fold {
    use super::Value;

    /// Keep the first value, drop the second.
    pub fn fst(a: Value, _b: Value) -> Value {
        a
    }

    /// Keep the second value, drop the first.
    pub fn snd(_a: Value, b: Value) -> Value {
        b
    }

    /// Concatenate two string values; [`Value::Unit`] reads as the empty
    /// string.
    pub fn concat(a: Value, b: Value) -> Value {
        match (a.into_string(), b.into_string()) {
            (Some(mut a), Some(b)) => {
                a.push_str(&b);
                Value::Str(a)
            }
            _ => {
                debug_assert!(false, "fold::concat over non-string values");
                Value::Unit
            }
        }
    }

    /// Drop both values.
    pub fn discard(_a: Value, _b: Value) -> Value {
        Value::Unit
    }

    /// Concatenate an array of string values, for [`and`][super::and].
    pub fn concat_all(values: Vec<Value>) -> Value {
        values.into_iter().fold(Value::Unit, concat)
    }

    /// Keep the `i`-th value of an [`and`][super::and] array, dropping the
    /// rest.
    pub fn nth(i: usize) -> impl Fn(Vec<Value>) -> Value {
        move |mut values| {
            debug_assert!(i < values.len(), "fold::nth({i}) out of bounds");
            if i < values.len() {
                values.swap_remove(i)
            } else {
                Value::Unit
            }
        }
    }
}

/// Anchor `parser` to the start of the input.
pub fn start(parser: Parser) -> Parser {
    also(soi(), parser, fold::snd)
}

/// Require `parser` to reach the end of the input.
pub fn end(parser: Parser) -> Parser {
    also(parser, eoi(), fold::fst)
}

/// Anchor `parser` to both ends of the input.
pub fn enclose(parser: Parser) -> Parser {
    start(end(parser))
}

/// Skip insignificant whitespace on both sides of `parser`.
pub fn strip(parser: Parser) -> Parser {
    also(also(whitespace(), parser, fold::snd), whitespace(), fold::fst)
}

/// Lexeme wrapper: run `parser`, then skip trailing whitespace.
///
/// # Example
///
/// ```rust
/// use thresh::combinator::{also, fold, tok};
/// use thresh::token::string;
///
/// let p = also(tok(string("fn")), string("main"), fold::snd);
/// assert_eq!(p.parse("<test>", "fn   main").unwrap().as_str(), Some("main"));
/// ```
pub fn tok(parser: Parser) -> Parser {
    also(parser, whitespace(), fold::fst)
}

/// A [`tok`]-wrapped literal: match `text`, then skip trailing whitespace.
pub fn sym(text: &str) -> Parser {
    tok(string(text))
}

/// The whole-input wrapper: strip surrounding whitespace and require both
/// ends of the input. This is what a top-level parser usually wants.
///
/// # Example
///
/// ```rust
/// use thresh::combinator::{fold, many1, total};
/// use thresh::token::range;
///
/// let p = total(many1(range('a', 'z'), fold::concat));
/// assert_eq!(p.parse("<test>", "  word\n").unwrap().as_str(), Some("word"));
/// assert!(p.parse("<test>", "  word!  ").is_err());
/// ```
pub fn total(parser: Parser) -> Parser {
    enclose(strip(parser))
}

/// Match `open`, `parser`, `close`, yielding only `parser`'s value.
///
/// # Example
///
/// ```rust
/// use thresh::combinator::{between, fold, many};
/// use thresh::token::none_of;
///
/// let quoted = between(many(none_of("'"), fold::concat), "'", "'");
/// assert_eq!(quoted.parse("<test>", "'hi'").unwrap().as_str(), Some("hi"));
/// ```
pub fn between(parser: Parser, open: &str, close: &str) -> Parser {
    also(
        also(string(open), parser, fold::snd),
        string(close),
        fold::fst,
    )
}

/// [`between`] `(` and `)`.
pub fn parens(parser: Parser) -> Parser {
    between(parser, "(", ")")
}

/// [`between`] `{` and `}`.
pub fn braces(parser: Parser) -> Parser {
    between(parser, "{", "}")
}

/// [`between`] `<` and `>`.
pub fn brackets(parser: Parser) -> Parser {
    between(parser, "<", ">")
}

/// [`between`] `[` and `]`.
pub fn squares(parser: Parser) -> Parser {
    between(parser, "[", "]")
}

/// [`between`] with both delimiters [`tok`]-wrapped.
pub fn tok_between(parser: Parser, open: &str, close: &str) -> Parser {
    also(also(sym(open), parser, fold::snd), sym(close), fold::fst)
}

/// [`tok_between`] `(` and `)`.
pub fn tok_parens(parser: Parser) -> Parser {
    tok_between(parser, "(", ")")
}

/// [`tok_between`] `{` and `}`.
pub fn tok_braces(parser: Parser) -> Parser {
    tok_between(parser, "{", "}")
}

/// [`tok_between`] `<` and `>`.
pub fn tok_brackets(parser: Parser) -> Parser {
    tok_between(parser, "<", ">")
}

/// [`tok_between`] `[` and `]`.
pub fn tok_squares(parser: Parser) -> Parser {
    tok_between(parser, "[", "]")
}

/// [`many`], dropping every element.
pub fn skip_many(parser: Parser) -> Parser {
    many(parser, fold::discard)
}

/// [`many1`], dropping every element.
pub fn skip_many1(parser: Parser) -> Parser {
    many1(parser, fold::discard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{char, range};
    use crate::Value;

    #[test]
    fn expect_rewrites_the_whole_expected_set() {
        let p = expect(or([char('a'), char('b')]), "identifier");
        let err = p.parse("<t>", "1").unwrap_err();
        assert_eq!(err.expected(), ["identifier"]);
    }

    #[test]
    fn count_backtracks_when_nothing_was_committed() {
        let p = or([count(3, char('a'), fold::concat), string("aab")]);
        assert_eq!(p.parse("<t>", "aab").unwrap().as_str(), Some("aab"));
    }

    #[test]
    fn and_drops_staged_values_on_failure() {
        let p = and(vec![char('a'), char('b'), char('c')], fold::concat_all);
        assert_eq!(p.parse("<t>", "abc").unwrap().as_str(), Some("abc"));
        let err = p.parse("<t>", "abx").unwrap_err();
        assert_eq!(err.expected(), ["c"]);
        assert_eq!(err.column(), 3);
    }

    #[test]
    fn many_else_seeds_the_accumulator() {
        let p = many_else(char('!'), fold::concat, || Value::Str("said: ".into()));
        assert_eq!(p.parse("<t>", "!!").unwrap().as_str(), Some("said: !!"));
        assert_eq!(p.parse("<t>", "").unwrap().as_str(), Some("said: "));
    }

    #[test]
    fn derived_wrappers() {
        let digit = || range('0', '9');
        assert_eq!(
            parens(digit()).parse("<t>", "(5)").unwrap().as_str(),
            Some("5")
        );
        assert_eq!(
            squares(digit()).parse("<t>", "[5]").unwrap().as_str(),
            Some("5")
        );
        assert_eq!(
            brackets(digit()).parse("<t>", "<5>").unwrap().as_str(),
            Some("5")
        );
        assert_eq!(
            // the inner parser handles its own trailing whitespace
            tok_braces(tok(digit())).parse("<t>", "{ 5 }x").unwrap().as_str(),
            Some("5")
        );
        assert_eq!(
            total(digit()).parse("<t>", "  5  ").unwrap().as_str(),
            Some("5")
        );
        assert!(total(digit()).parse("<t>", " 5 x").is_err());
        assert!(skip_many(digit()).parse("<t>", "123").unwrap().is_unit());
    }

    #[test]
    fn sym_skips_trailing_whitespace_only() {
        let p = also(sym("if"), char('('), fold::snd);
        assert!(p.parse("<t>", "if (").is_ok());
        assert!(p.parse("<t>", " if(").is_err());
    }
}

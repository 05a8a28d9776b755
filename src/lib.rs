//! # thresh, parsers as values
//!
//! thresh is a parser-combinator library in which parsers are *runtime
//! trees*: a [`Parser`] is an ordinary value built up from the primitive
//! matchers in [`token`] and the combinators in [`combinator`], and a single
//! recursive evaluator walks the tree over the input. Because the grammar is
//! data rather than types, grammars can be cyclic ([`Rule`]), compiled from
//! a regex pattern ([`regex::re`]) or built from a BNF-like grammar string
//! at runtime ([`grammar::grammar`], [`grammar::lang`]).
//!
//! ## Example
//!
//! Hand-built combinators, folding matched text into whatever you like:
//!
//! ```rust
//! use thresh::combinator::{also, fold, many1, total};
//! use thresh::token::{char, range};
//! use thresh::Value;
//!
//! // key=value
//! let key = many1(range('a', 'z'), fold::concat);
//! let value = many1(range('0', '9'), fold::concat);
//! let pair = also(also(key, char('='), fold::fst), value, |k, v| {
//!     Value::boxed((k.into_string(), v.into_string()))
//! });
//!
//! let v = total(pair).parse("<stdin>", "port=8080\n").unwrap();
//! let (k, v) = *v.downcast::<(Option<String>, Option<String>)>().unwrap();
//! assert_eq!(k.as_deref(), Some("port"));
//! assert_eq!(v.as_deref(), Some("8080"));
//! ```
//!
//! Or the grammar-only mode, where the whole language is a string and every
//! result is a generic syntax tree:
//!
//! ```rust
//! use thresh::grammar::lang;
//! use thresh::{ast, cleanup, Rule};
//!
//! let expr = Rule::new("expr");
//! let value = Rule::new("value");
//! lang(
//!     r#"
//!         expr  : <value> ('+' <value>)* ;
//!         value : /[0-9]+/ ;
//!     "#,
//!     &[&expr, &value],
//! )
//! .unwrap();
//!
//! let tree = ast::total(expr.parser())
//!     .parse("<stdin>", "1 + 2 + 3")
//!     .unwrap()
//!     .into_ast()
//!     .unwrap();
//! println!("{tree}");
//!
//! cleanup([&expr, &value]);
//! ```
//!
//! ## Errors
//!
//! Failures are first-class [`ParseError`] values. Alternatives that fail at
//! the same position pool their expectations, and the failure furthest into
//! the input wins, so the message a user sees is the familiar
//! `expected A, B or C at 'x'` with a line and column. See
//! [`error`][mod@error].
//!
//! ## Backtracking
//!
//! Alternation is committed-choice: once an alternative consumes input, the
//! alternation does not try the rest. [`combinator::maybe`] is the explicit
//! backtracking point. The details live in the [`combinator`][mod@combinator]
//! module docs.
//!
//! ## Input
//!
//! Input is a borrowed byte slice interpreted with ASCII semantics; there
//! are no Unicode-aware character classes. Left-recursive grammars are not
//! supported: the evaluator detects direct and mutual left recursion at a
//! fixed input position and reports it as an error naming the rule, rather
//! than diverging. Rewrite `e : e '+' t | t` as `e : t ('+' t)*`.

#![warn(missing_docs)]

pub mod ascii;
pub mod ast;
pub mod combinator;
pub mod error;
pub mod grammar;
mod parser;
pub mod regex;
mod stream;
pub mod token;
#[cfg(feature = "debug")]
mod trace;
mod value;

pub use crate::ast::Ast;
pub use crate::error::ParseError;
pub use crate::parser::cleanup;
pub use crate::parser::Parser;
pub use crate::parser::Rule;
pub use crate::value::Value;

/// Core names for glob import.
///
/// ## Example
///
/// ```rust
/// use thresh::prelude::*;
///
/// let p = thresh::ascii::digits();
/// let v: Value = p.parse("<stdin>", "17").unwrap();
/// assert_eq!(v.as_str(), Some("17"));
/// ```
pub mod prelude {
    pub use crate::cleanup;
    pub use crate::Ast;
    pub use crate::ParseError;
    pub use crate::Parser;
    pub use crate::Rule;
    pub use crate::Value;
}

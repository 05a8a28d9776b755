//! Parse result values
//!
//! Every parser yields a [`Value`]. The primitive matchers yield
//! [`Value::Str`] holding the matched text, combinators yield whatever their
//! folds build, and the two front-ends yield [`Value::Ast`] (the grammar
//! compiler) and [`Value::Parser`] (the regex compiler, whose parse *results*
//! are parsers). [`Value::Boxed`] carries any user-defined payload.
//!
//! Folds and applies receive values by value and own them; whatever they do
//! not return is dropped.

use std::any::Any;
use std::fmt;

use crate::ast::Ast;
use crate::parser::Parser;

/// The result of a successful parse, tagged by shape.
pub enum Value {
    /// No value: [`pass`][crate::token::pass], anchors, lookahead, discarded
    /// repetition.
    Unit,
    /// Matched text, or whatever a fold built from it.
    Str(String),
    /// An integer built by a user fold.
    Int(i64),
    /// A syntax tree, as produced by grammar-compiled parsers.
    Ast(Ast),
    /// A parser built *by parsing*, as in the regex compiler.
    Parser(Parser),
    /// A user-defined payload.
    Boxed(Box<dyn Any>),
}

impl Value {
    /// True for [`Value::Unit`].
    pub fn is_unit(&self) -> bool {
        matches!(self, Value::Unit)
    }

    /// The text of a [`Value::Str`], if that is what this is.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Unwrap a [`Value::Str`]; `Unit` converts to the empty string.
    pub fn into_string(self) -> Option<String> {
        match self {
            Value::Str(s) => Some(s),
            Value::Unit => Some(String::new()),
            _ => None,
        }
    }

    /// Unwrap a [`Value::Int`].
    pub fn into_int(self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(n),
            _ => None,
        }
    }

    /// Unwrap a [`Value::Ast`].
    pub fn into_ast(self) -> Option<Ast> {
        match self {
            Value::Ast(a) => Some(a),
            _ => None,
        }
    }

    /// Unwrap a [`Value::Parser`].
    pub fn into_parser(self) -> Option<Parser> {
        match self {
            Value::Parser(p) => Some(p),
            _ => None,
        }
    }

    /// Unwrap a [`Value::Boxed`] payload of a concrete type.
    pub fn downcast<T: Any>(self) -> Option<Box<T>> {
        match self {
            Value::Boxed(b) => b.downcast().ok(),
            _ => None,
        }
    }

    /// Box an arbitrary payload.
    pub fn boxed<T: Any>(value: T) -> Value {
        Value::Boxed(Box::new(value))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Str(s.to_owned())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Value {
        Value::Int(n)
    }
}

impl From<Ast> for Value {
    fn from(a: Ast) -> Value {
        Value::Ast(a)
    }
}

impl From<Parser> for Value {
    fn from(p: Parser) -> Value {
        Value::Parser(p)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Value {
        Value::Unit
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => f.write_str("Unit"),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Value::Ast(a) => f.debug_tuple("Ast").field(a).finish(),
            Value::Parser(p) => f.debug_tuple("Parser").field(p).finish(),
            Value::Boxed(_) => f.write_str("Boxed(..)"),
        }
    }
}

/// Structural equality where it is meaningful; `Parser` and `Boxed` values
/// never compare equal.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Ast(a), Value::Ast(b)) => a == b,
            _ => false,
        }
    }
}

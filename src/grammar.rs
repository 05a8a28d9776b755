//! Grammar-string front-end
//!
//! The BNF-like notation accepted here builds parsers that produce
//! [`Ast`][crate::Ast] trees, so a whole language can be described as text
//! with no callbacks at all:
//!
//! - `<name>` refers to one of the supplied [`Rule`]s, by name or by
//!   position (`<0>`, `<1>`, ...);
//! - `/…/` is a regex, compiled with [`re`][crate::regex::re], matching as a
//!   leaf tagged `regex`;
//! - `"…"` and `'…'` are string and character literals, leaves tagged
//!   `string` and `char`;
//! - juxtaposition sequences, `|` alternates (lowest precedence), postfix
//!   `*`, `+` and `?` repeat, and `(…)` groups.
//!
//! Literals skip the whitespace that follows them, so the parsers built here
//! are whitespace-insensitive between tokens; whitespace inside the grammar
//! string itself is likewise insignificant.
//!
//! [`grammar`] compiles one expression; [`lang`] reads a whole
//! `name : body ;` rule list and defines the supplied rules from it. Like
//! the regex front-end, the compilers are themselves built from the core
//! combinators, and a malformed grammar fails with a position inside the
//! grammar string.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ascii;
use crate::ast;
use crate::combinator::also;
use crate::combinator::and;
use crate::combinator::fold;
use crate::combinator::many;
use crate::combinator::many1;
use crate::combinator::maybe;
use crate::combinator::or;
use crate::combinator::sym;
use crate::combinator::tok;
use crate::combinator::tok_brackets;
use crate::combinator::tok_parens;
use crate::combinator::total;
use crate::error::ParseError;
use crate::parser::Parser;
use crate::regex::re;
use crate::stream::Input;
use crate::token;
use crate::token::mark;
use crate::token::one_of;
use crate::token::string;
use crate::value::Value;
use crate::Rule;

/// Compile a grammar expression into a parser producing
/// [`Ast`][crate::Ast] nodes.
///
/// `rules` supplies the parsers the `<name>` references resolve to. An
/// unknown name is a construction failure.
///
/// # Example
///
/// ```rust
/// use thresh::combinator::tok;
/// use thresh::grammar::grammar;
/// use thresh::{cleanup, Rule};
///
/// // Referenced rules handle their own trailing whitespace, like the
/// // literals do; `tok` is the usual way.
/// let digits = Rule::new("digits");
/// digits.define(tok(thresh::ast::leaf(thresh::ascii::digits(), "digits")));
///
/// let assign = grammar("<digits> '=' <digits>", &[&digits]).unwrap();
/// let tree = assign
///     .parse("<test>", "1 = 2")
///     .unwrap()
///     .into_ast()
///     .unwrap();
/// assert_eq!(tree.children().len(), 3);
/// assert_eq!(tree.children()[1].tag(), "char");
/// cleanup([&digits]);
/// ```
pub fn grammar(definition: &str, rules: &[&Rule]) -> Result<Parser, ParseError> {
    let env = Env::new(rules, "<grammar>");
    let gram = meta_grammar(&env);
    let compiled = total(gram.parser())
        .parse("<grammar>", definition)
        .map(parser_value);
    gram.undefine();
    env.check(definition)?;
    compiled
}

/// Read a whole language description and define every listed rule from it.
///
/// The description is a list of `name : body ;` productions; each body uses
/// the same notation as [`grammar`], and each rule's result tree is tagged
/// with the rule's name, producing the hierarchical tags like
/// `expr|value|regex`.
///
/// # Example
///
/// ```rust
/// use thresh::grammar::lang;
/// use thresh::{ast, cleanup, Rule};
///
/// let list = Rule::new("list");
/// let item = Rule::new("item");
/// lang(
///     r#"
///         list : '[' (<item> (',' <item>)*)? ']' ;
///         item : /[a-z]+/ | <list> ;
///     "#,
///     &[&list, &item],
/// )
/// .unwrap();
///
/// let tree = ast::total(list.parser())
///     .parse("<test>", "[a, [b, c]]")
///     .unwrap()
///     .into_ast()
///     .unwrap();
/// assert_eq!(tree.tag(), ">");
/// cleanup([&list, &item]);
/// ```
pub fn lang(definition: &str, rules: &[&Rule]) -> Result<(), ParseError> {
    let env = Env::new(rules, "<lang>");
    let gram = meta_grammar(&env);

    let stanza = {
        let env = Rc::clone(&env);
        and(
            vec![mark(), tok(ascii::ident()), sym(":"), gram.parser(), sym(";")],
            move |mut values| {
                let at = mark_offset(&values[0]);
                let body = values.swap_remove(3);
                let name = match values[1].as_str() {
                    Some(name) => name.to_owned(),
                    None => return Value::Unit,
                };
                match env.find(&name) {
                    Some(rule) if rule.is_defined() => {
                        env.record(at, format!("rule '{name}' is defined twice"));
                    }
                    Some(rule) => {
                        rule.define(ast::tag_node(parser_value(body), name.as_str()));
                    }
                    None => env.record(at, format!("unknown rule <{name}>")),
                }
                Value::Unit
            },
        )
    };

    let parsed = total(many(stanza, fold::discard)).parse("<lang>", definition);
    gram.undefine();
    parsed?;
    env.check(definition)
}

/// Shared state of one compiler run: the rules `<name>` can resolve to, and
/// the first construction failure noticed inside a fold (which has no way to
/// fail the parse directly). Folds record the failing token's byte offset —
/// captured with [`mark`] just before the token — and [`Env::check`] turns
/// it into an error positioned in the definition string.
struct Env {
    rules: Vec<Rule>,
    filename: &'static str,
    error: RefCell<Option<(usize, String)>>,
}

impl Env {
    fn new(rules: &[&Rule], filename: &'static str) -> Rc<Env> {
        Rc::new(Env {
            rules: rules.iter().map(|&r| r.clone()).collect(),
            filename,
            error: RefCell::new(None),
        })
    }

    fn find(&self, key: &str) -> Option<Rule> {
        if let Ok(index) = key.parse::<usize>() {
            return self.rules.get(index).cloned();
        }
        self.rules.iter().find(|r| r.name() == key).cloned()
    }

    fn record(&self, offset: usize, message: String) {
        let mut slot = self.error.borrow_mut();
        if slot.is_none() {
            *slot = Some((offset, message));
        }
    }

    fn check(&self, definition: &str) -> Result<(), ParseError> {
        match self.error.borrow_mut().take() {
            Some((offset, message)) => {
                let mut input = Input::new(self.filename, definition);
                input.advance(offset.min(definition.len()));
                Err(ParseError::failure(&input, message))
            }
            None => Ok(()),
        }
    }
}

/// The offset a [`mark`] node yielded.
fn mark_offset(value: &Value) -> usize {
    match value {
        Value::Int(offset) => *offset as usize,
        _ => 0,
    }
}

/// The grammar-expression grammar. Values are parsers producing trees.
fn meta_grammar(env: &Rc<Env>) -> Rule {
    let gram = Rule::new("grammar");

    let reference = {
        let env = Rc::clone(env);
        also(
            mark(),
            tok_brackets(or([ascii::ident(), ascii::digits()])),
            move |at, v| {
                let key = v.into_string().unwrap_or_default();
                match env.find(&key) {
                    Some(rule) => rule.parser().into(),
                    None => {
                        env.record(mark_offset(&at), format!("unknown rule <{key}>"));
                        token::fail(format!("unknown rule <{key}>")).into()
                    }
                }
            },
        )
    };

    let string_literal = tok(ascii::string_lit()).map(|v| {
        let text = ascii::unescape(&v.into_string().unwrap_or_default());
        tok(ast::leaf(string(&text), "string")).into()
    });

    let char_literal = tok(ascii::char_lit()).map(|v| {
        let text = ascii::unescape(&v.into_string().unwrap_or_default());
        tok(ast::leaf(string(&text), "char")).into()
    });

    let regex_literal = {
        let env = Rc::clone(env);
        also(mark(), tok(ascii::regex_lit()), move |at, v| {
            let pattern = v.into_string().unwrap_or_default();
            match re(&pattern) {
                Ok(parser) => tok(ast::leaf(parser, "regex")).into(),
                Err(e) => {
                    // the pattern sits one byte past the opening slash, so
                    // the inner offset maps straight back into the definition
                    env.record(
                        mark_offset(&at) + 1 + e.offset(),
                        format!("in /{pattern}/: {e}"),
                    );
                    token::fail(format!("invalid regex /{pattern}/")).into()
                }
            }
        })
    };

    let base = or([
        reference,
        string_literal,
        char_literal,
        regex_literal,
        tok_parens(gram.parser()),
    ]);

    let factor = also(base, maybe(tok(one_of("*+?"))), |base, suffix| {
        let base = parser_value(base);
        match suffix.as_str() {
            Some("*") => ast::many(base).into(),
            Some("+") => ast::many1(base).into(),
            Some("?") => ast::maybe(base).into(),
            _ => base.into(),
        }
    });

    let term = many1(factor, |acc, next| match acc {
        Value::Unit => next,
        acc => also(parser_value(acc), parser_value(next), ast::fold_ast).into(),
    });

    gram.define(also(
        term,
        maybe(also(sym("|"), gram.parser(), fold::snd)),
        |left, right| match right {
            Value::Unit => left,
            right => or([parser_value(left), parser_value(right)]).into(),
        },
    ));

    gram
}

fn parser_value(value: Value) -> Parser {
    match value {
        Value::Parser(parser) => parser,
        _ => {
            debug_assert!(false, "grammar fold produced a non-parser value");
            token::fail("malformed grammar")
        }
    }
}

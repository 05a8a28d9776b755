//! The generic syntax tree and its grammar combinators
//!
//! Grammar-compiled parsers produce [`Ast`] nodes: a hierarchical `|`
//! separated tag, the matched contents, and ordered children. A leaf holds
//! contents and no children; an internal node holds children and (typically)
//! empty contents.
//!
//! The second half of the module is the callback-free combinator layer the
//! [grammar compiler][crate::grammar] is built on: the same combinators as
//! [`combinator`][crate::combinator], with every fold fixed to the AST folds
//! [`fold_ast`] and [`afold_ast`] so grammars compose without user callbacks.

use std::fmt;

use crate::combinator;
use crate::combinator::apply;
use crate::error::escape_byte;
use crate::parser::Parser;
use crate::value::Value;

/// A node of the generic syntax tree.
///
/// # Example
///
/// ```rust
/// use thresh::Ast;
///
/// let mut pair = Ast::new("pair", "");
/// pair.add_child(Ast::new("key", "host"));
/// pair.add_child(Ast::new("value", "localhost"));
///
/// assert_eq!(pair.children().len(), 2);
/// assert_eq!(pair.children()[0].contents(), "host");
/// assert_eq!(
///     pair.to_string(),
///     "pair\n  key 'host'\n  value 'localhost'\n"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ast {
    tag: String,
    contents: String,
    children: Vec<Ast>,
}

impl Ast {
    /// Allocate a node with no children.
    pub fn new(tag: impl Into<String>, contents: impl Into<String>) -> Ast {
        Ast {
            tag: tag.into(),
            contents: contents.into(),
            children: Vec::new(),
        }
    }

    /// The `|`-separated hierarchical tag; the rightmost segment is the most
    /// specific.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The matched text of a leaf; typically empty for internal nodes.
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// The ordered children.
    pub fn children(&self) -> &[Ast] {
        &self.children
    }

    /// True if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Append a child.
    pub fn add_child(&mut self, child: Ast) {
        self.children.push(child);
    }

    /// Wrap this node in a synthetic root tagged `>`, the conventional way to
    /// present a single top-level result.
    pub fn into_root(self) -> Ast {
        let mut root = Ast::new(">", "");
        root.add_child(self);
        root
    }

    /// Prepend a segment to the tag: `child.prepend_tag("expr")` turns tag
    /// `number|regex` into `expr|number|regex`.
    pub fn prepend_tag(&mut self, segment: &str) {
        if self.tag.is_empty() {
            self.tag = segment.to_owned();
        } else {
            self.tag = format!("{segment}|{}", self.tag);
        }
    }

    /// Write the indented textual form to `out`; the same format as
    /// `Display`.
    pub fn print_to(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        self.print_indented(out, 0)
    }

    fn print_indented(&self, out: &mut dyn fmt::Write, depth: usize) -> fmt::Result {
        write!(out, "{:indent$}", "", indent = depth * 2)?;
        if self.is_leaf() && !self.contents.is_empty() {
            writeln!(out, "{} '{}'", self.tag, escape_contents(&self.contents))?;
        } else {
            writeln!(out, "{}", self.tag)?;
        }
        for child in &self.children {
            child.print_indented(out, depth + 1)?;
        }
        Ok(())
    }
}

/// The indented tree format: two spaces per depth, leaves as `tag 'contents'`
/// and internal nodes as a bare `tag` followed by their children. Quotes,
/// backslashes and control characters in leaf contents print escaped, so a
/// line is never ambiguous and the printed form can be read back.
impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.print_indented(f, 0)
    }
}

/// Leaf contents for a printed line: the delimiter quote and everything
/// non-printable escaped.
fn escape_contents(contents: &str) -> String {
    contents
        .bytes()
        .map(|b| match b {
            b'\'' => "\\'".to_owned(),
            _ => escape_byte(b),
        })
        .collect()
}

/// Fold an element into an accumulated tree, for repetition and sequencing.
///
/// [`Value::Unit`] on either side passes the other through. A bare `>`
/// sequence accumulator adopts the element as a new child; any other
/// accumulator — a leaf, or a node already claimed by a tagged production —
/// is atomic, so it and the element become the two children of a fresh `>`
/// node.
pub fn fold_ast(acc: Value, element: Value) -> Value {
    let element = match element {
        Value::Unit => return acc,
        element => element,
    };
    let acc = match acc {
        Value::Unit => return element,
        acc => acc,
    };
    match (acc, element) {
        (Value::Ast(mut acc), Value::Ast(element)) => {
            if acc.tag == ">" {
                acc.add_child(element);
                Value::Ast(acc)
            } else {
                let mut node = Ast::new(">", "");
                node.add_child(acc);
                node.add_child(element);
                Value::Ast(node)
            }
        }
        (acc, _element) => {
            debug_assert!(false, "fold_ast over non-tree values");
            acc
        }
    }
}

/// Fold a sequence's values into one `>` node, for [`seq`].
///
/// [`Value::Unit`] elements are skipped, and a single surviving element
/// passes through without a wrapper.
pub fn afold_ast(values: Vec<Value>) -> Value {
    let mut nodes: Vec<Ast> = Vec::with_capacity(values.len());
    for value in values {
        match value {
            Value::Unit => {}
            Value::Ast(node) => nodes.push(node),
            _ => debug_assert!(false, "afold_ast over non-tree values"),
        }
    }
    if nodes.len() == 1 {
        return Value::Ast(nodes.remove(0));
    }
    if nodes.is_empty() {
        return Value::Unit;
    }
    let mut node = Ast::new(">", "");
    for child in nodes {
        node.add_child(child);
    }
    Value::Ast(node)
}

/// Wrap a string-producing parser so its match becomes a leaf tagged `tag`.
///
/// # Example
///
/// ```rust
/// use thresh::ast::leaf;
/// use thresh::ascii::digits;
///
/// let number = leaf(digits(), "number");
/// let v = number.parse("<test>", "42").unwrap().into_ast().unwrap();
/// assert_eq!(v.tag(), "number");
/// assert_eq!(v.contents(), "42");
/// ```
pub fn leaf(parser: Parser, tag: impl Into<String>) -> Parser {
    let tag = tag.into();
    apply(parser, move |value| {
        let contents = value.into_string().unwrap_or_default();
        Value::Ast(Ast::new(tag.clone(), contents))
    })
}

/// Run the parsers in order and gather their trees under one `>` node.
pub fn seq(parsers: Vec<Parser>) -> Parser {
    combinator::and(parsers, afold_ast)
}

/// Tree-building [`many`][combinator::many].
pub fn many(parser: Parser) -> Parser {
    combinator::many(parser, fold_ast)
}

/// Tree-building [`many1`][combinator::many1].
pub fn many1(parser: Parser) -> Parser {
    combinator::many1(parser, fold_ast)
}

/// Tree-building [`maybe`][combinator::maybe]: a missing branch contributes
/// [`Value::Unit`], which the tree folds skip.
pub fn maybe(parser: Parser) -> Parser {
    combinator::maybe(parser)
}

/// Tree-building [`or`][combinator::or].
pub fn or(parsers: impl IntoIterator<Item = Parser>) -> Parser {
    combinator::or(parsers)
}

/// Tree-building [`count`][combinator::count].
pub fn count(n: usize, parser: Parser) -> Parser {
    combinator::count(n, parser, fold_ast)
}

/// Tree-building [`not`][combinator::not].
pub fn not(parser: Parser) -> Parser {
    combinator::not(parser)
}

/// Prepend `segment` to the tag of the resulting tree, turning
/// `number|regex` into e.g. `expr|number|regex`.
pub fn tag_node(parser: Parser, segment: impl Into<String>) -> Parser {
    let segment = segment.into();
    apply(parser, move |value| match value {
        Value::Ast(mut node) => {
            node.prepend_tag(&segment);
            Value::Ast(node)
        }
        value => value,
    })
}

/// Wrap the resulting tree in a synthetic `>` root.
pub fn root(parser: Parser) -> Parser {
    apply(parser, |value| match value {
        Value::Ast(node) => Value::Ast(node.into_root()),
        Value::Unit => Value::Ast(Ast::new(">", "")),
        value => value,
    })
}

/// Tree-building [`total`][combinator::total]: strip surrounding whitespace,
/// anchor both ends of the input, and wrap the result in a `>` root.
pub fn total(parser: Parser) -> Parser {
    root(combinator::total(parser))
}

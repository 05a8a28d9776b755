//! The parser tree and its evaluator
//!
//! A [`Parser`] is a heap value describing *how to parse*: each node is one
//! combinator, built by the constructors in [`token`][crate::token] and
//! [`combinator`][crate::combinator] and owned by whichever node it is
//! composed into. Evaluation walks the tree over an input with
//! [`Parser::parse`].
//!
//! Recursive grammars need a node that can be referenced before it is built;
//! that is a [`Rule`]: a named, shared slot created undefined and filled in
//! exactly once. References between rules may be cyclic, which is why a rule
//! graph must be torn down with [`cleanup`] (or rule-by-rule with
//! [`Rule::undefine`]) before the handles are dropped — a cycle that is never
//! severed is never freed.
//!
//! # Backtracking
//!
//! A parser that fails leaves the input where it was when the attempt
//! started, with one documented exception: the direct operands of the
//! sequencing and repetition combinators
//! ([`also`][crate::combinator::also], [`and`][crate::combinator::and],
//! [`many`][crate::combinator::many], [`count`][crate::combinator::count])
//! keep whatever input the failed attempt consumed. This is what makes
//! [`or`][crate::combinator::or] committed-choice: an alternative that fails
//! after consuming input ends the alternation. Wrap an ambiguous prefix in
//! [`maybe`][crate::combinator::maybe] to opt back into full backtracking.

use std::cell::RefCell;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use crate::error::escape_byte;
use crate::error::escape_str;
use crate::error::ParseError;
use crate::stream::Input;
use crate::value::Value;

pub(crate) type Ctor = Box<dyn Fn() -> Value>;
pub(crate) type ApplyFn = Box<dyn Fn(Value) -> Value>;
pub(crate) type Fold = Box<dyn Fn(Value, Value) -> Value>;
pub(crate) type AFold = Box<dyn Fn(Vec<Value>) -> Value>;

/// One node of a parser tree.
///
/// Build leaves with the [`token`][crate::token] constructors, compose them
/// with [`combinator`][crate::combinator], then run the root with
/// [`Parser::parse`].
///
/// # Example
///
/// ```rust
/// use thresh::combinator::{also, fold, many1};
/// use thresh::token::range;
///
/// let digits = many1(range('0', '9'), fold::concat);
/// let value = digits.parse("<stdin>", "2026!").unwrap();
/// assert_eq!(value.as_str(), Some("2026"));
/// ```
pub struct Parser {
    pub(crate) kind: Kind,
}

pub(crate) enum Kind {
    Any,
    Char(u8),
    Range(u8, u8),
    OneOf(Vec<u8>),
    NoneOf(Vec<u8>),
    Satisfy(Box<dyn Fn(char) -> bool>),
    Literal(String),
    Pass,
    Fail(String),
    Lift(Ctor),
    Soi,
    Eoi,
    Mark,
    Expect(Box<Parser>, String),
    Apply(Box<Parser>, ApplyFn),
    Not(Box<Parser>, Ctor),
    Maybe(Box<Parser>, Ctor),
    Many {
        min: usize,
        item: Box<Parser>,
        fold: Fold,
        init: Ctor,
    },
    Count {
        n: usize,
        item: Box<Parser>,
        fold: Fold,
        init: Ctor,
    },
    Or(Vec<Parser>),
    Also {
        first: Box<Parser>,
        second: Box<Parser>,
        fold: Fold,
    },
    And {
        items: Vec<Parser>,
        fold: AFold,
    },
    Ref(Rc<RuleInner>),
}

impl Parser {
    pub(crate) fn from_kind(kind: Kind) -> Parser {
        Parser { kind }
    }

    /// Run this parser against `input`.
    ///
    /// `filename` is an opaque label that only appears in error positions;
    /// `"<stdin>"` and friends are conventional. Success does not require the
    /// whole input to be consumed — wrap the parser in
    /// [`total`][crate::combinator::total] or
    /// [`end`][crate::combinator::end] for that.
    ///
    /// # Example
    ///
    /// ```rust
    /// use thresh::token::string;
    ///
    /// let p = string("let");
    /// assert_eq!(p.parse("<stdin>", "let x").unwrap().as_str(), Some("let"));
    /// assert!(p.parse("<stdin>", "const x").is_err());
    /// ```
    pub fn parse(&self, filename: &str, input: &str) -> Result<Value, ParseError> {
        let mut machine = Machine {
            input: Input::new(filename, input),
            active: Vec::new(),
        };
        self.eval(&mut machine)
    }

    /// Read a whole file and parse it, labelling errors with the path.
    ///
    /// An unreadable file is reported as an error with a message rather than
    /// an expected set.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Value, ParseError> {
        let path = path.as_ref();
        let label = path.display().to_string();
        match std::fs::read_to_string(path) {
            Ok(contents) => self.parse(&label, &contents),
            Err(e) => Err(ParseError::failure_at_start(
                &label,
                format!("unable to read '{label}': {e}"),
            )),
        }
    }

    /// Transform this parser's result through `f`. Equivalent to
    /// [`apply`][crate::combinator::apply].
    pub fn map(self, f: impl Fn(Value) -> Value + 'static) -> Parser {
        crate::combinator::apply(self, f)
    }

    /// Replace this parser's failure message with `expected <label>`.
    /// Equivalent to [`expect`][crate::combinator::expect].
    pub fn expect(self, label: impl Into<String>) -> Parser {
        crate::combinator::expect(self, label)
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// A named parser with stable identity, definable after construction.
///
/// `Rule` is the unit of recursion: [`Rule::parser`] hands out reference
/// nodes before the rule has a body, and [`Rule::define`] supplies the body
/// exactly once. Handles are cheap to clone and share.
///
/// # Example
///
/// ```rust
/// use thresh::combinator::{fold, many, or, parens};
/// use thresh::token::char;
/// use thresh::{cleanup, Rule};
///
/// // nesting : ('x' | '(' nesting ')')*
/// let nesting = Rule::new("nesting");
/// nesting.define(many(
///     or([char('x'), parens(nesting.parser())]),
///     fold::concat,
/// ));
///
/// assert!(nesting.parse("<stdin>", "x(x(x))x").is_ok());
/// cleanup([&nesting]);
/// ```
#[derive(Clone)]
pub struct Rule {
    inner: Rc<RuleInner>,
}

pub(crate) struct RuleInner {
    pub(crate) name: String,
    pub(crate) body: RefCell<Option<Parser>>,
}

impl Rule {
    /// Create a retained parser named `name`, initially undefined.
    pub fn new(name: impl Into<String>) -> Rule {
        Rule {
            inner: Rc::new(RuleInner {
                name: name.into(),
                body: RefCell::new(None),
            }),
        }
    }

    /// The name given at construction.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Give this rule its body.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the rule is already defined (defining twice
    /// is a usage error). In release builds the old body is replaced.
    pub fn define(&self, body: Parser) {
        let mut slot = self.inner.body.borrow_mut();
        debug_assert!(
            slot.is_none(),
            "rule '{}' is already defined",
            self.inner.name
        );
        *slot = Some(body);
    }

    /// Drop this rule's body, severing its references to other parsers.
    ///
    /// Undefining every rule in a reference graph is what breaks its cycles;
    /// see [`cleanup`].
    pub fn undefine(&self) {
        *self.inner.body.borrow_mut() = None;
    }

    /// Whether [`Rule::define`] has been called.
    pub fn is_defined(&self) -> bool {
        self.inner.body.borrow().is_some()
    }

    /// A parser node referencing this rule. The reference keeps the rule
    /// alive and may be cyclic.
    pub fn parser(&self) -> Parser {
        Parser::from_kind(Kind::Ref(Rc::clone(&self.inner)))
    }

    /// Shorthand for `self.parser().parse(filename, input)`.
    pub fn parse(&self, filename: &str, input: &str) -> Result<Value, ParseError> {
        self.parser().parse(filename, input)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.inner.name)
            .field("defined", &self.is_defined())
            .finish()
    }
}

/// Undefine every listed rule, breaking the cycles in their reference graph
/// so the graph is freed when the handles drop.
///
/// Call this once parsing is done, listing every rule of the grammar; a
/// cyclic graph dropped without it leaks.
pub fn cleanup<'a>(rules: impl IntoIterator<Item = &'a Rule>) {
    for rule in rules {
        rule.undefine();
    }
}

/// Per-parse evaluator state: the input plus the stack of rules currently
/// being expanded, for left-recursion detection.
struct Machine<'i> {
    input: Input<'i>,
    active: Vec<(*const RuleInner, usize)>,
}

impl Parser {
    fn eval(&self, m: &mut Machine<'_>) -> Result<Value, ParseError> {
        #[cfg(feature = "debug")]
        let frame = crate::trace::enter(&self.describe(), &m.input);
        let result = self.eval_inner(m);
        #[cfg(feature = "debug")]
        crate::trace::exit(frame, &m.input, result.is_ok());
        result
    }

    fn eval_inner(&self, m: &mut Machine<'_>) -> Result<Value, ParseError> {
        match &self.kind {
            Kind::Any => self.matcher(m, |_| true, || "any character".to_owned()),
            Kind::Char(c) => {
                let c = *c;
                self.matcher(m, move |b| b == c, move || escape_byte(c))
            }
            Kind::Range(lo, hi) => {
                let (lo, hi) = (*lo, *hi);
                self.matcher(m, move |b| (lo..=hi).contains(&b), move || {
                    format!(
                        "character between '{}' and '{}'",
                        escape_byte(lo),
                        escape_byte(hi)
                    )
                })
            }
            Kind::OneOf(set) => self.matcher(m, |b| set.contains(&b), || {
                format!("one of '{}'", escape_bytes(set))
            }),
            Kind::NoneOf(set) => self.matcher(m, |b| !set.contains(&b), || {
                format!("none of '{}'", escape_bytes(set))
            }),
            Kind::Satisfy(pred) => {
                self.matcher(m, |b| pred(char::from(b)), || {
                    "character satisfying predicate".to_owned()
                })
            }
            Kind::Literal(text) => {
                if m.input.rest().starts_with(text.as_bytes()) {
                    m.input.advance(text.len());
                    Ok(Value::Str(text.clone()))
                } else {
                    Err(ParseError::expecting(
                        &m.input,
                        format!("\"{}\"", escape_str(text)),
                    ))
                }
            }
            Kind::Pass => Ok(Value::Unit),
            Kind::Fail(message) => Err(ParseError::failure(&m.input, message.clone())),
            Kind::Lift(ctor) => Ok(ctor()),
            Kind::Soi => {
                if m.input.at_start() {
                    Ok(Value::Unit)
                } else {
                    Err(ParseError::expecting(&m.input, "start of input"))
                }
            }
            Kind::Eoi => {
                if m.input.peek().is_none() {
                    Ok(Value::Unit)
                } else {
                    Err(ParseError::expecting(&m.input, "end of input"))
                }
            }
            Kind::Mark => Ok(Value::Int(m.input.offset() as i64)),
            Kind::Expect(inner, label) => match inner.eval(m) {
                Ok(value) => Ok(value),
                Err(e) if e.is_cut() => Err(e),
                Err(mut e) => {
                    e.set_expected(label.clone());
                    Err(e)
                }
            },
            Kind::Apply(inner, f) => inner.eval(m).map(f),
            Kind::Not(inner, ctor) => {
                let cp = m.input.checkpoint();
                match inner.eval(m) {
                    Ok(_discarded) => {
                        m.input.reset(cp);
                        Err(ParseError::expecting(&m.input, "opposite"))
                    }
                    Err(e) if e.is_cut() => Err(e),
                    Err(_) => {
                        m.input.reset(cp);
                        Ok(ctor())
                    }
                }
            }
            Kind::Maybe(inner, ctor) => {
                let cp = m.input.checkpoint();
                match inner.eval(m) {
                    Ok(value) => Ok(value),
                    Err(e) if e.is_cut() => Err(e),
                    Err(_) => {
                        m.input.reset(cp);
                        Ok(ctor())
                    }
                }
            }
            Kind::Many { min, item, fold, init } => {
                let mut acc = init();
                let mut matched = 0usize;
                loop {
                    let cp = m.input.checkpoint();
                    match item.eval(m) {
                        Ok(value) => {
                            let consumed = m.input.offset() != cp.offset;
                            acc = fold(acc, value);
                            matched += 1;
                            // A successful match that consumed nothing would
                            // repeat forever; take it once and stop.
                            if !consumed {
                                break;
                            }
                        }
                        Err(e) => {
                            if e.is_cut() || m.input.offset() != cp.offset {
                                return Err(e);
                            }
                            if matched < *min {
                                return Err(e);
                            }
                            break;
                        }
                    }
                }
                Ok(acc)
            }
            Kind::Count { n, item, fold, init } => {
                let start = m.input.checkpoint();
                let mut acc = init();
                for _ in 0..*n {
                    let cp = m.input.checkpoint();
                    match item.eval(m) {
                        Ok(value) => acc = fold(acc, value),
                        Err(e) => {
                            if !e.is_cut() && m.input.offset() == cp.offset {
                                m.input.reset(start);
                            }
                            return Err(e);
                        }
                    }
                }
                Ok(acc)
            }
            Kind::Or(alternatives) => {
                let entry = m.input.checkpoint();
                let mut merged: Option<ParseError> = None;
                for alternative in alternatives {
                    match alternative.eval(m) {
                        Ok(value) => return Ok(value),
                        Err(e) if e.is_cut() => return Err(e),
                        Err(e) => {
                            let committed = m.input.offset() != entry.offset;
                            let e = match merged.take() {
                                Some(prev) => prev.merge(e),
                                None => e,
                            };
                            if committed {
                                return Err(e);
                            }
                            merged = Some(e);
                        }
                    }
                }
                Err(merged.unwrap_or_else(|| {
                    ParseError::failure(&m.input, "empty alternation")
                }))
            }
            Kind::Also { first, second, fold } => {
                let a = first.eval(m)?;
                match second.eval(m) {
                    Ok(b) => Ok(fold(a, b)),
                    Err(e) => {
                        drop(a);
                        Err(e)
                    }
                }
            }
            Kind::And { items, fold } => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(item.eval(m)?);
                }
                Ok(fold(values))
            }
            Kind::Ref(rule) => {
                let id = Rc::as_ptr(rule);
                let offset = m.input.offset();
                if m.active.contains(&(id, offset)) {
                    return Err(ParseError::cut(
                        &m.input,
                        format!("rule '{}' is left-recursive", rule.name),
                    ));
                }
                let body = rule.body.borrow();
                match body.as_ref() {
                    Some(parser) => {
                        m.active.push((id, offset));
                        let result = parser.eval(m);
                        m.active.pop();
                        result
                    }
                    None => {
                        debug_assert!(false, "rule '{}' used before being defined", rule.name);
                        Err(ParseError::cut(
                            &m.input,
                            format!("rule '{}' is undefined", rule.name),
                        ))
                    }
                }
            }
        }
    }

    /// Shared single-byte matcher: succeed with a 1-byte string, fail with
    /// the label, never consume on failure.
    fn matcher(
        &self,
        m: &mut Machine<'_>,
        pred: impl Fn(u8) -> bool,
        label: impl Fn() -> String,
    ) -> Result<Value, ParseError> {
        match m.input.peek() {
            Some(b) if pred(b) => {
                m.input.advance(1);
                Ok(Value::Str(char::from(b).to_string()))
            }
            _ => Err(ParseError::expecting(&m.input, label())),
        }
    }

    /// Short human name for debugging and tracing.
    pub(crate) fn describe(&self) -> String {
        match &self.kind {
            Kind::Any => "any".to_owned(),
            Kind::Char(c) => format!("char '{}'", escape_byte(*c)),
            Kind::Range(lo, hi) => {
                format!("range '{}'-'{}'", escape_byte(*lo), escape_byte(*hi))
            }
            Kind::OneOf(set) => format!("one_of '{}'", escape_bytes(set)),
            Kind::NoneOf(set) => format!("none_of '{}'", escape_bytes(set)),
            Kind::Satisfy(_) => "satisfy".to_owned(),
            Kind::Literal(text) => format!("string \"{}\"", escape_str(text)),
            Kind::Pass => "pass".to_owned(),
            Kind::Fail(_) => "fail".to_owned(),
            Kind::Lift(_) => "lift".to_owned(),
            Kind::Soi => "soi".to_owned(),
            Kind::Eoi => "eoi".to_owned(),
            Kind::Mark => "mark".to_owned(),
            Kind::Expect(_, label) => format!("expect {label}"),
            Kind::Apply(inner, _) => format!("apply({})", inner.describe()),
            Kind::Not(..) => "not".to_owned(),
            Kind::Maybe(..) => "maybe".to_owned(),
            Kind::Many { min: 0, .. } => "many".to_owned(),
            Kind::Many { .. } => "many1".to_owned(),
            Kind::Count { n, .. } => format!("count {n}"),
            Kind::Or(_) => "or".to_owned(),
            Kind::Also { .. } => "also".to_owned(),
            Kind::And { .. } => "and".to_owned(),
            Kind::Ref(rule) => format!("<{}>", rule.name),
        }
    }
}

fn escape_bytes(set: &[u8]) -> String {
    set.iter().map(|&b| escape_byte(b)).collect()
}

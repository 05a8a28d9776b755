//! Printing a tree and reading the printed form back.

use snapbox::assert_data_eq;
use snapbox::str;

use thresh::combinator::{also, between, end, fold, many, many1, maybe, or};
use thresh::grammar::lang;
use thresh::token::{any, char, none_of};
use thresh::{ast, cleanup, Ast, Rule, Value};

/// One printed line: `tag` or `tag 'contents'`, with the contents field
/// escaped the way the printer writes it.
fn line_parser() -> thresh::Parser {
    let tag = many1(none_of(" \n"), fold::concat);
    let escape = also(char('\\'), any(), fold::concat);
    let contents = between(
        many(or([escape, none_of("'\\")]), fold::concat),
        "'",
        "'",
    );
    end(also(
        tag,
        maybe(also(char(' '), contents, fold::snd)),
        |tag, contents| {
            Value::boxed((
                tag.into_string().unwrap_or_default(),
                unescape(&contents.into_string().unwrap_or_default()),
            ))
        },
    ))
}

/// Undo the printer's escaping of a contents field.
fn unescape(raw: &str) -> String {
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

/// Rebuild a tree from its printed form, using the indentation as depth.
fn reparse(printed: &str) -> Ast {
    let line = line_parser();
    let mut stack: Vec<Ast> = Vec::new();
    for text in printed.lines() {
        let body = text.trim_start_matches(' ');
        let depth = (text.len() - body.len()) / 2;
        while stack.len() > depth {
            let done = stack.pop().unwrap();
            match stack.last_mut() {
                Some(parent) => parent.add_child(done),
                None => return done,
            }
        }
        let (tag, contents): (String, String) =
            *line.parse("<line>", body).unwrap().downcast().unwrap();
        stack.push(Ast::new(tag, contents));
    }
    while stack.len() > 1 {
        let done = stack.pop().unwrap();
        if let Some(parent) = stack.last_mut() {
            parent.add_child(done);
        }
    }
    stack.pop().unwrap()
}

fn sample_tree() -> Ast {
    let pair = Rule::new("pair");
    lang("pair : '(' /[a-z]+/ ')' ;", &[&pair]).unwrap();
    let tree = ast::total(pair.parser())
        .parse("<test>", "(ab)")
        .unwrap()
        .into_ast()
        .unwrap();
    cleanup([&pair]);
    tree
}

#[test]
fn printed_form_is_the_documented_format() {
    assert_data_eq!(
        sample_tree().to_string(),
        str![[r#"
>
  pair|>
    char '('
    regex 'ab'
    char ')'
"#]]
    );
}

#[test]
fn print_then_reparse_is_identity() {
    let tree = sample_tree();
    assert_eq!(reparse(&tree.to_string()), tree);
}

#[test]
fn quoted_and_control_contents_survive_the_roundtrip() {
    let mut tree = Ast::new(">", "");
    tree.add_child(Ast::new("string", "it's"));
    tree.add_child(Ast::new("string", "line\nbreak"));
    tree.add_child(Ast::new("char", "\\"));

    let printed = tree.to_string();
    // the quote and the newline print escaped, keeping one node per line
    assert!(printed.contains(r"it\'s"));
    assert!(printed.contains(r"line\nbreak"));
    assert_eq!(printed.lines().count(), 4);

    assert_eq!(reparse(&printed), tree);
}

#[test]
fn deep_trees_survive_the_roundtrip() {
    let list = Rule::new("list");
    let item = Rule::new("item");
    lang(
        r#"
            list : '[' <item>* ']' ;
            item : /[a-z]+/ | <list> ;
        "#,
        &[&list, &item],
    )
    .unwrap();

    let tree = ast::total(list.parser())
        .parse("<test>", "[a [b [c]] d]")
        .unwrap()
        .into_ast()
        .unwrap();
    assert_eq!(reparse(&tree.to_string()), tree);

    cleanup([&list, &item]);
}

//! The same calculator in grammar-only mode, checking the shape of the
//! generic syntax trees.

use thresh::grammar::lang;
use thresh::{ast, cleanup, Ast, Rule};

fn leaves<'a>(tree: &'a Ast, out: &mut Vec<&'a str>) {
    if tree.is_leaf() {
        if !tree.contents().is_empty() {
            out.push(tree.contents());
        }
    } else {
        for child in tree.children() {
            leaves(child, out);
        }
    }
}

fn maths() -> (Rule, Rule, Rule) {
    let expr = Rule::new("expr");
    let product = Rule::new("product");
    let value = Rule::new("value");
    lang(
        r#"
            expr    : <product> (('+' | '-') <product>)* ;
            product : <value> (('*' | '/') <value>)* ;
            value   : /[0-9]+/ | '(' <expr> ')' ;
        "#,
        &[&expr, &product, &value],
    )
    .unwrap();
    (expr, product, value)
}

#[test]
fn leaf_contents_appear_in_reading_order() {
    let (expr, product, value) = maths();

    let tree = ast::total(expr.parser())
        .parse("<test>", "(4 * 2 * 11 + 2) + 5")
        .unwrap()
        .into_ast()
        .unwrap();

    let mut contents = Vec::new();
    leaves(&tree, &mut contents);
    assert_eq!(
        contents,
        ["(", "4", "*", "2", "*", "11", "+", "2", ")", "+", "5"]
    );

    cleanup([&expr, &product, &value]);
}

#[test]
fn tags_name_the_producing_rules() {
    let (expr, product, value) = maths();

    let tree = ast::total(expr.parser())
        .parse("<test>", "4 + 5")
        .unwrap()
        .into_ast()
        .unwrap();

    assert_eq!(tree.tag(), ">");
    let expr_node = &tree.children()[0];
    assert_eq!(expr_node.tag(), "expr|>");

    // `4` flows through product and value untouched, picking their tags up,
    // and the rightmost segment names the literal's source.
    let four = &expr_node.children()[0];
    assert_eq!(four.tag(), "product|value|regex");
    assert_eq!(four.contents(), "4");

    cleanup([&expr, &product, &value]);
}

#[test]
fn whitespace_between_tokens_is_insignificant() {
    let (expr, product, value) = maths();
    let p = ast::total(expr.parser());

    let spaced = p.parse("<test>", "  1 + 2  ").unwrap().into_ast().unwrap();
    let dense = p.parse("<test>", "1+2").unwrap().into_ast().unwrap();
    assert_eq!(spaced, dense);

    cleanup([&expr, &product, &value]);
}

//! The classic calculator, with user folds doing the arithmetic directly.

use thresh::ascii::digits;
use thresh::combinator::{also, apply, fold, many, or, parens, total};
use thresh::token::one_of;
use thresh::{cleanup, Rule, Value};

fn to_int(v: Value) -> Value {
    Value::Int(v.into_string().unwrap().parse().unwrap())
}

/// Accumulate `(operator, operand)` pairs into a boxed list.
fn pair_list(acc: Value, pair: Value) -> Value {
    let mut list: Vec<(String, i64)> = match acc {
        Value::Unit => Vec::new(),
        acc => *acc.downcast().unwrap(),
    };
    list.push(*pair.downcast().unwrap());
    Value::boxed(list)
}

/// Apply the accumulated pairs to the leading operand, left to right.
fn run_ops(first: Value, rest: Value) -> Value {
    let mut result = first.into_int().unwrap();
    let pairs: Vec<(String, i64)> = match rest {
        Value::Unit => Vec::new(),
        rest => *rest.downcast().unwrap(),
    };
    for (op, operand) in pairs {
        result = match op.as_str() {
            "+" => result + operand,
            "-" => result - operand,
            "*" => result * operand,
            _ => result / operand,
        };
    }
    Value::Int(result)
}

/// expression : <value> (('+' | '-' | '*' | '/') <value>)*
///
/// One flat level, so operators apply in reading order with no precedence.
fn expression() -> Rule {
    let expr = Rule::new("expression");
    let value = || or([apply(digits(), to_int), parens(expr.parser())]);
    let op_value = also(one_of("+-*/"), value(), |op, v| {
        Value::boxed((op.into_string().unwrap(), v.into_int().unwrap()))
    });
    expr.define(also(value(), many(op_value, pair_list), run_ops));
    expr
}

#[test]
fn folds_to_an_integer() {
    let expr = expression();
    let p = total(expr.parser());

    assert_eq!(p.parse("<test>", "(4*2)+5").unwrap(), Value::Int(13));
    assert_eq!(p.parse("<test>", "42").unwrap(), Value::Int(42));

    cleanup([&expr]);
}

#[test]
fn operators_apply_left_to_right() {
    let expr = expression();
    let p = total(expr.parser());

    // no precedence in this grammar shape: (1+2)*3
    assert_eq!(p.parse("<test>", "1+2*3").unwrap(), Value::Int(9));
    assert_eq!(p.parse("<test>", "10-2-3").unwrap(), Value::Int(5));

    cleanup([&expr]);
}

#[test]
fn nesting_restores_precedence_by_hand() {
    let expr = expression();
    let p = total(expr.parser());

    assert_eq!(p.parse("<test>", "1+(2*3)").unwrap(), Value::Int(7));

    cleanup([&expr]);
}

/// The left-recursive `e : e '+' int | int` rewritten as repetition: summing
/// `1+2+3` is folding `[1, 2, 3]` with `+`.
#[test]
fn rewritten_left_recursion_sums() {
    let int = || apply(digits(), to_int);
    let sum = also(
        int(),
        many(also(one_of("+"), int(), fold::snd), |acc, v| {
            Value::Int(acc.into_int().unwrap_or(0) + v.into_int().unwrap())
        }),
        |first, rest| Value::Int(first.into_int().unwrap() + rest.into_int().unwrap_or(0)),
    );

    assert_eq!(sum.parse("<test>", "1+2+3").unwrap(), Value::Int(6));
    assert_eq!(sum.parse("<test>", "7").unwrap(), Value::Int(7));
}

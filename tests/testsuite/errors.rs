//! Error merging and the rendered message format.

use snapbox::assert_data_eq;
use snapbox::str;

use thresh::ascii::digit;
use thresh::combinator::{also, fold, or};
use thresh::token::{char, string};

#[test]
fn alternation_pools_expectations() {
    let p = or([char('a'), char('b'), char('c')]);
    let err = p.parse("<stdin>", "d").unwrap_err();

    assert_eq!((err.line(), err.column()), (1, 1));
    assert_eq!(err.unexpected(), Some('d'));
    assert_eq!(err.expected(), ["a", "b", "c"]);
    assert_data_eq!(
        err.to_string(),
        str!["<stdin>:1:1: error: expected a, b or c at 'd'"]
    );
}

#[test]
fn the_rightmost_failure_wins() {
    // branch one fails two bytes in; branch two at the start
    let p = or([
        also(string("ab"), char('c'), fold::concat),
        string("xyz"),
    ]);
    let err = p.parse("<stdin>", "abd").unwrap_err();

    assert_eq!(err.offset(), 2);
    assert_eq!(err.column(), 3);
    assert_eq!(err.expected(), ["c"]);
}

#[test]
fn positions_count_lines() {
    let p = also(string("one\n"), digit(), fold::snd);
    let err = p.parse("input.txt", "one\nx").unwrap_err();

    assert_eq!((err.line(), err.column()), (2, 1));
    assert_data_eq!(
        err.to_string(),
        str!["input.txt:2:1: error: expected digit at 'x'"]
    );
}

#[test]
fn end_of_input_is_spelled_out() {
    let err = digit().parse("<stdin>", "").unwrap_err();
    assert_eq!(err.unexpected(), None);
    assert_data_eq!(
        err.to_string(),
        str!["<stdin>:1:1: error: expected digit at end of input"]
    );
}

#[test]
fn control_characters_render_escaped() {
    let err = digit().parse("<stdin>", "\n7").unwrap_err();
    assert_data_eq!(
        err.to_string(),
        str![[r#"<stdin>:1:1: error: expected digit at '\n'"#]]
    );
}

#[test]
fn fail_carries_a_message_instead_of_expectations() {
    let err = thresh::token::fail("unsupported construct")
        .parse("<stdin>", "x")
        .unwrap_err();
    assert!(err.expected().is_empty());
    assert_data_eq!(
        err.to_string(),
        str!["<stdin>:1:1: error: unsupported construct"]
    );
}

#[test]
fn unreadable_files_are_reported_as_failures() {
    let err = digit()
        .parse_file("definitely/not/a/real/path.txt")
        .unwrap_err();
    assert!(err
        .failure_message()
        .unwrap()
        .starts_with("unable to read 'definitely/not/a/real/path.txt'"));
}

//! Property tests for the evaluator's universal invariants.

use proptest::prelude::*;

use thresh::combinator::{also, fold, many, many1, not, or};
use thresh::token::{any, char, fail, range, string};

proptest! {
    /// `or(fail, a)` behaves as `a`: same successes, and on failure the
    /// message-free `fail` contributes nothing to the expected set.
    #[test]
    fn alternation_identity(c in proptest::char::range('a', 'e'), input in "[a-e]{0,6}") {
        let direct = char(c).parse("<p>", &input);
        let with_fail = or([fail("never"), char(c)]).parse("<p>", &input);
        match (direct, with_fail) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(a), Err(b)) => {
                prop_assert_eq!(a.expected(), b.expected());
                prop_assert_eq!(a.offset(), b.offset());
            }
            _ => prop_assert!(false, "or(fail, p) disagrees with p"),
        }
    }

    /// `many` succeeds on every input, possibly matching nothing.
    #[test]
    fn many_is_total(c in proptest::char::range('a', 'c'), input in "[a-e]{0,8}") {
        prop_assert!(many(char(c), fold::concat).parse("<p>", &input).is_ok());
    }

    /// A failed attempt leaves the input exactly where it was: after the
    /// lookahead fails, `any` still sees the first character.
    #[test]
    fn no_consume_on_fail(c in proptest::char::range('a', 'c'), input in "[d-f]{1,6}") {
        let p = also(not(char(c)), any(), fold::snd);
        let v = p.parse("<p>", &input).unwrap();
        prop_assert_eq!(v.as_str().unwrap(), &input[..1]);
    }

    /// A compiled pattern accepts exactly what its combinator spelling does.
    #[test]
    fn regex_agrees_with_combinators(input in "[0-9a-z]{0,8}") {
        let by_pattern = thresh::regex::re("[0-9]+").unwrap().parse("<p>", &input);
        let by_hand = many1(range('0', '9'), fold::concat).parse("<p>", &input);
        prop_assert_eq!(by_pattern.is_ok(), by_hand.is_ok());
        if let (Ok(a), Ok(b)) = (by_pattern, by_hand) {
            prop_assert_eq!(a, b);
        }
    }

    /// Of two failing branches, the one that got further in wins.
    #[test]
    fn rightmost_failure_wins(input in "ab[a-c]{0,4}") {
        let deep = also(string("ab"), char('z'), fold::concat);
        let err = or([deep, char('z')]).parse("<p>", &input).unwrap_err();
        prop_assert_eq!(err.offset(), 2);
        prop_assert_eq!(err.expected(), ["z"]);
    }
}

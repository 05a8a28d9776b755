//! The regex front-end against hand-written combinator equivalents.

use thresh::combinator::{also, end, fold, many1, maybe};
use thresh::regex::re;
use thresh::token::{char, range};

#[test]
fn decimal_number() {
    let p = re(r"[0-9]+\.[0-9]+").unwrap();

    let v = p.parse("<test>", "3.14").unwrap();
    assert_eq!(v.as_str(), Some("3.14"));

    let err = p.parse("<test>", "3.").unwrap_err();
    assert_eq!((err.line(), err.column()), (1, 3));
    assert_eq!(err.expected(), ["digit"]);
    assert_eq!(err.unexpected(), None);
}

#[test]
fn pattern_accepts_the_same_language_as_the_combinators() {
    let pattern = end(re(r"a[0-9]*b?").unwrap());
    let digits = many1(range('0', '9'), fold::concat);
    let by_hand = end(also(
        also(char('a'), maybe(digits), fold::concat),
        maybe(char('b')),
        fold::concat,
    ));

    for input in ["ab", "a", "a123b", "a9", "b", "a12c", "", "aab"] {
        let left = pattern.parse("<test>", input);
        let right = by_hand.parse("<test>", input);
        assert_eq!(
            left.is_ok(),
            right.is_ok(),
            "pattern and combinators disagree on {input:?}"
        );
        if let (Ok(l), Ok(r)) = (&left, &right) {
            // `maybe` yields no text where the regex yields ""; compare
            // through the lens of the matched input.
            assert_eq!(l.as_str().unwrap_or(""), r.as_str().unwrap_or(""));
        }
    }
}

#[test]
fn errors_point_into_the_pattern() {
    // the class never closes; the failure is at the end of the pattern
    let err = re("ab[cd").unwrap_err();
    assert_eq!(err.filename(), "<regex>");
    assert_eq!((err.line(), err.column()), (1, 6));
    assert_eq!(err.expected(), ["]"]);
    assert_eq!(err.unexpected(), None);
}

use thresh::ascii::ident;

#[test]
fn matches_a_full_identifier() {
    let v = ident().parse("<test>", "foo_bar123").unwrap();
    assert_eq!(v.as_str(), Some("foo_bar123"));

    let v = ident().parse("<test>", "_private rest").unwrap();
    assert_eq!(v.as_str(), Some("_private"));
}

#[test]
fn reports_both_ways_an_identifier_can_start() {
    let err = ident().parse("<test>", "3bad").unwrap_err();

    assert_eq!((err.line(), err.column()), (1, 1));
    assert_eq!(err.unexpected(), Some('3'));
    assert_eq!(err.expected(), ["alpha", "underscore"]);
}

#[test]
fn stops_before_nonword_characters() {
    let v = ident().parse("<test>", "abc-def").unwrap();
    assert_eq!(v.as_str(), Some("abc"));
}

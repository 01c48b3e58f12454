mod domain;

use domain::{act, builder, engine, Num};
use slotrules::{ParseErrorKind, PredicateError};

fn load_error(rules: &str) -> (usize, String) {
    let engine = builder().build().unwrap();
    let err = engine.load_rules_raw(rules).unwrap_err();
    assert_eq!(engine.count(), 0, "failed load must not install rules");
    (err.line(), err.to_string())
}

#[test]
fn malformed_rule_keeps_count_at_zero() {
    let engine = builder().build().unwrap();
    assert!(engine.load_rules_raw("1 a ->").is_err());
    assert_eq!(engine.count(), 0);
}

#[test]
fn load_returns_rule_count() {
    let engine = builder().build().unwrap();
    let text = "\
# divisibility
5 /2 -> 1
0 /3 -> 2

even [ /2 ]
1 %even -> @even
";
    assert_eq!(engine.load_rules_raw(text).unwrap(), 3);
    assert_eq!(engine.count(), 3);
}

#[test]
fn error_messages_carry_line_numbers() {
    assert_eq!(
        load_error("1 /2 -> 1\n2 /3 /5"),
        (2, "error on line 2: no arrow (\"->\") in rule line".into())
    );
    assert_eq!(
        load_error("1 /2 ->"),
        (1, "error on line 1: no effects for rule".into())
    );
    assert_eq!(
        load_error("\n\n1 /2 -> twelve"),
        (3, "error on line 3: invalid effect: \"twelve\"".into())
    );
}

#[test]
fn predicate_errors() {
    assert_eq!(
        load_error("1 (depth>3) -> 1"),
        (1, "error on line 1: unknown variable: \"depth\"".into())
    );
    assert_eq!(
        load_error("1 (it>three) -> 1"),
        (1, "error on line 1: invalid number: \"three\"".into())
    );
    assert_eq!(
        load_error("1 (it) -> 1"),
        (1, "error on line 1: no comparison operator found in \"it\"".into())
    );
    assert_eq!(
        load_error("1 odd -> 1"),
        (1, "error on line 1: unprefixed predicates unsupported: \"odd\"".into())
    );
    assert_eq!(
        load_error("1 /two -> 1"),
        (1, "error on line 1: invalid digit found in string".into())
    );
}

#[test]
fn tag_errors() {
    assert_eq!(
        load_error("big-ones [ /2 ]"),
        (
            1,
            "error on line 1: illegal tag name: big-ones (tag name must be purely alphanumeric)"
                .into()
        )
    );
    assert_eq!(
        load_error("a [ /2 ]"),
        (
            1,
            "error on line 1: illegal tag name: a (tag name must be purely alphanumeric)".into()
        )
    );
    assert_eq!(
        load_error("even /2"),
        (1, "error on line 1: expected [ after tag name".into())
    );
    assert_eq!(
        load_error("even [ /2 ]\n\neven [ /4 ]"),
        (3, "error on line 3: duplicate tag \"even\"".into())
    );
    assert_eq!(
        load_error("even [ /2\n/4"),
        (2, "error on line 2: unexpected EOF, unclosed block for tag \"even\"".into())
    );
    assert_eq!(
        load_error("even [ /2 ] 1"),
        (1, "error on line 1: \"]\" must appear at the end of a line".into())
    );
    assert_eq!(
        load_error("1 %odd -> 1\n2 %odd -> 2"),
        (1, "error on line 1: tag referenced but never defined: \"odd\"".into())
    );
}

#[test]
fn error_kinds_are_matchable() {
    let engine = builder().build().unwrap();
    let err = engine.load_rules_raw("1 !% -> 1").unwrap_err();
    assert_eq!(
        err.kind(),
        &ParseErrorKind::Predicate(PredicateError::EmptyTagName)
    );
}

#[test]
fn failed_reload_keeps_previous_rules() {
    let engine = engine("5 /2 -> 1\n0 /3 -> 2");
    assert!(engine.load_rules_raw("5 /2 -> 1\nbroken").is_err());
    assert_eq!(engine.count(), 2);
    assert_eq!(act(&engine, 6), Num::new(7));
}

#[test]
fn whitespace_and_comments() {
    let engine = engine("   # indented comment\n\t5\t/2   ->\t1  \n#0 -> 100");
    assert_eq!(engine.count(), 1);
    assert_eq!(act(&engine, 4).value, 5);
    assert_eq!(act(&engine, 3).value, 3);
}

#[test]
fn multiline_tag_blocks() {
    let engine = engine(
        "\
round [
    /10
    # or a quarter
    /25
]
1 %round -> @round",
    );
    assert_eq!(act(&engine, 30).label.as_deref(), Some("round"));
    assert_eq!(act(&engine, 75).label.as_deref(), Some("round"));
    assert_eq!(act(&engine, 12).label, None);
}

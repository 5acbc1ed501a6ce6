//! End-to-end tests for the `mbx` driver through its library entry point.

use pretty_assertions::assert_eq;

use mbx::{run, CliError, Outcome, SyntaxErrorKind};

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

fn run_ok(list: &[&str]) -> (Outcome, String) {
    let mut out = Vec::new();
    let outcome = run(&args(list), &mut out).expect("command should succeed");
    let text = String::from_utf8(out).expect("output should be utf-8");
    (outcome, text)
}

fn run_err(list: &[&str]) -> CliError {
    let mut out = Vec::new();
    match run(&args(list), &mut out) {
        Ok(outcome) => panic!("expected an error, got {outcome:?}"),
        Err(e) => e,
    }
}

#[test]
fn match_prints_mapping_and_bindings() {
    let (outcome, text) = run_ok(&["match", ":get, int, ..", r#":get, 1, "x""#]);
    assert_eq!(outcome, Outcome::Matched);
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(
        text,
        "match [0, 1]\n  $0 = :get : atom @0\n  $1 = 1 : int @1\n"
    );
}

#[test]
fn interior_stretch_binds_later_positions() {
    let (outcome, text) = run_ok(&["match", "(.., str, _)", r#"1, "a", 'c'"#]);
    assert_eq!(outcome, Outcome::Matched);
    assert_eq!(
        text,
        "match [1, 2]\n  $0 = \"a\" : str @1\n  $1 = 'c' : char @2\n"
    );
}

#[test]
fn no_match_exits_one() {
    let (outcome, text) = run_ok(&["match", "3, _", r#"4, "x""#]);
    assert_eq!(outcome, Outcome::NoMatch);
    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(text, "no match\n");
}

#[test]
fn quiet_prints_nothing() {
    let (outcome, text) = run_ok(&["match", "--quiet", "_, _", "1"]);
    assert_eq!(outcome, Outcome::NoMatch);
    assert_eq!(text, "");

    let (outcome, text) = run_ok(&["-q", "match", "..", "1, 2"]);
    assert_eq!(outcome, Outcome::Matched);
    assert_eq!(text, "");
}

#[test]
fn negative_numbers_are_not_flags() {
    let (outcome, _) = run_ok(&["match", "-1", "-1"]);
    assert_eq!(outcome, Outcome::Matched);
}

#[test]
fn show_describes_pattern() {
    let (outcome, text) = run_ok(&["show", ":get,int,_,.."]);
    assert_eq!(outcome, Outcome::Done);
    assert_eq!(
        text,
        "(:get, int, _, ..)\n  slots: 4\n  arity: 3\n  stretch: true\n"
    );
}

#[test]
fn help_prints_usage() {
    let (outcome, text) = run_ok(&["help"]);
    assert_eq!(outcome, Outcome::Done);
    assert!(text.starts_with("Usage: mbx"));
}

#[test]
fn syntax_errors_exit_two() {
    let e = run_err(&["match", "int, ?", "1"]);
    assert_eq!(e.exit_code(), 2);
    match &e {
        CliError::Syntax { what, source } => {
            assert_eq!(*what, "pattern");
            assert_eq!(source.offset, 5);
        }
        other => panic!("expected a syntax error, got {other:?}"),
    }

    let e = run_err(&["match", "int", "_"]);
    match &e {
        CliError::Syntax { what, source } => {
            assert_eq!(*what, "tuple");
            assert_eq!(source.kind, SyntaxErrorKind::NotAValue("_".to_string()));
        }
        other => panic!("expected a syntax error, got {other:?}"),
    }
    assert_eq!(
        e.to_string(),
        "invalid tuple: `_` is a pattern slot, not a value at offset 0"
    );
}

#[test]
fn usage_errors() {
    for list in [
        &[][..],
        &["match", "int"][..],
        &["show"][..],
        &["frobnicate"][..],
        &["match", "--verbose", "int", "1"][..],
    ] {
        let e = run_err(list);
        assert!(matches!(e, CliError::Usage(_)), "{list:?} gave {e:?}");
        assert_eq!(e.exit_code(), 2);
    }
}

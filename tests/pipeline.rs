//! Integration tests for the lex, parse and evaluate pipeline

use blanket::session::DEFAULT_MAX_OPERATORS;
use blanket::{run, Session};

fn eval(session: &mut Session, source: &str) -> Option<f64> {
    run(session, source)
        .unwrap_or_else(|e| panic!("evaluating {:?} failed:\n{}", source, e))
        .map(|v| v.number)
}

fn eval_fresh(source: &str) -> f64 {
    eval(&mut Session::new(), source).expect("expression produced no value")
}

#[test]
fn test_precedence_and_grouping() {
    assert_eq!(eval_fresh("1+2*3"), 7.0);
    assert_eq!(eval_fresh("(1+2)*3"), 9.0);
    assert_eq!(eval_fresh("-2 * 3 + 10 / 4"), -3.5);
}

#[test]
fn test_exponentiation_folds_left() {
    // (2^3)^2, not 2^(3^2)
    assert_eq!(eval_fresh("2^3^2"), 64.0);
}

#[test]
fn test_bindings_survive_across_calls() {
    let mut session = Session::new();
    assert_eq!(eval(&mut session, "sclr x = 5"), Some(5.0));
    assert_eq!(eval(&mut session, "x+1"), Some(6.0));
}

#[test]
fn test_last_assignment_wins() {
    let mut session = Session::new();
    eval(&mut session, "sclr x = 1");
    eval(&mut session, "sclr x = 2");
    assert_eq!(eval(&mut session, "x"), Some(2.0));
}

#[test]
fn test_conditional_forms() {
    assert_eq!(eval_fresh("if 1==1 then 10 else 20"), 10.0);
    assert_eq!(eval_fresh("if 0 then 10 else 20"), 20.0);
    assert_eq!(eval_fresh("if 0 then 10 elif 1==1 then 30 else 20"), 30.0);
    assert_eq!(eval_fresh("if 0 then 10 then 1==1 then 30 else 20"), 30.0);
}

#[test]
fn test_conditional_without_else_can_be_absent() {
    let mut session = Session::new();
    assert_eq!(eval(&mut session, "if 0 then 10"), None);
    assert_eq!(eval(&mut session, "if 1 then 10"), Some(10.0));
}

#[test]
fn test_builtin_constants_usable() {
    let mut session = Session::new();
    assert_eq!(eval(&mut session, "true and not false"), Some(1.0));
    assert_eq!(eval(&mut session, "null or 4"), Some(4.0));
}

#[test]
fn test_or_returns_operand_value() {
    assert_eq!(eval_fresh("2.5 or 0"), 2.5);
    assert_eq!(eval_fresh("0 or -3"), -3.0);
    assert_eq!(eval_fresh("2.5 and 4"), 1.0);
}

#[test]
fn test_multiline_source() {
    assert_eq!(eval_fresh("1 +\n  2 *\n  3"), 7.0);
}

#[test]
fn test_evaluation_is_deterministic() {
    let sources = [
        "1 + 2 * 3 - 4 / 5",
        "2 ^ 0.5",
        "if 3 > 2 and not 0 then 7 / 3 else 1",
        "(1.5 + 2.25) * -4 == -15",
        "0.1 + 0.2",
    ];
    for source in sources {
        let first = eval_fresh(source);
        let second = eval_fresh(source);
        assert_eq!(first.to_bits(), second.to_bits(), "{} was not deterministic", source);
    }
}

#[test]
fn test_value_display() {
    let mut session = Session::new();
    let show = |session: &mut Session, source: &str| {
        run(session, source).unwrap().map(|v| v.to_string())
    };
    assert_eq!(show(&mut session, "3 * 2").as_deref(), Some("6"));
    assert_eq!(show(&mut session, "5 / 2").as_deref(), Some("2.5"));
    assert_eq!(show(&mut session, "-0").as_deref(), Some("0"));
    assert_eq!(show(&mut session, "if 0 then 1"), None);
}

#[test]
fn test_sessions_are_isolated() {
    let mut a = Session::new();
    let mut b = Session::new();
    eval(&mut a, "sclr shared = 1");
    assert!(run(&mut b, "shared").is_err());
}

/// `first op operand op operand ...` with as many operators as one input allows
fn longest_chain(first: &str, op: &str, operand: &str) -> String {
    let mut source = first.to_string();
    for _ in 0..DEFAULT_MAX_OPERATORS {
        source.push_str(op);
        source.push_str(operand);
    }
    source
}

#[test]
fn test_long_operator_chains() {
    assert_eq!(eval_fresh(&longest_chain("1", " + ", "1")), 1001.0);
    assert_eq!(eval_fresh(&longest_chain("1000", " - ", "1")), 0.0);
    assert_eq!(eval_fresh(&longest_chain("3", " * ", "1")), 3.0);
    assert_eq!(eval_fresh(&longest_chain("2", " ^ ", "1")), 2.0);
    assert_eq!(eval_fresh(&longest_chain("5", " and ", "1")), 1.0);
    assert_eq!(eval_fresh(&longest_chain("0", " or ", "0")), 0.0);
}

#[test]
fn test_long_chain_of_variables() {
    let mut session = Session::new();
    eval(&mut session, "sclr x = 2");
    let source = longest_chain("x", " * ", "1");
    assert_eq!(eval(&mut session, &source), Some(2.0));
}

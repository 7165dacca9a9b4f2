mod common;

use common::*;
use proctor::errors::ErrorKind;
use proctor::sandbox::{budget, capture, BudgetGuard, Sandbox};
use proctor::Value;

#[test]
fn normal_return_has_value_and_no_error() {
    let outcome = Sandbox::default().execute(square, &Value::Int(4), false).unwrap();
    assert_eq!(outcome.return_value, Some(Value::Int(16)));
    assert!(outcome.error.is_none());
    assert_eq!(outcome.stdout, "");
    assert_eq!(outcome.stderr, "");
}

#[test]
fn raised_error_is_recorded_by_kind() {
    let outcome = Sandbox::default()
        .execute(divide_by_zero, &Value::Nil, false)
        .unwrap();
    assert!(outcome.return_value.is_none());
    assert_eq!(outcome.error_kind(), Some(&ErrorKind::new("ZeroDivision")));
}

#[test]
fn crash_mode_propagates_the_error() {
    let err = Sandbox::default()
        .execute(divide_by_zero, &Value::Nil, true)
        .unwrap_err();
    assert_eq!(err.kind.as_str(), "ZeroDivision");
    assert!(!capture::is_capturing());
    assert!(budget::remaining().is_none());
}

#[test]
fn endless_loop_is_stopped_by_the_step_budget() {
    let outcome = Sandbox::new(10_000).execute(forever, &Value::Nil, false).unwrap();
    assert!(outcome.return_value.is_none());
    assert_eq!(outcome.error_kind(), Some(&ErrorKind::budget_exceeded()));
    assert!(budget::remaining().is_none());
}

#[test]
fn panics_are_recorded_without_escaping() {
    let outcome = Sandbox::default().execute(panicking, &Value::Nil, false).unwrap();
    let error = outcome.error.unwrap();
    assert_eq!(error.kind, ErrorKind::panic());
    assert_eq!(error.message, "candidate blew up");
    assert!(!capture::is_capturing());
    assert!(budget::remaining().is_none());
}

#[test]
fn panic_in_crash_mode_is_returned_and_releases_state() {
    let err = Sandbox::default().execute(panicking, &Value::Nil, true).unwrap_err();
    assert_eq!(err.kind, ErrorKind::panic());
    assert!(!capture::is_capturing());
    assert!(budget::remaining().is_none());

    let case = proctor::TestCase::new("boom", panicking, proctor::comparators::COMPARE_EQUAL);
    let err = proctor::evaluate_case(&case, &Sandbox::default(), true).unwrap_err();
    match err {
        proctor::ProctorError::Candidate { case, source, .. } => {
            assert_eq!(case, "boom");
            assert_eq!(source.kind, ErrorKind::panic());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn panic_inside_an_active_budget_charges_and_restores_it() {
    let outer = BudgetGuard::install(1_000);
    let outer_capture = capture::CaptureGuard::begin();
    let outcome = Sandbox::new(100)
        .execute(tick_then_panic, &Value::Nil, false)
        .unwrap();
    assert_eq!(outcome.error_kind(), Some(&ErrorKind::panic()));
    assert_eq!(outcome.stdout, "half done");
    assert_eq!(outer.remaining(), 995);
    assert_eq!(outer_capture.finish().stdout, "");
    drop(outer);
    assert!(budget::remaining().is_none());
}

#[test]
fn output_is_captured_per_stream() {
    let outcome = Sandbox::default().execute(chatty, &Value::Int(3), false).unwrap();
    assert_eq!(outcome.stdout, "got 3\n");
    assert_eq!(outcome.stderr, "careful\n");
}

#[test]
fn output_written_before_a_failure_is_kept() {
    fn print_then_fail(
        _input: &Value,
        ctx: &mut proctor::ExecContext,
    ) -> Result<Value, proctor::CandidateError> {
        proctor::sandbox_print!("partial");
        ctx.eprint("oops");
        Err(proctor::CandidateError::new("ValueError", "late failure"))
    }
    let outcome = Sandbox::default()
        .execute(print_then_fail, &Value::Nil, false)
        .unwrap();
    assert_eq!(outcome.stdout, "partial");
    assert_eq!(outcome.stderr, "oops");
    assert_eq!(outcome.error_kind().map(|k| k.as_str()), Some("ValueError"));
}

#[test]
fn nested_budget_charges_the_outer_allowance() {
    let outer = BudgetGuard::install(100);
    {
        let _inner = BudgetGuard::install(10);
        for _ in 0..4 {
            budget::tick().unwrap();
        }
    }
    assert_eq!(outer.remaining(), 96);
    drop(outer);
    assert!(budget::remaining().is_none());
}

#[test]
fn sandbox_inside_an_active_budget_restores_it() {
    let outer = BudgetGuard::install(1_000);
    let outcome = Sandbox::new(10).execute(forever, &Value::Nil, false).unwrap();
    assert!(outcome.error_kind().unwrap().is_budget_exceeded());
    assert_eq!(outer.remaining(), 990);
}

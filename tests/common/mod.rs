//! Shared candidates and helpers for the integration tests.
#![allow(dead_code)]

use proctor::comparators::COMPARE_EQUAL;
use proctor::{CandidateError, ComparisonError, ExecContext, Registry, TestCase, Value};

pub fn square(input: &Value, _ctx: &mut ExecContext) -> Result<Value, CandidateError> {
    let n = input
        .as_int()
        .ok_or_else(|| CandidateError::new("TypeError", "expected an integer"))?;
    Ok(Value::Int(n * n))
}

pub fn off_by_one(input: &Value, ctx: &mut ExecContext) -> Result<Value, CandidateError> {
    let squared = square(input, ctx)?;
    Ok(Value::Int(squared.as_int().unwrap_or(0) - 1))
}

pub fn divide_by_zero(_input: &Value, _ctx: &mut ExecContext) -> Result<Value, CandidateError> {
    Err(CandidateError::new("ZeroDivision", "division by zero"))
}

pub fn forever(_input: &Value, ctx: &mut ExecContext) -> Result<Value, CandidateError> {
    loop {
        ctx.tick()?;
    }
}

pub fn chatty(input: &Value, ctx: &mut ExecContext) -> Result<Value, CandidateError> {
    ctx.println(&format!("got {}", input));
    ctx.eprintln("careful");
    Ok(input.clone())
}

pub fn panicking(_input: &Value, _ctx: &mut ExecContext) -> Result<Value, CandidateError> {
    panic!("candidate blew up")
}

/// Spends five steps and prints before panicking.
pub fn tick_then_panic(_input: &Value, ctx: &mut ExecContext) -> Result<Value, CandidateError> {
    for _ in 0..5 {
        ctx.tick()?;
    }
    ctx.print("half done");
    panic!("gave up after five steps")
}

pub fn raising_comparator(
    _actual: Option<&Value>,
    _expected: &Value,
    _crash: bool,
) -> Result<bool, ComparisonError> {
    Err(ComparisonError::new("shapes differ").with_note("expected a list"))
}

/// The square-4 case: input 4, expected 16, no output, no error.
pub fn square_case(target: proctor::CandidateFn) -> TestCase {
    TestCase::new("square-4", target, COMPARE_EQUAL)
        .with_input(4)
        .with_output(16)
}

/// Built-in comparators plus every candidate above under `test.*`.
pub fn test_registry() -> Registry {
    let mut registry = Registry::with_builtins();
    registry
        .register_candidate("test.square", square)
        .register_candidate("test.off_by_one", off_by_one)
        .register_candidate("test.divide_by_zero", divide_by_zero)
        .register_candidate("test.forever", forever)
        .register_candidate("test.chatty", chatty)
        .register_candidate("test.panicking", panicking)
        .register_candidate("test.tick_then_panic", tick_then_panic)
        .register_comparator("test.raising", raising_comparator);
    registry
}

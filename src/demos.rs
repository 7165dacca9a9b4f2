//! # Demonstration Candidates
//!
//! A handful of small candidates registered by the `proctor` binary so suite
//! files can be exercised without an embedding application. Each one shows a
//! different observable effect the sandbox captures.
//!
//! ## Candidates Provided
//!
//! - **`demo.square`**: returns its numeric input squared
//! - **`demo.echo`**: prints its input to stdout and returns it
//! - **`demo.shout`**: prints its input upper-cased to stderr
//! - **`demo.divide`**: divides the first element of a pair by the second
//! - **`demo.spin`**: never returns on its own

use crate::errors::CandidateError;
use crate::registry::{CandidateFn, Registry};
use crate::value::Value;

fn type_error(name: &str, expected: &str, found: &Value) -> CandidateError {
    CandidateError::new(
        "TypeError",
        format!("{} expects {}, got {}", name, expected, found.type_name()),
    )
}

/// Squares a number.
///
/// Usage: input `4` => `16`, input `1.5` => `2.25`
///
/// Integer overflow raises `Overflow`.
pub const DEMO_SQUARE: CandidateFn = |input, _ctx| match input {
    Value::Int(n) => n
        .checked_mul(*n)
        .map(Value::Int)
        .ok_or_else(|| CandidateError::new("Overflow", format!("{} squared overflows", n))),
    Value::Float(x) => Ok(Value::Float(x * x)),
    other => Err(type_error("demo.square", "a number", other)),
};

/// Prints the input on its own line and returns it unchanged. Strings are
/// printed without quotes.
pub const DEMO_ECHO: CandidateFn = |input, ctx| {
    match input.as_str() {
        Some(text) => ctx.println(text),
        None => ctx.println(&input.to_string()),
    }
    Ok(input.clone())
};

/// Writes the upper-cased input string to stderr and returns its length.
pub const DEMO_SHOUT: CandidateFn = |input, ctx| {
    let text = input
        .as_str()
        .ok_or_else(|| type_error("demo.shout", "a string", input))?;
    ctx.eprintln(&text.to_uppercase());
    Ok(Value::Int(text.chars().count() as i64))
};

/// Divides `a` by `b` for an input pair `[a, b]`. Two integers divide
/// with truncation; anything else divides as floats.
///
/// A zero divisor raises `ZeroDivision`.
pub const DEMO_DIVIDE: CandidateFn = |input, _ctx| {
    let pair = input
        .as_list()
        .filter(|items| items.len() == 2)
        .ok_or_else(|| type_error("demo.divide", "a pair", input))?;
    match (&pair[0], &pair[1]) {
        (_, Value::Int(0)) => Err(CandidateError::new("ZeroDivision", "division by zero")),
        (Value::Int(a), Value::Int(b)) => a
            .checked_div(*b)
            .map(Value::Int)
            .ok_or_else(|| CandidateError::new("Overflow", format!("{} / {} overflows", a, b))),
        (a, b) => {
            let (Some(a), Some(b)) = (a.as_float(), b.as_float()) else {
                return Err(type_error("demo.divide", "numbers", input));
            };
            if b == 0.0 {
                return Err(CandidateError::new("ZeroDivision", "division by zero"));
            }
            Ok(Value::Float(a / b))
        }
    }
};

/// Loops forever, ticking the step budget on every iteration.
pub const DEMO_SPIN: CandidateFn = |_input, ctx| loop {
    ctx.tick()?;
};

/// Registers every demonstration candidate.
pub fn register_demo_candidates(registry: &mut Registry) {
    registry
        .register_candidate("demo.square", DEMO_SQUARE)
        .register_candidate("demo.echo", DEMO_ECHO)
        .register_candidate("demo.shout", DEMO_SHOUT)
        .register_candidate("demo.divide", DEMO_DIVIDE)
        .register_candidate("demo.spin", DEMO_SPIN);
}

/// Built-in comparators plus the demonstration candidates.
pub fn demo_registry() -> Registry {
    let mut registry = Registry::with_builtins();
    register_demo_candidates(&mut registry);
    registry
}

//! # Verdict Engine
//!
//! Decides pass/fail for one test case from its execution outcome. Checks run
//! in a fixed order and stop at the first divergence:
//!
//! 1. the case's comparator on the return value,
//! 2. captured stdout against the expected text,
//! 3. captured stderr against the expected text.
//!
//! The error-kind check always runs and is AND-ed into the final verdict, so
//! a candidate that crashed is never mistaken for one that merely returned a
//! wrong value.

use log::debug;

use crate::errors::{kinds_match, ComparisonError, ProctorError};
use crate::sandbox::{contain_panic, ExecutionOutcome, Sandbox};
use crate::suite::TestCase;

/// Which check first disagreed with the expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// The comparator raised; its message and notes are the verdict notes.
    Comparator,
    /// The comparator reported a mismatch.
    ReturnValue,
    Stdout,
    Stderr,
    /// Everything else matched but the error kinds differ.
    ErrorKind,
}

/// Pass/fail decision plus ordered diagnostics for one test case.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Verdict {
    pub passed: bool,
    pub notes: Vec<String>,
    pub divergence: Option<Check>,
}

impl Verdict {
    pub fn pass() -> Self {
        Self {
            passed: true,
            notes: Vec::new(),
            divergence: None,
        }
    }
}

/// Compares an outcome against the case's expectations.
///
/// Comparator errors (including panics) become a failed verdict unless
/// `crash` is set, in which case they are returned as
/// [`ProctorError::Comparator`].
pub fn evaluate(
    case: &TestCase,
    outcome: &ExecutionOutcome,
    crash: bool,
) -> Result<Verdict, ProctorError> {
    let comparison = contain_panic(|| {
        (case.comparator)(outcome.return_value.as_ref(), &case.expected_output, crash)
    })
    .unwrap_or_else(|message| Err(ComparisonError::new(format!("comparator panicked: {}", message))));

    let mut verdict = match comparison {
        Ok(true) => Verdict::pass(),
        Ok(false) => Verdict {
            passed: false,
            notes: Vec::new(),
            divergence: Some(Check::ReturnValue),
        },
        Err(source) if crash => {
            return Err(ProctorError::Comparator {
                comparator: case.compare.clone(),
                case: case.id.clone(),
                source,
            })
        }
        Err(source) => Verdict {
            passed: false,
            notes: source.into_notes(),
            divergence: Some(Check::Comparator),
        },
    };

    if verdict.passed {
        if let Some(notes) = compare_text("stdout", &outcome.stdout, &case.expected_stdout) {
            verdict = Verdict {
                passed: false,
                notes,
                divergence: Some(Check::Stdout),
            };
        }
    }
    if verdict.passed {
        if let Some(notes) = compare_text("stderr", &outcome.stderr, &case.expected_stderr) {
            verdict = Verdict {
                passed: false,
                notes,
                divergence: Some(Check::Stderr),
            };
        }
    }

    if !kinds_match(outcome.error_kind(), case.expected_error.as_ref()) {
        debug!(
            "verdict: `{}` error kind {:?}, expected {:?}",
            case.id,
            outcome.error_kind().map(|k| k.as_str()),
            case.expected_error.as_ref().map(|k| k.as_str())
        );
        verdict.passed = false;
        verdict.divergence.get_or_insert(Check::ErrorKind);
    }
    Ok(verdict)
}

/// Runs the case in the sandbox, then judges the outcome.
pub fn evaluate_case(
    case: &TestCase,
    sandbox: &Sandbox,
    crash: bool,
) -> Result<(Verdict, ExecutionOutcome), ProctorError> {
    let outcome = sandbox
        .execute(case.target, &case.input, crash)
        .map_err(|source| ProctorError::Candidate {
            function: case.function.clone(),
            case: case.id.clone(),
            source,
        })?;
    let verdict = evaluate(case, &outcome, crash)?;
    Ok((verdict, outcome))
}

/// Exact text comparison; on mismatch returns the labeled expected and
/// actual blocks.
fn compare_text(label: &str, actual: &str, expected: &str) -> Option<Vec<String>> {
    if actual == expected {
        return None;
    }
    Some(vec![
        format!("Expected {}:\n{}", label, expected),
        format!("Actual {}:\n{}", label, actual),
    ])
}

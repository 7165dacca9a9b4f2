//! # Capture Sandbox
//!
//! Runs exactly one candidate invocation and turns whatever happens into an
//! [`ExecutionOutcome`]:
//!
//! - both standard streams are captured for the duration of the call,
//! - a fresh step budget is installed immediately before the call,
//! - returned errors and panics are recorded under their [`ErrorKind`].
//!
//! Every piece of process or thread state touched here is held by a guard,
//! so it is released on normal return, on a recorded error, and while a
//! panic unwinds.
//!
//! In crash mode a raised condition is handed back to the caller instead of
//! being recorded.

use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use log::debug;
use once_cell::sync::Lazy;

use crate::errors::{CandidateError, ErrorKind};
use crate::registry::CandidateFn;
use crate::value::Value;

pub mod budget;
pub mod capture;

pub use budget::{tick, BudgetGuard, DEFAULT_STEP_BUDGET};
pub use capture::{CaptureGuard, CapturedOutput, Stream, StreamWriter};

// ============================================================================
// CORE TYPES
// ============================================================================

/// The captured result of one sandboxed invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionOutcome {
    /// Absent whenever the invocation raised.
    pub return_value: Option<Value>,
    pub stdout: String,
    pub stderr: String,
    pub error: Option<CandidateError>,
}

impl ExecutionOutcome {
    pub fn error_kind(&self) -> Option<&ErrorKind> {
        self.error.as_ref().map(|e| &e.kind)
    }

    pub fn returned(value: Value) -> Self {
        Self {
            return_value: Some(value),
            ..Self::default()
        }
    }

    pub fn raised(error: CandidateError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    pub fn with_output(mut self, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self.stderr = stderr.into();
        self
    }
}

/// Handle given to candidates: step accounting and the captured streams.
///
/// Only output written through this handle (or the `sandbox_print!` macros)
/// is captured; `println!` and `eprintln!` go straight to the real streams.
pub struct ExecContext {
    _private: (),
}

impl ExecContext {
    fn new() -> Self {
        Self { _private: () }
    }

    /// Consumes one step; fails once the budget is spent.
    pub fn tick(&mut self) -> Result<(), CandidateError> {
        budget::tick()
    }

    pub fn remaining_steps(&self) -> Option<u64> {
        budget::remaining()
    }

    /// Calls another candidate inside the same budget and capture.
    pub fn call(&mut self, callable: CandidateFn, input: &Value) -> Result<Value, CandidateError> {
        self.tick()?;
        callable(input, self)
    }

    pub fn print(&mut self, text: &str) {
        capture::write_str(Stream::Stdout, text);
    }

    pub fn println(&mut self, text: &str) {
        capture::write_str(Stream::Stdout, text);
        capture::write_str(Stream::Stdout, "\n");
    }

    pub fn eprint(&mut self, text: &str) {
        capture::write_str(Stream::Stderr, text);
    }

    pub fn eprintln(&mut self, text: &str) {
        capture::write_str(Stream::Stderr, text);
        capture::write_str(Stream::Stderr, "\n");
    }

    pub fn stdout(&mut self) -> StreamWriter {
        StreamWriter::new(Stream::Stdout)
    }

    pub fn stderr(&mut self) -> StreamWriter {
        StreamWriter::new(Stream::Stderr)
    }
}

impl fmt::Debug for ExecContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecContext")
            .field("remaining_steps", &self.remaining_steps())
            .finish()
    }
}

// ============================================================================
// PANIC CONTAINMENT
// ============================================================================

thread_local! {
    static QUIET_PANICS: Cell<usize> = const { Cell::new(0) };
}

// Installed once per process; defers to the previous hook outside sandboxes.
static PANIC_FILTER: Lazy<()> = Lazy::new(|| {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if QUIET_PANICS.with(Cell::get) == 0 {
            previous(info);
        }
    }));
});

struct QuietPanics;

impl QuietPanics {
    fn enter() -> Self {
        Lazy::force(&PANIC_FILTER);
        QUIET_PANICS.with(|depth| depth.set(depth.get() + 1));
        QuietPanics
    }
}

impl Drop for QuietPanics {
    fn drop(&mut self) {
        QUIET_PANICS.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with a non-string payload".to_string()
    }
}

/// Runs `f`, turning a panic into its message without printing it.
pub(crate) fn contain_panic<R>(f: impl FnOnce() -> R) -> Result<R, String> {
    let _quiet = QuietPanics::enter();
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panic_message(&*payload))
}

// ============================================================================
// SANDBOX
// ============================================================================

/// Executes candidates under a step budget with both streams captured.
#[derive(Debug, Clone, Copy)]
pub struct Sandbox {
    step_budget: u64,
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_BUDGET)
    }
}

impl Sandbox {
    pub fn new(step_budget: u64) -> Self {
        Self { step_budget }
    }

    pub fn step_budget(&self) -> u64 {
        self.step_budget
    }

    /// Invokes `callable(input)` and records its observable effects.
    ///
    /// Never fails unless `crash` is set, in which case the raised condition
    /// is returned instead of being recorded.
    pub fn execute(
        &self,
        callable: CandidateFn,
        input: &Value,
        crash: bool,
    ) -> Result<ExecutionOutcome, CandidateError> {
        let capture = CaptureGuard::begin();
        let (result, exhausted) = {
            let budget = BudgetGuard::install(self.step_budget);
            let mut ctx = ExecContext::new();
            let result = contain_panic(|| callable(input, &mut ctx));
            (result, budget.exhausted())
        };
        let output = capture.finish();

        let mut result = result.unwrap_or_else(|message| Err(CandidateError::panic(message)));
        if exhausted {
            // Swallowing the budget failure does not rescue the invocation.
            result = Err(CandidateError::budget_exceeded());
        }

        match result {
            Ok(value) => Ok(ExecutionOutcome::returned(value).with_output(output.stdout, output.stderr)),
            Err(error) if crash => {
                debug!("sandbox: propagating {} in crash mode", error.kind);
                Err(error)
            }
            Err(error) => {
                debug!("sandbox: candidate raised {}", error);
                Ok(ExecutionOutcome::raised(error).with_output(output.stdout, output.stderr))
            }
        }
    }
}

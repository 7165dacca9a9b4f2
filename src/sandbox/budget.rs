//! Deterministic step budget.
//!
//! The budget is a thread-local counter decremented by every [`tick`]. It
//! replaces wall-clock timeouts: the same candidate aborts after the same
//! number of steps on every machine. Candidates cooperate by ticking at loop
//! back-edges and nested calls; code that never ticks cannot be interrupted.

use std::cell::Cell;
use std::marker::PhantomData;

use crate::errors::CandidateError;

/// Steps granted to a single invocation unless configured otherwise.
pub const DEFAULT_STEP_BUDGET: u64 = 100_000_000;

thread_local! {
    static REMAINING: Cell<Option<u64>> = const { Cell::new(None) };
}

/// Consumes one step from the installed budget.
///
/// Once the counter reaches zero every further tick fails, so a candidate
/// that swallows the first failure keeps failing. Without an installed
/// budget this is a no-op.
pub fn tick() -> Result<(), CandidateError> {
    REMAINING.with(|cell| {
        let Some(remaining) = cell.get() else {
            return Ok(());
        };
        let remaining = remaining.saturating_sub(1);
        cell.set(Some(remaining));
        if remaining == 0 {
            Err(CandidateError::budget_exceeded())
        } else {
            Ok(())
        }
    })
}

/// Steps left in the installed budget, if any.
pub fn remaining() -> Option<u64> {
    REMAINING.with(Cell::get)
}

/// Installs a budget for the lifetime of the guard.
///
/// Guards nest: dropping an inner guard restores the outer budget, charged
/// with the steps the inner invocation consumed.
pub struct BudgetGuard {
    allowance: u64,
    previous: Option<u64>,
    // Thread-local state; the guard must be dropped on the thread that made it.
    _not_send: PhantomData<*const ()>,
}

impl BudgetGuard {
    pub fn install(steps: u64) -> Self {
        let allowance = steps.max(1);
        let previous = REMAINING.with(|cell| cell.replace(Some(allowance)));
        Self {
            allowance,
            previous,
            _not_send: PhantomData,
        }
    }

    pub fn remaining(&self) -> u64 {
        remaining().unwrap_or(0)
    }

    pub fn used(&self) -> u64 {
        self.allowance - self.remaining().min(self.allowance)
    }

    pub fn exhausted(&self) -> bool {
        self.remaining() == 0
    }
}

impl Drop for BudgetGuard {
    fn drop(&mut self) {
        let used = self.used();
        let restored = self.previous.map(|outer| outer.saturating_sub(used));
        REMAINING.with(|cell| cell.set(restored));
    }
}

//! Run configuration.
//!
//! Defaults come from [`RunConfig::default`]; the environment can override
//! the step budget (`PROCTOR_STEP_BUDGET`) and disable colors (`NO_COLOR`).
//! Command-line flags are applied on top by the CLI.

use crate::errors::ProctorError;
use crate::sandbox::DEFAULT_STEP_BUDGET;

pub const STEP_BUDGET_ENV: &str = "PROCTOR_STEP_BUDGET";
pub const NO_COLOR_ENV: &str = "NO_COLOR";

/// Configuration for one suite run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Report every case, not just failures.
    pub verbose: bool,
    /// Propagate the first candidate or comparator error instead of
    /// recording it.
    pub crash: bool,
    /// Run only the case with this exact name.
    pub name_filter: Option<String>,
    /// Steps granted to each invocation.
    pub step_budget: u64,
    pub use_colors: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            crash: false,
            name_filter: None,
            step_budget: DEFAULT_STEP_BUDGET,
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl RunConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self, ProctorError> {
        Self::default().apply_env(|key| std::env::var(key).ok())
    }

    /// Applies overrides from a variable lookup. Split out so the lookup can
    /// be faked.
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ProctorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(STEP_BUDGET_ENV) {
            self.step_budget = parse_budget(&raw)?;
        }
        if lookup(NO_COLOR_ENV).is_some_and(|v| !v.is_empty()) {
            self.use_colors = false;
        }
        Ok(self)
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Crash mode implies verbose reporting.
    pub fn crash(mut self, crash: bool) -> Self {
        self.crash = crash;
        self.verbose |= crash;
        self
    }

    pub fn name_filter(mut self, name: Option<String>) -> Self {
        self.name_filter = name;
        self
    }

    pub fn step_budget(mut self, steps: u64) -> Result<Self, ProctorError> {
        if steps == 0 {
            return Err(ProctorError::Config("step budget must be positive".to_string()));
        }
        self.step_budget = steps;
        Ok(self)
    }

    pub fn use_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// True if the case with this name should run.
    pub fn selects(&self, name: &str) -> bool {
        self.name_filter.as_deref().map_or(true, |wanted| wanted == name)
    }
}

fn parse_budget(raw: &str) -> Result<u64, ProctorError> {
    match raw.trim().replace('_', "").parse::<u64>() {
        Ok(0) | Err(_) => Err(ProctorError::Config(format!(
            "{} must be a positive integer, got `{}`",
            STEP_BUDGET_ENV, raw
        ))),
        Ok(steps) => Ok(steps),
    }
}

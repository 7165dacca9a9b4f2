//! # Callable Registry
//!
//! Test suites name their candidate and comparator callables with stable
//! dotted identifiers (`demo.square`, `proctor.equal`). The registry maps
//! those names to functions supplied by the embedding application and is
//! consulted once, when a suite is resolved into test cases.
//!
//! Registry invariant: build one registry at the entrypoint and pass it by
//! reference to suite loading. Names that do not resolve are fatal.

use im::OrdMap;

use crate::comparators;
use crate::errors::{CandidateError, ComparisonError, ProctorError};
use crate::sandbox::ExecContext;
use crate::value::Value;

// ============================================================================
// CALLABLE SIGNATURES
// ============================================================================

/// A callable under test: receives the case input and a handle for step
/// accounting and output.
pub type CandidateFn = fn(input: &Value, ctx: &mut ExecContext) -> Result<Value, CandidateError>;

/// A comparison between the actual return value (absent if the candidate
/// raised) and the expected output. The flag carries crash mode.
pub type ComparatorFn =
    fn(actual: Option<&Value>, expected: &Value, crash: bool) -> Result<bool, ComparisonError>;

// ============================================================================
// REGISTRY
// ============================================================================

#[derive(Clone, Default)]
pub struct Registry {
    candidates: OrdMap<String, CandidateFn>,
    comparators: OrdMap<String, ComparatorFn>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in comparator.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        comparators::register_builtin_comparators(&mut registry);
        registry
    }

    pub fn register_candidate(&mut self, name: &str, func: CandidateFn) -> &mut Self {
        self.candidates.insert(name.to_string(), func);
        self
    }

    pub fn register_comparator(&mut self, name: &str, func: ComparatorFn) -> &mut Self {
        self.comparators.insert(name.to_string(), func);
        self
    }

    pub fn candidate(&self, name: &str) -> Option<CandidateFn> {
        self.candidates.get(name).copied()
    }

    pub fn comparator(&self, name: &str) -> Option<ComparatorFn> {
        self.comparators.get(name).copied()
    }

    pub fn resolve_candidate(&self, name: &str) -> Result<CandidateFn, ProctorError> {
        self.candidate(name).ok_or_else(|| ProctorError::UnknownSymbol {
            what: "candidate",
            name: name.to_string(),
        })
    }

    pub fn resolve_comparator(&self, name: &str) -> Result<ComparatorFn, ProctorError> {
        self.comparator(name).ok_or_else(|| ProctorError::UnknownSymbol {
            what: "comparator",
            name: name.to_string(),
        })
    }

    pub fn has_candidate(&self, name: &str) -> bool {
        self.candidates.contains_key(name)
    }

    pub fn has_comparator(&self, name: &str) -> bool {
        self.comparators.contains_key(name)
    }

    /// Candidate names in sorted order.
    pub fn candidate_names(&self) -> Vec<String> {
        self.candidates.keys().cloned().collect()
    }

    pub fn comparator_names(&self) -> Vec<String> {
        self.comparators.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.candidates.len() + self.comparators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty() && self.comparators.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("candidates", &self.candidate_names())
            .field("comparators", &self.comparator_names())
            .finish()
    }
}

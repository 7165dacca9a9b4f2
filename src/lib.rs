pub use crate::errors::{CandidateError, ComparisonError, ErrorKind, ProctorError};
pub use crate::registry::{CandidateFn, ComparatorFn, Registry};
pub use crate::runner::{run_suite, CaseResult, RunSummary, SuiteRunner};
pub use crate::sandbox::{ExecContext, ExecutionOutcome, Sandbox};
pub use crate::suite::{Suite, SuiteRecord, TestCase};
pub use crate::value::Value;
pub use crate::verdict::{evaluate, evaluate_case, Verdict};

pub mod cli;
pub mod comparators;
pub mod config;
pub mod demos;
pub mod diff;
pub mod errors;
pub mod registry;
pub mod report;
pub mod runner;
pub mod sandbox;
pub mod score;
pub mod suite;
pub mod value;
pub mod verdict;

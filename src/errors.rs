//! Error types for the proctor engine.
//!
//! Three layers of failure are kept apart:
//!
//! - [`CandidateError`]: a condition raised by the callable under test. It is
//!   recorded in the execution outcome under its [`ErrorKind`].
//! - [`ComparisonError`]: a condition raised by a comparator, carrying ordered
//!   diagnostic notes. It turns into a failed verdict.
//! - [`ProctorError`]: fatal errors that abort a run. Malformed suites and
//!   unresolved names always land here; candidate and comparator errors only
//!   do in crash mode.

use std::path::PathBuf;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Category name of a raised condition.
///
/// Equality is by category only; the message carried by the error never
/// takes part in the comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorKind(String);

impl ErrorKind {
    /// Sentinel kind for invocations aborted by the step budget.
    pub const BUDGET_EXCEEDED: &'static str = "BudgetExceeded";
    /// Kind recorded for candidates or comparators that panicked.
    pub const PANIC: &'static str = "Panic";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn budget_exceeded() -> Self {
        Self::new(Self::BUDGET_EXCEEDED)
    }

    pub fn panic() -> Self {
        Self::new(Self::PANIC)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_budget_exceeded(&self) -> bool {
        self.0 == Self::BUDGET_EXCEEDED
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ErrorKind {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Returns true when two optional error kinds name the same category.
/// Absent on both sides counts as equal.
///
/// # Examples
///
/// ```rust
/// use proctor::errors::{kinds_match, ErrorKind};
/// assert!(kinds_match(None, None));
/// assert!(kinds_match(Some(&ErrorKind::new("ZeroDivision")), Some(&"ZeroDivision".into())));
/// assert!(!kinds_match(Some(&ErrorKind::panic()), None));
/// ```
pub fn kinds_match(actual: Option<&ErrorKind>, expected: Option<&ErrorKind>) -> bool {
    actual == expected
}

/// A condition raised by a candidate callable.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message}")]
pub struct CandidateError {
    pub kind: ErrorKind,
    pub message: String,
}

impl CandidateError {
    pub fn new(kind: impl Into<ErrorKind>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    pub fn budget_exceeded() -> Self {
        Self::new(ErrorKind::budget_exceeded(), "step budget exceeded")
    }

    pub fn panic(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::panic(), message)
    }
}

/// A condition raised by a comparator, with explanatory notes attached.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ComparisonError {
    pub message: String,
    pub notes: Vec<String>,
}

impl ComparisonError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_notes<I, S>(mut self, notes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.notes.extend(notes.into_iter().map(Into::into));
        self
    }

    /// The stringified error followed by every attached note.
    pub fn into_notes(self) -> Vec<String> {
        let mut notes = Vec::with_capacity(self.notes.len() + 1);
        notes.push(self.message);
        notes.extend(self.notes);
        notes
    }
}

/// Fatal errors that abort a suite run.
#[derive(Debug, Error, Diagnostic)]
pub enum ProctorError {
    #[error("candidate `{function}` raised {source} in test `{case}`")]
    #[diagnostic(
        code(proctor::candidate),
        help("crash mode propagates the first candidate error; run without --crash to record it as a failing case")
    )]
    Candidate {
        function: String,
        case: String,
        #[source]
        source: CandidateError,
    },

    #[error("comparator `{comparator}` raised `{source}` in test `{case}`")]
    #[diagnostic(code(proctor::comparator))]
    Comparator {
        comparator: String,
        case: String,
        #[source]
        source: ComparisonError,
    },

    #[error("malformed test case {case}: {issue}")]
    #[diagnostic(
        code(proctor::suite::malformed),
        help("the suite file is corrupt; regenerate it with `proctor create`")
    )]
    MalformedCase { case: String, issue: String },

    #[error("unknown {what} `{name}`")]
    #[diagnostic(
        code(proctor::registry::unknown),
        help("register the callable in the registry handed to the runner")
    )]
    UnknownSymbol { what: &'static str, name: String },

    #[error("failed to access {}: {source}", .path.display())]
    #[diagnostic(code(proctor::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to {action} {}: {message}", .path.display())]
    #[diagnostic(code(proctor::format))]
    Format {
        action: &'static str,
        path: PathBuf,
        message: String,
    },

    #[error("invalid configuration: {0}")]
    #[diagnostic(code(proctor::config))]
    Config(String),
}

impl ProctorError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(case: impl Into<String>, issue: impl Into<String>) -> Self {
        Self::MalformedCase {
            case: case.into(),
            issue: issue.into(),
        }
    }
}

/// Prints a fatal error as a full `miette` report on stderr.
pub fn print_error(error: ProctorError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}

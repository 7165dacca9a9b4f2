//! # Test Suites
//!
//! A suite is an ordered list of [`TestCase`]s. On disk a suite is a JSON or
//! YAML list of [`SuiteRecord`]s that name their callables; resolving the
//! records against a [`Registry`] produces immutable test cases.
//!
//! ```yaml
//! - name: square-4
//!   function: demo.square
//!   compare: proctor.equal
//!   input: 4
//!   output: 16
//!   stdout: ""
//!   stderr: ""
//!   error: null
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorKind, ProctorError};
use crate::registry::{CandidateFn, ComparatorFn, Registry};
use crate::value::Value;

pub mod create;
pub mod loader;

pub use create::{create_records, read_inputs, InputFormat};
pub use loader::{discover_suite_files, expand_paths, load_suite, read_records, write_records, SuiteFormat};

/// Name recorded for callables attached directly rather than by name.
pub const INLINE_NAME: &str = "<inline>";

// ============================================================================
// PERSISTED RECORDS
// ============================================================================

/// A test case as stored in a suite file.
///
/// The three identifying fields are optional here so that a record missing
/// one of them is reported as a malformed case rather than a parse error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SuiteRecord {
    #[serde(alias = "file")]
    pub name: Option<String>,
    pub function: Option<String>,
    pub compare: Option<String>,
    #[serde(default)]
    pub input: Value,
    #[serde(default)]
    pub output: Value,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    #[serde(default)]
    pub error: Option<ErrorKind>,
}

// ============================================================================
// TEST CASES
// ============================================================================

/// One immutable unit of verification.
#[derive(Clone)]
pub struct TestCase {
    pub id: String,
    pub input: Value,
    pub function: String,
    pub target: CandidateFn,
    pub compare: String,
    pub comparator: ComparatorFn,
    pub expected_output: Value,
    pub expected_stdout: String,
    pub expected_stderr: String,
    pub expected_error: Option<ErrorKind>,
}

impl TestCase {
    /// A case with nil input, nil expected output, no expected text and no
    /// expected error.
    pub fn new(id: impl Into<String>, target: CandidateFn, comparator: ComparatorFn) -> Self {
        Self {
            id: id.into(),
            input: Value::Nil,
            function: INLINE_NAME.to_string(),
            target,
            compare: INLINE_NAME.to_string(),
            comparator,
            expected_output: Value::Nil,
            expected_stdout: String::new(),
            expected_stderr: String::new(),
            expected_error: None,
        }
    }

    pub fn with_input(mut self, input: impl Into<Value>) -> Self {
        self.input = input.into();
        self
    }

    pub fn with_output(mut self, output: impl Into<Value>) -> Self {
        self.expected_output = output.into();
        self
    }

    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.expected_stdout = stdout.into();
        self
    }

    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.expected_stderr = stderr.into();
        self
    }

    pub fn with_error(mut self, kind: impl Into<ErrorKind>) -> Self {
        self.expected_error = Some(kind.into());
        self
    }

    pub fn with_names(mut self, function: impl Into<String>, compare: impl Into<String>) -> Self {
        self.function = function.into();
        self.compare = compare.into();
        self
    }

    /// Resolves a stored record. `position` locates the record for error
    /// messages when it has no name.
    pub fn from_record(
        record: SuiteRecord,
        position: &str,
        registry: &Registry,
    ) -> Result<Self, ProctorError> {
        let id = record
            .name
            .ok_or_else(|| ProctorError::malformed(position, "missing required field `name`"))?;
        let function = record.function.ok_or_else(|| {
            ProctorError::malformed(format!("`{}`", id), "missing required field `function`")
        })?;
        let compare = record.compare.ok_or_else(|| {
            ProctorError::malformed(format!("`{}`", id), "missing required field `compare`")
        })?;
        let target = registry.resolve_candidate(&function)?;
        let comparator = registry.resolve_comparator(&compare)?;
        Ok(Self {
            id,
            input: record.input,
            function,
            target,
            compare,
            comparator,
            expected_output: record.output,
            expected_stdout: record.stdout,
            expected_stderr: record.stderr,
            expected_error: record.error,
        })
    }

    pub fn to_record(&self) -> SuiteRecord {
        SuiteRecord {
            name: Some(self.id.clone()),
            function: Some(self.function.clone()),
            compare: Some(self.compare.clone()),
            input: self.input.clone(),
            output: self.expected_output.clone(),
            stdout: self.expected_stdout.clone(),
            stderr: self.expected_stderr.clone(),
            error: self.expected_error.clone(),
        }
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("id", &self.id)
            .field("input", &self.input)
            .field("function", &self.function)
            .field("compare", &self.compare)
            .field("expected_output", &self.expected_output)
            .field("expected_stdout", &self.expected_stdout)
            .field("expected_stderr", &self.expected_stderr)
            .field("expected_error", &self.expected_error)
            .finish()
    }
}

// ============================================================================
// SUITES
// ============================================================================

/// An ordered collection of test cases from one source.
#[derive(Debug, Clone, Default)]
pub struct Suite {
    pub name: String,
    pub cases: Vec<TestCase>,
}

impl Suite {
    pub fn new(name: impl Into<String>, cases: Vec<TestCase>) -> Self {
        Self {
            name: name.into(),
            cases,
        }
    }

    /// Resolves every record; the first malformed or unresolvable record
    /// aborts the whole suite.
    pub fn resolve(
        name: impl Into<String>,
        records: Vec<SuiteRecord>,
        registry: &Registry,
    ) -> Result<Self, ProctorError> {
        let name = name.into();
        let cases = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| {
                TestCase::from_record(record, &format!("#{} in {}", i + 1, name), registry)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { name, cases })
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

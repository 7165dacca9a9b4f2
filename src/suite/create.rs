//! Suite authoring: run a reference candidate over a set of inputs and
//! record what it did as the expected outcome.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use super::SuiteRecord;
use crate::errors::ProctorError;
use crate::registry::Registry;
use crate::sandbox::Sandbox;
use crate::value::Value;

/// How an input file is turned into test inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// A JSON array; each element is one input.
    Json,
    /// A YAML sequence; each element is one input.
    Yaml,
    /// The whole file content is a single string input.
    Text,
}

pub fn read_inputs(path: &Path, format: InputFormat) -> Result<Vec<Value>, ProctorError> {
    let content = fs::read_to_string(path).map_err(|e| ProctorError::io(path, e))?;
    let parsed = match format {
        InputFormat::Text => return Ok(vec![Value::Str(content)]),
        InputFormat::Json => serde_json::from_str::<Vec<Value>>(&content).map_err(|e| e.to_string()),
        InputFormat::Yaml => serde_yaml::from_str::<Vec<Value>>(&content).map_err(|e| e.to_string()),
    };
    parsed.map_err(|message| ProctorError::Format {
        action: "read inputs from",
        path: path.to_path_buf(),
        message,
    })
}

/// Builds one record per input by running `function` in the sandbox.
///
/// Each record is named after the file its input came from. Errors raised by
/// the reference candidate are recorded as the expected error kind.
pub fn create_records(
    inputs: &[PathBuf],
    format: InputFormat,
    function: &str,
    compare: &str,
    registry: &Registry,
    sandbox: &Sandbox,
) -> Result<Vec<SuiteRecord>, ProctorError> {
    let target = registry.resolve_candidate(function)?;
    registry.resolve_comparator(compare)?;

    let mut records = Vec::new();
    for path in inputs {
        info!("reading {}", path.display());
        for input in read_inputs(path, format)? {
            let outcome = sandbox
                .execute(target, &input, false)
                .map_err(|source| ProctorError::Candidate {
                    function: function.to_string(),
                    case: path.display().to_string(),
                    source,
                })?;
            records.push(SuiteRecord {
                name: Some(path.display().to_string()),
                function: Some(function.to_string()),
                compare: Some(compare.to_string()),
                input,
                output: outcome.return_value.clone().unwrap_or_default(),
                stdout: outcome.stdout.clone(),
                stderr: outcome.stderr.clone(),
                error: outcome.error_kind().cloned(),
            });
        }
    }
    Ok(records)
}

//! Reading, writing and discovering suite files.
//!
//! The format follows the file extension: `.json` for JSON, `.yaml` or
//! `.yml` for YAML.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use walkdir::WalkDir;

use super::{Suite, SuiteRecord};
use crate::errors::ProctorError;
use crate::registry::Registry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteFormat {
    Json,
    Yaml,
}

impl SuiteFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(SuiteFormat::Json),
            "yaml" | "yml" => Some(SuiteFormat::Yaml),
            _ => None,
        }
    }

    fn require(path: &Path) -> Result<Self, ProctorError> {
        Self::from_path(path).ok_or_else(|| ProctorError::Format {
            action: "recognise",
            path: path.to_path_buf(),
            message: "suite files must end in .json, .yaml or .yml".to_string(),
        })
    }
}

// =============================
// Public API for suite loading
// =============================

/// Reads the raw records of a suite file.
pub fn read_records(path: &Path) -> Result<Vec<SuiteRecord>, ProctorError> {
    let format = SuiteFormat::require(path)?;
    let content = fs::read_to_string(path).map_err(|e| ProctorError::io(path, e))?;
    let parsed = match format {
        SuiteFormat::Json => serde_json::from_str(&content).map_err(|e| e.to_string()),
        SuiteFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
    };
    parsed.map_err(|message| ProctorError::Format {
        action: "parse",
        path: path.to_path_buf(),
        message,
    })
}

/// Writes records to a suite file, pretty-printed in the format the
/// extension names.
pub fn write_records(path: &Path, records: &[SuiteRecord]) -> Result<(), ProctorError> {
    let format = SuiteFormat::require(path)?;
    let rendered = match format {
        SuiteFormat::Json => serde_json::to_string_pretty(records).map_err(|e| e.to_string()),
        SuiteFormat::Yaml => serde_yaml::to_string(records).map_err(|e| e.to_string()),
    };
    let rendered = rendered.map_err(|message| ProctorError::Format {
        action: "serialize",
        path: path.to_path_buf(),
        message,
    })?;
    fs::write(path, rendered).map_err(|e| ProctorError::io(path, e))?;
    info!("wrote {} test case(s) to {}", records.len(), path.display());
    Ok(())
}

/// Loads a suite file and resolves it against the registry.
pub fn load_suite(path: &Path, registry: &Registry) -> Result<Suite, ProctorError> {
    let records = read_records(path)?;
    debug!("read {} record(s) from {}", records.len(), path.display());
    Suite::resolve(path.display().to_string(), records, registry)
}

/// Recursively collects suite files under `root`, sorted for a
/// deterministic run order.
pub fn discover_suite_files<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>, ProctorError> {
    let root = root.as_ref();
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| {
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "filesystem loop"));
            ProctorError::io(root, source)
        })?;
        if entry.file_type().is_file() && SuiteFormat::from_path(entry.path()).is_some() {
            files.push(entry.path().to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Replaces directory arguments with the suite files beneath them. Files
/// keep their position in the argument list.
pub fn expand_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>, ProctorError> {
    let mut expanded = Vec::new();
    for path in paths {
        if path.is_dir() {
            expanded.extend(discover_suite_files(path)?);
        } else {
            expanded.push(path.clone());
        }
    }
    Ok(expanded)
}

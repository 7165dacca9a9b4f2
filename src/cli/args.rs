//! Defines the command-line arguments and subcommands for the proctor CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::suite::InputFormat;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "proctor",
    version,
    about = "Runs test suites against registered candidates and reports verdicts."
)]
pub struct ProctorArgs {
    /// Log level for diagnostics on stderr (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the test cases in one or more suite files.
    Run {
        /// Suite files, or directories to search for suite files.
        #[arg(required = true)]
        suites: Vec<PathBuf>,
        /// Report every case in full, not just failures.
        #[arg(long)]
        verbose: bool,
        /// Abort on the first candidate or comparator error (implies --verbose).
        #[arg(long)]
        crash: bool,
        /// Only run the test case with this name.
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Print the records stored in suite files.
    Dump {
        #[arg(required = true)]
        suites: Vec<PathBuf>,
        /// Only print the test case with this name.
        #[arg(long)]
        name: Option<String>,
    },
    /// Create a suite by running a reference candidate over input files.
    Create {
        /// Input files; each becomes one or more test cases.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Suite file to write (.json, .yaml or .yml).
        #[arg(long)]
        output: PathBuf,
        /// Registered name of the candidate to record.
        #[arg(long)]
        function: String,
        /// Registered name of the comparator the suite should use.
        #[arg(long)]
        compare: String,
        #[command(flatten)]
        format: FormatArgs,
        #[arg(long)]
        verbose: bool,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Run suites and export a grade report as JSON.
    Score {
        #[arg(required = true)]
        suites: Vec<PathBuf>,
        /// Report file to write.
        #[arg(long)]
        output: PathBuf,
        /// Score 100 when the pass ratio reaches this threshold, else 0.
        #[arg(long)]
        all_or_nothing: Option<f64>,
        /// Minutes past the deadline; negative for an early submission.
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        minutes_late: f64,
        /// A previous score to keep if it is higher.
        #[arg(long, default_value_t = 0.0)]
        previous_score: f64,
        #[command(flatten)]
        run: RunArgs,
    },
    /// List the registered candidates and comparators.
    List,
}

/// Execution settings shared by the commands that run candidates.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Steps granted to each invocation.
    #[arg(long)]
    pub budget: Option<u64>,
    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,
}

/// Exactly one input format for `create`.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct FormatArgs {
    /// Each input file holds a JSON array of inputs.
    #[arg(long)]
    pub json: bool,
    /// Each input file holds a YAML sequence of inputs.
    #[arg(long)]
    pub yaml: bool,
    /// Each input file's content is a single string input.
    #[arg(long)]
    pub text: bool,
}

impl FormatArgs {
    pub fn format(&self) -> InputFormat {
        if self.json {
            InputFormat::Json
        } else if self.yaml {
            InputFormat::Yaml
        } else {
            InputFormat::Text
        }
    }
}

//! The proctor command-line interface.
//!
//! Embedding applications build a [`Registry`] with their own candidates and
//! comparators and hand it to [`run_with`]; the bundled binary does the same
//! with the demo candidates.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;

use clap::Parser;
use log::{info, LevelFilter};
use serde::Serialize;

use crate::cli::args::{Command, ProctorArgs, RunArgs};
use crate::config::RunConfig;
use crate::errors::{print_error, ProctorError};
use crate::registry::Registry;
use crate::report::{self, ConsoleReporter};
use crate::runner::{CaseResult, RunSummary, SuiteRunner};
use crate::sandbox::Sandbox;
use crate::score::{self, ScoreOptions};
use crate::suite::{self, create_records, expand_paths, read_records};

pub mod args;

/// Exit status when every case passed.
pub const EXIT_OK: i32 = 0;
/// Exit status when at least one case failed.
pub const EXIT_FAILURES: i32 = 1;
/// Exit status for fatal errors.
pub const EXIT_FATAL: i32 = 2;

/// Parses the process arguments, dispatches the subcommand and exits.
pub fn run_with(registry: Registry) {
    let args = ProctorArgs::parse();
    let result = init_logging(args.log_level.as_deref()).and_then(|()| dispatch(args.command, &registry));
    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            print_error(e);
            process::exit(EXIT_FATAL);
        }
    }
}

fn dispatch(command: Command, registry: &Registry) -> Result<i32, ProctorError> {
    match command {
        Command::Run {
            suites,
            verbose,
            crash,
            name,
            run,
        } => {
            let config = run_config(&run)?.verbose(verbose).crash(crash).name_filter(name);
            handle_run(&suites, config, registry)
        }
        Command::Dump { suites, name } => handle_dump(&suites, name.as_deref()),
        Command::Create {
            inputs,
            output,
            function,
            compare,
            format,
            verbose,
            run,
        } => {
            let config = run_config(&run)?;
            let records = create_records(
                &inputs,
                format.format(),
                &function,
                &compare,
                registry,
                &Sandbox::new(config.step_budget),
            )?;
            if verbose {
                println!("Writing output. {} tests", records.len());
            }
            suite::write_records(&output, &records)?;
            Ok(EXIT_OK)
        }
        Command::Score {
            suites,
            output,
            all_or_nothing,
            minutes_late,
            previous_score,
            run,
        } => {
            let options = ScoreOptions {
                all_or_nothing,
                minutes_late,
                previous_score,
            };
            handle_score(&suites, &output, run_config(&run)?, &options, registry)
        }
        Command::List => handle_list(registry),
    }
}

/// Environment defaults with the shared command-line overrides applied.
fn run_config(run: &RunArgs) -> Result<RunConfig, ProctorError> {
    let mut config = RunConfig::from_env()?;
    if let Some(steps) = run.budget {
        config = config.step_budget(steps)?;
    }
    if run.no_color {
        config = config.use_colors(false);
    }
    Ok(config)
}

fn init_logging(level: Option<&str>) -> Result<(), ProctorError> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Warn).parse_default_env();
    if let Some(level) = level {
        let level = LevelFilter::from_str(level)
            .map_err(|_| ProctorError::Config(format!("unknown log level `{}`", level)))?;
        builder.filter_level(level);
    }
    // A second initialization only happens when embedded in tests.
    let _ = builder.try_init();
    Ok(())
}

#[derive(Serialize)]
struct TableRow<'a> {
    name: &'a str,
    passed: bool,
}

/// Handles the `run` subcommand.
fn handle_run(suites: &[PathBuf], config: RunConfig, registry: &Registry) -> Result<i32, ProctorError> {
    let reporter = ConsoleReporter::stdout(config.use_colors);
    let results = SuiteRunner::new(config)
        .with_reporter(reporter)
        .run_files(suites, registry)?;
    print_table(&results)?;
    Ok(exit_code(&results))
}

fn print_table(results: &[CaseResult]) -> Result<(), ProctorError> {
    let rows: Vec<_> = results
        .iter()
        .map(|r| TableRow {
            name: &r.case.id,
            passed: r.passed(),
        })
        .collect();
    let rendered = serde_json::to_string_pretty(&rows).map_err(|e| ProctorError::Format {
        action: "serialize results for",
        path: PathBuf::from("<stdout>"),
        message: e.to_string(),
    })?;
    println!("{}", rendered);
    Ok(())
}

fn exit_code(results: &[CaseResult]) -> i32 {
    if RunSummary::from_results(results).has_failures() {
        EXIT_FAILURES
    } else {
        EXIT_OK
    }
}

/// Handles the `dump` subcommand.
fn handle_dump(suites: &[PathBuf], name: Option<&str>) -> Result<i32, ProctorError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for path in expand_paths(suites)? {
        let records: Vec<_> = read_records(&path)?
            .into_iter()
            .filter(|r| name.map_or(true, |wanted| r.name.as_deref() == Some(wanted)))
            .collect();
        report::write_records(&mut out, &records).map_err(|e| ProctorError::io(&path, e))?;
    }
    out.flush().map_err(|e| ProctorError::io("<stdout>", e))?;
    Ok(EXIT_OK)
}

/// Handles the `score` subcommand. Failing cases are reported tersely.
fn handle_score(
    suites: &[PathBuf],
    output: &Path,
    config: RunConfig,
    options: &ScoreOptions,
    registry: &Registry,
) -> Result<i32, ProctorError> {
    let reporter = ConsoleReporter::stdout(config.use_colors);
    let results = SuiteRunner::new(config.verbose(false))
        .with_reporter(reporter)
        .run_files(suites, registry)?;
    let grade = score::score(&results, options);
    score::write_report(output, &grade)?;
    info!("wrote grade report to {}", output.display());
    println!("{} (score {:.2})", grade.output, grade.score);
    Ok(EXIT_OK)
}

/// Handles the `list` subcommand.
fn handle_list(registry: &Registry) -> Result<i32, ProctorError> {
    println!("candidates:");
    for name in registry.candidate_names() {
        println!("  {}", name);
    }
    println!("comparators:");
    for name in registry.comparator_names() {
        println!("  {}", name);
    }
    Ok(EXIT_OK)
}

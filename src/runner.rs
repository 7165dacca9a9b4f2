//! # Suite Runner
//!
//! Runs test cases strictly one after another, in suite order: sandboxed
//! invocation, verdict, report, then the next case. Results are returned as
//! `(case, verdict, outcome)` triples for downstream reporting and scoring.
//!
//! Reporting is verbosity-gated: verbose runs report every case in full,
//! terse runs report failing cases only. In crash mode the first candidate
//! or comparator error aborts the run.

use std::path::PathBuf;

use log::{debug, info};

use crate::config::RunConfig;
use crate::errors::ProctorError;
use crate::registry::Registry;
use crate::report::{ConsoleReporter, NullReporter, Reporter};
use crate::sandbox::{ExecutionOutcome, Sandbox};
use crate::suite::{expand_paths, load_suite, Suite, TestCase};
use crate::verdict::{evaluate_case, Verdict};

/// Everything known about one executed case.
#[derive(Debug, Clone)]
pub struct CaseResult {
    pub case: TestCase,
    pub verdict: Verdict,
    pub outcome: ExecutionOutcome,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        self.verdict.passed
    }
}

/// Pass/fail counts for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn from_results(results: &[CaseResult]) -> Self {
        let passed = results.iter().filter(|r| r.passed()).count();
        Self {
            passed,
            failed: results.len() - passed,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn success_rate(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        (self.passed as f64 / self.total() as f64) * 100.0
    }
}

/// Sequential runner over one or more suites.
pub struct SuiteRunner<R: Reporter = NullReporter> {
    config: RunConfig,
    sandbox: Sandbox,
    reporter: R,
}

impl SuiteRunner<NullReporter> {
    pub fn new(config: RunConfig) -> Self {
        let sandbox = Sandbox::new(config.step_budget);
        Self {
            config,
            sandbox,
            reporter: NullReporter,
        }
    }
}

impl<R: Reporter> SuiteRunner<R> {
    pub fn with_reporter<T: Reporter>(self, reporter: T) -> SuiteRunner<T> {
        SuiteRunner {
            config: self.config,
            sandbox: self.sandbox,
            reporter,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Runs every selected case of every suite, in order.
    pub fn run(&mut self, suites: &[Suite]) -> Result<Vec<CaseResult>, ProctorError> {
        if self.config.verbose {
            self.reporter.run_started();
        }
        let mut results = Vec::new();
        for suite in suites {
            self.run_one(suite, &mut results)?;
        }
        self.finish(&results);
        Ok(results)
    }

    /// Loads each suite file (directories are searched for suite files) and
    /// runs it before loading the next.
    pub fn run_files(
        &mut self,
        paths: &[PathBuf],
        registry: &Registry,
    ) -> Result<Vec<CaseResult>, ProctorError> {
        if self.config.verbose {
            self.reporter.run_started();
        }
        let mut results = Vec::new();
        for path in expand_paths(paths)? {
            let suite = load_suite(&path, registry)?;
            self.run_one(&suite, &mut results)?;
        }
        self.finish(&results);
        Ok(results)
    }

    fn run_one(&mut self, suite: &Suite, results: &mut Vec<CaseResult>) -> Result<(), ProctorError> {
        let (config, sandbox, reporter) = (&self.config, &self.sandbox, &mut self.reporter);
        if config.verbose {
            reporter.suite_started(suite);
        }
        for case in suite.cases.iter().filter(|c| config.selects(&c.id)) {
            if config.verbose {
                reporter.case_started(case);
            }
            let (verdict, outcome) = evaluate_case(case, sandbox, config.crash)?;
            debug!("runner: `{}` passed={}", case.id, verdict.passed);
            let result = CaseResult {
                case: case.clone(),
                verdict,
                outcome,
            };
            if config.verbose {
                reporter.case_detail(&result);
            } else if !result.passed() {
                reporter.case_failed(&result);
            }
            results.push(result);
        }
        Ok(())
    }

    fn finish(&mut self, results: &[CaseResult]) {
        let summary = RunSummary::from_results(results);
        info!("runner: {} / {} correct", summary.passed, summary.total());
        if self.config.verbose {
            self.reporter.run_finished(&summary);
        }
    }
}

/// Runs suites with console reporting on stdout.
pub fn run_suite(
    suites: &[Suite],
    verbose: bool,
    crash: bool,
    name: Option<&str>,
) -> Result<Vec<CaseResult>, ProctorError> {
    let config = RunConfig::default()
        .verbose(verbose)
        .crash(crash)
        .name_filter(name.map(str::to_string));
    let reporter = ConsoleReporter::stdout(config.use_colors);
    SuiteRunner::new(config).with_reporter(reporter).run(suites)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_of_empty_run_is_zero() {
        let summary = RunSummary::from_results(&[]);
        assert_eq!(summary.total(), 0);
        assert_eq!(summary.success_rate(), 0.0);
        assert!(!summary.has_failures());
    }
}

mod common;

use std::fs;

use common::*;
use proctor::comparators::COMPARE_EQUAL;
use proctor::config::RunConfig;
use proctor::report::{ConsoleReporter, Reporter};
use proctor::runner::{CaseResult, RunSummary};
use proctor::suite::{Suite, SuiteRecord};
use proctor::{ProctorError, SuiteRunner, TestCase};
use tempfile::tempdir;
use termcolor::Buffer;

/// Records which events the runner emitted, in order.
#[derive(Default)]
struct RecordingReporter {
    events: Vec<String>,
}

impl Reporter for RecordingReporter {
    fn suite_started(&mut self, suite: &Suite) {
        self.events.push(format!("suite {}", suite.name));
    }

    fn case_detail(&mut self, result: &CaseResult) {
        self.events.push(format!("detail {}", result.case.id));
    }

    fn case_failed(&mut self, result: &CaseResult) {
        self.events.push(format!("failed {}", result.case.id));
    }

    fn run_finished(&mut self, summary: &RunSummary) {
        self.events.push(format!("finished {}/{}", summary.passed, summary.total()));
    }
}

fn mixed_suite() -> Suite {
    Suite::new(
        "mixed",
        vec![
            square_case(square),
            TestCase::new("wrong", off_by_one, COMPARE_EQUAL)
                .with_input(3)
                .with_output(9),
            TestCase::new("divide", divide_by_zero, COMPARE_EQUAL).with_error("ZeroDivision"),
        ],
    )
}

fn quiet_config() -> RunConfig {
    RunConfig::default().use_colors(false)
}

#[test]
fn results_follow_suite_order() {
    let suites = [mixed_suite(), Suite::new("second", vec![square_case(square)])];
    let results = SuiteRunner::new(quiet_config()).run(&suites).unwrap();
    let ids: Vec<_> = results.iter().map(|r| r.case.id.as_str()).collect();
    assert_eq!(ids, vec!["square-4", "wrong", "divide", "square-4"]);
    let passed: Vec<_> = results.iter().map(CaseResult::passed).collect();
    assert_eq!(passed, vec![true, false, true, true]);
}

#[test]
fn terse_mode_reports_failures_only() {
    let mut runner = SuiteRunner::new(quiet_config()).with_reporter(RecordingReporter::default());
    runner.run(&[mixed_suite()]).unwrap();
    assert_eq!(runner.reporter().events, vec!["failed wrong"]);
}

#[test]
fn verbose_mode_reports_every_case() {
    let mut runner =
        SuiteRunner::new(quiet_config().verbose(true)).with_reporter(RecordingReporter::default());
    runner.run(&[mixed_suite()]).unwrap();
    assert_eq!(
        runner.into_reporter().events,
        vec![
            "suite mixed",
            "detail square-4",
            "detail wrong",
            "detail divide",
            "finished 2/3"
        ]
    );
}

#[test]
fn name_filter_selects_a_single_case() {
    let config = quiet_config().name_filter(Some("wrong".to_string()));
    let results = SuiteRunner::new(config).run(&[mixed_suite()]).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].case.id, "wrong");
}

#[test]
fn crash_mode_aborts_on_first_candidate_error() {
    let suite = Suite::new(
        "crashy",
        vec![
            TestCase::new("divide", divide_by_zero, COMPARE_EQUAL).with_error("ZeroDivision"),
            square_case(square),
        ],
    );
    let mut runner =
        SuiteRunner::new(quiet_config().crash(true)).with_reporter(RecordingReporter::default());
    let err = runner.run(&[suite]).unwrap_err();
    assert!(matches!(err, ProctorError::Candidate { ref case, .. } if case == "divide"));
    assert!(!runner.reporter().events.iter().any(|e| e.starts_with("detail")));
}

#[test]
fn terse_console_output_names_the_failure() {
    let mut runner = SuiteRunner::new(quiet_config()).with_reporter(ConsoleReporter::new(Buffer::no_color()));
    runner.run(&[mixed_suite()]).unwrap();
    let text = String::from_utf8(runner.into_reporter().into_inner().into_inner()).unwrap();
    assert_eq!(text, "--- Failed test: wrong\n");
}

fn record(name: &str, function: &str, input: i64, output: i64) -> SuiteRecord {
    SuiteRecord {
        name: Some(name.to_string()),
        function: Some(function.to_string()),
        compare: Some("proctor.equal".to_string()),
        input: input.into(),
        output: output.into(),
        ..SuiteRecord::default()
    }
}

#[test]
fn run_files_loads_json_and_yaml_suites() {
    let dir = tempdir().unwrap();
    let json = dir.path().join("a.json");
    let yaml = dir.path().join("nested/b.yaml");
    fs::create_dir_all(yaml.parent().unwrap()).unwrap();
    proctor::suite::write_records(&json, &[record("sq-2", "test.square", 2, 4)]).unwrap();
    proctor::suite::write_records(&yaml, &[record("sq-3", "test.off_by_one", 3, 9)]).unwrap();

    let registry = test_registry();
    let results = SuiteRunner::new(quiet_config())
        .run_files(&[dir.path().to_path_buf()], &registry)
        .unwrap();
    let summary = RunSummary::from_results(&results);
    assert_eq!((summary.passed, summary.failed), (1, 1));
    assert_eq!(results[0].case.id, "sq-2");
    assert_eq!(results[1].case.id, "sq-3");
}

#[test]
fn malformed_record_aborts_the_run() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, r#"[{"name": "no-function", "compare": "proctor.equal"}]"#).unwrap();
    let err = SuiteRunner::new(quiet_config())
        .run_files(&[path], &test_registry())
        .unwrap_err();
    assert!(matches!(err, ProctorError::MalformedCase { .. }));
}

#[test]
fn unknown_candidate_name_is_fatal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("unknown.yml");
    proctor::suite::write_records(&path, &[record("x", "test.missing", 1, 1)]).unwrap();
    let err = SuiteRunner::new(quiet_config())
        .run_files(&[path], &test_registry())
        .unwrap_err();
    assert_eq!(err.to_string(), "unknown candidate `test.missing`");
}

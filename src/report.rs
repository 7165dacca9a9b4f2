//! Console reporting for suite runs.
//!
//! The runner decides *when* to report (verbose vs. terse); a [`Reporter`]
//! decides *how*. [`ConsoleReporter`] writes colored text to any
//! `termcolor::WriteColor`, so tests can point it at an in-memory buffer.

use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::diff::{diff_values, DiffLine};
use crate::runner::{CaseResult, RunSummary};
use crate::suite::{Suite, SuiteRecord, TestCase};

/// Receives run events from the suite runner.
pub trait Reporter {
    fn run_started(&mut self) {}
    fn suite_started(&mut self, _suite: &Suite) {}
    fn case_started(&mut self, _case: &TestCase) {}
    /// Full expected/actual comparison; verbose mode only.
    fn case_detail(&mut self, _result: &CaseResult) {}
    /// Name and notes of a failing case; terse mode only.
    fn case_failed(&mut self, _result: &CaseResult) {}
    fn run_finished(&mut self, _summary: &RunSummary) {}
}

/// Discards every event.
pub struct NullReporter;

impl Reporter for NullReporter {}

/// Writes human-readable reports to a color-capable stream.
pub struct ConsoleReporter<W: WriteColor> {
    out: W,
}

impl ConsoleReporter<StandardStream> {
    pub fn stdout(use_colors: bool) -> Self {
        let choice = if use_colors {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self::new(StandardStream::stdout(choice))
    }
}

impl<W: WriteColor> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn colored(&mut self, color: Color, bold: bool, text: &str) {
        let _ = self.out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(bold));
        let _ = writeln!(self.out, "{}", text);
        let _ = self.out.reset();
    }

    fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}", text);
    }

    fn notes(&mut self, notes: &[String]) {
        if !notes.is_empty() {
            self.line(&notes.join("\n"));
        }
    }

    fn diff(&mut self, lines: &[DiffLine]) {
        for line in lines {
            match line {
                DiffLine::Equal(text) => self.line(&format!("  {}", text)),
                DiffLine::OnlyInExpected(text) => self.colored(Color::Red, false, &format!("- {}", text)),
                DiffLine::OnlyInActual(text) => self.colored(Color::Green, false, &format!("+ {}", text)),
            }
        }
    }
}

impl<W: WriteColor> Reporter for ConsoleReporter<W> {
    fn run_started(&mut self) {
        self.line("Running tests");
    }

    fn suite_started(&mut self, suite: &Suite) {
        self.line(&format!("Reading {} ({} test case(s))", suite.name, suite.len()));
    }

    fn case_started(&mut self, case: &TestCase) {
        self.line(&format!("test: {}", case.id));
        self.line(&format!("function: {}", case.function));
        self.line(&format!("compare: {}", case.compare));
        self.line(&format!("input: {}", case.input));
    }

    fn case_detail(&mut self, result: &CaseResult) {
        let (case, verdict, outcome) = (&result.case, &result.verdict, &result.outcome);
        if verdict.passed {
            self.colored(Color::Green, true, "passed: true");
        } else {
            self.colored(Color::Red, true, "passed: false");
        }
        self.line("expected return value:");
        self.line(&case.expected_output.pretty());
        self.line("actual return value:");
        match &outcome.return_value {
            Some(value) => self.line(&value.pretty()),
            None => self.line("<none>"),
        }
        if !verdict.passed && outcome.return_value.as_ref() != Some(&case.expected_output) {
            self.line("return value diff:");
            self.diff(&diff_values(&case.expected_output, outcome.return_value.as_ref()));
        }
        self.line(&format!("expected stdout: {:?}", case.expected_stdout));
        self.line(&format!("actual stdout: {:?}", outcome.stdout));
        self.line(&format!("expected stderr: {:?}", case.expected_stderr));
        self.line(&format!("actual stderr: {:?}", outcome.stderr));
        if let Some(kind) = &case.expected_error {
            self.line(&format!("expected error: {}", kind));
        }
        if let Some(error) = &outcome.error {
            self.line(&format!("actual error: {}", error));
        }
        self.notes(&verdict.notes);
        self.line("-----");
    }

    fn case_failed(&mut self, result: &CaseResult) {
        self.colored(Color::Red, true, &format!("--- Failed test: {}", result.case.id));
        self.notes(&result.verdict.notes);
    }

    fn run_finished(&mut self, summary: &RunSummary) {
        let color = if summary.failed == 0 { Color::Green } else { Color::Red };
        self.colored(
            color,
            true,
            &format!("{} / {} correct", summary.passed, summary.total()),
        );
    }
}

/// Writes suite records as YAML documents, one per record.
pub fn write_records<W: Write>(out: &mut W, records: &[SuiteRecord]) -> std::io::Result<()> {
    for record in records {
        let rendered = serde_yaml::to_string(record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writeln!(out, "---\n{}", rendered.trim_end())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparators::COMPARE_EQUAL;
    use crate::errors::CandidateError;
    use crate::sandbox::{ExecContext, ExecutionOutcome};
    use crate::value::Value;
    use crate::verdict::Verdict;
    use termcolor::Buffer;

    fn unused(_: &Value, _: &mut ExecContext) -> Result<Value, CandidateError> {
        Ok(Value::Nil)
    }

    fn failing_result() -> CaseResult {
        CaseResult {
            case: TestCase::new("square-4", unused, COMPARE_EQUAL)
                .with_input(4)
                .with_output(16),
            verdict: Verdict {
                passed: false,
                notes: vec!["note one".into()],
                divergence: None,
            },
            outcome: ExecutionOutcome::returned(Value::Int(15)),
        }
    }

    fn render(f: impl FnOnce(&mut ConsoleReporter<Buffer>)) -> String {
        let mut reporter = ConsoleReporter::new(Buffer::no_color());
        f(&mut reporter);
        String::from_utf8(reporter.into_inner().into_inner()).unwrap()
    }

    #[test]
    fn terse_failure_lists_name_and_notes() {
        let text = render(|r| r.case_failed(&failing_result()));
        assert_eq!(text, "--- Failed test: square-4\nnote one\n");
    }

    #[test]
    fn detail_includes_return_value_diff() {
        let text = render(|r| r.case_detail(&failing_result()));
        assert!(text.contains("passed: false"));
        assert!(text.contains("- 16\n+ 15\n"));
        assert!(text.ends_with("note one\n-----\n"));
    }
}

//! Grade export.
//!
//! Turns run results into a percentage and a structured JSON report of the
//! shape autograders consume. The late/early/previous-score adjustments are
//! grading policy, not part of the verdict engine.

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::errors::ProctorError;
use crate::runner::{CaseResult, RunSummary};

/// Points deducted per minute of lateness.
pub const LATE_PENALTY_PER_MINUTE: f64 = 1.0;
/// Minutes early are divided by this to get bonus points.
pub const EARLY_BONUS_DIVISOR: f64 = 1000.0;
pub const EARLY_BONUS_CAP: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreOptions {
    /// Pass ratio at or above which the score is 100, below which it is 0.
    pub all_or_nothing: Option<f64>,
    /// Positive when late, negative when early.
    pub minutes_late: f64,
    /// Kept if higher than the new score.
    pub previous_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedTest {
    pub status: TestStatus,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeReport {
    pub score: f64,
    pub output: String,
    pub visibility: String,
    pub tests: Vec<GradedTest>,
}

/// Scores a run. An empty run scores 0.
pub fn score(results: &[CaseResult], options: &ScoreOptions) -> GradeReport {
    let summary = RunSummary::from_results(results);
    let tests = results
        .iter()
        .map(|r| GradedTest {
            status: if r.passed() {
                TestStatus::Passed
            } else {
                TestStatus::Failed
            },
            name: r.case.id.clone(),
        })
        .collect();

    let ratio = if summary.total() == 0 {
        0.0
    } else {
        summary.passed as f64 / summary.total() as f64
    };
    let mut score = match options.all_or_nothing {
        Some(threshold) if ratio >= threshold && summary.total() > 0 => 100.0,
        Some(_) => 0.0,
        None => 100.0 * ratio,
    };
    info!("raw score: {}", score);

    if options.minutes_late > 0.0 {
        let penalty = options.minutes_late * LATE_PENALTY_PER_MINUTE;
        info!("late penalty: {}", penalty);
        score = (score - penalty).max(0.0);
    } else if options.minutes_late < 0.0 {
        let bonus = (-options.minutes_late / EARLY_BONUS_DIVISOR).min(EARLY_BONUS_CAP);
        info!("early bonus: {}", bonus);
        score += bonus;
    }
    if options.previous_score > score {
        info!("keeping previous score: {}", options.previous_score);
        score = options.previous_score;
    }

    GradeReport {
        score,
        output: format!("{} / {} correct", summary.passed, summary.total()),
        visibility: "visible".to_string(),
        tests,
    }
}

pub fn write_report(path: &Path, report: &GradeReport) -> Result<(), ProctorError> {
    let rendered = serde_json::to_string_pretty(report).map_err(|e| ProctorError::Format {
        action: "serialize",
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    fs::write(path, rendered).map_err(|e| ProctorError::io(path, e))
}

//! # Diff Reporter
//!
//! Line-level diff between an expected and an actual text block, built on the
//! LCS alignment of the `difference` crate. Every source line becomes exactly
//! one [`DiffLine`]; colors and prefixes belong to the printer.

use difference::{Changeset, Difference};

use crate::value::Value;

/// One line of a diff, tagged by which side it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DiffLine {
    Equal(String),
    OnlyInExpected(String),
    OnlyInActual(String),
}

impl DiffLine {
    pub fn text(&self) -> &str {
        match self {
            DiffLine::Equal(s) | DiffLine::OnlyInExpected(s) | DiffLine::OnlyInActual(s) => s,
        }
    }

    pub fn is_equal(&self) -> bool {
        matches!(self, DiffLine::Equal(_))
    }

    /// The same line seen with expected and actual swapped.
    pub fn complement(&self) -> DiffLine {
        match self {
            DiffLine::Equal(s) => DiffLine::Equal(s.clone()),
            DiffLine::OnlyInExpected(s) => DiffLine::OnlyInActual(s.clone()),
            DiffLine::OnlyInActual(s) => DiffLine::OnlyInExpected(s.clone()),
        }
    }

    /// Plain-text rendering: `"  "` for equal, `"- "` for expected-only,
    /// `"+ "` for actual-only.
    pub fn render(&self) -> String {
        match self {
            DiffLine::Equal(s) => format!("  {}", s),
            DiffLine::OnlyInExpected(s) => format!("- {}", s),
            DiffLine::OnlyInActual(s) => format!("+ {}", s),
        }
    }
}

/// Diffs two text blocks line by line.
///
/// Lines are split the way `str::lines` splits them, so a trailing newline
/// does not produce an extra empty line.
///
/// # Examples
///
/// ```rust
/// use proctor::diff::{diff, DiffLine};
/// let lines = diff("a\nb\nc", "a\nx\nc");
/// assert_eq!(
///     lines,
///     vec![
///         DiffLine::Equal("a".into()),
///         DiffLine::OnlyInExpected("b".into()),
///         DiffLine::OnlyInActual("x".into()),
///         DiffLine::Equal("c".into()),
///     ]
/// );
/// ```
pub fn diff(expected: &str, actual: &str) -> Vec<DiffLine> {
    let expected: Vec<&str> = expected.lines().collect();
    let actual: Vec<&str> = actual.lines().collect();
    match (expected.is_empty(), actual.is_empty()) {
        (true, true) => return Vec::new(),
        (true, false) => return tag_all(&actual, DiffLine::OnlyInActual),
        (false, true) => return tag_all(&expected, DiffLine::OnlyInExpected),
        (false, false) => {}
    }

    let changeset = Changeset::new(&tokens(&expected), &tokens(&actual), "\n");
    let mut lines = Vec::new();
    for chunk in &changeset.diffs {
        match chunk {
            Difference::Same(text) => lines.extend(untokens(text, DiffLine::Equal)),
            Difference::Rem(text) => lines.extend(untokens(text, DiffLine::OnlyInExpected)),
            Difference::Add(text) => lines.extend(untokens(text, DiffLine::OnlyInActual)),
        }
    }
    lines
}

/// Diffs the pretty-printed forms of two values. An absent actual value
/// renders as `nil`.
pub fn diff_values(expected: &Value, actual: Option<&Value>) -> Vec<DiffLine> {
    let actual = actual.cloned().unwrap_or_default();
    diff(&expected.pretty(), &actual.pretty())
}

pub fn render_plain(lines: &[DiffLine]) -> Vec<String> {
    lines.iter().map(DiffLine::render).collect()
}

fn tag_all(lines: &[&str], tag: fn(String) -> DiffLine) -> Vec<DiffLine> {
    lines.iter().map(|line| tag(line.to_string())).collect()
}

// `Changeset` does not align empty tokens, so every line carries a marker.
const LINE_MARKER: char = '|';

fn tokens(lines: &[&str]) -> String {
    lines
        .iter()
        .map(|line| format!("{}{}", LINE_MARKER, line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn untokens(text: &str, tag: fn(String) -> DiffLine) -> Vec<DiffLine> {
    text.split('\n')
        .map(|token| tag(token.strip_prefix(LINE_MARKER).unwrap_or(token).to_string()))
        .collect()
}

use proctor::diff::{diff, diff_values, DiffLine};
use proctor::Value;

const EXPECTED: &str = "alpha\nbeta\ngamma\ndelta";
const ACTUAL: &str = "alpha\nBETA\ngamma\ndelta\nepsilon";

fn sorted(lines: impl IntoIterator<Item = DiffLine>) -> Vec<String> {
    let mut rendered: Vec<String> = lines.into_iter().map(|l| l.render()).collect();
    rendered.sort();
    rendered
}

#[test]
fn diff_of_a_block_with_itself_is_all_equal() {
    for text in [EXPECTED, ACTUAL, "", "single"] {
        assert!(diff(text, text).iter().all(DiffLine::is_equal));
    }
}

#[test]
fn swapping_sides_complements_every_tag() {
    let forward = diff(EXPECTED, ACTUAL);
    let backward = diff(ACTUAL, EXPECTED);
    assert_eq!(
        sorted(forward.iter().map(DiffLine::complement)),
        sorted(backward)
    );
}

#[test]
fn every_source_line_appears_once() {
    let lines = diff(EXPECTED, ACTUAL);
    let expected_side: Vec<_> = lines
        .iter()
        .filter(|l| !matches!(l, DiffLine::OnlyInActual(_)))
        .map(DiffLine::text)
        .collect();
    let actual_side: Vec<_> = lines
        .iter()
        .filter(|l| !matches!(l, DiffLine::OnlyInExpected(_)))
        .map(DiffLine::text)
        .collect();
    assert_eq!(expected_side, EXPECTED.lines().collect::<Vec<_>>());
    assert_eq!(actual_side, ACTUAL.lines().collect::<Vec<_>>());
}

#[test]
fn changed_line_is_removed_then_added() {
    let lines = diff(EXPECTED, ACTUAL);
    assert_eq!(
        lines,
        vec![
            DiffLine::Equal("alpha".into()),
            DiffLine::OnlyInExpected("beta".into()),
            DiffLine::OnlyInActual("BETA".into()),
            DiffLine::Equal("gamma".into()),
            DiffLine::Equal("delta".into()),
            DiffLine::OnlyInActual("epsilon".into()),
        ]
    );
}

#[test]
fn value_diff_uses_pretty_forms() {
    let long = |tail: i64| {
        Value::List(
            (0..20)
                .map(|i| Value::Int(1_000_000 + i))
                .chain(std::iter::once(Value::Int(tail)))
                .collect(),
        )
    };
    let lines = diff_values(&long(1), Some(&long(2)));
    let changed: Vec<_> = lines.iter().filter(|l| !l.is_equal()).collect();
    assert_eq!(
        changed,
        vec![
            &DiffLine::OnlyInExpected("    1,".into()),
            &DiffLine::OnlyInActual("    2,".into()),
        ]
    );
}

#[test]
fn absent_actual_value_diffs_against_nil() {
    assert_eq!(
        diff_values(&Value::Int(16), None),
        vec![
            DiffLine::OnlyInExpected("16".into()),
            DiffLine::OnlyInActual("nil".into()),
        ]
    );
}

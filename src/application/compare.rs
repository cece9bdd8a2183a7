use std::collections::BTreeSet;

use crate::domain::analysis::{FieldComparison, FieldStatus};

/// Absent, or blank after trimming.
pub fn is_empty(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Classify one input/fetched pair by plain string equality.
pub fn compare_field(name: &str, input: Option<&str>, fetched: Option<&str>) -> FieldComparison {
    classify(name, input, fetched, |a, b| a == b)
}

/// Classify a comma-separated multi-value pair by set membership.
///
/// Element order, surrounding whitespace and empty elements never cause a
/// mismatch.
pub fn compare_list_field(
    name: &str,
    input: Option<&str>,
    fetched: Option<&str>,
) -> FieldComparison {
    classify(name, input, fetched, |a, b| list_set(a) == list_set(b))
}

fn list_set(value: &str) -> BTreeSet<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect()
}

fn classify(
    name: &str,
    input: Option<&str>,
    fetched: Option<&str>,
    equal: impl Fn(&str, &str) -> bool,
) -> FieldComparison {
    let (status, matches) = match (input, fetched) {
        (i, f) if is_empty(i) && is_empty(f) => (FieldStatus::BothMissing, true),
        (_, f) if is_empty(f) => (FieldStatus::InputOnly, false),
        (i, _) if is_empty(i) => (FieldStatus::FetchedOnly, false),
        (Some(i), Some(f)) if equal(i, f) => (FieldStatus::Match, true),
        _ => (FieldStatus::Mismatch, false),
    };

    FieldComparison {
        field: name.to_string(),
        input_value: input.map(str::to_string),
        fetched_value: fetched.map(str::to_string),
        matches,
        status,
    }
}

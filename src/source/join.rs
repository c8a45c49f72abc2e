//! Left joins between record batches

use super::Record;
use indexmap::IndexSet;
use serde_json::Value;

/// Suffix for right-hand columns whose name is taken on the left
const CLASH_SUFFIX: &str = "_right";

/// Left-join `right` onto `left` where `left[left_on] == right[right_on]`.
///
/// The right key column is dropped. Left rows without a match get nulls
/// for every right column; rows with several matches are repeated once
/// per match. Null keys never match.
pub fn left_join(left: Vec<Record>, right: &[Record], left_on: &str, right_on: &str) -> Vec<Record> {
    let left_columns: IndexSet<&str> = left
        .iter()
        .flat_map(|row| row.keys().map(String::as_str))
        .collect();
    let right_columns: Vec<(&str, String)> = right
        .iter()
        .flat_map(|row| row.keys().map(String::as_str))
        .filter(|column| *column != right_on)
        .collect::<IndexSet<_>>()
        .into_iter()
        .map(|column| {
            let target = if left_columns.contains(column) {
                format!("{}{}", column, CLASH_SUFFIX)
            } else {
                column.to_string()
            };
            (column, target)
        })
        .collect();

    let mut joined = Vec::with_capacity(left.len());
    for row in &left {
        let matches: Vec<&Record> = match row.get(left_on) {
            Some(key) if !key.is_null() => right
                .iter()
                .filter(|candidate| candidate.get(right_on) == Some(key))
                .collect(),
            _ => Vec::new(),
        };

        if matches.is_empty() {
            joined.push(extend(row, None, &right_columns));
        } else {
            for matched in matches {
                joined.push(extend(row, Some(matched), &right_columns));
            }
        }
    }
    joined
}

fn extend(row: &Record, matched: Option<&Record>, columns: &[(&str, String)]) -> Record {
    let mut out = row.clone();
    for (column, target) in columns {
        let value = matched
            .and_then(|m| m.get(*column))
            .cloned()
            .unwrap_or(Value::Null);
        out.insert(target.clone(), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: Value) -> Vec<Record> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn matches_on_key_and_drops_right_key() {
        let left = records(json!([{"id": "1", "cat": "a"}]));
        let right = records(json!([{"code": "a", "label": "Alpha"}]));
        let out = left_join(left, &right, "cat", "code");
        assert_eq!(out, records(json!([{"id": "1", "cat": "a", "label": "Alpha"}])));
    }

    #[test]
    fn unmatched_rows_get_nulls() {
        let left = records(json!([{"cat": "z"}]));
        let right = records(json!([{"code": "a", "label": "Alpha"}]));
        let out = left_join(left, &right, "cat", "code");
        assert_eq!(out[0]["label"], Value::Null);
    }

    #[test]
    fn multiple_matches_duplicate_left_row() {
        let left = records(json!([{"cat": "a"}]));
        let right = records(json!([{"code": "a", "n": "1"}, {"code": "a", "n": "2"}]));
        let out = left_join(left, &right, "cat", "code");
        assert_eq!(out.len(), 2);
        assert_eq!(out[1]["n"], "2");
    }

    #[test]
    fn clashing_columns_are_suffixed() {
        let left = records(json!([{"cat": "a", "name": "left"}]));
        let right = records(json!([{"code": "a", "name": "right"}]));
        let out = left_join(left, &right, "cat", "code");
        assert_eq!(out[0]["name"], "left");
        assert_eq!(out[0]["name_right"], "right");
    }

    #[test]
    fn null_keys_never_match() {
        let left = records(json!([{"cat": null}]));
        let right = records(json!([{"code": null, "label": "x"}]));
        let out = left_join(left, &right, "cat", "code");
        assert_eq!(out[0]["label"], Value::Null);
    }
}

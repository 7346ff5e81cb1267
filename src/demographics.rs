//! Re-keying of demographic count tables into the output vocabulary.
//!
//! Every county publishes its own column names, so each one carries fixed
//! `(target_label, source_label)` tables and runs them through the helpers here.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::data_model::AgeGroup;
use crate::{Error, Result, SENTINEL};

/// Marker some sources use in place of small counts.
pub const SUPPRESSED: &str = "<10";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Count {
    Value(i64),
    Suppressed,
}

/// Interprets one source cell as a count.
///
/// `null` becomes the sentinel, `"<10"` is suppressed, anything else must be an integer.
pub fn coerce_count(key: &str, value: &Value) -> Result<Count> {
    let invalid = || Error::InvalidCount {
        key: key.to_string(),
        value: value.to_string(),
    };

    match value {
        Value::Null => Ok(Count::Value(SENTINEL)),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .map(Count::Value)
            .ok_or_else(invalid),
        Value::String(s) if s.trim() == SUPPRESSED => Ok(Count::Suppressed),
        Value::String(s) => s.trim().parse().map(Count::Value).map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

/// Collects the paths of suppressed counts seen while re-keying a table.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Suppressed(pub Vec<String>);

impl Suppressed {
    fn resolve(&mut self, path: String, count: Count) -> i64 {
        match count {
            Count::Value(n) => n,
            Count::Suppressed => {
                self.0.push(path);
                SENTINEL
            }
        }
    }
}

/// Builds a `target_label -> count` map from a fixed table.
///
/// Source columns are looked up as `{prefix}{source_label}`; columns the source
/// does not publish are filled with the sentinel.
pub fn rekey(
    table: &[(&str, &str)],
    source: &Map<String, Value>,
    prefix: &str,
    suppressed: &mut Suppressed,
) -> Result<BTreeMap<String, i64>> {
    table
        .iter()
        .map(|(target, src)| {
            let column = format!("{prefix}{src}");
            let count = lookup(source, &column)?;
            Ok((target.to_string(), suppressed.resolve(column, count)))
        })
        .collect()
}

/// Same as [`rekey`], but keeps the table's bucket order.
pub fn age_table(
    table: &[(&str, &str)],
    source: &Map<String, Value>,
    prefix: &str,
    suppressed: &mut Suppressed,
) -> Result<Vec<AgeGroup>> {
    table
        .iter()
        .map(|(target, src)| {
            let column = format!("{prefix}{src}");
            let count = lookup(source, &column)?;
            Ok(AgeGroup {
                group: target.to_string(),
                raw_count: suppressed.resolve(column, count),
            })
        })
        .collect()
}

fn lookup(source: &Map<String, Value>, column: &str) -> Result<Count> {
    match source.get(column) {
        Some(value) => coerce_count(column, value),
        None => Ok(Count::Value(SENTINEL)),
    }
}

/// Maps `(source_label, count)` rows onto a fixed label table.
///
/// Labels the table does not know are an error, since they mean the source changed
/// its categories, and so is a label reported twice. Known labels missing from `rows`
/// get the sentinel. Suppressed counts are recorded under their source label.
pub fn rekey_rows(
    table: &[(&str, &str)],
    rows: &[(String, Count)],
    suppressed: &mut Suppressed,
) -> Result<Vec<(String, i64)>> {
    for (idx, (label, _)) in rows.iter().enumerate() {
        if !table.iter().any(|(_, src)| *src == label.as_str()) {
            return Err(Error::UnknownLabel(label.clone()));
        }
        if rows[..idx].iter().any(|(seen, _)| seen == label) {
            return Err(Error::InconsistentData(format!(
                "label {label} appears twice"
            )));
        }
    }

    Ok(table
        .iter()
        .map(|(target, src)| {
            let count = rows
                .iter()
                .find(|(label, _)| label.as_str() == *src)
                .map(|(_, count)| *count)
                .unwrap_or(Count::Value(SENTINEL));
            (target.to_string(), suppressed.resolve(src.to_string(), count))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const GENDER: &[(&str, &str)] = &[("female", "Female"), ("male", "Male"), ("mtf", "MTF")];

    #[test]
    fn coerces_counts() {
        assert_eq!(coerce_count("a", &json!(null)).unwrap(), Count::Value(-1));
        assert_eq!(coerce_count("a", &json!(12)).unwrap(), Count::Value(12));
        assert_eq!(coerce_count("a", &json!(12.0)).unwrap(), Count::Value(12));
        assert_eq!(coerce_count("a", &json!(" 7 ")).unwrap(), Count::Value(7));
        assert_eq!(coerce_count("a", &json!("<10")).unwrap(), Count::Suppressed);
    }

    #[test]
    fn non_numeric_strings_are_rejected() {
        match coerce_count("Female", &json!("n/a")) {
            Err(Error::InvalidCount { key, value }) => {
                assert_eq!(key, "Female");
                assert_eq!(value, "\"n/a\"");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(coerce_count("Female", &json!(true)).is_err());
    }

    #[test]
    fn rekey_fills_absent_and_null_with_sentinel() {
        let source = json!({ "Deaths_Female": 4, "Deaths_Male": null });
        let mut suppressed = Suppressed::default();
        let out = rekey(GENDER, source.as_object().unwrap(), "Deaths_", &mut suppressed).unwrap();
        assert_eq!(out["female"], 4);
        assert_eq!(out["male"], -1);
        assert_eq!(out["mtf"], -1);
        assert!(suppressed.0.is_empty());
    }

    #[test]
    fn suppressed_counts_are_recorded() {
        let source = json!({ "Female": "<10", "Male": 20, "MTF": 0 });
        let mut suppressed = Suppressed::default();
        let out = rekey(GENDER, source.as_object().unwrap(), "", &mut suppressed).unwrap();
        assert_eq!(out["female"], -1);
        assert_eq!(suppressed.0, vec!["Female".to_string()]);
    }

    #[test]
    fn age_table_keeps_bucket_order() {
        let table = &[("81_and_older", "Age_81_Up"), ("18_and_under", "Age_LT18")];
        let source = json!({ "Age_LT18": 3, "Age_81_Up": 9 });
        let mut suppressed = Suppressed::default();
        let out = age_table(table, source.as_object().unwrap(), "", &mut suppressed).unwrap();
        let groups: Vec<_> = out.iter().map(|g| g.group.as_str()).collect();
        assert_eq!(groups, ["81_and_older", "18_and_under"]);
        assert_eq!(out[0].raw_count, 9);
    }

    #[test]
    fn rekey_rows_rejects_unknown_labels() {
        let rows = vec![
            ("Female".to_string(), Count::Value(1)),
            ("Nonbinary".to_string(), Count::Value(2)),
        ];
        match rekey_rows(GENDER, &rows, &mut Suppressed::default()) {
            Err(Error::UnknownLabel(label)) => assert_eq!(label, "Nonbinary"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn rekey_rows_rejects_repeated_labels() {
        let rows = vec![
            ("Female".to_string(), Count::Value(1)),
            ("Female".to_string(), Count::Value(2)),
        ];
        assert!(matches!(
            rekey_rows(GENDER, &rows, &mut Suppressed::default()),
            Err(Error::InconsistentData(_))
        ));
    }

    #[test]
    fn rekey_rows_resolves_suppressed_counts() {
        let rows = vec![
            ("Female".to_string(), Count::Suppressed),
            ("Male".to_string(), Count::Value(12)),
        ];
        let mut suppressed = Suppressed::default();
        let out = rekey_rows(GENDER, &rows, &mut suppressed).unwrap();
        assert_eq!(out[0], ("female".to_string(), -1));
        assert_eq!(out[1], ("male".to_string(), 12));
        assert_eq!(suppressed.0, vec!["Female".to_string()]);
    }

    #[test]
    fn rekey_rows_fills_missing_labels() {
        let rows = vec![("Male".to_string(), Count::Value(5))];
        let out = rekey_rows(GENDER, &rows, &mut Suppressed::default()).unwrap();
        assert_eq!(
            out,
            vec![
                ("female".to_string(), -1),
                ("male".to_string(), 5),
                ("mtf".to_string(), -1),
            ]
        );
    }
}

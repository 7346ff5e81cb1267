//! Querying public Power BI reports.
//!
//! Public reports answer `querydata` POSTs with a compressed "data shape result":
//! `results[0].result.data.dsr.DS[0].PH[0].DM0` holds the rows, each row's `C`
//! array only carries the cells that are neither repeated from the previous row
//! (`R` bitmask) nor null (`Ø` bitmask), and string columns can be dictionary
//! encoded through `ValueDicts`.

use std::collections::BTreeMap;

use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use serde_json::{json, Map, Value};

use crate::demographics::{coerce_count, Count};
use crate::request::post_json;
use crate::utils::{as_i64, as_str, count_cell, dig, wrong_type, Key};
use crate::{Error, Result};

pub type Row = Vec<Value>;

/// A grouped query against one table of a report's model.
#[derive(Debug, Clone, Copy)]
pub struct PowerBiQuery<'a> {
    pub entity: &'a str,
    /// Grouping columns, the first one also orders the result.
    pub columns: &'a [&'a str],
    /// Columns summed per group.
    pub measures: &'a [&'a str],
}

impl PowerBiQuery<'_> {
    fn column_ref(property: &str) -> Value {
        json!({
            "Column": {
                "Expression": { "SourceRef": { "Source": "t" } },
                "Property": property
            }
        })
    }

    /// Builds the `querydata` request body.
    pub fn body(&self, model_id: i64) -> Value {
        let mut select = Vec::with_capacity(self.columns.len() + self.measures.len());
        for column in self.columns {
            let mut sel = Self::column_ref(column);
            sel["Name"] = json!(format!("{}.{}", self.entity, column));
            select.push(sel);
        }
        for measure in self.measures {
            select.push(json!({
                "Aggregation": { "Expression": Self::column_ref(measure), "Function": 0 },
                "Name": format!("Sum({}.{})", self.entity, measure)
            }));
        }
        let projections: Vec<usize> = (0..select.len()).collect();

        let mut query = json!({
            "Version": 2,
            "From": [{ "Name": "t", "Entity": self.entity, "Type": 0 }],
            "Select": select
        });
        if let Some(first) = self.columns.first() {
            query["OrderBy"] = json!([{ "Direction": 1, "Expression": Self::column_ref(first) }]);
        }

        json!({
            "version": "1.0.0",
            "queries": [{
                "Query": {
                    "Commands": [{
                        "SemanticQueryDataShapeCommand": {
                            "Query": query,
                            "Binding": {
                                "Primary": { "Groupings": [{ "Projections": projections }] },
                                "DataReduction": {
                                    "DataVolume": 4,
                                    "Primary": { "Window": { "Count": 30000 } }
                                },
                                "Version": 1
                            }
                        }
                    }]
                },
                "QueryId": ""
            }],
            "cancelQueries": [],
            "modelId": model_id
        })
    }
}

/// Connection details of one published report.
#[derive(Debug, Clone, Copy)]
pub struct PowerBiQuerier {
    pub url: &'static str,
    pub resource_key: &'static str,
    pub model_id: i64,
}

impl PowerBiQuerier {
    /// Runs `query` and returns the decoded rows.
    pub async fn rows(&self, client: &Client, query: &PowerBiQuery<'_>) -> Result<Vec<Row>> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-powerbi-resourcekey",
            HeaderValue::from_static(self.resource_key),
        );
        let response = post_json(client, self.url, headers, &query.body(self.model_id)).await?;
        parse_dsr(&response)
    }
}

/// Decodes the rows of a `querydata` response.
pub fn parse_dsr(response: &Value) -> Result<Vec<Row>> {
    let ds = dig(
        response,
        &[
            "results".into(),
            Key::Index(0),
            "result".into(),
            "data".into(),
            "dsr".into(),
            "DS".into(),
            Key::Index(0),
        ],
    )?;
    let dm0 = dig(ds, &["PH".into(), Key::Index(0), "DM0".into()])?
        .as_array()
        .ok_or_else(|| wrong_type("DM0", "an array"))?;
    let Some(first) = dm0.first() else {
        return Ok(Vec::new());
    };

    let empty = Map::new();
    let value_dicts = ds
        .get("ValueDicts")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let schema = dig(first, &["S".into()])?
        .as_array()
        .ok_or_else(|| wrong_type("S", "an array"))?;
    let dicts = schema
        .iter()
        .map(|col| match col.get("DN").and_then(Value::as_str) {
            Some(name) => value_dicts
                .get(name)
                .and_then(Value::as_array)
                .map(Some)
                .ok_or_else(|| Error::MissingField(format!("ValueDicts.{name}"))),
            None => Ok(None),
        })
        .collect::<Result<Vec<_>>>()?;

    let mut rows: Vec<Row> = Vec::with_capacity(dm0.len());
    for raw in dm0 {
        let repeat = bitmask(raw, "R")?;
        let null = bitmask(raw, "Ø")?;
        let mut cells = raw
            .get("C")
            .and_then(Value::as_array)
            .map(|c| c.iter())
            .unwrap_or_default();

        let mut row = Vec::with_capacity(schema.len());
        for (idx, dict) in dicts.iter().enumerate() {
            let cell = if bit_set(repeat, idx) {
                rows.last()
                    .map(|prev| prev[idx].clone())
                    .ok_or_else(|| Error::InconsistentData("first row repeats a value".into()))?
            } else if bit_set(null, idx) {
                Value::Null
            } else {
                let value = cells
                    .next()
                    .ok_or_else(|| Error::InconsistentData("row is missing cells".into()))?;
                decode(value, *dict)?
            };
            row.push(cell);
        }
        rows.push(row);
    }
    Ok(rows)
}

fn bitmask(row: &Value, key: &str) -> Result<u64> {
    match row.get(key) {
        Some(value) => value.as_u64().ok_or_else(|| wrong_type(key, "a bitmask")),
        None => Ok(0),
    }
}

/// Masks only cover the first 64 columns.
fn bit_set(mask: u64, idx: usize) -> bool {
    u32::try_from(idx)
        .ok()
        .and_then(|shift| 1u64.checked_shl(shift))
        .is_some_and(|bit| mask & bit != 0)
}

fn decode(value: &Value, dict: Option<&Vec<Value>>) -> Result<Value> {
    match (dict, value) {
        (Some(dict), Value::Number(n)) => n
            .as_u64()
            .and_then(|idx| dict.get(idx as usize))
            .cloned()
            .ok_or_else(|| Error::InconsistentData(format!("no dictionary entry {n}"))),
        _ => Ok(value.clone()),
    }
}

/// Reads `(label, count)` rows, counts follow the demographic cell rules.
pub fn label_counts(rows: &[Row]) -> Result<Vec<(String, Count)>> {
    rows.iter()
        .map(|row| match row.as_slice() {
            [label, count, ..] => {
                let label = as_str(label, "label")?;
                Ok((label.to_string(), coerce_count(label, count)?))
            }
            _ => Err(Error::InconsistentData("expected a label and a count".into())),
        })
        .collect()
}

/// Reads `(timestamp, count)` rows into a timestamp-ordered series.
pub fn timeseries(rows: &[Row]) -> Result<BTreeMap<i64, i64>> {
    let mut series = BTreeMap::new();
    for row in rows {
        let [timestamp, count, ..] = row.as_slice() else {
            return Err(Error::InconsistentData("expected a timestamp and a count".into()));
        };
        let timestamp = as_i64(timestamp, "timestamp")?;
        if series.insert(timestamp, count_cell(count, "count")?).is_some() {
            return Err(Error::InconsistentData(format!(
                "timestamp {timestamp} appears twice"
            )));
        }
    }
    Ok(series)
}

/// Reads a single aggregated value.
pub fn single_value(rows: &[Row]) -> Result<i64> {
    match rows {
        [row] => match row.as_slice() {
            [value] => as_i64(value, "value"),
            _ => Err(Error::InconsistentData("expected one column".into())),
        },
        _ => Err(Error::InconsistentData(format!(
            "expected one row, got {}",
            rows.len()
        ))),
    }
}

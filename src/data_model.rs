//! The shared output schema every county fills in.
//!
//! The empty template lives in `data_model.json` and is compiled into the binary,
//! [`get_data_model`] hands out a fresh copy of it for every run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Result, SENTINEL};

const DATA_MODEL: &str = include_str!("data_model.json");

/// Loads the empty county record.
pub fn get_data_model() -> Result<County> {
    Ok(serde_json::from_str(DATA_MODEL)?)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct County {
    pub name: String,
    pub update_time: String,
    pub source_url: String,
    pub meta_from_source: Option<String>,
    pub meta_from_baypd: String,
    pub series: Series,
    pub case_totals: Totals,
    pub death_totals: Totals,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub cases: Vec<CaseRecord>,
    pub deaths: Vec<DeathRecord>,
    pub tests: Vec<TestRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub date: String,
    pub cases: i64,
    pub cumul_cases: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathRecord {
    pub date: String,
    pub deaths: i64,
    pub cumul_deaths: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRecord {
    pub date: String,
    pub tests: i64,
    pub positive: i64,
    pub negative: i64,
    pub pending: i64,
    pub cumul_tests: i64,
    pub cumul_pos: i64,
    pub cumul_neg: i64,
    pub cumul_pend: i64,
}

impl CaseRecord {
    pub fn empty(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            cases: SENTINEL,
            cumul_cases: SENTINEL,
        }
    }
}

impl DeathRecord {
    pub fn empty(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            deaths: SENTINEL,
            cumul_deaths: SENTINEL,
        }
    }
}

impl TestRecord {
    pub fn empty(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            tests: SENTINEL,
            positive: SENTINEL,
            negative: SENTINEL,
            pending: SENTINEL,
            cumul_tests: SENTINEL,
            cumul_pos: SENTINEL,
            cumul_neg: SENTINEL,
            cumul_pend: SENTINEL,
        }
    }
}

/// Demographic breakdown for either cases or deaths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub gender: BTreeMap<String, i64>,
    pub age_group: Vec<AgeGroup>,
    pub race_eth: BTreeMap<String, i64>,
}

/// Age buckets are a list rather than a map so bucket order survives serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeGroup {
    pub group: String,
    pub raw_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_is_empty() {
        let county = get_data_model().unwrap();
        assert_eq!(county.name, "");
        assert_eq!(county.meta_from_source.as_deref(), Some(""));
        assert!(county.series.cases.is_empty());
        assert!(county.series.deaths.is_empty());
        assert!(county.series.tests.is_empty());
        assert!(county.case_totals.gender.is_empty());
        assert!(county.death_totals.age_group.is_empty());
    }

    #[test]
    fn empty_test_record_is_all_sentinel() {
        let json = serde_json::to_value(TestRecord::empty("2020-05-01")).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 9);
        for (key, value) in obj {
            if key != "date" {
                assert_eq!(value, -1, "{key}");
            }
        }
    }
}

use std::collections::BTreeMap;

use reqwest::Client;

use super::fetch_breakdown;
use crate::power_bi::PowerBiQuery;
use crate::Result;

/// `(target_label, source_label)`
const GENDER_KEYS: &[(&str, &str)] = &[
    ("female", "Female"),
    ("male", "Male"),
    ("other", "Other"),
    ("unknown", "Unknown"),
];

const CASES_QUERY: PowerBiQuery<'static> = PowerBiQuery {
    entity: "cases_by_gender",
    columns: &["gender"],
    measures: &["count"],
};

const DEATHS_QUERY: PowerBiQuery<'static> = PowerBiQuery {
    entity: "deaths_by_gender",
    columns: &["gender"],
    measures: &["count"],
};

pub struct CasesByGender;

impl CasesByGender {
    pub async fn get_data(&self, client: &Client) -> Result<BTreeMap<String, i64>> {
        Ok(fetch_breakdown(client, &CASES_QUERY, GENDER_KEYS)
            .await?
            .into_iter()
            .collect())
    }
}

pub struct DeathsByGender;

impl DeathsByGender {
    pub async fn get_data(&self, client: &Client) -> Result<BTreeMap<String, i64>> {
        Ok(fetch_breakdown(client, &DEATHS_QUERY, GENDER_KEYS)
            .await?
            .into_iter()
            .collect())
    }
}

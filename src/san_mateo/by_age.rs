use reqwest::Client;

use super::fetch_breakdown;
use crate::data_model::AgeGroup;
use crate::power_bi::PowerBiQuery;
use crate::Result;

/// Ordered `(target_label, source_label)` buckets.
const AGE_KEYS: &[(&str, &str)] = &[
    ("0_to_19", "0-19"),
    ("20_to_29", "20-29"),
    ("30_to_39", "30-39"),
    ("40_to_49", "40-49"),
    ("50_to_59", "50-59"),
    ("60_to_69", "60-69"),
    ("70_to_79", "70-79"),
    ("80_to_89", "80-89"),
    ("90_and_older", "90+"),
    ("Unknown", "Unknown"),
];

const CASES_QUERY: PowerBiQuery<'static> = PowerBiQuery {
    entity: "cases_by_age",
    columns: &["age_group"],
    measures: &["count"],
};

const DEATHS_QUERY: PowerBiQuery<'static> = PowerBiQuery {
    entity: "deaths_by_age",
    columns: &["age_group"],
    measures: &["count"],
};

fn to_age_groups(counts: Vec<(String, i64)>) -> Vec<AgeGroup> {
    counts
        .into_iter()
        .map(|(group, raw_count)| AgeGroup { group, raw_count })
        .collect()
}

pub struct CasesByAge;

impl CasesByAge {
    pub async fn get_data(&self, client: &Client) -> Result<Vec<AgeGroup>> {
        let counts = fetch_breakdown(client, &CASES_QUERY, AGE_KEYS).await?;
        Ok(to_age_groups(counts))
    }
}

pub struct DeathsByAge;

impl DeathsByAge {
    pub async fn get_data(&self, client: &Client) -> Result<Vec<AgeGroup>> {
        let counts = fetch_breakdown(client, &DEATHS_QUERY, AGE_KEYS).await?;
        Ok(to_age_groups(counts))
    }
}

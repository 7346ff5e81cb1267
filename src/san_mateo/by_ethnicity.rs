use std::collections::BTreeMap;

use reqwest::Client;

use super::fetch_breakdown;
use crate::power_bi::PowerBiQuery;
use crate::Result;

/// `(target_label, source_label)`
const RACE_KEYS: &[(&str, &str)] = &[
    ("Latinx_or_Hispanic", "Latino/Hispanic"),
    ("Asian", "Asian"),
    ("African_Amer", "Black"),
    ("White", "White"),
    ("Pacific_Islander", "Pacific Islander"),
    ("Native_Amer", "Native American"),
    ("Multiple_Race", "Multirace"),
    ("Other", "Other"),
    ("Unknown", "Unknown"),
];

const CASES_QUERY: PowerBiQuery<'static> = PowerBiQuery {
    entity: "cases_by_race_ethnicity",
    columns: &["race_ethnicity"],
    measures: &["count"],
};

const DEATHS_QUERY: PowerBiQuery<'static> = PowerBiQuery {
    entity: "deaths_by_race_ethnicity",
    columns: &["race_ethnicity"],
    measures: &["count"],
};

pub struct CasesByEthnicity;

impl CasesByEthnicity {
    pub async fn get_data(&self, client: &Client) -> Result<BTreeMap<String, i64>> {
        Ok(fetch_breakdown(client, &CASES_QUERY, RACE_KEYS)
            .await?
            .into_iter()
            .collect())
    }
}

pub struct DeathsByEthnicity;

impl DeathsByEthnicity {
    pub async fn get_data(&self, client: &Client) -> Result<BTreeMap<String, i64>> {
        Ok(fetch_breakdown(client, &DEATHS_QUERY, RACE_KEYS)
            .await?
            .into_iter()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::demographics::{rekey_rows, Suppressed};
    use crate::power_bi::label_counts;

    #[test]
    fn rekeys_dashboard_labels() {
        let rows = vec![
            vec![json!("Latino/Hispanic"), json!(812)],
            vec![json!("Black"), json!(40)],
            vec![json!("Unknown"), json!(null)],
        ];
        let out: BTreeMap<_, _> = rekey_rows(
            RACE_KEYS,
            &label_counts(&rows).unwrap(),
            &mut Suppressed::default(),
        )
        .unwrap()
            .into_iter()
            .collect();

        assert_eq!(out.len(), RACE_KEYS.len());
        assert_eq!(out["Latinx_or_Hispanic"], 812);
        assert_eq!(out["African_Amer"], 40);
        assert_eq!(out["Unknown"], -1);
        assert_eq!(out["White"], -1);
    }
}

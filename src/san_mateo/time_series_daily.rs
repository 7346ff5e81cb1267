use std::collections::BTreeMap;

use reqwest::Client;

use super::POWER_BI;
use crate::power_bi::{timeseries, PowerBiQuery};
use crate::Result;

const QUERY: PowerBiQuery<'static> = PowerBiQuery {
    entity: "cases_by_episode_date",
    columns: &["episode_date"],
    measures: &["new_cases"],
};

/// New cases per day, keyed by millisecond timestamp.
pub struct TimeSeriesDaily;

impl TimeSeriesDaily {
    pub async fn get_data(&self, client: &Client) -> Result<BTreeMap<i64, i64>> {
        let rows = POWER_BI.rows(client, &QUERY).await?;
        timeseries(&rows)
    }
}

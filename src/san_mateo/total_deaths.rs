use reqwest::Client;

use super::POWER_BI;
use crate::power_bi::{single_value, PowerBiQuery};
use crate::Result;

const QUERY: PowerBiQuery<'static> = PowerBiQuery {
    entity: "deaths",
    columns: &[],
    measures: &["count"],
};

pub struct TotalDeaths;

impl TotalDeaths {
    pub async fn get_data(&self, client: &Client) -> Result<i64> {
        let rows = POWER_BI.rows(client, &QUERY).await?;
        single_value(&rows)
    }
}

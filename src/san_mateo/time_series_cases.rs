use std::collections::BTreeMap;

use reqwest::Client;

use super::{TimeSeriesCumulative, TimeSeriesDaily};
use crate::data_model::CaseRecord;
use crate::utils::timestamp_to_date;
use crate::{Error, Result};

/// Daily and cumulative cases joined on their shared dates.
pub struct TimeSeriesCases;

impl TimeSeriesCases {
    pub async fn get_data(&self, client: &Client) -> Result<Vec<CaseRecord>> {
        let daily_cases = TimeSeriesDaily.get_data(client).await?;
        let cumulative_cases = TimeSeriesCumulative.get_data(client).await?;
        join_daily_and_cumulative(&daily_cases, &cumulative_cases)
    }
}

/// Produces one record per timestamp, in the order of `daily_cases`.
///
/// Both series must cover exactly the same timestamps, otherwise nothing is returned.
pub fn join_daily_and_cumulative(
    daily_cases: &BTreeMap<i64, i64>,
    cumulative_cases: &BTreeMap<i64, i64>,
) -> Result<Vec<CaseRecord>> {
    if !daily_cases.keys().eq(cumulative_cases.keys()) {
        return Err(Error::SeriesMismatch("cases"));
    }

    daily_cases
        .iter()
        .map(|(timestamp, cases)| {
            Ok(CaseRecord {
                date: timestamp_to_date(*timestamp)?,
                cases: *cases,
                cumul_cases: cumulative_cases[timestamp],
            })
        })
        .collect()
}

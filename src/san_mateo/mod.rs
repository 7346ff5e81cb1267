//! San Mateo County publishes through a public Power BI report plus a landing page
//! with the dataset notes.

mod by_age;
mod by_ethnicity;
mod by_gender;
mod meta;
mod time_series_cases;
mod time_series_cumulative;
mod time_series_daily;
mod total_deaths;

use chrono::{Local, NaiveDate};
use chrono_tz::America::Los_Angeles;
use reqwest::Client;

pub use by_age::{CasesByAge, DeathsByAge};
pub use by_ethnicity::{CasesByEthnicity, DeathsByEthnicity};
pub use by_gender::{CasesByGender, DeathsByGender};
pub use meta::Meta;
pub use time_series_cases::{join_daily_and_cumulative, TimeSeriesCases};
pub use time_series_cumulative::TimeSeriesCumulative;
pub use time_series_daily::TimeSeriesDaily;
pub use time_series_tests::{tests_from_rows, TimeSeriesTests};
pub use total_deaths::TotalDeaths;

use crate::data_model::{get_data_model, County, DeathRecord, Series, Totals};
use crate::demographics::{rekey_rows, Suppressed};
use crate::power_bi::{label_counts, PowerBiQuerier, PowerBiQuery};
use crate::{info_time, Error, Result, SENTINEL};

pub const LANDING_PAGE: &str = "https://www.smchealth.org/post/san-mateo-county-covid-19-data-1";

/// Public report the charts are queried from. The url, resource key and model id,
/// together with the entity and column names in each extractor's query, must match
/// the report the county currently publishes. The values here are stand-ins to be
/// replaced with those read from the live dashboard's `querydata` requests.
const POWER_BI: PowerBiQuerier = PowerBiQuerier {
    url: "https://wabi-us-gov-virginia-api.analysis.usgovcloudapi.net/public/reports/querydata?synchronous=true",
    resource_key: "1b96a93b-9500-44cf-a3ce-942805b455ce",
    model_id: 275_725,
};

/// The source has no update timestamp. Midnight of the latest case date is used,
/// expressed as this many hours past UTC midnight so the Pacific date stays the same.
const MIDNIGHT_PROXY_HOURS: u32 = 8;

const META_FROM_BAYPD: &str = "San Mateo does not publish a timestamp for its last dataset update, \
so midnight of the latest day in the cases timeseries is used as a proxy. \
San Mateo does not publish a deaths timeseries either; in its place the series holds the \
cumulative deaths on the date of the last dataset update.";

pub async fn get_county(client: &Client) -> Result<County> {
    let start_time = Local::now();
    let mut out = get_data_model()?;

    out.name = "San Mateo County".to_string();
    out.source_url = LANDING_PAGE.to_string();
    out.meta_from_source = Some(Meta.get_data(client).await?);
    out.meta_from_baypd = META_FROM_BAYPD.to_string();

    out.series = Series {
        cases: TimeSeriesCases.get_data(client).await?,
        deaths: Vec::new(),
        tests: TimeSeriesTests.get_data(client).await?,
    };
    out.case_totals = Totals {
        gender: CasesByGender.get_data(client).await?,
        age_group: CasesByAge.get_data(client).await?,
        race_eth: CasesByEthnicity.get_data(client).await?,
    };
    out.death_totals = Totals {
        gender: DeathsByGender.get_data(client).await?,
        age_group: DeathsByAge.get_data(client).await?,
        race_eth: DeathsByEthnicity.get_data(client).await?,
    };

    let total_deaths = TotalDeaths.get_data(client).await?;
    backfill(&mut out, total_deaths)?;

    info_time!(start_time, "Fetched {}", out.name);
    Ok(out)
}

/// Derives `update_time` from the cases series and fills in the one-point deaths series.
pub fn backfill(county: &mut County, total_deaths: i64) -> Result<()> {
    let last_updated = most_recent_case_time(county)?;
    county.series.deaths = cumulative_deaths(&last_updated, total_deaths);
    county.update_time = last_updated;
    Ok(())
}

/// Midnight Pacific of the latest day in the cases series, as ISO-8601 with offset.
pub fn most_recent_case_time(county: &County) -> Result<String> {
    let most_recent = county
        .series
        .cases
        .last()
        .ok_or_else(|| Error::MissingField("series.cases.[-1]".into()))?;

    let date = NaiveDate::parse_from_str(&most_recent.date, "%Y-%m-%d")?;
    let start_of_day = date
        .and_hms_opt(MIDNIGHT_PROXY_HOURS, 0, 0)
        .ok_or_else(|| Error::InconsistentData(format!("invalid date {date}")))?
        .and_utc();
    Ok(start_of_day.with_timezone(&Los_Angeles).to_rfc3339())
}

/// There is no deaths timeseries, only the cumulative total on the last update.
pub fn cumulative_deaths(last_updated: &str, total_deaths: i64) -> Vec<DeathRecord> {
    vec![DeathRecord {
        date: last_updated.to_string(),
        deaths: SENTINEL,
        cumul_deaths: total_deaths,
    }]
}

/// Fetches one `(label, count)` chart and maps it onto `table`.
/// Suppressed counts come back as the sentinel and are logged.
pub(crate) async fn fetch_breakdown(
    client: &Client,
    query: &PowerBiQuery<'_>,
    table: &[(&str, &str)],
) -> Result<Vec<(String, i64)>> {
    let rows = POWER_BI.rows(client, query).await?;
    let mut suppressed = Suppressed::default();
    let counts = rekey_rows(table, &label_counts(&rows)?, &mut suppressed)?;
    if !suppressed.0.is_empty() {
        info_time!(
            "{} suppressed counts: {}",
            query.entity,
            suppressed.0.join(", ")
        );
    }
    Ok(counts)
}

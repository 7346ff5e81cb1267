//! Solano County publishes a single ArcGIS layer with daily cumulative cases, deaths and
//! residents tested, plus new confirmed cases per day. Test results are not reported.

use chrono::Local;
use reqwest::Client;
use serde_json::Value;

use crate::arcgis::{last_edit_time, query_features, Attributes};
use crate::data_model::{
    get_data_model, CaseRecord, County, DeathRecord, Series, TestRecord, Totals,
};
use crate::demographics::{age_table, coerce_count, rekey, Suppressed};
use crate::request::get_json;
use crate::utils::{as_i64, count_cell, timestamp_to_iso, to_iso};
use crate::{info_time, Error, Result};

pub const DATA_URL: &str = "https://services2.arcgis.com/SCn6czzcqKAFwdGU/ArcGIS/rest/services/COVID_19_Survey_part_1_v2_new_public_view/FeatureServer/0/query";
pub const METADATA_URL: &str = "https://services2.arcgis.com/SCn6czzcqKAFwdGU/ArcGIS/rest/services/COVID_19_Survey_part_1_v2_new_public_view/FeatureServer/0";
pub const DASHBOARD_URL: &str =
    "https://doitgis.maps.arcgis.com/apps/MapSeries/index.html?appid=055f81e9fe154da5860257e3f2489d67";

const META_FROM_BAYPD: &str = "Solano County reports daily cumulative cases, deaths, and residents tested. \
The county also separately reports new daily confirmed cases. \
Solano reports cumulative tests, but does not report test results.";

/// Days with at least one case, ordered by report date.
const TIMESERIES_PARAMS: &[(&str, &str)] = &[
    ("where", "cumulative_number_of_cases_on_t>0"),
    ("resultType", "none"),
    (
        "outFields",
        "date_reported,cumulative_number_of_cases_on_t,total_deaths,residents_tested,new_cases_confirmed_today",
    ),
    ("orderByFields", "date_reported"),
    ("f", "json"),
];

/// Where a source field lands in the output series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Date,
    Cases,
    CumulCases,
    CumulDeaths,
    CumulTests,
}

/// `(source_label, target)`
const TIMESERIES_KEYS: &[(&str, Target)] = &[
    ("date_reported", Target::Date),
    ("new_cases_confirmed_today", Target::Cases),
    ("cumulative_number_of_cases_on_t", Target::CumulCases),
    ("total_deaths", Target::CumulDeaths),
    ("residents_tested", Target::CumulTests),
];

pub async fn get_county(client: &Client) -> Result<County> {
    let start_time = Local::now();
    let mut out = get_data_model()?;

    out.name = "Solano County".to_string();
    out.source_url = DATA_URL.to_string();
    out.meta_from_source = get_notes();
    out.meta_from_baypd = META_FROM_BAYPD.to_string();

    let metadata = get_json(client, METADATA_URL, &[("f", "pjson")]).await?;
    out.update_time = to_iso(&last_edit_time(&metadata)?);

    out.series = get_timeseries(client).await?;

    info_time!(start_time, "Fetched {}", out.name);
    Ok(out)
}

/// Fetches cumulative cases, deaths and tests by day.
pub async fn get_timeseries(client: &Client) -> Result<Series> {
    let features = query_features(client, DATA_URL, TIMESERIES_PARAMS).await?;
    split_series(&features)
}

/// Re-keys each feature into parallel cases, deaths and tests records.
/// Every value the source does not report stays at the sentinel.
pub fn split_series(features: &[Attributes]) -> Result<Series> {
    let mut series = Series::default();

    for attrs in features {
        let mut date = None;
        let mut cases = CaseRecord::empty("");
        let mut deaths = DeathRecord::empty("");
        let mut tests = TestRecord::empty("");

        for (key, value) in attrs {
            let target = TIMESERIES_KEYS
                .iter()
                .find(|(src, _)| *src == key.as_str())
                .map(|(_, target)| *target)
                .ok_or_else(|| Error::UnknownField(key.clone()))?;

            match target {
                Target::Date => date = Some(timestamp_to_iso(as_i64(value, key)?)?),
                Target::Cases => cases.cases = count_cell(value, key)?,
                Target::CumulCases => cases.cumul_cases = count_cell(value, key)?,
                Target::CumulDeaths => deaths.cumul_deaths = count_cell(value, key)?,
                Target::CumulTests => tests.cumul_tests = count_cell(value, key)?,
            }
        }

        let date = date.ok_or_else(|| Error::MissingField("date_reported".into()))?;
        cases.date = date.clone();
        deaths.date = date.clone();
        tests.date = date;

        series.cases.push(cases);
        series.deaths.push(deaths);
        series.tests.push(tests);
    }
    Ok(series)
}

/// Notes and disclaimers from the dashboard.
///
/// The dashboard only renders in a browser, and at the moment it only says
/// "Data update weekdays at 4:30pm", so nothing is scraped.
pub fn get_notes() -> Option<String> {
    info_time!("No notes scraped from {DASHBOARD_URL}");
    None
}

/// `(target_label, source_label)`. The cases table has MTF and FTM, the deaths table does not.
const GENDER_KEYS: &[(&str, &str)] = &[
    ("female", "Female"),
    ("male", "Male"),
    ("unknown", "Unknown_Sex"),
    ("mtf", "MTF"),
    ("ftm", "FTM"),
];

const RACE_KEYS: &[(&str, &str)] = &[
    ("Latinx_or_Hispanic", "Hispanic_Latino"),
    ("Asian", "Asian"),
    ("African_Amer", "African_American_Black"),
    ("White", "White"),
    ("Pacific_Islander", "Pacific_Islander"),
    ("Native_Amer", "Native_American"),
    ("Multiple_Race", "Multirace"),
    ("Other", "Other_Race"),
    ("Unknown", "Unknown_Race"),
];

/// Ordered age buckets.
const AGE_KEYS: &[(&str, &str)] = &[
    ("18_and_under", "Age_LT18"),
    ("18_to_30", "Age_18_30"),
    ("31_to_40", "Age_31_40"),
    ("41_to_50", "Age_41_50"),
    ("51_to_60", "Age_51_60"),
    ("61_to_70", "Age_61_70"),
    ("71_to_80", "Age_71_80"),
    ("81_and_older", "Age_81_Up"),
    ("Unknown", "Unknown_Age"),
];

const DEATHS_PREFIX: &str = "Deaths_";

/// Re-keyed case and death breakdowns, plus the paths of counts the source suppressed.
#[derive(Debug, Clone, PartialEq)]
pub struct Demographics {
    pub case_totals: Totals,
    pub death_totals: Totals,
    pub suppressed: Vec<String>,
}

/// Fetches the county-wide cases and deaths demographic tables.
///
/// The layers behind these tables were never published for Solano, so the caller
/// has to supply the query endpoints.
pub async fn get_demographics(
    client: &Client,
    cases_url: &str,
    deaths_url: &str,
) -> Result<Demographics> {
    let params = [
        ("where", "Geography='Solano County'"),
        ("outFields", "*"),
        ("outSR", "4326"),
        ("f", "json"),
    ];
    let cases = first_feature(query_features(client, cases_url, &params).await?, cases_url)?;
    let deaths = first_feature(query_features(client, deaths_url, &params).await?, deaths_url)?;
    rekey_demographics(&cases, &deaths)
}

fn first_feature(features: Vec<Attributes>, url: &str) -> Result<Attributes> {
    features
        .into_iter()
        .next()
        .ok_or_else(|| Error::MissingField(format!("features.[0] from {url}")))
}

pub fn rekey_demographics(cases: &Attributes, deaths: &Attributes) -> Result<Demographics> {
    check_counts(cases)?;
    check_counts(deaths)?;

    let mut suppressed = Vec::new();
    let case_totals = rekey_totals(cases, "", "case_totals", &mut suppressed)?;
    let death_totals = rekey_totals(deaths, DEATHS_PREFIX, "death_totals", &mut suppressed)?;
    if !suppressed.is_empty() {
        info_time!("Suppressed counts: {}", suppressed.join(", "));
    }

    Ok(Demographics {
        case_totals,
        death_totals,
        suppressed,
    })
}

/// Every column besides the geography name has to hold a count.
fn check_counts(attrs: &Attributes) -> Result<()> {
    attrs
        .iter()
        .filter(|(key, _)| key.as_str() != "Geography")
        .try_for_each(|(key, value): (&String, &Value)| coerce_count(key, value).map(|_| ()))
}

fn rekey_totals(
    attrs: &Attributes,
    prefix: &str,
    scope: &str,
    suppressed: &mut Vec<String>,
) -> Result<Totals> {
    let mut found = [
        Suppressed::default(),
        Suppressed::default(),
        Suppressed::default(),
    ];
    let totals = Totals {
        gender: rekey(GENDER_KEYS, attrs, prefix, &mut found[0])?,
        age_group: age_table(AGE_KEYS, attrs, prefix, &mut found[1])?,
        race_eth: rekey(RACE_KEYS, attrs, prefix, &mut found[2])?,
    };

    for (demo, found) in ["gender", "age_group", "race_eth"].iter().zip(found) {
        suppressed.extend(found.0.into_iter().map(|col| format!("{scope}.{demo}.{col}")));
    }
    Ok(totals)
}

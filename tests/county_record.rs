use std::collections::BTreeMap;

use serde_json::{json, Value};
use sfbay_scrape::data_model::get_data_model;
use sfbay_scrape::power_bi::{parse_dsr, timeseries};
use sfbay_scrape::san_mateo::{backfill, join_daily_and_cumulative};
use sfbay_scrape::solano::split_series;

const MAY_1: i64 = 1_588_291_200_000;
const DAY_MS: i64 = 86_400_000;

fn dsr(rows: Value) -> Value {
    json!({
        "results": [{ "result": { "data": { "dsr": { "DS": [{ "PH": [{ "DM0": rows }] }] } } } }]
    })
}

#[test]
fn san_mateo_record_from_dashboard_responses() {
    let daily = dsr(json!([
        { "S": [{ "N": "G0", "T": 7 }, { "N": "M0", "T": 4 }], "C": [MAY_1, 3] },
        { "C": [MAY_1 + DAY_MS, 5] }
    ]));
    let cumulative = dsr(json!([
        { "S": [{ "N": "G0", "T": 7 }, { "N": "M0", "T": 4 }], "C": [MAY_1, 10] },
        { "C": [MAY_1 + DAY_MS, 15] }
    ]));
    let daily = timeseries(&parse_dsr(&daily).unwrap()).unwrap();
    let cumulative = timeseries(&parse_dsr(&cumulative).unwrap()).unwrap();

    let mut county = get_data_model().unwrap();
    county.name = "San Mateo County".to_string();
    county.series.cases = join_daily_and_cumulative(&daily, &cumulative).unwrap();
    backfill(&mut county, 40).unwrap();

    let out = serde_json::to_value(&county).unwrap();
    assert_eq!(out["update_time"], "2020-05-02T01:00:00-07:00");
    assert_eq!(
        out["series"]["cases"],
        json!([
            { "date": "2020-05-01", "cases": 3, "cumul_cases": 10 },
            { "date": "2020-05-02", "cases": 5, "cumul_cases": 15 }
        ])
    );
    assert_eq!(
        out["series"]["deaths"],
        json!([{ "date": "2020-05-02T01:00:00-07:00", "deaths": -1, "cumul_deaths": 40 }])
    );
    assert_eq!(out["case_totals"]["age_group"], json!([]));
}

#[test]
fn san_mateo_mismatched_series_abort() {
    let daily: BTreeMap<i64, i64> = [(MAY_1, 3), (MAY_1 + DAY_MS, 5)].into_iter().collect();
    let cumulative: BTreeMap<i64, i64> = [(MAY_1, 10)].into_iter().collect();
    let err = join_daily_and_cumulative(&daily, &cumulative).unwrap_err();
    assert_eq!(
        err.to_string(),
        "The cumulative and daily cases do not have the same timestamps!"
    );
}

#[test]
fn solano_series_serialize_with_sentinels() {
    let features = vec![json!({
        "date_reported": MAY_1,
        "new_cases_confirmed_today": 5,
        "cumulative_number_of_cases_on_t": 100,
        "total_deaths": 2,
        "residents_tested": 50
    })
    .as_object()
    .unwrap()
    .clone()];

    let series = serde_json::to_value(split_series(&features).unwrap()).unwrap();
    assert_eq!(
        series["tests"][0],
        json!({
            "date": "2020-05-01T00:00:00+00:00",
            "tests": -1, "positive": -1, "negative": -1, "pending": -1,
            "cumul_tests": 50, "cumul_pos": -1, "cumul_neg": -1, "cumul_pend": -1
        })
    );
    assert_eq!(
        series["deaths"][0],
        json!({ "date": "2020-05-01T00:00:00+00:00", "deaths": -1, "cumul_deaths": 2 })
    );
}

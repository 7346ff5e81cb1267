//! ArcGIS `FeatureServer` plumbing shared by the counties that publish through it.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::request::get_json;
use crate::utils::{as_i64, dig, timestamp_to_datetime, wrong_type};
use crate::{Error, Result};

pub type Attributes = Map<String, Value>;

/// Runs a `FeatureServer/<layer>/query` and returns the `attributes` of every feature.
pub async fn query_features<P>(client: &Client, url: &str, params: &P) -> Result<Vec<Attributes>>
where
    P: Serialize + ?Sized,
{
    let parsed = get_json(client, url, params).await?;
    feature_attributes(&parsed)
}

/// ArcGIS reports query errors with a 200 status and an `error` object in the body.
pub fn feature_attributes(parsed: &Value) -> Result<Vec<Attributes>> {
    if let Some(err) = parsed.get("error") {
        let message = err
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("no message");
        return Err(Error::ArcGis(message.to_string()));
    }

    let features = dig(parsed, &["features".into()])?
        .as_array()
        .ok_or_else(|| wrong_type("features", "an array"))?;

    features
        .iter()
        .map(|feature| {
            dig(feature, &["attributes".into()])?
                .as_object()
                .cloned()
                .ok_or_else(|| wrong_type("attributes", "an object"))
        })
        .collect()
}

/// Reads the layer's last edit time from its `?f=pjson` metadata.
///
/// Date fields are only converted correctly while the layer stores them in UTC,
/// so a declared time reference stops the fetch instead of producing shifted dates.
/// See https://developers.arcgis.com/rest/services-reference/layer-feature-service-.htm
pub fn last_edit_time(metadata: &Value) -> Result<DateTime<Utc>> {
    check_time_reference(metadata)?;
    let timestamp = dig(metadata, &["editingInfo".into(), "lastEditDate".into()])?;
    timestamp_to_datetime(as_i64(timestamp, "editingInfo.lastEditDate")?)
}

fn check_time_reference(metadata: &Value) -> Result<()> {
    let edit_fields = dig(metadata, &["editFieldsInfo".into()])?;
    if let Some(reference) = edit_fields.get("dateFieldsTimeReference") {
        return Err(Error::UnsupportedTimeReference(reference.to_string()));
    }

    let time_zone = metadata
        .get("dateFieldsTimeReference")
        .and_then(|reference| reference.get("timeZone"))
        .and_then(Value::as_str);
    match time_zone {
        Some(tz) if tz != "UTC" => Err(Error::UnsupportedTimeReference(tz.to_string())),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn metadata() -> Value {
        json!({
            "editingInfo": { "lastEditDate": 1_588_291_200_000_i64 },
            "editFieldsInfo": {
                "creationDateField": "CreationDate",
                "editDateField": "EditDate"
            }
        })
    }

    #[test]
    fn reads_last_edit_date() {
        let time = last_edit_time(&metadata()).unwrap();
        assert_eq!(time.to_rfc3339(), "2020-05-01T00:00:00+00:00");
    }

    #[test]
    fn declared_time_reference_fails_loudly() {
        let mut meta = metadata();
        meta["editFieldsInfo"]["dateFieldsTimeReference"] =
            json!({ "timeZone": "Pacific Standard Time", "respectsDaylightSaving": true });
        assert!(matches!(
            last_edit_time(&meta),
            Err(Error::UnsupportedTimeReference(_))
        ));

        let mut meta = metadata();
        meta["dateFieldsTimeReference"] = json!({ "timeZone": "Pacific Standard Time" });
        assert!(matches!(
            last_edit_time(&meta),
            Err(Error::UnsupportedTimeReference(_))
        ));
    }

    #[test]
    fn utc_time_reference_is_accepted() {
        let mut meta = metadata();
        meta["dateFieldsTimeReference"] = json!({ "timeZone": "UTC" });
        assert!(last_edit_time(&meta).is_ok());
    }

    #[test]
    fn missing_edit_fields_info_is_an_error() {
        let meta = json!({ "editingInfo": { "lastEditDate": 0 } });
        assert!(matches!(last_edit_time(&meta), Err(Error::MissingField(_))));
    }

    #[test]
    fn extracts_feature_attributes() {
        let parsed = json!({
            "features": [
                { "attributes": { "a": 1 } },
                { "attributes": { "a": 2 } }
            ]
        });
        let attrs = feature_attributes(&parsed).unwrap();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[1]["a"], 2);
    }

    #[test]
    fn body_errors_are_surfaced() {
        let parsed = json!({ "error": { "code": 400, "message": "Invalid query" } });
        match feature_attributes(&parsed) {
            Err(Error::ArcGis(msg)) => assert_eq!(msg, "Invalid query"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}

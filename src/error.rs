use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The selector you are trying to scrape for is missing. Selector: {0}")]
    ParseMissingSelector(String),
    #[error("The source page has changed: {0}")]
    SourceChanged(String),

    #[error("Expected field is missing: {0}")]
    MissingField(String),
    #[error("Field `{field}` has an unexpected type, expected {expected}")]
    WrongType { field: String, expected: &'static str },
    #[error("Unknown field in source data: {0}")]
    UnknownField(String),
    #[error("Unknown label in source data: {0}")]
    UnknownLabel(String),
    #[error("Non-integer value for {key}: {value}")]
    InvalidCount { key: String, value: String },
    #[error("Timestamp out of range: {0}")]
    InvalidTimestamp(i64),
    #[error("Date parse error: {0}")]
    Date(#[from] chrono::ParseError),

    #[error("The cumulative and daily {0} do not have the same timestamps!")]
    SeriesMismatch(&'static str),
    #[error("Inconsistent source data: {0}")]
    InconsistentData(String),
    #[error("A timezone may now be specified in the metadata: {0}")]
    UnsupportedTimeReference(String),

    #[error("ArcGIS returned an error: {0}")]
    ArcGis(String),
    #[error("Unknown county: {0}")]
    UnknownCounty(String),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

//! Bay Area county COVID-19 scrapers.
//!
//! Each county module fetches its dashboards from scratch and fills in the shared
//! data model, see [`data_model::County`]. Nothing is cached between runs.

mod error;
mod macros;

pub mod arcgis;
pub mod data_model;
pub mod demographics;
pub mod parse;
pub mod power_bi;
pub mod process;
pub mod request;
pub mod san_mateo;
pub mod solano;
pub mod utils;

pub use error::{Error, Result};

/// Marks a value the source does not provide.
pub const SENTINEL: i64 = -1;
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

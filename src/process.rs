use std::fmt;
use std::io::Write;
use std::str::FromStr;

use chrono::Local;

use crate::data_model::County as CountyRecord;
use crate::request::client;
use crate::{info_time, san_mateo, solano, Error, Result};

/// Counties with a scraper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum County {
    SanMateo,
    Solano,
}

impl County {
    pub const ALL: [County; 2] = [County::SanMateo, County::Solano];

    pub fn name(&self) -> &'static str {
        match self {
            County::SanMateo => "san_mateo",
            County::Solano => "solano",
        }
    }
}

impl fmt::Display for County {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for County {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        County::ALL
            .into_iter()
            .find(|county| county.name() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| Error::UnknownCounty(s.to_string()))
    }
}

/// Fetches one county from scratch and returns its record.
pub async fn fetch_county(county: County) -> Result<CountyRecord> {
    let client = client()?;
    match county {
        County::SanMateo => san_mateo::get_county(&client).await,
        County::Solano => solano::get_county(&client).await,
    }
}

/// Fetches one county and writes the record to stdout as pretty-printed JSON.
pub async fn process_county(county: County) -> Result<()> {
    let start_time = Local::now();
    info_time!("Started scraping {county}");

    let record = fetch_county(county).await?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &record)?;
    writeln!(stdout)?;
    info_time!(start_time, "Finished {county}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_county_names() {
        assert_eq!("san_mateo".parse::<County>().unwrap(), County::SanMateo);
        assert_eq!(" Solano ".parse::<County>().unwrap(), County::Solano);
        assert!(matches!(
            "alameda".parse::<County>(),
            Err(Error::UnknownCounty(_))
        ));
    }
}

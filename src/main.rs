use chrono::Local;
use sfbay_scrape::{
    info_time,
    process::{process_county, County},
    Error, Result,
};

fn usage() -> String {
    let names: Vec<_> = County::ALL.iter().map(County::name).collect();
    format!("Usage: sfbay_scrape <county>\nCounties: {}", names.join(", "))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let start_time = Local::now();

    let arg = std::env::args().nth(1);
    let county = match arg.as_deref() {
        Some("--list") => {
            for county in County::ALL {
                println!("{county}");
            }
            return Ok(());
        }
        Some("-h" | "--help") => {
            eprintln!("{}", usage());
            return Ok(());
        }
        None => {
            eprintln!("{}", usage());
            return Err(Error::UnknownCounty(String::new()));
        }
        Some(name) => name.parse::<County>()?,
    };

    process_county(county).await?;
    info_time!(start_time, "Full program time:");

    Ok(())
}

use reqwest::Client;

use super::LANDING_PAGE;
use crate::parse::paragraphs_containing;
use crate::request::get_html;
use crate::{Error, Result};

/// Notes and disclaimers from the landing page.
pub struct Meta;

impl Meta {
    pub async fn get_data(&self, client: &Client) -> Result<String> {
        let html = get_html(client, LANDING_PAGE).await?;
        parse_notes(&html)
    }
}

pub(crate) fn parse_notes(html: &str) -> Result<String> {
    let notes = paragraphs_containing(html, "Note")?;
    if notes.is_empty() {
        return Err(Error::SourceChanged(format!(
            "none of the <p> elements on {LANDING_PAGE} mention notes"
        )));
    }
    Ok(notes.join("\n\n"))
}

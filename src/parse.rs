use scraper::{ElementRef, Html, Selector};

use crate::{Error, Result};

#[inline]
pub fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseMissingSelector(sel_str.into()))
}

/// Returns the text of every `<p>` that mentions `needle`, in document order.
/// Whitespace runs inside a paragraph collapse to a single space.
pub fn paragraphs_containing(html: &str, needle: &str) -> Result<Vec<String>> {
    let doc = Html::parse_document(html);
    let p_selector = create_selector("p")?;

    let paragraphs = doc
        .select(&p_selector)
        .map(element_text)
        .filter(|text| text.contains(needle))
        .collect();
    Ok(paragraphs)
}

#[inline]
fn element_text(el: ElementRef) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

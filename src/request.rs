use reqwest::{header::HeaderMap, Client};
use serde::Serialize;
use serde_json::Value;

use crate::{info_time, Result, USER_AGENT};

/// Builds the one client a run shares between all of its requests.
pub fn client() -> Result<Client> {
    Ok(Client::builder().user_agent(USER_AGENT).build()?)
}

/// GETs `url` with the given query parameters and decodes the body as JSON.
/// Any non-2xx status is an error.
pub async fn get_json<P>(client: &Client, url: &str, params: &P) -> Result<Value>
where
    P: Serialize + ?Sized,
{
    info_time!("GET {url}");
    let res = client
        .get(url)
        .query(params)
        .send()
        .await?
        .error_for_status()?;
    Ok(res.json().await?)
}

/// Requests a page and returns a `Result<String>` containing the HTML.
pub async fn get_html(client: &Client, url: &str) -> Result<String> {
    info_time!("GET {url}");
    let res = client.get(url).send().await?.error_for_status()?;
    let html = res.text().await?;
    Ok(html)
}

/// POSTs a JSON body and decodes the JSON response.
pub async fn post_json(
    client: &Client,
    url: &str,
    headers: HeaderMap,
    body: &Value,
) -> Result<Value> {
    info_time!("POST {url}");
    let res = client
        .post(url)
        .headers(headers)
        .json(body)
        .send()
        .await?
        .error_for_status()?;
    Ok(res.json().await?)
}

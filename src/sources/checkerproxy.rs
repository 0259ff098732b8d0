//! Scraper for checkerproxy.net.

use crate::source::Source;
use crate::utils::{cells, fetch_text, page_url, selector, text_of};

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;

pub const BASE_URL: &str = "http://checkerproxy.net";

pub struct CheckerProxy {
    client: Client,
    base_url: String,
}

impl CheckerProxy {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, BASE_URL)
    }

    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Source for CheckerProxy {
    async fn fetch(&self) -> Result<Vec<String>> {
        let url = page_url(&self.base_url, "/all_proxy")?;
        let body = fetch_text(&self.client, url).await?;
        parse(&body)
    }
}

/// Extract HTTP proxies from the result table.
pub fn parse(html: &str) -> Result<Vec<String>> {
    let doc = Html::parse_document(html);
    let rows = selector("table#result-box-table tbody tr")?;
    let td = selector("td")?;

    let mut proxies = Vec::new();
    for row in doc.select(&rows) {
        let cells = cells(row, &td, 4)?;
        if text_of(cells[3]) == "HTTP" {
            proxies.push(format!("http://{}", text_of(cells[1])));
        }
    }
    Ok(proxies)
}

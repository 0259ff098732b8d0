//! Scraper for proxy-ip-list.com.

use crate::source::Source;
use crate::utils::{cells, fetch_text, page_url, selector, text_of};

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;

pub const BASE_URL: &str = "http://proxy-ip-list.com";

pub struct ProxyIpList {
    client: Client,
    base_url: String,
}

impl ProxyIpList {
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
impl Source for ProxyIpList {
    async fn fetch(&self) -> Result<Vec<String>> {
        // proxies on this page were checked within the past hour
        let url = page_url(&self.base_url, "/fresh-proxy-list.html")?;
        let body = fetch_text(&self.client, url).await?;
        parse(&body)
    }
}

/// Keep responsive, high-anonymity proxies.
pub fn parse(html: &str) -> Result<Vec<String>> {
    let doc = Html::parse_document(html);
    let rows = selector("tbody tr")?;
    let td = selector("td")?;

    let mut proxies = Vec::new();
    for row in doc.select(&rows) {
        let cells = cells(row, &td, 5)?;
        let address = text_of(cells[0]);
        let response = text_of(cells[1]);
        let speed = text_of(cells[2]);
        let kind = text_of(cells[3]);

        if response != "0" && speed != "0" && kind == "high-anonymous" {
            proxies.push(format!("http://{}", address));
        }
    }
    Ok(proxies)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_fast_anonymous_proxies() {
        let page = r#"<table><tbody>
            <tr><td>1.2.3.4:80</td><td>1.2</td><td>30</td><td>high-anonymous</td><td>US</td></tr>
            <tr><td>2.2.2.2:80</td><td>0</td><td>30</td><td>high-anonymous</td><td>US</td></tr>
            <tr><td>3.3.3.3:80</td><td>1.0</td><td>0</td><td>high-anonymous</td><td>US</td></tr>
            <tr><td>4.4.4.4:80</td><td>1.0</td><td>20</td><td>transparent</td><td>US</td></tr>
        </tbody></table>"#;
        assert_eq!(parse(page).unwrap(), vec!["http://1.2.3.4:80"]);
    }
}

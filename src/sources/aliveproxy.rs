//! Scraper for aliveproxy.com.

use crate::source::Source;
use crate::utils::{cells, fetch_text, page_url, selector, text_of};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use scraper::Html;

pub const BASE_URL: &str = "http://aliveproxy.com";

/// Only proxies checked more recently than this many minutes are kept.
const MAX_CHECK_AGE_MINUTES: u32 = 30;

pub struct AliveProxy {
    client: Client,
    base_url: String,
}

impl AliveProxy {
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
impl Source for AliveProxy {
    async fn fetch(&self) -> Result<Vec<String>> {
        let url = page_url(&self.base_url, "/high-anonymity-proxy-list/")?;
        let body = fetch_text(&self.client, url).await?;
        parse(&body)
    }
}

pub fn parse(html: &str) -> Result<Vec<String>> {
    let doc = Html::parse_document(html);
    let rows = selector("tr.cw-list")?;
    let td = selector("td")?;
    let address_re = Regex::new(r"(\d+\.\d+\.\d+\.\d+:\d+)")?;
    let age_re = Regex::new(r"(\d+):(\d+)")?;

    let mut proxies = Vec::new();
    for row in doc.select(&rows) {
        let cells = cells(row, &td, 10)?;

        let text = text_of(cells[0]);
        let address = address_re
            .captures(&text)
            .and_then(|c| c.get(1))
            .ok_or_else(|| anyhow!("no address in `{}`", text))?
            .as_str();

        let last_check = text_of(cells[4]);
        let age = age_re
            .captures(&last_check)
            .ok_or_else(|| anyhow!("unexpected check time `{}`", last_check))?;
        let minutes = age[1].parse::<u32>()? * 60 + age[2].parse::<u32>()?;

        if minutes < MAX_CHECK_AGE_MINUTES {
            proxies.push(format!("http://{}", address));
        }
    }
    Ok(proxies)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(address: &str, last_check: &str) -> String {
        format!(
            r#"<tr class="cw-list"><td>{} <script>x</script></td><td></td><td></td><td></td><td>{}</td><td></td><td></td><td></td><td></td><td></td></tr>"#,
            address, last_check
        )
    }

    #[test]
    fn keeps_recently_checked() {
        let page = format!(
            "<table>{}{}</table>",
            row("1.2.3.4:8080", "0:12 ago"),
            row("5.6.7.8:80", "1:05 ago")
        );
        assert_eq!(parse(&page).unwrap(), vec!["http://1.2.3.4:8080"]);
    }

    #[test]
    fn row_without_address_is_an_error() {
        let page = format!("<table>{}</table>", row("unknown", "0:01"));
        assert!(parse(&page).is_err());
    }
}

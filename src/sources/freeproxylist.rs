//! Scraper for freeproxylist.co.
//!
//! The front page links to the most recent list; the list itself is a plain
//! `host:port` block inside the entry body.

use crate::source::Source;
use crate::utils::{fetch_text, page_url, selector, text_of};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;

pub const BASE_URL: &str = "http://freeproxylist.co";

pub struct FreeProxyList {
    client: Client,
    base_url: String,
}

impl FreeProxyList {
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
impl Source for FreeProxyList {
    async fn fetch(&self) -> Result<Vec<String>> {
        let index = page_url(&self.base_url, "/")?;
        let body = fetch_text(&self.client, index.clone()).await?;
        let latest = index.join(&parse_latest_link(&body)?)?;

        let body = fetch_text(&self.client, latest).await?;
        parse_entry(&body)
    }
}

/// Link to the newest list on the front page.
pub fn parse_latest_link(html: &str) -> Result<String> {
    let doc = Html::parse_document(html);
    let link = selector("div.entry_date a[href]")?;
    doc.select(&link)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
        .ok_or_else(|| anyhow!("no link to the latest list"))
}

/// Proxies listed one per line in the entry body.
pub fn parse_entry(html: &str) -> Result<Vec<String>> {
    let doc = Html::parse_document(html);
    let content = selector("div.entry_content")?;
    let entry = doc
        .select(&content)
        .next()
        .ok_or_else(|| anyhow!("list page has no entry content"))?;

    Ok(text_of(entry)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| format!("http://{}", line))
        .collect())
}

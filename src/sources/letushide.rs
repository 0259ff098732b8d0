//! Scraper for letushide.com.
//!
//! The list is paginated; pages are walked in order until one fails to
//! download or stops linking to its successor.

use crate::source::Source;
use crate::utils::{cells, fetch_text, page_url, selector, text_of};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use scraper::{ElementRef, Html};

pub const BASE_URL: &str = "http://letushide.com";

const LAST_PAGE: usize = 19;
const MIN_SPEED: u32 = 4;
const MIN_RELIABILITY: u32 = 90;

pub struct LetUsHide {
    client: Client,
    base_url: String,
}

impl LetUsHide {
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

fn page_path(page: usize) -> String {
    format!("/filter/http,all,all/{}/list_of_free_HTTP_proxy_servers", page)
}

#[async_trait]
impl Source for LetUsHide {
    async fn fetch(&self) -> Result<Vec<String>> {
        let mut proxies = Vec::new();
        for page in 1..=LAST_PAGE {
            let url = page_url(&self.base_url, &page_path(page))?;
            let body = match fetch_text(&self.client, url).await {
                Ok(body) => body,
                Err(e) => {
                    debug!("letushide page {} unavailable: {:#}", page, e);
                    break;
                }
            };

            let (found, has_next) = parse_page(&body, page)?;
            proxies.extend(found);
            if !has_next {
                break;
            }
        }
        Ok(proxies)
    }
}

/// Speed is encoded as a two character class such as `s5`.
fn speed(cell: ElementRef<'_>) -> Result<u32> {
    let class = cell
        .descendants()
        .filter_map(ElementRef::wrap)
        .find_map(|e| e.value().attr("class"))
        .ok_or_else(|| anyhow!("speed cell has no class"))?;

    let mut chars = class.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(_), Some(digit), None) => digit
            .to_digit(10)
            .ok_or_else(|| anyhow!("unexpected speed class `{}`", class)),
        _ => Ok(0),
    }
}

/// Parse one page, returning its proxies and whether it links to the next page.
pub fn parse_page(html: &str, page: usize) -> Result<(Vec<String>, bool)> {
    let doc = Html::parse_document(html);
    let rows = selector("tr#data")?;
    let td = selector("td")?;

    let mut proxies = Vec::new();
    for row in doc.select(&rows) {
        let cells = cells(row, &td, 7)?;
        let host = text_of(cells[1]);
        let port = text_of(cells[2]);
        let speed = speed(cells[5])?;
        let reliability = text_of(cells[6]);
        let reliability: u32 = reliability
            .strip_suffix('%')
            .unwrap_or(&reliability)
            .trim()
            .parse()?;

        if speed >= MIN_SPEED && reliability >= MIN_RELIABILITY {
            proxies.push(format!("http://{}:{}", host, port));
        }
    }

    let next = selector(&format!(r#"a[href*="{}"]"#, page_path(page + 1)))?;
    let has_next = doc.select(&next).next().is_some();
    Ok((proxies, has_next))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(host: &str, port: u16, class: &str, reliability: &str) -> String {
        format!(
            r#"<tr id="data"><td>x</td><td>{}</td><td>{}</td><td>HTTP</td><td>US</td><td><span class="{}"></span></td><td>{}</td></tr>"#,
            host, port, class, reliability
        )
    }

    #[test]
    fn filters_on_speed_and_reliability() {
        let page = format!(
            "<table>{}{}{}</table>",
            row("1.1.1.1", 80, "s5", "95%"),
            row("2.2.2.2", 80, "s2", "99%"),
            row("3.3.3.3", 80, "s4", "50%"),
        );
        let (proxies, has_next) = parse_page(&page, 1).unwrap();
        assert_eq!(proxies, vec!["http://1.1.1.1:80"]);
        assert!(!has_next);
    }

    #[test]
    fn detects_next_page_link() {
        let page = format!(
            r#"<table>{}</table><a href="{}">next</a>"#,
            row("1.1.1.1", 8080, "s4", "90%"),
            page_path(3)
        );
        let (proxies, has_next) = parse_page(&page, 2).unwrap();
        assert_eq!(proxies, vec!["http://1.1.1.1:8080"]);
        assert!(has_next);
    }

    #[test]
    fn long_speed_class_counts_as_zero() {
        let page = format!("<table>{}</table>", row("1.1.1.1", 80, "slow", "100%"));
        let (proxies, _) = parse_page(&page, 1).unwrap();
        assert!(proxies.is_empty());
    }
}

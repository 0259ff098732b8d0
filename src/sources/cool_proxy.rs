//! Scraper for www.cool-proxy.net.
//!
//! Addresses are written by a script as `str_rot13` of a base64 string, so
//! they have to be decoded before use.

use crate::source::Source;
use crate::utils::{fetch_text, page_url, selector, text_of};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use regex::Regex;
use reqwest::Client;
use scraper::Html;

pub const BASE_URL: &str = "http://www.cool-proxy.net";

const PAGES: usize = 5;

pub struct CoolProxy {
    client: Client,
    base_url: String,
}

impl CoolProxy {
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
impl Source for CoolProxy {
    async fn fetch(&self) -> Result<Vec<String>> {
        let mut proxies = Vec::new();
        for page in 0..PAGES {
            let path = format!("/proxies/http_proxy_list/sort:score/direction:desc/page:{}", page);
            let body = fetch_text(&self.client, page_url(&self.base_url, &path)?).await?;
            proxies.extend(parse(&body)?);
        }
        Ok(proxies)
    }
}

fn rot13(c: char) -> char {
    match c {
        'A'..='Z' => ((c as u8 - b'A' + 13) % 26 + b'A') as char,
        'a'..='z' => ((c as u8 - b'a' + 13) % 26 + b'a') as char,
        _ => c,
    }
}

/// Decode an address obfuscated as `rot13(base64(ip))`.
pub fn decode_address(encoded: &str) -> Result<String> {
    let rotated: String = encoded.chars().map(rot13).collect();
    let bytes = general_purpose::STANDARD.decode(rotated)?;
    Ok(String::from_utf8(bytes)?)
}

/// `MM:SS` since the last check, in seconds.
fn seconds_since_check(text: &str) -> Result<u32> {
    let (minutes, seconds) = text
        .split_once(':')
        .ok_or_else(|| anyhow!("unexpected check time `{}`", text))?;
    Ok(minutes.trim().parse::<u32>()? * 60 + seconds.trim().parse::<u32>()?)
}

/// Keep top-rated proxies that are fast and were checked recently.
pub fn parse(html: &str) -> Result<Vec<String>> {
    let doc = Html::parse_document(html);
    let rows = selector("table tr")?;
    let td = selector("td")?;
    let rating_img = selector("img[alt]")?;
    let quoted = Regex::new(r#""(.*)""#)?;

    let mut proxies = Vec::new();
    // first row is the header
    for row in doc.select(&rows).skip(1) {
        let cells: Vec<_> = row.select(&td).collect();
        if cells.len() != 10 {
            continue;
        }

        let script = text_of(cells[0]);
        let encoded = quoted
            .captures(&script)
            .and_then(|c| c.get(1))
            .ok_or_else(|| anyhow!("no encoded address in `{}`", script))?;
        let ip = decode_address(encoded.as_str())?;
        let port = text_of(cells[1]);

        let rating = cells[4]
            .select(&rating_img)
            .next()
            .and_then(|img| img.value().attr("alt"))
            .ok_or_else(|| anyhow!("row has no rating"))?;
        let working: f64 = text_of(cells[6]).parse()?;
        let response_time: f64 = text_of(cells[7]).parse()?;
        let speed: f64 = text_of(cells[8]).parse()?;
        let last_check = seconds_since_check(&text_of(cells[9]))?;

        if rating == "5 star proxy"
            && working >= 90.0
            && response_time <= 2.0
            && speed >= 100.0
            && last_check < 600
        {
            proxies.push(format!("http://{}:{}", ip, port));
        }
    }
    Ok(proxies)
}

//! Helpers shared by the built-in scrapers.

use anyhow::anyhow;
use reqwest::Client;
use scraper::{ElementRef, Selector};
use url::Url;

/// Resolve `path` against a scraper's base URL.
pub(crate) fn page_url(base: &str, path: &str) -> anyhow::Result<Url> {
    Ok(Url::parse(base)?.join(path)?)
}

/// Fetch a page and return its body, failing on non-success statuses.
pub(crate) async fn fetch_text(client: &Client, url: Url) -> anyhow::Result<String> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.text().await?)
}

pub(crate) fn selector(css: &str) -> anyhow::Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector `{}`: {:?}", css, e))
}

/// Concatenated, trimmed text content of an element.
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Cells of a table row, failing when there are fewer than `expected`.
pub(crate) fn cells<'a>(
    row: ElementRef<'a>,
    td: &Selector,
    expected: usize,
) -> anyhow::Result<Vec<ElementRef<'a>>> {
    let cells: Vec<_> = row.select(td).collect();
    if cells.len() < expected {
        return Err(anyhow!("expected {} cells per row, found {}", expected, cells.len()));
    }
    Ok(cells)
}

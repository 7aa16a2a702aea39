//! Generic homepage headline scraper.
//!
//! Regional outlets do not share markup, so this takes the broad approach:
//! every `h2`, `h3` and `a` on the homepage is a candidate headline. Short
//! texts are skipped, links are resolved against the page URL, and repeated
//! texts are dropped before the per-source cap is applied. The result is a
//! list of `{headline, link, language}` records.

use super::Scraper;
use crate::config::SourceConfig;
use itertools::Itertools;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// One candidate headline found on a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrapedHeadline {
    pub headline: String,
    pub link: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HtmlScraper {
    client: Client,
}

impl HtmlScraper {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0")
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }
}

impl Scraper for HtmlScraper {
    #[instrument(level = "info", skip_all, fields(source = %source.id, url = %source.url))]
    async fn scrape(&self, source: &SourceConfig) -> Result<Option<Value>, Box<dyn Error>> {
        let base = Url::parse(&source.url)?;
        let html = self
            .client
            .get(base.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let headlines = extract_headlines(&html, &base, source)?;
        info!(count = headlines.len(), "Scraped headlines");
        Ok(Some(serde_json::to_value(headlines)?))
    }
}

/// Pull candidate headlines out of a homepage, in document order.
pub fn extract_headlines(
    html: &str,
    base: &Url,
    source: &SourceConfig,
) -> Result<Vec<ScrapedHeadline>, Box<dyn Error>> {
    let document = Html::parse_document(html);
    let candidate_selector = Selector::parse("h2, h3, a")?;
    let link_selector = Selector::parse("a[href]")?;

    let mut candidates = Vec::new();
    for element in document.select(&candidate_selector) {
        let text = element.text().flat_map(str::split_whitespace).join(" ");
        if text.chars().count() < source.min_text_len {
            continue;
        }

        let href = if element.value().name() == "a" {
            element.value().attr("href")
        } else {
            element
                .select(&link_selector)
                .next()
                .and_then(|a| a.value().attr("href"))
        };
        let link = href.and_then(|h| base.join(h).ok()).map(|u| u.to_string());

        candidates.push(ScrapedHeadline {
            headline: text,
            link,
            language: source.language.clone(),
        });
    }

    let found = candidates.len();
    let headlines: Vec<ScrapedHeadline> = candidates
        .into_iter()
        .unique_by(|h| h.headline.clone())
        .take(source.max_headlines)
        .collect();
    debug!(found, kept = headlines.len(), source = %source.id, "Extracted headline candidates");
    Ok(headlines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(max_headlines: usize) -> SourceConfig {
        SourceConfig {
            id: "vijaya_karnataka".to_string(),
            name: "Vijaya Karnataka".to_string(),
            url: "https://vijaykarnataka.indiatimes.com/".to_string(),
            language: Some("kn".to_string()),
            min_text_len: 8,
            max_headlines,
        }
    }

    const PAGE: &str = r#"
        <html><body>
          <nav><a href="/live">Live</a><a href="/photos">Photos</a></nav>
          <h2><a href="/news/state/flood-relief">Flood relief reaches Kodagu villages</a></h2>
          <h3>Cabinet   expansion likely
              next week</h3>
          <a href="https://example.com/abs">Absolute link headline here</a>
          <h2>Short</h2>
        </body></html>
    "#;

    #[test]
    fn test_extracts_candidates_in_document_order() {
        let src = source(20);
        let base = Url::parse(&src.url).unwrap();
        let headlines = extract_headlines(PAGE, &base, &src).unwrap();

        let texts: Vec<&str> = headlines.iter().map(|h| h.headline.as_str()).collect();
        // The h2 and its inner anchor share the same text and collapse into one.
        assert_eq!(
            texts,
            vec![
                "Flood relief reaches Kodagu villages",
                "Cabinet expansion likely next week",
                "Absolute link headline here",
            ]
        );
        assert_eq!(
            headlines[0].link.as_deref(),
            Some("https://vijaykarnataka.indiatimes.com/news/state/flood-relief")
        );
        assert_eq!(headlines[1].link, None);
        assert_eq!(headlines[2].link.as_deref(), Some("https://example.com/abs"));
        assert!(headlines.iter().all(|h| h.language.as_deref() == Some("kn")));
    }

    #[test]
    fn test_respects_max_headlines() {
        let src = source(1);
        let base = Url::parse(&src.url).unwrap();
        let headlines = extract_headlines(PAGE, &base, &src).unwrap();
        assert_eq!(headlines.len(), 1);
    }

    #[test]
    fn test_output_is_a_record_list() {
        let src = source(20);
        let base = Url::parse(&src.url).unwrap();
        let headlines = extract_headlines(PAGE, &base, &src).unwrap();
        let value = serde_json::to_value(headlines).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["headline"], "Flood relief reaches Kodagu villages");
        assert_eq!(value[0]["language"], "kn");
    }
}

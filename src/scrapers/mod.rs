//! Scraper collaborators.
//!
//! A scraper returns whatever raw shape it produces for a source; the
//! ingestion normalizer deals with the shape. Errors are returned to the
//! pipeline, which treats a failing source as one with no data.
//!
//! | Scraper | Module | Input |
//! |---------|--------|-------|
//! | Live homepage scraping | [`html`] | the source's `url` over HTTP |
//! | Recorded output | [`dump`] | a JSON file keyed by source id |

pub mod dump;
pub mod html;

use crate::config::SourceConfig;
use serde_json::Value;
use std::error::Error;

/// Fetches raw headline data for one source. `Ok(None)` means no data.
pub trait Scraper {
    async fn scrape(&self, source: &SourceConfig) -> Result<Option<Value>, Box<dyn Error>>;
}

/// The scraper a run was configured with.
#[derive(Debug)]
pub enum SourceFeed {
    Live(html::HtmlScraper),
    Recorded(dump::DumpScraper),
}

impl Scraper for SourceFeed {
    async fn scrape(&self, source: &SourceConfig) -> Result<Option<Value>, Box<dyn Error>> {
        match self {
            SourceFeed::Live(s) => s.scrape(source).await,
            SourceFeed::Recorded(s) => s.scrape(source).await,
        }
    }
}

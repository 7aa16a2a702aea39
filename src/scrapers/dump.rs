//! Replays recorded scraper output.
//!
//! The dump is a JSON object mapping source id to whatever that source's
//! scraper returned, in any of the shapes the normalizer accepts:
//!
//! ```json
//! {
//!   "ndtv": ["Headline one", "Headline two"],
//!   "vijaya_karnataka": [{"headline": "ಅಪಘಾತ ಸುದ್ದಿ", "language": "kn"}],
//!   "dinamani": null
//! }
//! ```

use super::Scraper;
use crate::config::SourceConfig;
use serde_json::{Map, Value};
use std::error::Error;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct DumpScraper {
    outputs: Map<String, Value>,
}

impl DumpScraper {
    pub fn from_json(raw: &str) -> Result<Self, Box<dyn Error>> {
        match serde_json::from_str(raw)? {
            Value::Object(outputs) => Ok(Self { outputs }),
            _ => Err("scraper dump must be a JSON object keyed by source id".into()),
        }
    }

    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let raw = std::fs::read_to_string(path)?;
        let dump = Self::from_json(&raw)?;
        info!(path = %path.display(), sources = dump.outputs.len(), "Loaded scraper dump");
        Ok(dump)
    }
}

impl Scraper for DumpScraper {
    async fn scrape(&self, source: &SourceConfig) -> Result<Option<Value>, Box<dyn Error>> {
        let output = self.outputs.get(&source.id).cloned();
        debug!(source = %source.id, found = output.is_some(), "Replaying scraper output");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Sources;

    #[tokio::test]
    async fn test_replays_by_source_id() {
        let dump = DumpScraper::from_json(
            r#"{"ndtv": ["Headline one here", "Headline two here"], "dinamani": null}"#,
        )
        .unwrap();
        let sources = Sources::default();
        let ndtv = sources.iter().find(|s| s.id == "ndtv").unwrap();
        let toi = sources.iter().find(|s| s.id == "times_of_india").unwrap();
        let dinamani = sources.iter().find(|s| s.id == "dinamani").unwrap();

        let out = dump.scrape(ndtv).await.unwrap().unwrap();
        assert_eq!(out.as_array().unwrap().len(), 2);
        assert_eq!(dump.scrape(toi).await.unwrap(), None);
        assert_eq!(dump.scrape(dinamani).await.unwrap(), Some(Value::Null));
    }

    #[test]
    fn test_rejects_non_object_dump() {
        assert!(DumpScraper::from_json("[1, 2, 3]").is_err());
        assert!(DumpScraper::from_json("not json").is_err());
    }
}

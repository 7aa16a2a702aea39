//! Application configuration loaded from YAML.
//!
//! Every section has defaults, so an absent or partial file is fine:
//!
//! ```yaml
//! pipeline:
//!   min_chars: 20
//!   noise_words: [live, videos, photos]
//! sources:
//!   - id: ndtv
//!     name: NDTV
//!     url: https://www.ndtv.com/
//!     language: en
//! llm:
//!   translation_template: headline_translator
//! ```

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;
use tracing::{info, instrument};

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub sources: Sources,
    pub llm: LlmSettings,
}

/// Tunables for filtering, emotion tagging and bias classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Headlines shorter than this many characters (after trimming) are dropped.
    pub min_chars: usize,
    /// Headlines with fewer whitespace-separated words are dropped.
    pub min_words: usize,
    /// Navigation text that is not a headline; matched case-insensitively as
    /// the whole text or as its prefix.
    pub noise_words: Vec<String>,
    /// Words that add the `/Fear` qualifier to a headline's emotion.
    pub fear_keywords: Vec<String>,
    /// Average sentiment above this is a positive bias.
    pub positive_bias_threshold: f64,
    /// Average sentiment below this is a negative bias.
    pub negative_bias_threshold: f64,
    /// Headlines whose translation moved the score by more than this are
    /// reported as divergent.
    pub divergence_threshold: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_chars: 15,
            min_words: 3,
            noise_words: strings(&[
                "live", "videos", "photos", "trending", "home", "latest", "web stories",
                "sign in", "subscribe", "read more", "more", "menu",
            ]),
            fear_keywords: strings(&[
                "bomb", "blast", "attack", "explosion", "terror", "shooting", "gunfire",
            ]),
            positive_bias_threshold: 0.05,
            negative_bias_threshold: -0.05,
            divergence_threshold: 0.5,
        }
    }
}

/// A news outlet to collect headlines from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Stable identifier, used as `source_id` on every headline.
    pub id: String,
    /// Human-readable outlet name.
    pub name: String,
    /// Homepage scraped for headlines.
    pub url: String,
    /// Language the outlet publishes in. When absent, each headline's
    /// language is detected.
    #[serde(default)]
    pub language: Option<String>,
    /// Scraped texts shorter than this are not headlines.
    #[serde(default = "default_min_text_len")]
    pub min_text_len: usize,
    /// Upper bound on headlines kept per scrape.
    #[serde(default = "default_max_headlines")]
    pub max_headlines: usize,
}

fn default_min_text_len() -> usize {
    10
}

fn default_max_headlines() -> usize {
    20
}

/// Configured sources; defaults to the four outlets the analysis was built around.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sources(pub Vec<SourceConfig>);

impl Default for Sources {
    fn default() -> Self {
        Sources(vec![
            source(
                "times_of_india",
                "Times of India",
                "https://timesofindia.indiatimes.com/",
                "en",
                10,
            ),
            source("ndtv", "NDTV", "https://www.ndtv.com/", "en", 10),
            source(
                "vijaya_karnataka",
                "Vijaya Karnataka",
                "https://vijaykarnataka.indiatimes.com/",
                "kn",
                8,
            ),
            source("dinamani", "Dinamani", "https://www.dinamani.com/", "ta", 8),
        ])
    }
}

impl Sources {
    pub fn iter(&self) -> std::slice::Iter<'_, SourceConfig> {
        self.0.iter()
    }

    /// The outlet name for `id`, or `id` itself when it is not configured.
    pub fn display_name<'s>(&'s self, id: &'s str) -> &'s str {
        self.iter()
            .find(|s| s.id == id)
            .map_or(id, |s| s.name.as_str())
    }
}

/// Settings for the model-backed collaborators (translation, classifier).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Chat template used to translate a headline into English.
    pub translation_template: String,
    /// Chat template used to classify a headline's sentiment.
    pub sentiment_template: String,
    /// Retries after the first failed attempt of a model call.
    pub max_retries: usize,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            translation_template: "headline_translator".to_string(),
            sentiment_template: "headline_sentiment".to_string(),
            max_retries: 2,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn source(id: &str, name: &str, url: &str, language: &str, min_text_len: usize) -> SourceConfig {
    SourceConfig {
        id: id.to_string(),
        name: name.to_string(),
        url: url.to_string(),
        language: Some(language.to_string()),
        min_text_len,
        max_headlines: default_max_headlines(),
    }
}

/// Load the configuration file, or the defaults when no path is given.
#[instrument(level = "info")]
pub fn load(path: Option<&Path>) -> Result<AppConfig, Box<dyn Error>> {
    let Some(path) = path else {
        info!("No config file given; using defaults");
        return Ok(AppConfig::default());
    };

    let raw = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_yaml::from_str(&raw)?;
    info!(
        path = %path.display(),
        sources = config.sources.0.len(),
        "Loaded configuration"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.pipeline.min_chars, 15);
        assert_eq!(config.pipeline.min_words, 3);
        assert!(config.pipeline.noise_words.contains(&"trending".to_string()));
        assert!(config.pipeline.fear_keywords.contains(&"explosion".to_string()));
        assert_eq!(config.sources.0.len(), 4);
        assert_eq!(config.llm.max_retries, 2);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
pipeline:
  min_chars: 20
llm:
  max_retries: 0
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.pipeline.min_chars, 20);
        assert_eq!(config.pipeline.min_words, 3);
        assert_eq!(config.pipeline.positive_bias_threshold, 0.05);
        assert_eq!(config.pipeline.divergence_threshold, 0.5);
        assert_eq!(config.llm.max_retries, 0);
        assert_eq!(config.llm.translation_template, "headline_translator");
        assert_eq!(config.sources.0.len(), 4);
    }

    #[test]
    fn test_sources_yaml() {
        let yaml = r#"
sources:
  - id: prajavani
    name: Prajavani
    url: https://www.prajavani.net/
    language: kn
  - id: wire
    name: The Wire
    url: https://thewire.in/
    max_headlines: 5
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        let sources = &config.sources.0;
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].language.as_deref(), Some("kn"));
        assert_eq!(sources[0].min_text_len, 10);
        assert_eq!(sources[0].max_headlines, 20);
        assert_eq!(sources[1].language, None);
        assert_eq!(sources[1].max_headlines, 5);
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let sources = Sources::default();
        assert_eq!(sources.display_name("vijaya_karnataka"), "Vijaya Karnataka");
        assert_eq!(sources.display_name("prajavani"), "prajavani");
    }

    #[test]
    fn test_load_without_path_uses_defaults() {
        let config = load(None).unwrap();
        assert_eq!(config.sources.0[2].id, "vijaya_karnataka");
        assert_eq!(config.sources.0[2].min_text_len, 8);
    }
}

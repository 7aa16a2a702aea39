//! Lexical polarity estimator.
//!
//! A word-polarity lexicon (YAML map of word to polarity in `[-1, 1]`) is
//! matched against the headline's words. The score is the mean polarity of
//! the matched words, after modifiers:
//!
//! - an intensifier directly before a word multiplies it by 1.3
//! - a negator within the two preceding words multiplies it by -0.5
//!
//! ```yaml
//! good: 0.7
//! terrible: -1.0
//! ```

use super::{LABEL_THRESHOLD, SentimentStrategy, StrategyOutcome};
use crate::models::{Sentiment, StrategyKind};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::error::Error;
use std::path::Path;
use tracing::info;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{M}']+").unwrap());

const NEGATORS: &[&str] = &["not", "no", "never", "without", "nor", "neither"];
const INTENSIFIERS: &[&str] = &["very", "extremely", "highly", "deeply", "hugely", "really"];

const NEGATION_FACTOR: f64 = -0.5;
const INTENSIFIER_FACTOR: f64 = 1.3;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lexicon {
    entries: HashMap<String, f64>,
}

impl Lexicon {
    /// Parse a YAML lexicon. Words are lowercased and polarities clamped.
    pub fn from_yaml(raw: &str) -> Result<Self, Box<dyn Error>> {
        let parsed: HashMap<String, f64> = serde_yaml::from_str(raw)?;
        let entries = parsed
            .into_iter()
            .filter(|(_, p)| p.is_finite())
            .map(|(w, p)| (w.trim().to_lowercase(), p.clamp(-1.0, 1.0)))
            .filter(|(w, _)| !w.is_empty())
            .collect();
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let raw = std::fs::read_to_string(path)?;
        let lexicon = Self::from_yaml(&raw)?;
        info!(path = %path.display(), words = lexicon.len(), "Loaded polarity lexicon");
        Ok(lexicon)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mean modified polarity of matched words; `None` when no word matched.
    pub fn polarity(&self, text: &str) -> Option<f64> {
        let lower = text.to_lowercase();
        let tokens: Vec<&str> = WORD.find_iter(&lower).map(|m| m.as_str()).collect();

        let values: Vec<f64> = tokens
            .iter()
            .enumerate()
            .filter_map(|(i, tok)| {
                let mut value = *self.entries.get(*tok)?;
                if i > 0 && INTENSIFIERS.contains(&tokens[i - 1]) {
                    value *= INTENSIFIER_FACTOR;
                }
                if tokens[i.saturating_sub(2)..i].iter().any(|t| is_negator(t)) {
                    value *= NEGATION_FACTOR;
                }
                Some(value.clamp(-1.0, 1.0))
            })
            .collect();

        if values.is_empty() {
            return None;
        }
        Some((values.iter().sum::<f64>() / values.len() as f64).clamp(-1.0, 1.0))
    }
}

fn is_negator(token: &str) -> bool {
    NEGATORS.contains(&token) || token.ends_with("n't")
}

/// Strategy 2: available only when a non-empty lexicon has been loaded.
#[derive(Debug, Clone, Default)]
pub struct LexicalStrategy {
    lexicon: Option<Lexicon>,
}

impl LexicalStrategy {
    pub fn new(lexicon: Option<Lexicon>) -> Self {
        Self { lexicon }
    }
}

#[async_trait(?Send)]
impl SentimentStrategy for LexicalStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Lexical
    }

    async fn score_batch(&self, texts: &[&str]) -> StrategyOutcome {
        let Some(lexicon) = self.lexicon.as_ref().filter(|l| !l.is_empty()) else {
            return StrategyOutcome::Unavailable("no polarity lexicon loaded".to_string());
        };

        StrategyOutcome::Scored(
            texts
                .iter()
                .map(|t| match lexicon.polarity(t) {
                    Some(p) => Sentiment::from_signed(p, LABEL_THRESHOLD),
                    None => Sentiment::NEUTRAL,
                })
                .collect(),
        )
    }
}

//! Rule-based keyword scorer, the last strategy in the chain.
//!
//! Each table entry is a lowercase stem with a weight. Every entry found as a
//! substring of the lowercased text contributes its weight once: negative
//! weights are subtracted, positive ones added, and the total is clamped to
//! `[-1, 1]`. Deterministic and always available.

use super::{LABEL_THRESHOLD, SentimentStrategy, StrategyOutcome};
use crate::models::{Sentiment, StrategyKind};
use async_trait::async_trait;

pub const NEGATIVE_KEYWORDS: &[(&str, f64)] = &[
    ("accident", 0.7),
    ("arrest", 0.4),
    ("attack", 0.8),
    ("blast", 0.8),
    ("bomb", 0.8),
    ("collapse", 0.6),
    ("crash", 0.7),
    ("crisis", 0.6),
    ("death", 0.8),
    ("drought", 0.5),
    ("earthquake", 0.7),
    ("explosion", 0.8),
    ("fear", 0.5),
    ("flood", 0.5),
    ("fraud", 0.6),
    ("injur", 0.5),
    ("kill", 0.9),
    ("loss", 0.4),
    ("murder", 0.9),
    ("protest", 0.4),
    ("scam", 0.6),
    ("shooting", 0.8),
    ("slump", 0.5),
    ("suicide", 0.8),
    ("terror", 0.9),
    ("tragedy", 0.8),
    ("violence", 0.7),
];

pub const POSITIVE_KEYWORDS: &[(&str, f64)] = &[
    ("achieve", 0.6),
    ("award", 0.5),
    ("boost", 0.4),
    ("celebrat", 0.6),
    ("gold", 0.5),
    ("growth", 0.5),
    ("historic", 0.4),
    ("honor", 0.5),
    ("honour", 0.5),
    ("hope", 0.4),
    ("launch", 0.3),
    ("medal", 0.5),
    ("peace", 0.5),
    ("praise", 0.5),
    ("progress", 0.4),
    ("record", 0.3),
    ("relief", 0.4),
    ("rescue", 0.4),
    ("success", 0.6),
    ("triumph", 0.7),
    ("victory", 0.7),
    ("welcome", 0.4),
    ("win", 0.6),
];

/// Signed keyword score of `text`, clamped to `[-1, 1]`.
pub fn keyword_score(text: &str) -> f64 {
    let lower = text.to_lowercase();
    let weight = |table: &[(&str, f64)]| -> f64 {
        table
            .iter()
            .filter(|(kw, _)| lower.contains(kw))
            .map(|(_, w)| w)
            .sum()
    };
    (weight(POSITIVE_KEYWORDS) - weight(NEGATIVE_KEYWORDS)).clamp(-1.0, 1.0)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordStrategy;

#[async_trait(?Send)]
impl SentimentStrategy for KeywordStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Keyword
    }

    async fn score_batch(&self, texts: &[&str]) -> StrategyOutcome {
        StrategyOutcome::Scored(
            texts
                .iter()
                .map(|t| Sentiment::from_signed(keyword_score(t), LABEL_THRESHOLD))
                .collect(),
        )
    }
}

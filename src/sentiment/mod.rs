//! Sentiment adapter: an ordered chain of independent scoring strategies.
//!
//! Strategies are tried in priority order and the first one that is
//! available scores the whole batch; results from different strategies are
//! never mixed within a batch. A strategy reports itself unavailable through
//! [`StrategyOutcome::Unavailable`] rather than an error.
//!
//! | Priority | Strategy | Module | Available when |
//! |----------|----------|--------|----------------|
//! | 1 | Binary classifier | [`classifier`] | a model endpoint is configured and answers |
//! | 2 | Lexical polarity | [`lexicon`] | a lexicon file was loaded |
//! | 3 | Keyword tables | [`keywords`] | always |

pub mod classifier;
pub mod keywords;
pub mod lexicon;

use crate::models::{Sentiment, StrategyKind};
use async_trait::async_trait;
use tracing::{info, instrument, warn};

/// Scores strictly above this are positive, strictly below its negation negative.
pub const LABEL_THRESHOLD: f64 = 0.1;

/// What a strategy produced for a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyOutcome {
    /// One sentiment per input text, in input order.
    Scored(Vec<Sentiment>),
    /// The strategy cannot run right now; the reason is logged.
    Unavailable(String),
}

/// One way of scoring English headlines.
#[async_trait(?Send)]
pub trait SentimentStrategy {
    fn kind(&self) -> StrategyKind;

    /// Score every text, or report the strategy unavailable. Texts are never empty.
    async fn score_batch(&self, texts: &[&str]) -> StrategyOutcome;
}

/// A headline ready for scoring: already in English.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentInput {
    pub text: String,
    /// Language the headline was published in.
    pub language_code: String,
}

/// Scores for a batch, parallel to the input, plus the strategy that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentBatch {
    /// `None` when nothing needed scoring or no strategy was available.
    pub strategy: Option<StrategyKind>,
    pub sentiments: Vec<Sentiment>,
}

pub struct SentimentAdapter<'a> {
    strategies: Vec<Box<dyn SentimentStrategy + 'a>>,
}

impl<'a> SentimentAdapter<'a> {
    /// Strategies are tried in the order given.
    pub fn new(strategies: Vec<Box<dyn SentimentStrategy + 'a>>) -> Self {
        Self { strategies }
    }

    pub fn strategy_order(&self) -> Vec<StrategyKind> {
        self.strategies.iter().map(|s| s.kind()).collect()
    }

    /// Score a batch with the first available strategy.
    ///
    /// Empty texts score as [`Sentiment::NEUTRAL`] and are never shown to a
    /// strategy.
    #[instrument(level = "info", skip_all, fields(count = inputs.len()))]
    pub async fn score(&self, inputs: &[SentimentInput]) -> SentimentBatch {
        let (mut sentiments, pending) = split_pending(inputs);
        if pending.is_empty() {
            return SentimentBatch {
                strategy: None,
                sentiments,
            };
        }

        for strategy in &self.strategies {
            if run_strategy(strategy.as_ref(), &pending, &mut sentiments).await {
                return SentimentBatch {
                    strategy: Some(strategy.kind()),
                    sentiments,
                };
            }
        }

        warn!("No sentiment strategy available; every headline scored neutral");
        SentimentBatch {
            strategy: None,
            sentiments,
        }
    }

    /// Score a batch with the strategy of kind `kind` only, so the result is
    /// comparable with an earlier batch that strategy scored. `None` when the
    /// chain has no such strategy or it cannot score right now.
    #[instrument(level = "info", skip_all, fields(count = inputs.len(), strategy = %kind))]
    pub async fn score_with(
        &self,
        kind: StrategyKind,
        inputs: &[SentimentInput],
    ) -> Option<Vec<Sentiment>> {
        let strategy = self.strategies.iter().find(|s| s.kind() == kind)?;
        let (mut sentiments, pending) = split_pending(inputs);
        if pending.is_empty() || run_strategy(strategy.as_ref(), &pending, &mut sentiments).await
        {
            Some(sentiments)
        } else {
            None
        }
    }
}

/// Neutral placeholders for every input, plus the non-empty texts that still
/// need a strategy, keyed by input index.
fn split_pending(inputs: &[SentimentInput]) -> (Vec<Sentiment>, Vec<(usize, &str)>) {
    let sentiments = vec![Sentiment::NEUTRAL; inputs.len()];
    let pending = inputs
        .iter()
        .enumerate()
        .map(|(i, input)| (i, input.text.trim()))
        .filter(|(_, text)| !text.is_empty())
        .collect();
    (sentiments, pending)
}

/// Let one strategy score the pending texts. Returns whether it did; on
/// `false` `sentiments` is untouched.
async fn run_strategy(
    strategy: &(dyn SentimentStrategy + '_),
    pending: &[(usize, &str)],
    sentiments: &mut [Sentiment],
) -> bool {
    let kind = strategy.kind();
    let texts: Vec<&str> = pending.iter().map(|(_, t)| *t).collect();
    match strategy.score_batch(&texts).await {
        StrategyOutcome::Scored(scores) if scores.len() == texts.len() => {
            for ((idx, _), score) in pending.iter().zip(scores) {
                sentiments[*idx] = sanitize(score);
            }
            info!(strategy = %kind, scored = texts.len(), "Scored headline batch");
            true
        }
        StrategyOutcome::Scored(scores) => {
            warn!(
                strategy = %kind,
                expected = texts.len(),
                got = scores.len(),
                "Strategy returned a mismatched batch"
            );
            false
        }
        StrategyOutcome::Unavailable(reason) => {
            info!(strategy = %kind, %reason, "Sentiment strategy unavailable");
            false
        }
    }
}

/// Keep strategy output inside the documented ranges.
fn sanitize(s: Sentiment) -> Sentiment {
    Sentiment {
        sentiment_score: if s.sentiment_score.is_finite() {
            s.sentiment_score.clamp(-1.0, 1.0)
        } else {
            0.0
        },
        sentiment_label: s.sentiment_label,
        confidence: if s.confidence.is_finite() {
            s.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        },
    }
}

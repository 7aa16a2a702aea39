//! Binary sentiment classifier behind a model endpoint (strategy 1).
//!
//! The endpoint's sentiment template must answer each headline with
//! `{"label": "POSITIVE" | "NEGATIVE", "score": <confidence 0..1>}`. The
//! confidence becomes the signed score: kept for positive predictions,
//! negated for negative ones, and zero for a neutral answer.
//!
//! Availability is decided by the first headline of the batch. If the
//! endpoint is missing or that call fails, the strategy is unavailable and
//! the next one takes the whole batch. Once the first call succeeds, a
//! failing headline is scored neutral instead.

use super::{SentimentStrategy, StrategyOutcome};
use crate::llm::{AskAsync, LlmClient};
use crate::models::{Sentiment, SentimentLabel, StrategyKind};
use crate::utils::{extract_json_object, looks_truncated, truncate_for_log};
use async_trait::async_trait;
use serde::Deserialize;
use std::error::Error;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct ClassifierReply {
    label: String,
    #[serde(alias = "confidence")]
    score: f64,
}

/// Turn a raw classifier reply into a [`Sentiment`].
pub fn parse_reply(reply: &str) -> Result<Sentiment, Box<dyn Error>> {
    let json = extract_json_object(reply).ok_or("classifier reply contains no JSON object")?;
    let parsed: ClassifierReply = serde_json::from_str(json).map_err(|e| {
        if looks_truncated(&e) {
            format!("classifier reply was cut off: {e}")
        } else {
            format!("classifier reply is not valid JSON: {e}")
        }
    })?;

    if !parsed.score.is_finite() {
        return Err("classifier score is not a number".into());
    }
    let confidence = parsed.score.clamp(0.0, 1.0);
    let label = SentimentLabel::parse(&parsed.label)
        .ok_or_else(|| format!("unknown classifier label {:?}", parsed.label))?;

    let sentiment_score = match label {
        SentimentLabel::Positive => confidence,
        SentimentLabel::Negative => -confidence,
        SentimentLabel::Neutral => 0.0,
    };
    Ok(Sentiment {
        sentiment_score,
        sentiment_label: label,
        confidence,
    })
}

/// Sends one headline to the endpoint's sentiment template.
#[derive(Debug)]
pub struct SentimentPrompt<'a>(pub &'a LlmClient);

impl AskAsync for SentimentPrompt<'_> {
    type Response = String;

    async fn ask(&self, text: &str) -> Result<String, Box<dyn Error>> {
        self.0.ask_sentiment(text).await
    }
}

pub struct ClassifierStrategy<A> {
    backend: Option<A>,
}

impl<A> ClassifierStrategy<A>
where
    A: AskAsync<Response = String>,
{
    pub fn new(backend: Option<A>) -> Self {
        Self { backend }
    }

    async fn classify(backend: &A, text: &str) -> Result<Sentiment, Box<dyn Error>> {
        let reply = backend.ask(text).await?;
        parse_reply(&reply).inspect_err(|_| {
            debug!(reply = %truncate_for_log(&reply, 200), "Unusable classifier reply");
        })
    }
}

#[async_trait(?Send)]
impl<A> SentimentStrategy for ClassifierStrategy<A>
where
    A: AskAsync<Response = String>,
{
    fn kind(&self) -> StrategyKind {
        StrategyKind::Classifier
    }

    async fn score_batch(&self, texts: &[&str]) -> StrategyOutcome {
        let Some(backend) = self.backend.as_ref() else {
            return StrategyOutcome::Unavailable("no model endpoint configured".to_string());
        };
        let Some((first, rest)) = texts.split_first() else {
            return StrategyOutcome::Scored(Vec::new());
        };

        let mut scores = Vec::with_capacity(texts.len());
        match Self::classify(backend, first).await {
            Ok(s) => scores.push(s),
            Err(e) => {
                return StrategyOutcome::Unavailable(format!("first classification failed: {e}"));
            }
        }

        for (i, text) in rest.iter().enumerate() {
            match Self::classify(backend, text).await {
                Ok(s) => scores.push(s),
                Err(e) => {
                    warn!(
                        index = i + 1,
                        error = %e,
                        text = %truncate_for_log(text, 80),
                        "Classifier failed on headline; scoring it neutral"
                    );
                    scores.push(Sentiment::NEUTRAL);
                }
            }
        }
        StrategyOutcome::Scored(scores)
    }
}

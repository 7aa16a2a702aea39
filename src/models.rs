//! Data models for headlines as they move through the enrichment pipeline.
//!
//! - [`HeadlineRecord`]: a normalized headline, before scoring
//! - [`ScoredHeadline`]: a headline with sentiment, emotion and provenance
//! - [`SourceBiasSummary`]: per-source statistics folded from scored headlines
//! - [`RunReport`]: everything a single run produces, ready for persistence
//!
//! Serialized field names are stable: `HeadlineRecord` writes `text` and
//! `language`, which are also keys the ingestion normalizer recognizes, so a
//! serialized record list normalizes back to itself.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A single headline normalized from scraper output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineRecord {
    /// Identifier of the configured source this headline came from.
    pub source_id: String,
    /// Unescaped, whitespace-trimmed headline text in its original language.
    #[serde(rename = "text")]
    pub raw_text: String,
    /// Declared or resolved ISO 639-1 language code.
    #[serde(rename = "language", default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    /// English rendering, only present for non-English headlines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_text: Option<String>,
    /// Link to the story, when the scraper found one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl HeadlineRecord {
    pub fn new(source_id: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            raw_text: raw_text.into(),
            language_code: None,
            translated_text: None,
            link: None,
        }
    }

    /// The text sentiment scoring should see: the translation when there is
    /// one, the original otherwise.
    pub fn english_text(&self) -> &str {
        self.translated_text.as_deref().unwrap_or(&self.raw_text)
    }

    /// Resolved language, `"en"` when none was ever set.
    pub fn language(&self) -> &str {
        self.language_code.as_deref().unwrap_or("en")
    }
}

/// Categorical sentiment. Variant order is the order used for confusion
/// matrices and other label-indexed tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Negative,
    Neutral,
    Positive,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
        SentimentLabel::Positive,
    ];

    /// Map a signed score to a label using a symmetric dead zone.
    pub fn from_score(score: f64, threshold: f64) -> Self {
        if score > threshold {
            SentimentLabel::Positive
        } else if score < -threshold {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    /// Case-insensitive parse of `positive` / `negative` / `neutral`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" | "pos" => Some(SentimentLabel::Positive),
            "negative" | "neg" => Some(SentimentLabel::Negative),
            "neutral" => Some(SentimentLabel::Neutral),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Negative => "NEGATIVE",
            SentimentLabel::Neutral => "NEUTRAL",
            SentimentLabel::Positive => "POSITIVE",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score, label and confidence for one headline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    /// Signed polarity in `[-1, 1]`.
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
    /// Strategy confidence in `[0, 1]`.
    pub confidence: f64,
}

impl Sentiment {
    /// What empty text and failed items score as.
    pub const NEUTRAL: Sentiment = Sentiment {
        sentiment_score: 0.0,
        sentiment_label: SentimentLabel::Neutral,
        confidence: 0.0,
    };

    /// Build from a signed score: clamps, labels with `threshold`, and uses
    /// the score magnitude as confidence.
    pub fn from_signed(score: f64, threshold: f64) -> Self {
        let score = score.clamp(-1.0, 1.0);
        Sentiment {
            sentiment_score: score,
            sentiment_label: SentimentLabel::from_score(score, threshold),
            confidence: score.abs(),
        }
    }
}

/// Which sentiment strategy produced a score. Scores from different
/// strategies are not comparable, so this travels with every result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Pretrained binary classifier behind a model endpoint.
    Classifier,
    /// Lexicon-based polarity estimator.
    Lexical,
    /// Fixed keyword tables.
    Keyword,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StrategyKind::Classifier => "classifier",
            StrategyKind::Lexical => "lexical",
            StrategyKind::Keyword => "keyword",
        })
    }
}

/// Coarse emotion bucket derived from a sentiment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emotion {
    Sad,
    Concerned,
    Neutral,
    Happy,
    VeryHappy,
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Emotion::Sad => "Sad",
            Emotion::Concerned => "Concerned",
            Emotion::Neutral => "Neutral",
            Emotion::Happy => "Happy",
            Emotion::VeryHappy => "Very Happy",
        })
    }
}

/// An [`Emotion`] with the optional fear qualifier, rendered as e.g. `Sad/Fear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmotionTag {
    pub emotion: Emotion,
    pub fear: bool,
}

impl fmt::Display for EmotionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fear {
            write!(f, "{}/Fear", self.emotion)
        } else {
            write!(f, "{}", self.emotion)
        }
    }
}

impl Serialize for EmotionTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A headline after sentiment scoring. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredHeadline {
    #[serde(flatten)]
    pub record: HeadlineRecord,
    #[serde(flatten)]
    pub sentiment: Sentiment,
    pub emotion: EmotionTag,
    /// `None` only for headlines whose text was empty.
    pub strategy: Option<StrategyKind>,
    /// Score of the untranslated text by the same strategy. Equal to the
    /// sentiment score for English headlines; `None` when the original could
    /// not be scored.
    pub original_score: Option<f64>,
    /// `sentiment_score - original_score`: how much translation moved the score.
    pub sentiment_shift: Option<f64>,
}

/// Direction of a source's average sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BiasIndicator {
    #[serde(rename = "Positive Bias")]
    PositiveBias,
    #[serde(rename = "Negative Bias")]
    NegativeBias,
    Neutral,
}

impl fmt::Display for BiasIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BiasIndicator::PositiveBias => "Positive Bias",
            BiasIndicator::NegativeBias => "Negative Bias",
            BiasIndicator::Neutral => "Neutral",
        })
    }
}

/// Per-source sentiment statistics for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceBiasSummary {
    pub source_id: String,
    pub headline_count: usize,
    pub avg_sentiment: f64,
    pub positive_count: usize,
    pub negative_count: usize,
    pub neutral_count: usize,
    /// Sample standard deviation of scores; absent with fewer than two headlines.
    pub std_deviation: Option<f64>,
    pub bias: BiasIndicator,
    /// Mean score of the untranslated texts, over headlines that have one.
    pub avg_original_sentiment: Option<f64>,
    /// Mean translation shift, over headlines that have one.
    pub avg_sentiment_shift: Option<f64>,
    /// Sample standard deviation of the shifts.
    pub shift_std_deviation: Option<f64>,
}

/// Average sentiment of all headlines sharing a language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageSummary {
    pub language_code: String,
    pub headline_count: usize,
    pub avg_sentiment: f64,
}

/// Label count differences between two sources (`a - b`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabelDelta {
    pub positive: i64,
    pub negative: i64,
    pub neutral: i64,
}

/// Label count differences between two sources in the same run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceComparison {
    pub source_a: String,
    pub source_b: String,
    #[serde(flatten)]
    pub delta: LabelDelta,
}

/// A headline whose score moved noticeably in translation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentDivergence {
    pub source_id: String,
    pub text: String,
    pub original_score: f64,
    pub translated_score: f64,
    pub sentiment_shift: f64,
}

/// Everything one pipeline run produces.
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// RFC 3339 timestamp of the run.
    pub generated_at: String,
    /// The date of the run in `YYYY-MM-DD` format.
    pub local_date: String,
    /// "morning", "afternoon", or "evening".
    pub edition: String,
    /// Strategy that scored this batch, if anything was scored.
    pub strategy: Option<StrategyKind>,
    pub headlines: Vec<ScoredHeadline>,
    pub summaries: Vec<SourceBiasSummary>,
    pub languages: Vec<LanguageSummary>,
    /// Every pair of summarized sources, in summary order.
    pub comparisons: Vec<SourceComparison>,
    /// Headlines whose translation shifted sentiment past the threshold,
    /// largest shift first.
    pub divergences: Vec<SentimentDivergence>,
}

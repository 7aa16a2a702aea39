//! Evaluation of the sentiment adapter against a labeled dataset.
//!
//! The dataset is a JSON list of `{headline, sentiment, language?}` entries.
//! Labels are matched case-insensitively; entries with an unknown label are
//! skipped. Non-English entries are translated the same way the pipeline
//! translates them, then the whole set is scored as one batch.
//!
//! Metrics follow the usual multi-class conventions: macro averages over the
//! union of true and predicted labels, and a zero wherever a ratio would
//! divide by zero.

use crate::models::{SentimentLabel, StrategyKind};
use crate::sentiment::{SentimentAdapter, SentimentInput};
use crate::translate::{Translator, translate_to_english};
use chrono::{DateTime, Local};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct LabeledHeadline {
    pub headline: String,
    pub sentiment: String,
    #[serde(default)]
    pub language: Option<String>,
}

/// Parse a labeled dataset.
pub fn parse_dataset(raw: &str) -> Result<Vec<LabeledHeadline>, Box<dyn Error>> {
    Ok(serde_json::from_str(raw)?)
}

pub fn load_dataset(path: &Path) -> Result<Vec<LabeledHeadline>, Box<dyn Error>> {
    let raw = std::fs::read_to_string(path)?;
    let dataset = parse_dataset(&raw)?;
    info!(path = %path.display(), entries = dataset.len(), "Loaded labeled dataset");
    Ok(dataset)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: SentimentLabel,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of entries whose true label is this one.
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationMetrics {
    pub total: usize,
    pub accuracy: f64,
    pub macro_precision: f64,
    pub macro_recall: f64,
    pub macro_f1: f64,
    /// Row and column order of `confusion_matrix`.
    pub labels: Vec<SentimentLabel>,
    /// `confusion_matrix[i][j]`: entries labeled `labels[i]` predicted as `labels[j]`.
    pub confusion_matrix: Vec<Vec<usize>>,
    pub per_class: Vec<ClassMetrics>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageMetrics {
    pub language_code: String,
    pub total: usize,
    pub accuracy: f64,
    pub macro_f1: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub headline: String,
    pub language_code: String,
    pub expected: SentimentLabel,
    pub predicted: SentimentLabel,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub generated_at: String,
    pub strategy: Option<StrategyKind>,
    pub skipped: usize,
    pub metrics: EvaluationMetrics,
    pub languages: Vec<LanguageMetrics>,
    pub predictions: Vec<Prediction>,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// Accuracy, macro precision/recall/F1 and the confusion matrix for two
/// parallel label lists.
pub fn compute_metrics(
    truth: &[SentimentLabel],
    predicted: &[SentimentLabel],
) -> EvaluationMetrics {
    let pairs: Vec<(SentimentLabel, SentimentLabel)> =
        truth.iter().copied().zip(predicted.iter().copied()).collect();

    let labels: Vec<SentimentLabel> = SentimentLabel::ALL
        .into_iter()
        .filter(|l| pairs.iter().any(|(t, p)| t == l || p == l))
        .collect();

    let confusion_matrix: Vec<Vec<usize>> = labels
        .iter()
        .map(|t| {
            labels
                .iter()
                .map(|p| pairs.iter().filter(|pair| **pair == (*t, *p)).count())
                .collect()
        })
        .collect();

    let per_class: Vec<ClassMetrics> = labels
        .iter()
        .map(|&label| {
            let tp = pairs.iter().filter(|(t, p)| *t == label && *p == label).count();
            let predicted_as = pairs.iter().filter(|(_, p)| *p == label).count();
            let support = pairs.iter().filter(|(t, _)| *t == label).count();
            let precision = ratio(tp, predicted_as);
            let recall = ratio(tp, support);
            let f1 = if precision + recall == 0.0 {
                0.0
            } else {
                2.0 * precision * recall / (precision + recall)
            };
            ClassMetrics {
                label,
                precision,
                recall,
                f1,
                support,
            }
        })
        .collect();

    let macro_avg = |f: fn(&ClassMetrics) -> f64| {
        if per_class.is_empty() {
            0.0
        } else {
            per_class.iter().map(f).sum::<f64>() / per_class.len() as f64
        }
    };
    let correct = pairs.iter().filter(|(t, p)| t == p).count();

    EvaluationMetrics {
        total: pairs.len(),
        accuracy: ratio(correct, pairs.len()),
        macro_precision: macro_avg(|c| c.precision),
        macro_recall: macro_avg(|c| c.recall),
        macro_f1: macro_avg(|c| c.f1),
        labels,
        confusion_matrix,
        per_class,
    }
}

/// Metrics per language code, sorted by code.
pub fn language_metrics(predictions: &[Prediction]) -> Vec<LanguageMetrics> {
    predictions
        .iter()
        .map(|p| (p.language_code.clone(), (p.expected, p.predicted)))
        .into_group_map()
        .into_iter()
        .sorted_by(|a, b| a.0.cmp(&b.0))
        .map(|(language_code, pairs)| {
            let (truth, predicted): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
            let metrics = compute_metrics(&truth, &predicted);
            LanguageMetrics {
                language_code,
                total: metrics.total,
                accuracy: metrics.accuracy,
                macro_f1: metrics.macro_f1,
            }
        })
        .collect()
}

/// Score a labeled dataset and compute its metrics.
#[instrument(level = "info", skip_all, fields(entries = dataset.len()))]
pub async fn evaluate<T: Translator>(
    dataset: &[LabeledHeadline],
    adapter: &SentimentAdapter<'_>,
    translator: &T,
    now: DateTime<Local>,
) -> EvaluationReport {
    let mut expected = Vec::with_capacity(dataset.len());
    let mut inputs = Vec::with_capacity(dataset.len());
    let mut headlines = Vec::with_capacity(dataset.len());

    for entry in dataset {
        let Some(label) = SentimentLabel::parse(&entry.sentiment) else {
            warn!(label = %entry.sentiment, "Unknown label in dataset; skipping entry");
            continue;
        };
        let language = entry
            .language
            .as_deref()
            .map(|l| l.trim().to_ascii_lowercase())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| "en".to_string());
        let text = translate_to_english(&entry.headline, &language, translator).await;

        expected.push(label);
        headlines.push(entry.headline.clone());
        inputs.push(SentimentInput {
            text,
            language_code: language,
        });
    }
    let skipped = dataset.len() - inputs.len();

    let batch = adapter.score(&inputs).await;
    let predictions: Vec<Prediction> = headlines
        .into_iter()
        .zip(inputs)
        .zip(expected)
        .zip(batch.sentiments)
        .map(|(((headline, input), expected), sentiment)| Prediction {
            headline,
            language_code: input.language_code,
            expected,
            predicted: sentiment.sentiment_label,
            score: sentiment.sentiment_score,
        })
        .collect();

    let (truth, predicted): (Vec<_>, Vec<_>) =
        predictions.iter().map(|p| (p.expected, p.predicted)).unzip();
    let metrics = compute_metrics(&truth, &predicted);
    info!(
        total = metrics.total,
        skipped,
        accuracy = metrics.accuracy,
        macro_f1 = metrics.macro_f1,
        strategy = ?batch.strategy,
        "Evaluation complete"
    );

    EvaluationReport {
        generated_at: now.to_rfc3339(),
        strategy: batch.strategy,
        skipped,
        metrics,
        languages: language_metrics(&predictions),
        predictions,
    }
}

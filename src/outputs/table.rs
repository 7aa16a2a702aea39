//! Plain-text summary table printed at the end of a run.

use crate::config::Sources;
use crate::models::{LanguageSummary, SentimentDivergence, SourceBiasSummary};
use std::fmt::Write;

/// Render per-source summaries, one row per source in report order. Rows
/// show the configured outlet name when `sources` knows the source.
pub fn summary_table(summaries: &[SourceBiasSummary], sources: &Sources) -> String {
    let names: Vec<&str> = summaries
        .iter()
        .map(|s| sources.display_name(&s.source_id))
        .collect();
    let width = names
        .iter()
        .map(|n| n.chars().count())
        .max()
        .unwrap_or(0)
        .max("source".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<width$}  {:>5}  {:>7}  {:>7}  {:>7}  {:>3}  {:>3}  {:>3}  {}",
        "source", "count", "avg", "std", "shift", "pos", "neg", "neu", "bias"
    );
    for (s, name) in summaries.iter().zip(names) {
        let _ = writeln!(
            out,
            "{:<width$}  {:>5}  {:>7.3}  {:>7}  {:>7}  {:>3}  {:>3}  {:>3}  {}",
            name,
            s.headline_count,
            s.avg_sentiment,
            optional(s.std_deviation),
            optional(s.avg_sentiment_shift),
            s.positive_count,
            s.negative_count,
            s.neutral_count,
            s.bias
        );
    }
    out
}

fn optional(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.3}"))
        .unwrap_or_else(|| "-".to_string())
}

/// One line per language: `kn  8 headlines  avg -0.213`.
pub fn language_lines(languages: &[LanguageSummary]) -> String {
    languages
        .iter()
        .map(|l| {
            format!(
                "{:<4}{:>3} headlines  avg {:.3}\n",
                l.language_code, l.headline_count, l.avg_sentiment
            )
        })
        .collect()
}

/// One line per divergent headline: `+0.900  vijaya_karnataka  <text>`.
pub fn divergence_lines(divergences: &[SentimentDivergence]) -> String {
    divergences
        .iter()
        .map(|d| format!("{:+.3}  {}  {}\n", d.sentiment_shift, d.source_id, d.text))
        .collect()
}

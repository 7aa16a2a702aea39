//! Per-source and per-language aggregation of scored headlines.
//!
//! All statistics are plain means and counts; confidence does not weight
//! anything. Sources appear in the order their first headline does, and a
//! source with no headlines produces no summary.
//!
//! Translation shift statistics only cover headlines whose original text
//! could be scored.

use crate::config::PipelineConfig;
use crate::models::{
    BiasIndicator, LabelDelta, LanguageSummary, ScoredHeadline, SentimentDivergence,
    SentimentLabel, SourceBiasSummary, SourceComparison,
};
use itertools::Itertools;

/// Classify an average sentiment.
pub fn bias_indicator(avg: f64, config: &PipelineConfig) -> BiasIndicator {
    if avg > config.positive_bias_threshold {
        BiasIndicator::PositiveBias
    } else if avg < config.negative_bias_threshold {
        BiasIndicator::NegativeBias
    } else {
        BiasIndicator::Neutral
    }
}

/// Summarize one source, or `None` when it has no headlines.
pub fn summarize_source<'a, I>(
    source_id: &str,
    headlines: I,
    config: &PipelineConfig,
) -> Option<SourceBiasSummary>
where
    I: IntoIterator<Item = &'a ScoredHeadline>,
{
    let headlines: Vec<&ScoredHeadline> = headlines.into_iter().collect();
    if headlines.is_empty() {
        return None;
    }

    let scores: Vec<f64> = headlines.iter().map(|h| h.sentiment.sentiment_score).collect();
    let avg_sentiment = mean(&scores);
    let count = |label: SentimentLabel| {
        headlines
            .iter()
            .filter(|h| h.sentiment.sentiment_label == label)
            .count()
    };
    let originals: Vec<f64> = headlines.iter().filter_map(|h| h.original_score).collect();
    let shifts: Vec<f64> = headlines.iter().filter_map(|h| h.sentiment_shift).collect();

    Some(SourceBiasSummary {
        source_id: source_id.to_string(),
        headline_count: headlines.len(),
        avg_sentiment,
        positive_count: count(SentimentLabel::Positive),
        negative_count: count(SentimentLabel::Negative),
        neutral_count: count(SentimentLabel::Neutral),
        std_deviation: sample_std_dev(&scores),
        bias: bias_indicator(avg_sentiment, config),
        avg_original_sentiment: (!originals.is_empty()).then(|| mean(&originals)),
        avg_sentiment_shift: (!shifts.is_empty()).then(|| mean(&shifts)),
        shift_std_deviation: sample_std_dev(&shifts),
    })
}

/// One summary per source present in `headlines`.
pub fn summarize(headlines: &[ScoredHeadline], config: &PipelineConfig) -> Vec<SourceBiasSummary> {
    headlines
        .iter()
        .map(|h| h.record.source_id.as_str())
        .unique()
        .filter_map(|source_id| {
            summarize_source(
                source_id,
                headlines.iter().filter(|h| h.record.source_id == source_id),
                config,
            )
        })
        .collect()
}

/// Average sentiment per language, sorted by language code.
pub fn language_breakdown(headlines: &[ScoredHeadline]) -> Vec<LanguageSummary> {
    headlines
        .iter()
        .map(|h| (h.record.language().to_string(), h.sentiment.sentiment_score))
        .into_group_map()
        .into_iter()
        .sorted_by(|a, b| a.0.cmp(&b.0))
        .map(|(language_code, scores)| LanguageSummary {
            language_code,
            headline_count: scores.len(),
            avg_sentiment: mean(&scores),
        })
        .collect()
}

/// How many more positive, negative and neutral headlines `a` ran than `b`.
pub fn compare_label_counts(a: &SourceBiasSummary, b: &SourceBiasSummary) -> LabelDelta {
    LabelDelta {
        positive: a.positive_count as i64 - b.positive_count as i64,
        negative: a.negative_count as i64 - b.negative_count as i64,
        neutral: a.neutral_count as i64 - b.neutral_count as i64,
    }
}

/// Label count comparisons for every pair of sources.
pub fn compare_sources(summaries: &[SourceBiasSummary]) -> Vec<SourceComparison> {
    summaries
        .iter()
        .tuple_combinations()
        .map(|(a, b)| SourceComparison {
            source_a: a.source_id.clone(),
            source_b: b.source_id.clone(),
            delta: compare_label_counts(a, b),
        })
        .collect()
}

/// Headlines whose translation moved the score by more than `threshold` in
/// either direction, sorted by shift with the largest first.
pub fn find_divergences(headlines: &[ScoredHeadline], threshold: f64) -> Vec<SentimentDivergence> {
    headlines
        .iter()
        .filter_map(|h| {
            let shift = h.sentiment_shift?;
            (shift.abs() > threshold).then(|| SentimentDivergence {
                source_id: h.record.source_id.clone(),
                text: h.record.raw_text.clone(),
                original_score: h.original_score.unwrap_or_default(),
                translated_score: h.sentiment.sentiment_score,
                sentiment_shift: shift,
            })
        })
        .sorted_by(|a, b| b.sentiment_shift.total_cmp(&a.sentiment_shift))
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Emotion, EmotionTag, HeadlineRecord, Sentiment, StrategyKind};
    use crate::sentiment::LABEL_THRESHOLD;

    fn scored(source: &str, language: &str, score: f64) -> ScoredHeadline {
        translated(source, language, &format!("{source} headline {score}"), score, score)
    }

    /// A headline scored `original` before translation and `score` after.
    fn translated(
        source: &str,
        language: &str,
        text: &str,
        original: f64,
        score: f64,
    ) -> ScoredHeadline {
        let mut record = HeadlineRecord::new(source, text);
        record.language_code = Some(language.to_string());
        ScoredHeadline {
            record,
            sentiment: Sentiment::from_signed(score, LABEL_THRESHOLD),
            emotion: EmotionTag {
                emotion: Emotion::Neutral,
                fear: false,
            },
            strategy: Some(StrategyKind::Keyword),
            original_score: Some(original),
            sentiment_shift: Some(score - original),
        }
    }

    /// Two outlets covering the same two stories; the Kannada originals
    /// score neutral and only their translations carry sentiment.
    fn shifted_day() -> Vec<ScoredHeadline> {
        vec![
            translated("times_of_india", "en", "Accident on highway", -0.7, -0.7),
            translated("times_of_india", "en", "Sports victory celebrated", 0.8, 0.8),
            translated("vijaya_karnataka", "kn", "ಹೆದ್ದಾರಿಯಲ್ಲಿ ಅಪಘಾತ", 0.0, -0.6),
            translated("vijaya_karnataka", "kn", "ಕ್ರೀಡಾ ಗೆಲುವು ಸಂಭ್ರಮ", 0.0, 0.9),
        ]
    }

    #[test]
    fn test_single_source_summary() {
        let config = PipelineConfig::default();
        let headlines = vec![
            scored("ndtv", "en", 0.8),
            scored("ndtv", "en", -0.2),
            scored("ndtv", "en", 0.1),
        ];

        let summaries = summarize(&headlines, &config);
        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        assert_eq!(s.source_id, "ndtv");
        assert_eq!(s.headline_count, 3);
        assert!((s.avg_sentiment - 0.2333).abs() < 1e-3);
        assert_eq!(s.positive_count, 1);
        assert_eq!(s.negative_count, 1);
        assert_eq!(s.neutral_count, 1);
        assert_eq!(s.bias, BiasIndicator::PositiveBias);
        assert!((s.std_deviation.unwrap() - 0.5132).abs() < 1e-3);
    }

    #[test]
    fn test_bias_thresholds() {
        let config = PipelineConfig::default();
        assert_eq!(bias_indicator(0.06, &config), BiasIndicator::PositiveBias);
        assert_eq!(bias_indicator(0.05, &config), BiasIndicator::Neutral);
        assert_eq!(bias_indicator(-0.05, &config), BiasIndicator::Neutral);
        assert_eq!(bias_indicator(-0.06, &config), BiasIndicator::NegativeBias);
    }

    #[test]
    fn test_sources_keep_first_seen_order() {
        let config = PipelineConfig::default();
        let headlines = vec![
            scored("vijaya_karnataka", "kn", -0.7),
            scored("ndtv", "en", 0.3),
            scored("vijaya_karnataka", "kn", -0.5),
        ];
        let summaries = summarize(&headlines, &config);
        let ids: Vec<&str> = summaries.iter().map(|s| s.source_id.as_str()).collect();
        assert_eq!(ids, vec!["vijaya_karnataka", "ndtv"]);
        assert_eq!(summaries[0].bias, BiasIndicator::NegativeBias);
        assert_eq!(summaries[1].std_deviation, None);
    }

    #[test]
    fn test_empty_input_has_no_summaries() {
        let config = PipelineConfig::default();
        assert!(summarize(&[], &config).is_empty());
        assert!(summarize_source("ndtv", std::iter::empty(), &config).is_none());
    }

    #[test]
    fn test_language_breakdown() {
        let headlines = vec![
            scored("toi", "en", 0.4),
            scored("dinamani", "ta", -0.2),
            scored("ndtv", "en", 0.0),
        ];
        let langs = language_breakdown(&headlines);
        assert_eq!(langs.len(), 2);
        assert_eq!(langs[0].language_code, "en");
        assert_eq!(langs[0].headline_count, 2);
        assert!((langs[0].avg_sentiment - 0.2).abs() < 1e-9);
        assert_eq!(langs[1].language_code, "ta");
    }

    #[test]
    fn test_compare_label_counts() {
        let config = PipelineConfig::default();
        let a = summarize_source(
            "toi",
            &[scored("toi", "en", 0.8), scored("toi", "en", 0.5)],
            &config,
        )
        .unwrap();
        let b = summarize_source(
            "vk",
            &[scored("vk", "kn", -0.8), scored("vk", "kn", 0.5), scored("vk", "kn", 0.0)],
            &config,
        )
        .unwrap();
        let delta = compare_label_counts(&a, &b);
        assert_eq!(
            delta,
            LabelDelta {
                positive: 1,
                negative: -1,
                neutral: -1
            }
        );

        let comparisons = compare_sources(&[a, b]);
        assert_eq!(comparisons.len(), 1);
        assert_eq!(comparisons[0].source_a, "toi");
        assert_eq!(comparisons[0].source_b, "vk");
        assert_eq!(comparisons[0].delta, delta);
    }

    #[test]
    fn test_compare_sources_covers_every_pair() {
        let config = PipelineConfig::default();
        let headlines = vec![
            scored("a", "en", 0.5),
            scored("b", "en", -0.5),
            scored("c", "ta", 0.0),
        ];
        let pairs: Vec<(String, String)> = compare_sources(&summarize(&headlines, &config))
            .into_iter()
            .map(|c| (c.source_a, c.source_b))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "b".to_string()),
                ("a".to_string(), "c".to_string()),
                ("b".to_string(), "c".to_string()),
            ]
        );
    }

    #[test]
    fn test_translation_shift_per_source() {
        let config = PipelineConfig::default();
        let summaries = summarize(&shifted_day(), &config);

        let toi = &summaries[0];
        assert_eq!(toi.source_id, "times_of_india");
        assert!((toi.avg_sentiment - 0.05).abs() < 1e-9);
        assert!((toi.avg_original_sentiment.unwrap() - 0.05).abs() < 1e-9);
        assert_eq!(toi.avg_sentiment_shift, Some(0.0));
        assert_eq!(toi.shift_std_deviation, Some(0.0));

        let vk = &summaries[1];
        assert_eq!(vk.source_id, "vijaya_karnataka");
        assert!((vk.avg_sentiment - 0.15).abs() < 1e-9);
        assert_eq!(vk.avg_original_sentiment, Some(0.0));
        assert!((vk.avg_sentiment_shift.unwrap() - 0.15).abs() < 1e-9);
        assert!((vk.shift_std_deviation.unwrap() - 1.0607).abs() < 1e-3);
    }

    #[test]
    fn test_unscored_originals_have_no_shift_stats() {
        let config = PipelineConfig::default();
        let mut headline = scored("dinamani", "ta", -0.4);
        headline.original_score = None;
        headline.sentiment_shift = None;

        let summary = summarize_source("dinamani", [&headline], &config).unwrap();
        assert_eq!(summary.avg_original_sentiment, None);
        assert_eq!(summary.avg_sentiment_shift, None);
        assert_eq!(summary.shift_std_deviation, None);
        assert!(find_divergences(&[headline], 0.5).is_empty());
    }

    #[test]
    fn test_divergences_sorted_by_shift() {
        let divergences = find_divergences(&shifted_day(), 0.5);
        assert_eq!(divergences.len(), 2);

        assert_eq!(divergences[0].text, "ಕ್ರೀಡಾ ಗೆಲುವು ಸಂಭ್ರಮ");
        assert_eq!(divergences[0].original_score, 0.0);
        assert_eq!(divergences[0].translated_score, 0.9);
        assert!((divergences[0].sentiment_shift - 0.9).abs() < 1e-9);

        assert_eq!(divergences[1].source_id, "vijaya_karnataka");
        assert!((divergences[1].sentiment_shift + 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_divergence_threshold_is_exclusive() {
        let headlines = vec![
            translated("ndtv", "hi", "सीमा पर तनाव", 0.0, -0.5),
            translated("ndtv", "hi", "बाज़ार में उछाल", 0.0, 0.51),
        ];
        let divergences = find_divergences(&headlines, 0.5);
        assert_eq!(divergences.len(), 1);
        assert_eq!(divergences[0].text, "बाज़ार में उछाल");
    }
}

//! The headline enrichment pipeline.
//!
//! Stages run one after another over in-memory lists, each consuming the
//! previous stage's output:
//!
//! 1. **Collect**: scrape every source, normalize its raw output and drop
//!    headlines that fail the validity filter
//! 2. **Enrich**: resolve each headline's language and translate the
//!    non-English ones
//! 3. **Score**: run the batch through the sentiment adapter, then tag
//!    emotions. Untranslated originals are scored again by the same strategy
//!    to measure how far translation moved each score
//! 4. **Aggregate**: fold scores into per-source and per-language summaries,
//!    compare label counts between sources and list divergent translations
//!
//! No collaborator failure stops a run. A source that cannot be scraped is
//! left out, and the run still produces a (possibly empty) report.

use crate::aggregate::{compare_sources, find_divergences, language_breakdown, summarize};
use crate::config::{PipelineConfig, Sources};
use crate::emotion::EmotionTagger;
use crate::filter::ValidityFilter;
use crate::ingest::normalize_value;
use crate::language::{LanguageDetector, resolve_language};
use crate::models::{HeadlineRecord, RunReport, ScoredHeadline, StrategyKind};
use crate::scrapers::Scraper;
use crate::sentiment::{SentimentAdapter, SentimentInput};
use crate::translate::{TARGET_LANGUAGE, Translator, translate_to_english};
use crate::utils::edition_for;
use chrono::{DateTime, Local};
use tracing::{debug, info, instrument, warn};

pub struct Pipeline<'a, S, T, D> {
    config: &'a PipelineConfig,
    scraper: &'a S,
    translator: &'a T,
    detector: &'a D,
    adapter: SentimentAdapter<'a>,
    filter: ValidityFilter,
    tagger: EmotionTagger,
}

impl<'a, S, T, D> Pipeline<'a, S, T, D>
where
    S: Scraper,
    T: Translator,
    D: LanguageDetector,
{
    pub fn new(
        config: &'a PipelineConfig,
        scraper: &'a S,
        translator: &'a T,
        detector: &'a D,
        adapter: SentimentAdapter<'a>,
    ) -> Self {
        Self {
            config,
            scraper,
            translator,
            detector,
            adapter,
            filter: ValidityFilter::from_config(config),
            tagger: EmotionTagger::new(&config.fear_keywords),
        }
    }

    /// Run every stage and build the report for `now`.
    #[instrument(level = "info", skip_all, fields(sources = sources.0.len()))]
    pub async fn run(&self, sources: &Sources, now: DateTime<Local>) -> RunReport {
        let records = self.collect(sources).await;
        let records = self.enrich(records).await;
        let (strategy, headlines) = self.score(records).await;
        build_report(headlines, strategy, self.config, now)
    }

    /// Scrape, normalize and filter each source in turn.
    #[instrument(level = "info", skip_all)]
    pub async fn collect(&self, sources: &Sources) -> Vec<HeadlineRecord> {
        let mut records = Vec::new();
        for source in sources.iter() {
            let raw = match self.scraper.scrape(source).await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(source = %source.id, error = %e, "Scraper failed; source has no data");
                    continue;
                }
            };

            let normalized = normalize_value(&source.id, raw, source.language.as_deref());
            let total = normalized.len();
            let valid: Vec<HeadlineRecord> = normalized
                .into_iter()
                .filter(|r| self.filter.is_valid(&r.raw_text))
                .collect();

            if valid.is_empty() {
                warn!(source = %source.id, scraped = total, "No valid headlines for source");
            } else {
                info!(
                    source = %source.id,
                    kept = valid.len(),
                    dropped = total - valid.len(),
                    "Collected headlines"
                );
            }
            records.extend(valid);
        }
        records
    }

    /// Resolve languages and attach English translations. Any translation
    /// carried in from scraper output is replaced: English headlines lose it
    /// and every other headline gets a fresh one.
    #[instrument(level = "info", skip_all, fields(count = records.len()))]
    pub async fn enrich(&self, records: Vec<HeadlineRecord>) -> Vec<HeadlineRecord> {
        let mut enriched = Vec::with_capacity(records.len());
        for mut record in records {
            let language = resolve_language(&record, self.detector);
            record.translated_text = if language == TARGET_LANGUAGE {
                None
            } else {
                Some(translate_to_english(&record.raw_text, &language, self.translator).await)
            };
            record.language_code = Some(language);
            enriched.push(record);
        }

        let translated = enriched.iter().filter(|r| r.translated_text.is_some()).count();
        debug!(translated, "Enriched headlines");
        enriched
    }

    /// Score the whole batch with one strategy and tag emotions.
    #[instrument(level = "info", skip_all, fields(count = records.len()))]
    pub async fn score(
        &self,
        records: Vec<HeadlineRecord>,
    ) -> (Option<StrategyKind>, Vec<ScoredHeadline>) {
        let inputs: Vec<SentimentInput> = records
            .iter()
            .map(|r| SentimentInput {
                text: r.english_text().to_string(),
                language_code: r.language().to_string(),
            })
            .collect();

        let batch = self.adapter.score(&inputs).await;
        let strategy = batch.strategy;
        let originals = self.score_originals(&records, strategy).await;
        let headlines = records
            .into_iter()
            .zip(batch.sentiments)
            .zip(originals)
            .map(|((record, sentiment), original)| {
                let text = record.english_text();
                let emotion = self.tagger.tag(sentiment.sentiment_score, text);
                let strategy = if text.trim().is_empty() { None } else { strategy };
                let original_score = if record.translated_text.is_some() {
                    original
                } else {
                    Some(sentiment.sentiment_score)
                };
                ScoredHeadline {
                    record,
                    sentiment,
                    emotion,
                    strategy,
                    original_score,
                    sentiment_shift: original_score.map(|o| sentiment.sentiment_score - o),
                }
            })
            .collect();
        (strategy, headlines)
    }

    /// Score each translated headline's original text with `strategy`, so
    /// the result is comparable with its translated score. Parallel to
    /// `records`; untranslated headlines are left `None`.
    async fn score_originals(
        &self,
        records: &[HeadlineRecord],
        strategy: Option<StrategyKind>,
    ) -> Vec<Option<f64>> {
        let (indices, inputs): (Vec<usize>, Vec<SentimentInput>) = records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.translated_text.is_some())
            .map(|(i, r)| {
                let input = SentimentInput {
                    text: r.raw_text.clone(),
                    language_code: r.language().to_string(),
                };
                (i, input)
            })
            .unzip();

        let mut originals = vec![None; records.len()];
        let Some(kind) = strategy else {
            return originals;
        };
        if inputs.is_empty() {
            return originals;
        }
        match self.adapter.score_with(kind, &inputs).await {
            Some(sentiments) => {
                for (idx, sentiment) in indices.into_iter().zip(sentiments) {
                    originals[idx] = Some(sentiment.sentiment_score);
                }
            }
            None => warn!(
                strategy = %kind,
                count = inputs.len(),
                "Original texts could not be scored; translation shift unknown"
            ),
        }
        originals
    }
}

/// Aggregate scored headlines into a report stamped with `now`.
pub fn build_report(
    headlines: Vec<ScoredHeadline>,
    strategy: Option<StrategyKind>,
    config: &PipelineConfig,
    now: DateTime<Local>,
) -> RunReport {
    let summaries = summarize(&headlines, config);
    let languages = language_breakdown(&headlines);
    let comparisons = compare_sources(&summaries);
    let divergences = find_divergences(&headlines, config.divergence_threshold);
    info!(
        headlines = headlines.len(),
        sources = summaries.len(),
        divergent = divergences.len(),
        strategy = ?strategy,
        "Built run report"
    );

    RunReport {
        generated_at: now.to_rfc3339(),
        local_date: now.date_naive().to_string(),
        edition: edition_for(now.time()).to_string(),
        strategy,
        headlines,
        summaries,
        languages,
        comparisons,
        divergences,
    }
}

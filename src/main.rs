//! # Headline Bias
//!
//! Collects front-page headlines from regional news outlets in several
//! languages, translates the non-English ones, scores their sentiment, and
//! aggregates per-source statistics to show how differently outlets frame
//! the same day's news.
//!
//! ## Usage
//!
//! ```sh
//! headline_bias analyze -j ./json
//! headline_bias evaluate -l labeled.json
//! ```
//!
//! ## Architecture
//!
//! `analyze` runs the [`pipeline::Pipeline`] stage by stage:
//! 1. **Collect**: scrape (or replay) each source, normalize and filter
//! 2. **Enrich**: resolve languages and translate into English
//! 3. **Score**: sentiment through the strategy chain, then emotion tags
//! 4. **Aggregate**: per-source bias summaries, a language breakdown and the
//!    headlines whose score moved most in translation
//!
//! Sentiment strategies are tried in order: the model-backed classifier, the
//! lexicon, and finally the built-in keyword tables, which always work. The
//! run report is written as JSON and summarized on the terminal.

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregate;
mod cli;
mod config;
mod emotion;
mod evaluate;
mod filter;
mod ingest;
mod language;
mod llm;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod sentiment;
mod translate;
mod utils;

use cli::{AnalyzeArgs, Cli, Command, CommonArgs, EvaluateArgs};
use config::LlmSettings;
use language::ScriptDetector;
use llm::LlmClient;
use outputs::{json, table};
use pipeline::Pipeline;
use scrapers::SourceFeed;
use scrapers::dump::DumpScraper;
use scrapers::html::HtmlScraper;
use sentiment::classifier::{ClassifierStrategy, SentimentPrompt};
use sentiment::keywords::KeywordStrategy;
use sentiment::lexicon::{LexicalStrategy, Lexicon};
use sentiment::{SentimentAdapter, SentimentStrategy};
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("headline_bias starting up");

    let cli = Cli::parse();
    debug!(?cli.command, "Parsed CLI arguments");

    match cli.command {
        Command::Analyze(args) => run_analysis(args).await?,
        Command::Evaluate(args) => run_evaluation(args).await?,
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

/// Scrape, enrich, score and aggregate, then write the run report.
async fn run_analysis(args: AnalyzeArgs) -> Result<(), Box<dyn Error>> {
    let config = config::load(args.common.config.as_deref())?;

    // Early check: ensure JSON output dir is writable
    if let Err(e) = ensure_writable_dir(&args.json_output_dir).await {
        error!(
            path = %args.json_output_dir,
            error = %e,
            "JSON output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let feed = match &args.input {
        Some(path) => SourceFeed::Recorded(DumpScraper::load(path)?),
        None => SourceFeed::Live(HtmlScraper::new()?),
    };
    let client = load_llm(args.common.llm_config.as_deref(), &config.llm).await;
    let adapter = build_adapter(client.as_ref(), load_lexicon(&args.common));

    let pipeline = Pipeline::new(&config.pipeline, &feed, &client, &ScriptDetector, adapter);
    let report = pipeline.run(&config.sources, Local::now()).await;

    let path = json::write_report(&report, &args.json_output_dir).await?;
    info!(path = %path.display(), edition = %report.edition, "Run report written");

    println!("{}", table::summary_table(&report.summaries, &config.sources));
    print!("{}", table::language_lines(&report.languages));
    if !report.divergences.is_empty() {
        println!("\ntranslation shifted sentiment for:");
        print!("{}", table::divergence_lines(&report.divergences));
    }
    match report.strategy {
        Some(strategy) => println!("\nscored by: {strategy}"),
        None => println!("\nno headlines scored"),
    }
    Ok(())
}

/// Score a labeled dataset and write the evaluation report.
async fn run_evaluation(args: EvaluateArgs) -> Result<(), Box<dyn Error>> {
    let config = config::load(args.common.config.as_deref())?;
    let dataset = evaluate::load_dataset(&args.labeled)?;
    ensure_writable_dir(&args.report_dir).await?;

    let client = load_llm(args.common.llm_config.as_deref(), &config.llm).await;
    let adapter = build_adapter(client.as_ref(), load_lexicon(&args.common));

    let now = Local::now();
    let report = evaluate::evaluate(&dataset, &adapter, &client, now).await;
    let path = json::evaluation_path(&args.report_dir, now);
    json::write_evaluation(&report, &path).await?;

    let m = &report.metrics;
    println!("evaluated {} headlines ({} skipped)", m.total, report.skipped);
    println!(
        "accuracy  {:.3}\nprecision {:.3}\nrecall    {:.3}\nf1        {:.3}",
        m.accuracy, m.macro_precision, m.macro_recall, m.macro_f1
    );
    println!("report: {}", path.display());
    Ok(())
}

/// The model endpoint, or `None` when it cannot be loaded. Without it the
/// translator keeps original text and the classifier is unavailable.
async fn load_llm(path: Option<&Path>, settings: &LlmSettings) -> Option<LlmClient> {
    match LlmClient::load(path, settings).await {
        Ok(client) => Some(client),
        Err(e) => {
            warn!(error = %e, "Model endpoint unavailable; translation and classifier disabled");
            None
        }
    }
}

fn load_lexicon(common: &CommonArgs) -> Option<Lexicon> {
    let path = common.lexicon.as_deref()?;
    match Lexicon::load(path) {
        Ok(lexicon) => Some(lexicon),
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Failed to load lexicon; lexical strategy disabled"
            );
            None
        }
    }
}

/// The strategy chain in priority order.
fn build_adapter(client: Option<&LlmClient>, lexicon: Option<Lexicon>) -> SentimentAdapter<'_> {
    let strategies: Vec<Box<dyn SentimentStrategy + '_>> = vec![
        Box::new(ClassifierStrategy::new(client.map(SentimentPrompt))),
        Box::new(LexicalStrategy::new(lexicon)),
        Box::new(KeywordStrategy),
    ];
    let adapter = SentimentAdapter::new(strategies);
    info!(order = ?adapter.strategy_order(), "Sentiment strategy chain ready");
    adapter
}

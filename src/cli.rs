//! Command-line interface definitions for Headline Bias.
//!
//! Two subcommands share the collaborator options: `analyze` runs the full
//! pipeline over the configured sources, `evaluate` scores a labeled dataset
//! with the same sentiment chain.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// # Examples
///
/// ```sh
/// # Scrape live and write today's edition
/// headline_bias analyze -j ./json
///
/// # Replay a recorded scrape with a custom config and lexicon
/// headline_bias analyze -j ./json -i scraped.json -c bias.yaml --lexicon lexicon.yaml
///
/// # Score a labeled dataset
/// headline_bias evaluate -l labeled.json -r ./reports
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scrape, enrich and aggregate headlines, then write the run report
    Analyze(AnalyzeArgs),
    /// Score a labeled headline dataset and write evaluation metrics
    Evaluate(EvaluateArgs),
}

/// Options shared by both subcommands.
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Optional path to the application config YAML
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Model endpoint config for translation and the classifier
    #[arg(long, env = "LLM_CONFIG")]
    pub llm_config: Option<PathBuf>,

    /// Word polarity lexicon (YAML) enabling the lexical strategy
    #[arg(long)]
    pub lexicon: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Output directory for the JSON run report
    #[arg(short, long)]
    pub json_output_dir: String,

    /// Recorded scraper output to use instead of live scraping
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Labeled dataset: a JSON list of {headline, sentiment, language?}
    #[arg(short, long)]
    pub labeled: PathBuf,

    /// Directory the evaluation report is written to
    #[arg(short, long, default_value = "reports")]
    pub report_dir: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_parsing() {
        let cli = Cli::parse_from([
            "headline_bias",
            "analyze",
            "--json-output-dir",
            "./json",
            "--input",
            "scraped.json",
            "--lexicon",
            "lexicon.yaml",
        ]);

        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.json_output_dir, "./json");
        assert_eq!(args.input, Some(PathBuf::from("scraped.json")));
        assert_eq!(args.common.lexicon, Some(PathBuf::from("lexicon.yaml")));
        assert_eq!(args.common.config, None);
    }

    #[test]
    fn test_analyze_short_flags() {
        let cli = Cli::parse_from([
            "headline_bias",
            "analyze",
            "-j",
            "/tmp/json",
            "-c",
            "bias.yaml",
        ]);

        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.json_output_dir, "/tmp/json");
        assert_eq!(args.common.config, Some(PathBuf::from("bias.yaml")));
        assert_eq!(args.input, None);
    }

    #[test]
    fn test_evaluate_defaults() {
        let cli = Cli::parse_from(["headline_bias", "evaluate", "-l", "labeled.json"]);

        let Command::Evaluate(args) = cli.command else {
            panic!("expected evaluate");
        };
        assert_eq!(args.labeled, PathBuf::from("labeled.json"));
        assert_eq!(args.report_dir, "reports");
    }

    #[test]
    fn test_analyze_requires_output_dir() {
        assert!(Cli::try_parse_from(["headline_bias", "analyze"]).is_err());
    }
}

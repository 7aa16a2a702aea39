//! JSON persistence for run and evaluation reports.
//!
//! Run reports are grouped by date with one file per edition:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── morning.json
//!     ├── afternoon.json
//!     └── evening.json
//! ```
//!
//! A second run in the same edition replaces the earlier file.

use crate::evaluate::EvaluationReport;
use crate::models::RunReport;
use chrono::{DateTime, Local};
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Path a run report is written to: `{dir}/{date}/{edition}.json`.
pub fn report_path(report: &RunReport, json_output_dir: &str) -> PathBuf {
    Path::new(json_output_dir)
        .join(&report.local_date)
        .join(format!("{}.json", report.edition))
}

/// Write a [`RunReport`] under its date directory.
///
/// Returns the path written.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_report(
    report: &RunReport,
    json_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;
    let path = report_path(report, json_output_dir);

    if let Some(dir) = path.parent() {
        info!(dir = %dir.display(), "Ensuring JSON directory exists");
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(
        path = %path.display(),
        headlines = report.headlines.len(),
        sources = report.summaries.len(),
        "Wrote run report"
    );
    Ok(path)
}

/// Path an evaluation started at `at` is written to.
pub fn evaluation_path(report_dir: &str, at: DateTime<Local>) -> PathBuf {
    Path::new(report_dir).join(format!("evaluation_{}.json", at.format("%Y%m%d_%H%M%S")))
}

/// Write an [`EvaluationReport`] to `path`, creating parent directories.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_evaluation(
    report: &EvaluationReport,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).await?;
    }
    fs::write(path, serde_json::to_string_pretty(report)?).await?;
    info!(accuracy = report.metrics.accuracy, "Wrote evaluation report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::models::{
        Emotion, EmotionTag, HeadlineRecord, ScoredHeadline, Sentiment, StrategyKind,
    };
    use crate::pipeline::build_report;
    use chrono::TimeZone;

    fn sample_report() -> RunReport {
        let mut record = HeadlineRecord::new("ndtv", "Monsoon arrives early in Kerala");
        record.language_code = Some("en".to_string());
        let headline = ScoredHeadline {
            record,
            sentiment: Sentiment::from_signed(0.4, 0.1),
            emotion: EmotionTag {
                emotion: Emotion::Happy,
                fear: false,
            },
            strategy: Some(StrategyKind::Lexical),
            original_score: Some(0.4),
            sentiment_shift: Some(0.0),
        };
        let now = Local.with_ymd_and_hms(2025, 5, 6, 18, 30, 0).unwrap();
        build_report(
            vec![headline],
            Some(StrategyKind::Lexical),
            &PipelineConfig::default(),
            now,
        )
    }

    #[test]
    fn test_report_path() {
        let path = report_path(&sample_report(), "/srv/json");
        assert_eq!(path, PathBuf::from("/srv/json/2025-05-06/evening.json"));
    }

    #[test]
    fn test_evaluation_path() {
        let at = Local.with_ymd_and_hms(2025, 5, 6, 14, 15, 3).unwrap();
        assert_eq!(
            evaluation_path("reports", at),
            PathBuf::from("reports/evaluation_20250506_141503.json")
        );
    }

    #[test]
    fn test_report_json_shape() {
        let value = serde_json::to_value(sample_report()).unwrap();
        assert_eq!(value["edition"], "evening");
        assert_eq!(value["strategy"], "lexical");
        let h = &value["headlines"][0];
        assert_eq!(h["source_id"], "ndtv");
        assert_eq!(h["text"], "Monsoon arrives early in Kerala");
        assert_eq!(h["sentiment_label"], "POSITIVE");
        assert_eq!(h["emotion"], "Happy");
        assert_eq!(value["summaries"][0]["bias"], "Positive Bias");
        assert!(value["summaries"][0]["std_deviation"].is_null());
        assert_eq!(value["summaries"][0]["avg_sentiment_shift"], 0.0);
        assert_eq!(value["divergences"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_write_report_creates_date_dir() {
        let dir = std::env::temp_dir().join(format!("headline_bias_json_{}", std::process::id()));
        let report = sample_report();
        let path = write_report(&report, dir.to_str().unwrap()).await.unwrap();
        assert!(path.ends_with("2025-05-06/evening.json"));

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["headlines"].as_array().unwrap().len(), 1);
        let _ = std::fs::remove_dir_all(&dir);
    }
}

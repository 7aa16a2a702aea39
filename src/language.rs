//! Language resolution.
//!
//! A record that already declares its language keeps it. Otherwise a
//! [`LanguageDetector`] is asked, and any failure resolves to English.

use crate::models::HeadlineRecord;
use std::collections::HashMap;
use std::error::Error;
use tracing::{debug, warn};

/// Fallback when detection fails.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Detects the language of a piece of text.
pub trait LanguageDetector {
    fn detect(&self, text: &str) -> Result<String, Box<dyn Error>>;
}

/// Language code for `record`. Never fails.
pub fn resolve_language<D: LanguageDetector + ?Sized>(
    record: &HeadlineRecord,
    detector: &D,
) -> String {
    if let Some(code) = record
        .language_code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
    {
        return code.to_ascii_lowercase();
    }

    match detector.detect(&record.raw_text) {
        Ok(code) => {
            debug!(source = %record.source_id, %code, "Detected headline language");
            code
        }
        Err(e) => {
            warn!(
                source = %record.source_id,
                error = %e,
                fallback = DEFAULT_LANGUAGE,
                "Language detection failed"
            );
            DEFAULT_LANGUAGE.to_string()
        }
    }
}

/// Detects the language from the dominant Unicode script of the text.
///
/// Indic scripts map one-to-one onto the languages carried by the configured
/// outlets. Latin script is reported as English.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptDetector;

impl ScriptDetector {
    fn script_language(c: char) -> Option<&'static str> {
        match c as u32 {
            0x0900..=0x097F => Some("hi"),
            0x0980..=0x09FF => Some("bn"),
            0x0A00..=0x0A7F => Some("pa"),
            0x0A80..=0x0AFF => Some("gu"),
            0x0B80..=0x0BFF => Some("ta"),
            0x0C00..=0x0C7F => Some("te"),
            0x0C80..=0x0CFF => Some("kn"),
            0x0D00..=0x0D7F => Some("ml"),
            _ if c.is_ascii_alphabetic() => Some("en"),
            0x00C0..=0x024F => Some("en"),
            _ => None,
        }
    }
}

impl LanguageDetector for ScriptDetector {
    fn detect(&self, text: &str) -> Result<String, Box<dyn Error>> {
        let mut counts: HashMap<&'static str, usize> = HashMap::new();
        let mut letters = 0usize;

        for c in text.chars().filter(|c| c.is_alphabetic()) {
            letters += 1;
            if let Some(lang) = Self::script_language(c) {
                *counts.entry(lang).or_default() += 1;
            }
        }

        if letters == 0 {
            return Err("no alphabetic characters to detect a language from".into());
        }

        // Ties break on the code so the result does not depend on map order.
        counts
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(lang, _)| lang.to_string())
            .ok_or_else(|| "no supported script found".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingDetector {
        calls: Cell<usize>,
        answer: Option<&'static str>,
    }

    impl LanguageDetector for CountingDetector {
        fn detect(&self, _text: &str) -> Result<String, Box<dyn Error>> {
            self.calls.set(self.calls.get() + 1);
            self.answer
                .map(str::to_string)
                .ok_or_else(|| "detector offline".into())
        }
    }

    #[test]
    fn test_declared_language_skips_detection() {
        let detector = CountingDetector {
            calls: Cell::new(0),
            answer: Some("hi"),
        };
        let mut record = HeadlineRecord::new("dinamani", "Some headline text");
        record.language_code = Some("TA".to_string());

        assert_eq!(resolve_language(&record, &detector), "ta");
        assert_eq!(detector.calls.get(), 0);
    }

    #[test]
    fn test_detection_used_when_undeclared() {
        let detector = CountingDetector {
            calls: Cell::new(0),
            answer: Some("bn"),
        };
        let record = HeadlineRecord::new("anandabazar", "Some headline text");
        assert_eq!(resolve_language(&record, &detector), "bn");
        assert_eq!(detector.calls.get(), 1);
    }

    #[test]
    fn test_detection_failure_defaults_to_english() {
        let detector = CountingDetector {
            calls: Cell::new(0),
            answer: None,
        };
        let mut record = HeadlineRecord::new("wire", "Some headline text");
        record.language_code = Some("  ".to_string());
        assert_eq!(resolve_language(&record, &detector), "en");
        assert_eq!(detector.calls.get(), 1);
    }

    #[test]
    fn test_script_detector_indic_scripts() {
        let d = ScriptDetector;
        assert_eq!(d.detect("ಅಪಘಾತ ಸುದ್ದಿ").unwrap(), "kn");
        assert_eq!(d.detect("சென்னையில் கனமழை").unwrap(), "ta");
        assert_eq!(d.detect("दिल्ली में बारिश").unwrap(), "hi");
        assert_eq!(d.detect("কলকাতায় বৃষ্টি").unwrap(), "bn");
    }

    #[test]
    fn test_script_detector_majority_wins() {
        let d = ScriptDetector;
        assert_eq!(d.detect("Monsoon session of Parliament begins").unwrap(), "en");
        assert_eq!(d.detect("IPL: ಬೆಂಗಳೂರು ತಂಡಕ್ಕೆ ಜಯ").unwrap(), "kn");
    }

    #[test]
    fn test_script_detector_fails_without_letters() {
        let d = ScriptDetector;
        assert!(d.detect("2024 — 11:30").is_err());
        assert!(d.detect("").is_err());
        assert!(d.detect("東京で地震").is_err());
    }
}

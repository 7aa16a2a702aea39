//! Validity filter: a heuristic that keeps headlines and rejects navigation
//! chrome ("Live", "Photos", "Trending now", ...) and fragments.

use crate::config::PipelineConfig;

#[derive(Debug, Clone)]
pub struct ValidityFilter {
    min_chars: usize,
    min_words: usize,
    /// Lowercased noise entries.
    noise_words: Vec<String>,
}

impl ValidityFilter {
    pub fn new(min_chars: usize, min_words: usize, noise_words: &[String]) -> Self {
        Self {
            min_chars,
            min_words,
            noise_words: noise_words
                .iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.min_chars, config.min_words, &config.noise_words)
    }

    /// Whether `text` looks like a headline. Deterministic for a given text
    /// and configuration.
    pub fn is_valid(&self, text: &str) -> bool {
        let text = text.trim();
        if text.chars().count() < self.min_chars {
            return false;
        }
        if text.split_whitespace().count() < self.min_words {
            return false;
        }
        let lower = text.to_lowercase();
        !self.noise_words.iter().any(|w| lower.starts_with(w.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_filter() -> ValidityFilter {
        ValidityFilter::from_config(&PipelineConfig::default())
    }

    #[test]
    fn test_accepts_real_headlines() {
        let filter = default_filter();
        assert!(filter.is_valid("Supreme Court reserves verdict on electoral bonds"));
        assert!(filter.is_valid("  India wins historic victory  "));
    }

    #[test]
    fn test_rejects_short_text() {
        let filter = default_filter();
        assert!(!filter.is_valid("Too short"));
        assert!(!filter.is_valid("   "));
        // 14 characters after trimming
        assert!(!filter.is_valid("  ab cd efghijkl  "));
    }

    #[test]
    fn test_rejects_few_words() {
        let filter = default_filter();
        assert!(!filter.is_valid("Extraordinarily-long-hyphenated headline"));
    }

    #[test]
    fn test_rejects_navigation_noise() {
        let filter = default_filter();
        assert!(!filter.is_valid("LIVE updates from the Lok Sabha"));
        assert!(!filter.is_valid("Photos from the cricket final today"));
        assert!(!filter.is_valid("trending stories of this week"));
    }

    #[test]
    fn test_length_is_counted_in_characters() {
        let filter = ValidityFilter::new(5, 1, &[]);
        // 3 characters, 9 bytes
        assert!(!filter.is_valid("ಸುದ"));
        assert!(filter.is_valid("ಅಪಘಾತ ಸುದ್ದಿ"));
    }

    #[test]
    fn test_custom_configuration() {
        let filter = ValidityFilter::new(1, 1, &["Breaking".to_string(), " ".to_string()]);
        assert!(filter.is_valid("Ok"));
        assert!(!filter.is_valid("breaking: something happened"));
    }

    #[test]
    fn test_is_deterministic() {
        let filter = default_filter();
        let text = "Home minister reviews flood relief in Kodagu";
        let first = filter.is_valid(text);
        for _ in 0..10 {
            assert_eq!(filter.is_valid(text), first);
        }
        assert_eq!(default_filter().is_valid(text), first);
    }
}

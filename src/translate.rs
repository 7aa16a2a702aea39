//! Translation adapter.
//!
//! English text passes through untouched. Anything else goes to a
//! [`Translator`]; when that fails or answers with nothing, the original text
//! is used instead. Translation is best-effort and never stops a run.

use crate::llm::LlmClient;
use crate::utils::truncate_for_log;
use std::error::Error;
use tracing::{debug, instrument, warn};

/// Language every headline is translated into before scoring.
pub const TARGET_LANGUAGE: &str = "en";

/// Translates text into a target language.
pub trait Translator {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, Box<dyn Error>>;
}

/// An absent translator is a translator that always fails.
impl<T: Translator> Translator for Option<T> {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, Box<dyn Error>> {
        match self {
            Some(inner) => inner.translate(text, target_lang).await,
            None => Err("no translation backend configured".into()),
        }
    }
}

/// Translation through the model endpoint's translation template.
impl Translator for LlmClient {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, Box<dyn Error>> {
        let prompt = format!("Target language: {target_lang}\nHeadline: {text}");
        self.ask_translation(&prompt).await
    }
}

/// English rendering of `text`, or `text` itself when translation is not
/// needed or not possible.
#[instrument(level = "debug", skip(text, translator))]
pub async fn translate_to_english<T: Translator>(
    text: &str,
    language_code: &str,
    translator: &T,
) -> String {
    if language_code.eq_ignore_ascii_case(TARGET_LANGUAGE) {
        return text.to_string();
    }

    match translator.translate(text, TARGET_LANGUAGE).await {
        Ok(translated) => {
            let translated = translated.trim();
            if translated.is_empty() {
                warn!(
                    language = language_code,
                    text = %truncate_for_log(text, 80),
                    "Translator returned an empty response; keeping original text"
                );
                text.to_string()
            } else {
                debug!(
                    language = language_code,
                    translated = %truncate_for_log(translated, 80),
                    "Translated headline"
                );
                translated.to_string()
            }
        }
        Err(e) => {
            warn!(
                language = language_code,
                error = %e,
                text = %truncate_for_log(text, 80),
                "Translation failed; keeping original text"
            );
            text.to_string()
        }
    }
}

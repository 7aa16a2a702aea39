//! Ingestion normalizer: turns whatever a scraper returned into
//! [`HeadlineRecord`]s.
//!
//! Scrapers are inconsistent. Some return a list of strings, some a list of
//! objects with a `headline`, `text` or `title` key, some a single object, and
//! some nothing at all. [`RawScraperOutput::classify`] names the shape once;
//! [`normalize`] then handles each case explicitly. Nothing here fails:
//! unusable entries are dropped and unrecognized shapes yield no records.

use crate::models::HeadlineRecord;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

/// Keys searched, in order, for the headline text of a record.
const TEXT_KEYS: [&str; 3] = ["headline", "text", "title"];
const LANGUAGE_KEYS: [&str; 3] = ["language", "language_code", "lang"];
const LINK_KEYS: [&str; 3] = ["link", "url", "href"];

/// A markup tag: `<` followed by a letter or `/`, up to the next `>`. A bare
/// `<` in prose ("Nifty <Sensex") never closes, so it is not a tag.
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[A-Za-z][^<>]*>").unwrap());

/// The shapes a scraper's output can take.
#[derive(Debug, Clone, PartialEq)]
pub enum RawScraperOutput {
    StringList(Vec<String>),
    RecordList(Vec<Map<String, Value>>),
    SingleRecord(Map<String, Value>),
    Empty,
}

impl RawScraperOutput {
    /// Classify an arbitrary JSON value.
    ///
    /// A list made only of strings is a `StringList`. Any other non-empty list
    /// becomes a `RecordList`: objects are kept, bare strings are wrapped as
    /// `{"headline": ...}` and everything else is discarded. Scalars and
    /// `null` are `Empty`.
    pub fn classify(value: Option<Value>) -> Self {
        match value {
            Some(Value::Array(items)) if items.is_empty() => RawScraperOutput::Empty,
            Some(Value::Array(items)) if items.iter().all(Value::is_string) => {
                RawScraperOutput::StringList(
                    items
                        .into_iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect(),
                )
            }
            Some(Value::Array(items)) => RawScraperOutput::RecordList(
                items
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::Object(map) => Some(map),
                        Value::String(s) => {
                            let mut map = Map::new();
                            map.insert("headline".to_string(), Value::String(s));
                            Some(map)
                        }
                        _ => None,
                    })
                    .collect(),
            ),
            Some(Value::Object(map)) => RawScraperOutput::SingleRecord(map),
            _ => RawScraperOutput::Empty,
        }
    }
}

/// Normalize one source's raw output.
///
/// `default_language` fills `language_code` for entries that do not declare
/// one; with no default the field stays empty for the language resolver.
/// Texts are HTML-unescaped and whitespace-collapsed, and repeated headlines
/// are dropped keeping the first.
#[instrument(level = "debug", skip(raw))]
pub fn normalize(
    source_id: &str,
    raw: RawScraperOutput,
    default_language: Option<&str>,
) -> Vec<HeadlineRecord> {
    let records: Vec<HeadlineRecord> = match raw {
        RawScraperOutput::StringList(items) => items
            .iter()
            .filter_map(|s| from_text(source_id, s, default_language))
            .collect(),
        RawScraperOutput::RecordList(items) => items
            .iter()
            .filter_map(|m| from_record(source_id, m, default_language))
            .collect(),
        RawScraperOutput::SingleRecord(map) => from_record(source_id, &map, default_language)
            .into_iter()
            .collect(),
        RawScraperOutput::Empty => Vec::new(),
    };

    let before = records.len();
    let records: Vec<HeadlineRecord> = records
        .into_iter()
        .unique_by(|r| r.raw_text.clone())
        .collect();
    debug!(
        source = source_id,
        count = records.len(),
        duplicates = before - records.len(),
        "Normalized scraper output"
    );
    records
}

/// Classify and normalize in one step.
pub fn normalize_value(
    source_id: &str,
    value: Option<Value>,
    default_language: Option<&str>,
) -> Vec<HeadlineRecord> {
    normalize(source_id, RawScraperOutput::classify(value), default_language)
}

/// Strip markup, decode HTML entities and collapse whitespace.
///
/// Repeats until nothing changes, so doubly escaped input ends fully decoded
/// and cleaning clean text is a no-op. Every pass that changes the text
/// shortens it.
pub fn clean_text(raw: &str) -> String {
    let mut text = raw.split_whitespace().join(" ");
    loop {
        let stripped = TAG.replace_all(&text, " ");
        let decoded = html_escape::decode_html_entities(&stripped);
        let next = decoded.split_whitespace().join(" ");
        if next == text {
            return text;
        }
        text = next;
    }
}

fn from_text(
    source_id: &str,
    text: &str,
    default_language: Option<&str>,
) -> Option<HeadlineRecord> {
    let text = clean_text(text);
    if text.is_empty() {
        return None;
    }
    let mut record = HeadlineRecord::new(source_id, text);
    record.language_code = default_language.and_then(language_code);
    Some(record)
}

fn from_record(
    source_id: &str,
    map: &Map<String, Value>,
    default_language: Option<&str>,
) -> Option<HeadlineRecord> {
    let text = TEXT_KEYS
        .iter()
        .filter_map(|k| string_field(map, k))
        .map(clean_text)
        .find(|t| !t.is_empty())?;

    let mut record = HeadlineRecord::new(source_id, text);
    record.language_code = first_string(map, &LANGUAGE_KEYS)
        .and_then(language_code)
        .or_else(|| default_language.and_then(language_code));
    record.link = first_string(map, &LINK_KEYS).map(|s| s.trim().to_string());
    record.translated_text = string_field(map, "translated_text")
        .map(clean_text)
        .filter(|t| !t.is_empty());
    Some(record)
}

fn string_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str)
}

fn first_string<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| string_field(map, k))
        .find(|s| !s.trim().is_empty())
}

fn language_code(s: &str) -> Option<String> {
    let code = s.trim().to_ascii_lowercase();
    (!code.is_empty()).then_some(code)
}

//! Emotion tagging.
//!
//! A stateless mapping from sentiment score to an [`Emotion`] bucket:
//!
//! | Score | Emotion |
//! |-------|---------|
//! | `s <= -0.6` | Sad |
//! | `-0.6 < s < -0.2` | Concerned |
//! | `-0.2 <= s <= 0.2` | Neutral |
//! | `0.2 < s <= 0.6` | Happy |
//! | `s > 0.6` | Very Happy |
//!
//! Headlines mentioning a fear keyword get a `/Fear` qualifier unless they
//! are already Very Happy.

use crate::models::{Emotion, EmotionTag};

pub fn emotion_for(score: f64) -> Emotion {
    if score <= -0.6 {
        Emotion::Sad
    } else if score < -0.2 {
        Emotion::Concerned
    } else if score <= 0.2 {
        Emotion::Neutral
    } else if score <= 0.6 {
        Emotion::Happy
    } else {
        Emotion::VeryHappy
    }
}

#[derive(Debug, Clone)]
pub struct EmotionTagger {
    /// Lowercased fear keywords, matched as substrings.
    fear_keywords: Vec<String>,
}

impl EmotionTagger {
    pub fn new(fear_keywords: &[String]) -> Self {
        Self {
            fear_keywords: fear_keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn tag(&self, score: f64, text: &str) -> EmotionTag {
        let emotion = emotion_for(score);
        let fear = emotion != Emotion::VeryHappy && {
            let lower = text.to_lowercase();
            self.fear_keywords.iter().any(|k| lower.contains(k.as_str()))
        };
        EmotionTag { emotion, fear }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_boundaries() {
        assert_eq!(emotion_for(-1.0), Emotion::Sad);
        assert_eq!(emotion_for(-0.6), Emotion::Sad);
        assert_eq!(emotion_for(-0.6 + EPS), Emotion::Concerned);
        assert_eq!(emotion_for(-0.2 - EPS), Emotion::Concerned);
        assert_eq!(emotion_for(-0.2), Emotion::Neutral);
        assert_eq!(emotion_for(0.0), Emotion::Neutral);
        assert_eq!(emotion_for(0.2), Emotion::Neutral);
        assert_eq!(emotion_for(0.2 + EPS), Emotion::Happy);
        assert_eq!(emotion_for(0.6), Emotion::Happy);
        assert_eq!(emotion_for(0.6 + EPS), Emotion::VeryHappy);
        assert_eq!(emotion_for(1.0), Emotion::VeryHappy);
    }

    #[test]
    fn test_fear_overlay() {
        let tagger = EmotionTagger::new(&["Bomb".to_string(), "blast".to_string()]);

        let tag = tagger.tag(-1.0, "Bomb blast near market");
        assert_eq!(tag.to_string(), "Sad/Fear");

        let tag = tagger.tag(0.0, "Police defuse bomb at station");
        assert_eq!(tag.to_string(), "Neutral/Fear");

        let tag = tagger.tag(0.9, "Bomb squad wins national award");
        assert_eq!(tag.to_string(), "Very Happy");

        let tag = tagger.tag(-0.4, "Bus overturns on highway");
        assert_eq!(tag.to_string(), "Concerned");
    }
}

//! Keyword-based mood scoring, used when the sentiment API is unavailable.
//!
//! The value of this fallback is its predictability: a fixed word list and a
//! simple sign rule, no inference.

use crate::turn::MoodLabel;

pub const POSITIVE_WORDS: &[&str] = &[
    "happy", "calm", "grateful", "excited", "better", "hopeful", "good", "great", "well", "fine",
    "joyful", "peaceful",
];

pub const NEGATIVE_WORDS: &[&str] = &[
    "sad", "angry", "anxious", "depressed", "tired", "hopeless", "bad", "stressed", "frustrated",
    "lonely", "empty",
];

/// Net keyword score: +1 for each positive word present as a substring of the
/// lowercased message, -1 for each negative word. Each lexicon word counts at
/// most once per message.
pub fn score_keywords(message: &str) -> i32 {
    let text = message.to_lowercase();
    let pos = POSITIVE_WORDS.iter().filter(|w| text.contains(*w)).count() as i32;
    let neg = NEGATIVE_WORDS.iter().filter(|w| text.contains(*w)).count() as i32;
    pos - neg
}

/// Classify a message by keyword score alone. Ties (including zero hits)
/// resolve to neutral.
pub fn classify_keywords(message: &str) -> MoodLabel {
    match score_keywords(message) {
        s if s > 0 => MoodLabel::Positive,
        s if s < 0 => MoodLabel::Negative,
        _ => MoodLabel::Neutral,
    }
}

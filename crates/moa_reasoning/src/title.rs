//! One-shot conversation titling.
//!
//! Runs only when a conversation is still named "default" and the incoming
//! history was empty: the first exchange is condensed into a short label
//! that becomes the new persistence key suffix.

use crate::generator::{GenerationParams, Generator};
use moa_core::{Role, Turn};
use regex::Regex;
use std::sync::LazyLock;

/// Placeholder name for conversations that haven't been titled yet.
pub const DEFAULT_CONVERSATION: &str = "default";

/// Returned whenever the generator cannot produce a usable title.
pub const FALLBACK_TITLE: &str = "Untitled Conversation";

/// Turns condensed into the titling transcript.
const SEED_TURNS: usize = 4;

const TRANSCRIPT_TURN_CHARS: usize = 200;

static RE_LEAD_IN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(conversation about|chat about|topic:)\s*").unwrap());

/// Generate a 3-10 word title for the seed history, or [`FALLBACK_TITLE`] on
/// any failure.
pub async fn generate_title(generator: &dyn Generator, seed_history: &[Turn]) -> String {
    let start = seed_history.len().saturating_sub(SEED_TURNS);
    let transcript = seed_history[start..]
        .iter()
        .map(|turn| {
            let speaker = match turn.role {
                Role::User => "User",
                Role::Model => "Companion",
            };
            format!("{}: {}", speaker, truncate(&turn.text, TRANSCRIPT_TURN_CHARS))
        })
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = format!(
        "Summarize this conversation into a short title of 3 to 10 words. \
         Do not use quotation marks, personal names, or lead-ins like \
         'Conversation about'. Reply with the title only.\n\n{}",
        transcript
    );

    match generator
        .generate(&[Turn::user(prompt)], &GenerationParams::for_title())
        .await
    {
        Ok(raw) => {
            let title = clean_title(&raw);
            if title.is_empty() {
                FALLBACK_TITLE.to_string()
            } else {
                title
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "title generation failed, using fallback");
            FALLBACK_TITLE.to_string()
        }
    }
}

/// Strip quotes, periods and boilerplate lead-ins from a generated title.
fn clean_title(raw: &str) -> String {
    let first_line = raw.trim().lines().next().unwrap_or("").trim();
    let stripped: String = first_line
        .chars()
        .filter(|c| !matches!(c, '"' | '\'' | '.' | '\u{201c}' | '\u{201d}'))
        .collect();
    let without_lead_in = RE_LEAD_IN.replace(stripped.trim(), "");
    without_lead_in
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GeneratorError;
    use crate::providers::MockGenerator;

    #[tokio::test]
    async fn test_title_is_cleaned() {
        let mock = MockGenerator::with_sequence(vec![Ok(
            "\"Conversation about Finding Calm After Work.\"".to_string()
        )]);
        let title = generate_title(&mock, &[Turn::user("hi")]).await;
        assert_eq!(title, "Finding Calm After Work");
    }

    #[tokio::test]
    async fn test_failure_yields_literal_fallback() {
        let mock = MockGenerator::with_sequence(vec![Err(GeneratorError::Connectivity(
            "down".to_string(),
        ))]);
        let title = generate_title(&mock, &[Turn::user("hi")]).await;
        assert_eq!(title, "Untitled Conversation");
    }

    #[tokio::test]
    async fn test_blank_reply_yields_fallback() {
        let mock = MockGenerator::with_sequence(vec![Ok("  \"\" ".to_string())]);
        let title = generate_title(&mock, &[Turn::user("hi")]).await;
        assert_eq!(title, FALLBACK_TITLE);
    }

    #[test]
    fn test_clean_title_strips_lead_in_case_insensitively() {
        assert_eq!(clean_title("CHAT ABOUT morning routines"), "morning routines");
        assert_eq!(clean_title("Topic: sleep hygiene"), "sleep hygiene");
    }
}

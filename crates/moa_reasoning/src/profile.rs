//! Opportunistic profile extraction from message text.

use moa_core::UserProfile;
use regex::Regex;
use std::sync::LazyLock;

static RE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:my name is|i'm|i am)\s+([a-zA-Z]+(?:[\s'-][a-zA-Z]+)*)").unwrap()
});

/// Pull a name out of a message, title-cased. The pattern is intentionally
/// loose ("i am ..." also matches non-names); values are never validated.
pub fn extract_name(message: &str) -> Option<String> {
    let captures = RE_NAME.captures(message)?;
    let raw = captures.get(1)?.as_str().trim();
    if raw.is_empty() {
        return None;
    }
    let name = raw
        .split_whitespace()
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ");
    Some(name)
}

/// Merge anything extractable from the message into the profile.
/// Last non-empty value wins.
pub fn apply(message: &str, profile: &mut UserProfile) {
    if let Some(name) = extract_name(message) {
        profile.set_if_nonempty("name", &name);
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

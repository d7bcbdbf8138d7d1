//! Context assembly — the ordered, role-tagged turn sequence handed to the
//! generator: persona instruction, bounded recent history, then a structured
//! block carrying mood, profile and the new query.

use moa_core::{persona, MoodLabel, Turn, UserProfile};

/// How many stored turns are replayed to the generator. The persisted
/// history itself is unbounded; only this suffix travels.
pub const HISTORY_WINDOW: usize = 10;

/// Characters kept per turn when condensing recent context.
const CONDENSED_TURN_CHARS: usize = 120;

/// Build the generator-bound turn sequence. Does not call the generator.
pub fn build_context(
    query: &str,
    mood: MoodLabel,
    profile: &UserProfile,
    history: &[Turn],
) -> Vec<Turn> {
    let mut turns = Vec::with_capacity(HISTORY_WINDOW + 2);

    // The persona instruction must be present exactly once, however many
    // turns have accumulated.
    if !persona::begins_with_persona(history) {
        turns.push(persona::persona_turn());
    }

    let window_start = history.len().saturating_sub(HISTORY_WINDOW);
    turns.extend_from_slice(&history[window_start..]);

    turns.push(Turn::user(format_query_block(query, mood, profile, history)));
    turns
}

/// The final user turn: mood line, name line, optional recent-context line
/// condensing the last two raw turns, query line.
fn format_query_block(
    query: &str,
    mood: MoodLabel,
    profile: &UserProfile,
    history: &[Turn],
) -> String {
    let mut lines = vec![
        format!("User's current mood: {}", mood),
        format!("User's name: {}", profile.name().unwrap_or("Unknown")),
    ];
    if !history.is_empty() {
        let start = history.len().saturating_sub(2);
        let condensed = history[start..]
            .iter()
            .map(|turn| condense(&turn.text))
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(format!("Recent conversation context: {}", condensed));
    }
    lines.push(format!("Current query: {}", query));
    lines.join("\n")
}

fn condense(text: &str) -> String {
    let flattened = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flattened.chars().count() <= CONDENSED_TURN_CHARS {
        flattened
    } else {
        flattened.chars().take(CONDENSED_TURN_CHARS).collect()
    }
}

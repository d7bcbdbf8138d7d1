//! The persona instruction and its de-duplication check.

use crate::turn::{Role, Turn};

/// The instruction injected as a synthetic user turn at the head of every
/// conversation sent to the generator.
pub const PERSONA_INSTRUCTION: &str = "You are Moa, a highly empathetic, gentle, and emotionally intelligent well-being companion. Your core purpose is to offer kind, supportive, and helpful emotional support, like a comforting pixel-art RPG helper. You listen attentively, reflect user feelings, and respond with genuine care.\n\n**IMPORTANT: You must always respond in English, regardless of the user's input language.**";

/// Length of the prefix compared when checking whether a stored history
/// already carries the persona turn. If `PERSONA_INSTRUCTION` is ever edited,
/// histories written before the edit will fail this check and receive a
/// second persona turn.
const PERSONA_PREFIX_LEN: usize = 20;

/// Does this history already begin with the persona instruction?
pub fn begins_with_persona(history: &[Turn]) -> bool {
    match history.first() {
        Some(turn) => {
            turn.role == Role::User && turn.text.starts_with(&PERSONA_INSTRUCTION[..PERSONA_PREFIX_LEN])
        }
        None => false,
    }
}

/// The synthetic user turn carrying the persona instruction.
pub fn persona_turn() -> Turn {
    Turn::user(PERSONA_INSTRUCTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history_lacks_persona() {
        assert!(!begins_with_persona(&[]));
    }

    #[test]
    fn test_history_starting_with_persona_turn() {
        let history = vec![persona_turn(), Turn::user("hi")];
        assert!(begins_with_persona(&history));
    }

    #[test]
    fn test_prefix_match_is_enough() {
        // Anything sharing the first 20 characters passes the check.
        let history = vec![Turn::user("You are Moa, a highl... (older wording)")];
        assert!(begins_with_persona(&history));
    }

    #[test]
    fn test_model_turn_does_not_count() {
        let history = vec![Turn::model(PERSONA_INSTRUCTION)];
        assert!(!begins_with_persona(&history));
    }
}

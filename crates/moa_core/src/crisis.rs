//! Crisis gate — the first pipeline stage.
//!
//! A purely local, deterministic keyword scan. On a hit the whole turn is
//! answered with a fixed supportive bundle and the generator is never
//! contacted, so crisis responses cannot be delayed by a degraded network.

/// Crisis lexicon. Entries are matched as case-insensitive substrings, so
/// short entries like "die" will also fire on unrelated words ("diet");
/// recall is deliberately favored over precision here.
pub const CRISIS_KEYWORDS: &[&str] = &[
    "suicide",
    "kill myself",
    "end my life",
    "can't go on",
    "hopeless",
    "helpless",
    "worthless",
    "no reason to live",
    "done with everything",
    "self-harm",
    "cut myself",
    "hurt myself",
    "die",
    "want to die",
    "overdose",
    "bipolar",
    "depressed",
    "anxiety attacks",
    "mental health crisis",
];

pub const SUPPORTIVE_RESPONSE: &str = "I hear that you're going through a difficult time. Please know that your feelings are valid, and it takes immense courage to reach out. I want to help you find the support you deserve. It's okay to ask for help, and there are people who care about you. Consider connecting with a professional or trusted person in your life.";

pub const EMERGENCY_RESOURCES: &[&str] = &[
    "**If you are in immediate danger, please contact your local emergency services immediately.** (e.g., dial 911 in the US/Canada, 999 in the UK, 112 in most of Europe, or your country's equivalent emergency number).",
    "You are not alone, and help is available. Please consider reaching out to a crisis hotline or mental health support line.",
    "- **Worldwide:** Search online for 'crisis hotline near me' or 'mental health support [your country]'.",
    "- **International Association for Suicide Prevention (IASP):** Provides a global directory of crisis centers.",
    "- **Befrienders Worldwide:** Offers emotional support in many countries.",
    "- **Crisis Text Line (US/Canada/UK/Ireland):** Text HOME to 741741 (US & Canada), 85258 (UK), or 50808 (Ireland) for free, confidential crisis support 24/7.",
    "Remember, taking care of your mental well-being is a sign of strength. We are here to support you in finding the help you need.",
];

/// Outcome of the crisis scan for one message. Never persisted; only used to
/// short-circuit response generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrisisDecision {
    pub is_crisis: bool,
    pub matched_keyword: Option<&'static str>,
}

/// Scan a message against the crisis lexicon.
///
/// The first matching keyword (in lexicon order) is reported. No error path:
/// this must always complete in bounded local time.
pub fn check(message: &str) -> CrisisDecision {
    let normalized = message.to_lowercase();
    for keyword in CRISIS_KEYWORDS {
        if normalized.contains(keyword) {
            return CrisisDecision {
                is_crisis: true,
                matched_keyword: Some(keyword),
            };
        }
    }
    CrisisDecision {
        is_crisis: false,
        matched_keyword: None,
    }
}

/// The fixed supportive message plus the ordered emergency-resource lines.
/// Returned verbatim to the caller whenever [`check`] fires.
pub fn crisis_response() -> String {
    format!("{}\n\n{}", SUPPORTIVE_RESPONSE, EMERGENCY_RESOURCES.join("\n"))
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One role-tagged message in a conversation.
///
/// Turns are immutable once stored; a conversation's history is an ordered,
/// append-only sequence of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// Per-message emotional tone. Derived per turn and consumed immediately by
/// the context builder; not persisted as a first-class field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodLabel {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MoodLabel::Positive => "positive",
            MoodLabel::Negative => "negative",
            MoodLabel::Neutral => "neutral",
        };
        f.write_str(s)
    }
}

/// Attributes extracted opportunistically from message text (e.g. `name`).
/// Never validated; the merge policy is "last non-empty value wins".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub attributes: BTreeMap<String, String>,
}

impl UserProfile {
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn name(&self) -> Option<&str> {
        self.attributes.get("name").map(String::as_str)
    }

    /// Overwrite an attribute, but only with a non-empty value.
    pub fn set_if_nonempty(&mut self, key: &str, value: &str) {
        if !value.is_empty() {
            self.attributes.insert(key.to_string(), value.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_serializes_with_lowercase_roles() {
        let json = serde_json::to_string(&Turn::model("hi")).unwrap();
        assert_eq!(json, r#"{"role":"model","text":"hi"}"#);
        let back: Turn = serde_json::from_str(&json).unwrap();
        assert_eq!(back.role, Role::Model);
    }

    #[test]
    fn profile_ignores_empty_updates() {
        let mut profile = UserProfile::default();
        profile.set_if_nonempty("name", "Ada");
        profile.set_if_nonempty("name", "");
        assert_eq!(profile.name(), Some("Ada"));
    }

    #[test]
    fn profile_roundtrips_as_flat_map() {
        let mut profile = UserProfile::default();
        profile.set_if_nonempty("name", "Ada");
        let json = serde_json::to_string(&profile).unwrap();
        assert_eq!(json, r#"{"name":"Ada"}"#);
    }
}

//! The conversation turn pipeline.
//!
//! Crisis gate → mood classification → profile extraction → context assembly
//! → generator call → history append → (first-turn) titling → one save at the
//! end. Once a turn enters the pipeline the caller always gets a response
//! string back; only missing startup configuration may halt the system.

use crate::generator::{GenerationParams, Generator, GeneratorError};
use crate::mood::MoodClassifier;
use crate::title::{self, DEFAULT_CONVERSATION};
use crate::{context, profile};
use moa_core::{crisis, MoodLabel, Turn, UserProfile};
use moa_memory::ConversationStore;
use std::sync::Arc;

// Fixed user-facing strings for generator failures. Raw errors are never
// propagated to the caller.
pub const APOLOGY_GENERIC: &str =
    "I apologize, but I'm having trouble processing your request. Please try again.";
pub const APOLOGY_HIGH_USAGE: &str =
    "I'm experiencing unusually high usage right now. Please give me a moment and try again.";
pub const APOLOGY_CONNECTIVITY: &str =
    "I'm having trouble connecting right now. Please check your connection and try again in a moment.";
pub const SAFETY_REFUSAL: &str =
    "I'm not able to respond to that, but I'm still here for you. Could we talk about something else that supports your well-being?";

/// One inbound message plus the caller's view of the conversation.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub message: String,
    pub conversation_name: String,
    pub history: Vec<Turn>,
    pub user_profile: UserProfile,
    pub language: String,
}

/// What the caller gets back. `conversation_name` may differ from the input
/// when a title was just generated.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub response: String,
    pub history: Vec<Turn>,
    pub user_profile: UserProfile,
    pub conversation_name: String,
}

/// Explicitly constructed, dependency-injected pipeline. No global model
/// client: tests swap in mock collaborators.
pub struct CompanionEngine {
    generator: Arc<dyn Generator>,
    mood: MoodClassifier,
    store: Arc<ConversationStore>,
    params: GenerationParams,
}

impl CompanionEngine {
    pub fn new(
        generator: Arc<dyn Generator>,
        mood: MoodClassifier,
        store: Arc<ConversationStore>,
        params: GenerationParams,
    ) -> Self {
        Self {
            generator,
            mood,
            store,
            params,
        }
    }

    /// Classify a message's mood without running a full turn. Used by the
    /// mood-journal command.
    pub async fn classify_mood(&self, message: &str) -> MoodLabel {
        self.mood.classify(message).await
    }

    /// Handle one conversation turn for the given user.
    ///
    /// Persistence happens only after the full pipeline completes, so an
    /// aborted request leaves no partial state behind.
    #[tracing::instrument(skip(self, request), fields(user = %user_id, conversation = %request.conversation_name))]
    pub async fn handle_turn(&self, user_id: &str, request: TurnRequest) -> TurnOutcome {
        let TurnRequest {
            message,
            conversation_name,
            history: incoming_history,
            user_profile: incoming_profile,
            language,
        } = request;
        tracing::debug!(%language, "handling turn");

        // The crisis gate runs before any classification or generator call,
        // and its decision is final for this turn: fixed bundle, nothing
        // persisted, conversation name unchanged.
        let decision = crisis::check(&message);
        if decision.is_crisis {
            tracing::info!(
                keyword = decision.matched_keyword.unwrap_or_default(),
                "crisis keyword detected, short-circuiting pipeline"
            );
            return TurnOutcome {
                response: crisis::crisis_response(),
                history: incoming_history,
                user_profile: incoming_profile,
                conversation_name,
            };
        }

        let started_empty = incoming_history.is_empty();
        let is_fresh_default = conversation_name == DEFAULT_CONVERSATION && started_empty;

        // For an existing conversation the store is authoritative; the
        // caller's history is just its latest view.
        let (mut history, mut user_profile) = if is_fresh_default {
            (incoming_history, incoming_profile)
        } else {
            let (stored_history, stored_profile) =
                self.store.load(user_id, &conversation_name).await;
            let user_profile = if incoming_profile.is_empty() {
                stored_profile
            } else {
                incoming_profile
            };
            (stored_history, user_profile)
        };

        let mood = self.mood.classify(&message).await;
        profile::apply(&message, &mut user_profile);

        let context_turns = context::build_context(&message, mood, &user_profile, &history);
        let response = match self.generator.generate(&context_turns, &self.params).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "generator failed, answering with fixed apology");
                apology_for(&e).to_string()
            }
        };

        history.push(Turn::user(&message));
        history.push(Turn::model(&response));

        let mut conversation_name = conversation_name;
        if is_fresh_default {
            let generated = title::generate_title(self.generator.as_ref(), &history).await;
            tracing::debug!(title = %generated, "renaming default conversation");
            // Re-key the turn under the new name, merging any history a
            // previous conversation already stored there.
            let (existing_history, existing_profile) =
                self.store.load(user_id, &generated).await;
            if !existing_history.is_empty() {
                let mut merged = existing_history;
                merged.append(&mut history);
                history = merged;
            }
            if user_profile.is_empty() {
                user_profile = existing_profile;
            }
            conversation_name = generated;
        }

        if let Err(e) = self
            .store
            .save(user_id, &conversation_name, &history, &user_profile)
            .await
        {
            // The user still gets their response; the turn is just lost from
            // the document.
            tracing::error!(error = %e, "failed to persist conversation");
        }

        TurnOutcome {
            response,
            history,
            user_profile,
            conversation_name,
        }
    }
}

/// Map a generator failure to its fixed user-facing string.
pub fn apology_for(error: &GeneratorError) -> &'static str {
    match error {
        GeneratorError::PolicyBlock(_) => SAFETY_REFUSAL,
        GeneratorError::Quota(_) => APOLOGY_HIGH_USAGE,
        GeneratorError::Connectivity(_) => APOLOGY_CONNECTIVITY,
        GeneratorError::Api { .. } | GeneratorError::MalformedResponse(_) => APOLOGY_GENERIC,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apology_mapping_is_distinct_per_kind() {
        let quota = apology_for(&GeneratorError::Quota("q".into()));
        let net = apology_for(&GeneratorError::Connectivity("n".into()));
        let block = apology_for(&GeneratorError::PolicyBlock("b".into()));
        let generic = apology_for(&GeneratorError::MalformedResponse("m".into()));
        assert_ne!(quota, net);
        assert_ne!(quota, block);
        assert_ne!(net, generic);
        assert_ne!(block, generic);
    }
}

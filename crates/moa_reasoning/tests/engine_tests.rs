//! Integration tests for the CompanionEngine.
//!
//! The generator is a queue-backed mock and the sentiment collaborator is
//! absent (keyword fallback), so the full handle_turn() pipeline runs without
//! any network.

use moa_memory::ConversationStore;
use moa_reasoning::engine::{
    CompanionEngine, TurnRequest, APOLOGY_CONNECTIVITY, APOLOGY_HIGH_USAGE, SAFETY_REFUSAL,
};
use moa_reasoning::providers::MockGenerator;
use moa_reasoning::{GenerationParams, GeneratorError, MoodClassifier};
use moa_core::crisis::SUPPORTIVE_RESPONSE;
use moa_core::{Role, Turn, UserProfile};
use std::sync::Arc;

fn engine_with(
    generator: Arc<MockGenerator>,
    dir: &tempfile::TempDir,
) -> (CompanionEngine, Arc<ConversationStore>) {
    let store = Arc::new(ConversationStore::new(dir.path().join("conversations.json")));
    let engine = CompanionEngine::new(
        generator,
        MoodClassifier::local_only(),
        store.clone(),
        GenerationParams::default(),
    );
    (engine, store)
}

fn request(message: &str) -> TurnRequest {
    TurnRequest {
        message: message.to_string(),
        conversation_name: "default".to_string(),
        history: Vec::new(),
        user_profile: UserProfile::default(),
        language: "en".to_string(),
    }
}

#[tokio::test]
async fn test_crisis_message_short_circuits_without_generator() {
    let dir = tempfile::tempdir().unwrap();
    let generator = Arc::new(MockGenerator::with_reply("should never be seen"));
    let (engine, store) = engine_with(generator.clone(), &dir);

    let outcome = engine
        .handle_turn("u1", request("I feel hopeless and want to die"))
        .await;

    assert!(outcome.response.starts_with(SUPPORTIVE_RESPONSE));
    assert!(outcome.response.contains("crisis hotline"));
    // Name unchanged, no title generated, nothing persisted, zero calls.
    assert_eq!(outcome.conversation_name, "default");
    assert!(outcome.history.is_empty());
    assert_eq!(generator.calls(), 0);
    assert!(store.list("u1").await.is_empty());
}

#[tokio::test]
async fn test_first_turn_generates_title_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let generator = Arc::new(MockGenerator::with_sequence(vec![
        Ok("That's wonderful to hear! What made today so good?".to_string()),
        Ok("Gratitude and a Good Morning".to_string()),
    ]));
    let (engine, store) = engine_with(generator.clone(), &dir);

    let outcome = engine.handle_turn("u1", request("I'm doing great today!")).await;

    // Sentiment API unavailable: the keyword fallback sees "great".
    assert_eq!(outcome.conversation_name, "Gratitude and a Good Morning");
    assert_eq!(outcome.history.len(), 2);
    assert_eq!(outcome.history[0].role, Role::User);
    assert_eq!(outcome.history[1].role, Role::Model);
    assert_eq!(generator.calls(), 2);

    // The turn was persisted under the generated name.
    let (stored, _) = store.load("u1", "Gratitude and a Good Morning").await;
    assert_eq!(stored, outcome.history);
    assert_eq!(store.list("u1").await, vec!["Gratitude and a Good Morning".to_string()]);
}

#[tokio::test]
async fn test_context_block_reports_fallback_mood() {
    // Run the same scenario through the context builder directly: the
    // structured query block must carry the fallback mood.
    let classifier = MoodClassifier::local_only();
    let mood = classifier.classify("I'm doing great today!").await;
    let turns =
        moa_reasoning::context::build_context("I'm doing great today!", mood, &UserProfile::default(), &[]);
    assert!(turns.last().unwrap().text.contains("User's current mood: positive"));
}

#[tokio::test]
async fn test_existing_conversation_appends_to_stored_history() {
    let dir = tempfile::tempdir().unwrap();
    let generator = Arc::new(MockGenerator::with_reply("of course"));
    let (engine, store) = engine_with(generator.clone(), &dir);

    let seed = vec![Turn::user("hi"), Turn::model("hello")];
    store
        .save("u1", "walks", &seed, &UserProfile::default())
        .await
        .unwrap();

    let mut req = request("can we talk about my day?");
    req.conversation_name = "walks".to_string();
    let outcome = engine.handle_turn("u1", req).await;

    // Store history is authoritative; the new exchange lands on top of it.
    assert_eq!(outcome.conversation_name, "walks");
    assert_eq!(outcome.history.len(), 4);
    assert_eq!(outcome.history[..2], seed[..]);
    // No titling for an already-named conversation.
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn test_generator_quota_failure_maps_to_high_usage_apology() {
    let dir = tempfile::tempdir().unwrap();
    let generator = Arc::new(MockGenerator::with_sequence(vec![
        Err(GeneratorError::Quota("429".to_string())),
        Ok("Quiet Evening Check In".to_string()),
    ]));
    let (engine, _store) = engine_with(generator, &dir);

    let outcome = engine.handle_turn("u1", request("how does this work?")).await;
    assert_eq!(outcome.response, APOLOGY_HIGH_USAGE);
    // The apology is still recorded as the model turn.
    assert_eq!(outcome.history[1].text, APOLOGY_HIGH_USAGE);
}

#[tokio::test]
async fn test_generator_connectivity_failure_maps_to_connectivity_apology() {
    let dir = tempfile::tempdir().unwrap();
    let generator = Arc::new(MockGenerator::with_sequence(vec![
        Err(GeneratorError::Connectivity("dns".to_string())),
        Err(GeneratorError::Connectivity("dns".to_string())),
    ]));
    let (engine, _store) = engine_with(generator, &dir);

    let outcome = engine.handle_turn("u1", request("hello there")).await;
    assert_eq!(outcome.response, APOLOGY_CONNECTIVITY);
    // Title generation also failed, so the fallback title names the key.
    assert_eq!(outcome.conversation_name, "Untitled Conversation");
}

#[tokio::test]
async fn test_policy_block_maps_to_safety_refusal() {
    let dir = tempfile::tempdir().unwrap();
    let generator = Arc::new(MockGenerator::with_sequence(vec![
        Err(GeneratorError::PolicyBlock("OTHER".to_string())),
        Ok("Blocked Topic".to_string()),
    ]));
    let (engine, _store) = engine_with(generator, &dir);

    let outcome = engine.handle_turn("u1", request("tell me something odd")).await;
    assert_eq!(outcome.response, SAFETY_REFUSAL);
}

#[tokio::test]
async fn test_profile_name_extraction_flows_into_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let generator = Arc::new(MockGenerator::with_reply("nice to meet you"));
    let (engine, store) = engine_with(generator, &dir);

    let outcome = engine.handle_turn("u1", request("my name is ada")).await;
    assert_eq!(outcome.user_profile.name(), Some("Ada"));

    // Persisted alongside the history.
    let (_, profile) = store.load("u1", &outcome.conversation_name).await;
    assert_eq!(profile.name(), Some("Ada"));
}

#[tokio::test]
async fn test_users_are_isolated_by_namespace() {
    let dir = tempfile::tempdir().unwrap();
    let generator = Arc::new(MockGenerator::with_reply("hello"));
    let (engine, store) = engine_with(generator, &dir);

    let mut req = request("good evening");
    req.conversation_name = "evenings".to_string();
    engine.handle_turn("alice", req.clone()).await;
    engine.handle_turn("bob", req).await;

    assert_eq!(store.list("alice").await, vec!["evenings".to_string()]);
    assert_eq!(store.list("bob").await, vec!["evenings".to_string()]);
    let (alice_history, _) = store.load("alice", "evenings").await;
    assert_eq!(alice_history.len(), 2);
}

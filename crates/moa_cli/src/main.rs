use clap::Parser;
use moa_core::{wellness, MoaConfig, UserProfile};
use moa_memory::{ConversationStore, MoodLog, SessionRegistry};
use moa_reasoning::providers::{GeminiGenerator, MockGenerator};
use moa_reasoning::{
    CompanionEngine, GenerationParams, Generator, MoodClassifier, SentimentApi, TurnRequest,
};
use moa_reasoning::mood::TwinwordClient;
use moa_reasoning::title::DEFAULT_CONVERSATION;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "moa.toml")]
    config: String,

    /// Override the conversation store path
    #[arg(long)]
    store: Option<PathBuf>,

    /// Session token; each distinct token gets its own user namespace
    #[arg(long, default_value = "cli")]
    session: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut config = MoaConfig::load_or_default(&args.config);
    if let Some(path) = args.store {
        config.store.path = path;
    }
    // Fatal: without a generator credential the companion must not start.
    config.validate()?;

    let generator: Arc<dyn Generator> = match config.generator.provider.as_str() {
        "mock" => Arc::new(MockGenerator::with_reply(
            "(mock) I hear you. Tell me more about how you're feeling.",
        )),
        _ => Arc::new(GeminiGenerator::new(&config.generator)?),
    };

    let sentiment: Option<Arc<dyn SentimentApi>> = match config.sentiment.api_key {
        Some(_) => Some(Arc::new(TwinwordClient::new(&config.sentiment)?)),
        None => {
            info!("No sentiment API key configured; using keyword fallback only");
            None
        }
    };
    let classifier = MoodClassifier::new(sentiment);

    let store = Arc::new(ConversationStore::new(&config.store.path));
    let mood_log = MoodLog::new(&config.store.mood_log_path);
    let registry = SessionRegistry::new();
    let user_id = registry.resolve(&args.session).await;

    let engine = CompanionEngine::new(
        generator,
        classifier,
        store.clone(),
        GenerationParams {
            max_output_tokens: config.generator.max_output_tokens,
            temperature: config.generator.temperature,
        },
    );

    println!("🧘 Welcome to Moa, your well-being companion.");
    println!("Commands: 'breathe', 'log my mood: <thoughts>', 'my recent moods', 'conversations', 'quit'.");
    println!("Or just start chatting about your feelings or your day.\n");

    let mut conversation_name = DEFAULT_CONVERSATION.to_string();
    let mut history = Vec::new();
    let mut user_profile = UserProfile::default();

    let stdin = io::stdin();
    let mut input = String::new();
    loop {
        print!("😊 > ");
        io::stdout().flush()?;
        input.clear();
        if stdin.read_line(&mut input)? == 0 {
            break;
        }
        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "quit" || trimmed == "exit" {
            println!("Take care of yourself. 💙");
            break;
        }

        if trimmed == "breathe" {
            for step in wellness::guided_breathing() {
                println!("{}", step);
            }
            continue;
        }

        if trimmed == "conversations" {
            for name in store.list(&user_id).await {
                println!("- {}", name);
            }
            continue;
        }

        if trimmed == "my recent moods" {
            for entry in mood_log.recent(3).await {
                println!("[{}] {}: {}", entry.timestamp.format("%Y-%m-%d %H:%M"), entry.mood, entry.message);
            }
            continue;
        }

        if let Some(thoughts) = trimmed.strip_prefix("log my mood:") {
            let thoughts = thoughts.trim();
            let mood = engine.classify_mood(thoughts).await;
            if mood_log.record(mood, thoughts).await {
                println!("Logged your mood as {}.", mood);
            } else {
                println!("Sorry, I couldn't save that mood entry.");
            }
            continue;
        }

        let outcome = engine
            .handle_turn(
                &user_id,
                TurnRequest {
                    message: trimmed.to_string(),
                    conversation_name: conversation_name.clone(),
                    history: history.clone(),
                    user_profile: user_profile.clone(),
                    language: config.pipeline.default_language.clone(),
                },
            )
            .await;

        println!("\nMoa: {}\n", outcome.response);
        conversation_name = outcome.conversation_name;
        history = outcome.history;
        user_profile = outcome.user_profile;
    }

    Ok(())
}

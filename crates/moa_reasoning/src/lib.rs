pub mod api_types;
pub mod context;
pub mod engine;
pub mod generator;
pub mod mood;
pub mod profile;
pub mod providers;
pub mod title;

pub use engine::{CompanionEngine, TurnOutcome, TurnRequest};
pub use generator::{GenerationParams, Generator, GeneratorError};
pub use mood::{MoodClassifier, SentimentApi};

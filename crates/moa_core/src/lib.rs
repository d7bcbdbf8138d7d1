pub mod config;
pub mod crisis;
pub mod lexicon;
pub mod persona;
pub mod turn;
pub mod wellness;

pub use config::MoaConfig;
pub use crisis::CrisisDecision;
pub use turn::{MoodLabel, Role, Turn, UserProfile};

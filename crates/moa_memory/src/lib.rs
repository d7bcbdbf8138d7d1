pub mod mood_log;
pub mod registry;
pub mod store;

pub use mood_log::{MoodEntry, MoodLog};
pub use registry::SessionRegistry;
pub use store::{conversation_key, ConversationStore};

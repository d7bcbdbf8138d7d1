pub mod gemini;
pub mod mock;

pub use gemini::GeminiGenerator;
pub use mock::MockGenerator;

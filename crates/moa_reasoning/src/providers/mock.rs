//! Mock generator — deterministic responses for tests and keyless runs.

use crate::generator::{GenerationParams, Generator, GeneratorError};
use moa_core::Turn;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Pops pre-queued results per call; once the queue is empty every call
/// returns the default reply.
pub struct MockGenerator {
    queued: Mutex<VecDeque<Result<String, GeneratorError>>>,
    default_reply: String,
    calls: AtomicUsize,
}

impl MockGenerator {
    pub fn with_reply(reply: &str) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            default_reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_sequence(responses: Vec<Result<String, GeneratorError>>) -> Self {
        Self {
            queued: Mutex::new(responses.into()),
            default_reply: "(mock) I hear you. Tell me more.".to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times `generate` was invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Generator for MockGenerator {
    async fn generate(
        &self,
        _turns: &[Turn],
        _params: &GenerationParams,
    ) -> Result<String, GeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.queued.lock().await.pop_front() {
            Some(result) => result,
            None => Ok(self.default_reply.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sequence_then_default() {
        let mock = MockGenerator::with_sequence(vec![
            Ok("first".to_string()),
            Err(GeneratorError::Quota("test".to_string())),
        ]);
        let params = GenerationParams::default();

        assert_eq!(mock.generate(&[], &params).await.unwrap(), "first");
        assert!(matches!(
            mock.generate(&[], &params).await,
            Err(GeneratorError::Quota(_))
        ));
        assert!(mock.generate(&[], &params).await.unwrap().contains("mock"));
        assert_eq!(mock.calls(), 3);
    }
}

use async_trait::async_trait;
use moa_core::Turn;
use thiserror::Error;

/// Failure kinds from the generator collaborator. The pipeline never shows
/// these to the user raw; each kind maps to a fixed apology or refusal.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The generator refused the content on policy grounds.
    #[error("content blocked by safety policy: {0}")]
    PolicyBlock(String),

    /// Rate limit / quota exhaustion.
    #[error("quota exhausted: {0}")]
    Quota(String),

    /// Transport-level failure: timeout, DNS, connection refused.
    #[error("connection failure: {0}")]
    Connectivity(String),

    /// Any other API-level error.
    #[error("generator API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A reply that arrived but couldn't be interpreted.
    #[error("malformed generator response: {0}")]
    MalformedResponse(String),
}

/// Sampling parameters for one generator call.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_output_tokens: 1024,
            temperature: 0.7,
        }
    }
}

impl GenerationParams {
    /// Tight parameters for the one-shot title call.
    pub fn for_title() -> Self {
        Self {
            max_output_tokens: 32,
            temperature: 0.4,
        }
    }
}

/// The external text-completion service, opaque to the pipeline. Injected
/// explicitly so tests can substitute a deterministic fake.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Produce a reply for an ordered role-tagged turn sequence.
    async fn generate(
        &self,
        turns: &[Turn],
        params: &GenerationParams,
    ) -> Result<String, GeneratorError>;
}

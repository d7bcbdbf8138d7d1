//! Mood classification — external API first, keyword fallback always.
//!
//! This stage never errors and never retries: any remote failure degrades
//! synchronously to the local lexicon so total turn latency stays bounded.

use async_trait::async_trait;
use moa_core::config::SentimentConfig;
use moa_core::{lexicon, MoodLabel};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Reply shape of the sentiment collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct SentimentReply {
    pub result_code: String,
    #[serde(rename = "type")]
    pub sentiment: String,
}

/// The external sentiment service. A trait seam so tests can substitute a
/// deterministic fake.
#[async_trait]
pub trait SentimentApi: Send + Sync {
    async fn analyze(&self, message: &str) -> anyhow::Result<SentimentReply>;
}

/// RapidAPI-hosted sentiment endpoint: GET with the message as the `text`
/// query parameter and two fixed header credentials.
pub struct TwinwordClient {
    client: Client,
    base_url: String,
    host: String,
    api_key: String,
}

impl TwinwordClient {
    pub fn new(config: &SentimentConfig) -> anyhow::Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| anyhow::anyhow!("sentiment client requires an API key"))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            host: config.host.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl SentimentApi for TwinwordClient {
    async fn analyze(&self, message: &str) -> anyhow::Result<SentimentReply> {
        let reply = self
            .client
            .get(&self.base_url)
            .header("x-rapidapi-host", &self.host)
            .header("x-rapidapi-key", &self.api_key)
            .query(&[("text", message)])
            .send()
            .await?
            .json::<SentimentReply>()
            .await?;
        Ok(reply)
    }
}

/// External-API-first classifier with the keyword lexicon as its floor.
pub struct MoodClassifier {
    remote: Option<Arc<dyn SentimentApi>>,
}

impl MoodClassifier {
    pub fn new(remote: Option<Arc<dyn SentimentApi>>) -> Self {
        Self { remote }
    }

    /// Classifier with no remote collaborator; every message goes through
    /// the keyword fallback.
    pub fn local_only() -> Self {
        Self { remote: None }
    }

    /// Tag a message as positive, negative or neutral. Never errors: remote
    /// failures of any kind (transport, timeout, non-success result code,
    /// unknown sentiment type) fall back to the lexicon.
    pub async fn classify(&self, message: &str) -> MoodLabel {
        if let Some(remote) = &self.remote {
            match remote.analyze(message).await {
                Ok(reply) if reply.result_code == "200" => match reply.sentiment.as_str() {
                    "positive" => return MoodLabel::Positive,
                    "negative" => return MoodLabel::Negative,
                    "neutral" => return MoodLabel::Neutral,
                    other => {
                        tracing::debug!(sentiment = other, "unknown sentiment type, falling back")
                    }
                },
                Ok(reply) => {
                    tracing::debug!(code = %reply.result_code, "sentiment API non-success, falling back")
                }
                Err(e) => tracing::debug!(error = %e, "sentiment API failed, falling back"),
            }
        }
        lexicon::classify_keywords(message)
    }
}

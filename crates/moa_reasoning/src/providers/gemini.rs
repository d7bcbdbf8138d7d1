use crate::api_types::{
    GenerateContentRequest, GenerateContentResponse, GenerationConfig, SafetySetting, WireContent,
    WirePart,
};
use crate::generator::{GenerationParams, Generator, GeneratorError};
use moa_core::config::GeneratorConfig;
use moa_core::{Role, Turn};
use reqwest::Client;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Harm categories relaxed so the companion can talk about difficult
/// feelings; hard policy blocks are still reported by the API and surface as
/// `GeneratorError::PolicyBlock`.
const SAFETY_CATEGORIES: &[&str] = &[
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiGenerator {
    pub fn new(config: &GeneratorConfig) -> anyhow::Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Gemini provider requires an API key"))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    fn request_body(turns: &[Turn], params: &GenerationParams) -> GenerateContentRequest {
        let contents = turns
            .iter()
            .map(|turn| WireContent {
                role: match turn.role {
                    Role::User => "user".to_string(),
                    Role::Model => "model".to_string(),
                },
                parts: vec![WirePart {
                    text: turn.text.clone(),
                }],
            })
            .collect();
        GenerateContentRequest {
            contents,
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|category| SafetySetting {
                    category: category.to_string(),
                    threshold: "BLOCK_ONLY_HIGH".to_string(),
                })
                .collect(),
            generation_config: GenerationConfig {
                max_output_tokens: params.max_output_tokens,
                temperature: params.temperature,
            },
        }
    }

    fn classify_failure(status: u16, body: &str) -> GeneratorError {
        let lowered = body.to_lowercase();
        if status == 429 || lowered.contains("quota") || lowered.contains("resource exhausted") {
            return GeneratorError::Quota(truncate(body, 200));
        }
        GeneratorError::Api {
            status,
            message: truncate(body, 200),
        }
    }
}

#[async_trait::async_trait]
impl Generator for GeminiGenerator {
    #[tracing::instrument(skip(self, turns, params), fields(model = %self.model, turns = turns.len()))]
    async fn generate(
        &self,
        turns: &[Turn],
        params: &GenerationParams,
    ) -> Result<String, GeneratorError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let body = Self::request_body(turns, params);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| GeneratorError::Connectivity(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GeneratorError::Connectivity(e.to_string()))?;
        if !status.is_success() {
            return Err(Self::classify_failure(status.as_u16(), &text));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| GeneratorError::MalformedResponse(e.to_string()))?;

        if let Some(feedback) = &parsed.prompt_feedback {
            if let Some(reason) = &feedback.block_reason {
                return Err(GeneratorError::PolicyBlock(reason.clone()));
            }
        }

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| GeneratorError::MalformedResponse("no candidates".to_string()))?;
        if candidate.finish_reason.as_deref() == Some("SAFETY") {
            return Err(GeneratorError::PolicyBlock("finish_reason SAFETY".to_string()));
        }

        let reply = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();
        if reply.is_empty() {
            return Err(GeneratorError::MalformedResponse(
                "candidate carried no text".to_string(),
            ));
        }
        Ok(reply)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_maps_roles() {
        let turns = vec![Turn::user("hello"), Turn::model("hi")];
        let body = GeminiGenerator::request_body(&turns, &GenerationParams::default());
        assert_eq!(body.contents[0].role, "user");
        assert_eq!(body.contents[1].role, "model");
        assert_eq!(body.contents[1].parts[0].text, "hi");
        assert_eq!(body.safety_settings.len(), 4);
    }

    #[test]
    fn test_classify_quota_by_status() {
        assert!(matches!(
            GeminiGenerator::classify_failure(429, "slow down"),
            GeneratorError::Quota(_)
        ));
    }

    #[test]
    fn test_classify_quota_by_text() {
        assert!(matches!(
            GeminiGenerator::classify_failure(403, "Quota exceeded for project"),
            GeneratorError::Quota(_)
        ));
    }

    #[test]
    fn test_classify_other_api_error() {
        assert!(matches!(
            GeminiGenerator::classify_failure(400, "bad request"),
            GeneratorError::Api { status: 400, .. }
        ));
    }

    #[test]
    fn test_new_requires_key() {
        let config = GeneratorConfig::default();
        assert!(GeminiGenerator::new(&config).is_err());
    }
}

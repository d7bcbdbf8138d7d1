use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MoaConfig {
    pub generator: GeneratorConfig,
    pub sentiment: SentimentConfig,
    pub store: StoreConfig,
    pub pipeline: PipelineConfig,
}

impl MoaConfig {
    /// Load config from a TOML file, falling back to defaults for missing
    /// fields. After loading, env var overrides are applied.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: MoaConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Try to load from path; if the file doesn't exist, return defaults with
    /// env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    /// Startup check: a missing generator credential is fatal — the process
    /// must not serve traffic without one. The mock provider needs no key.
    /// A missing sentiment key is fine; classification degrades to the
    /// keyword fallback.
    pub fn validate(&self) -> Result<()> {
        if self.generator.provider != "mock" && self.generator.api_key.is_none() {
            anyhow::bail!(
                "Missing generator API key: set GEMINI_API_KEY or [generator] api_key, \
                 or select provider = \"mock\""
            );
        }
        Ok(())
    }

    /// Apply environment variable overrides on top of file-based config.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("MOA_GENERATOR_PROVIDER") {
            self.generator.provider = v;
        }
        if let Ok(v) = std::env::var("GEMINI_API_KEY") {
            self.generator.api_key = Some(v);
        }
        if let Ok(v) = std::env::var("GEMINI_MODEL") {
            self.generator.model = v;
        }
        if let Ok(v) = std::env::var("GEMINI_BASE_URL") {
            self.generator.base_url = Some(v);
        }
        if let Ok(v) = std::env::var("TWINWORD_API_KEY") {
            self.sentiment.api_key = Some(v);
        }
        if let Ok(v) = std::env::var("MOA_STORE_PATH") {
            self.store.path = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("MOA_DEFAULT_LANGUAGE") {
            self.pipeline.default_language = v;
        }
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// "gemini" or "mock".
    pub provider: String,
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: Option<String>,
    pub max_output_tokens: u32,
    pub temperature: f32,
    /// Hard timeout for a single generator call.
    pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            api_key: None,
            model: "gemini-1.5-flash-latest".to_string(),
            base_url: None,
            max_output_tokens: 1024,
            temperature: 0.7,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    pub api_key: Option<String>,
    pub host: String,
    pub base_url: String,
    /// The sentiment call is the only optional network hop per turn; keep its
    /// timeout short so fallback classification stays cheap.
    pub timeout_secs: u64,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            host: "twinword-sentiment-analysis.p.rapidapi.com".to_string(),
            base_url: "https://twinword-sentiment-analysis.p.rapidapi.com/analyze/".to_string(),
            timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// The single JSON document holding every conversation.
    pub path: PathBuf,
    pub mood_log_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("conversation_memory.json"),
            mood_log_path: PathBuf::from("mood_log.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub default_language: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_language: "en".to_string(),
        }
    }
}

//! Configuration loading, validation, and management for ragturn.
//!
//! Loads configuration from `~/.ragturn/config.toml` with environment
//! variable overrides. The resulting [`AppConfig`] is handed to every turn
//! at construction time; nothing reads process-wide settings afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Placeholder the prompt template uses for retrieved context.
pub const SUMMARIES_PLACEHOLDER: &str = "{summaries}";

/// The root configuration structure.
///
/// Maps directly to `~/.ragturn/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default credential for the generation backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Generation backend family
    #[serde(default = "default_llm_name")]
    pub llm_name: String,

    /// Model used when a turn names none
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Token maximum for models missing from `model_token_limits`
    #[serde(default = "default_max_history")]
    pub default_max_history: u32,

    /// Per-model token maximum
    #[serde(default = "default_model_token_limits")]
    pub model_token_limits: HashMap<String, u32>,

    /// Vector store kind handed to the index factory
    #[serde(default = "default_vector_store")]
    pub vector_store: String,

    /// Embedding configuration identifier
    #[serde(default = "default_embeddings_key")]
    pub embeddings_key: String,

    /// Root directory of file-backed indexes
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Per-turn retrieval defaults
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,
}

fn default_llm_name() -> String {
    "openai".into()
}
fn default_model() -> String {
    "docsgpt".into()
}
fn default_max_history() -> u32 {
    150
}
fn default_model_token_limits() -> HashMap<String, u32> {
    HashMap::from([
        ("gpt-3.5-turbo".to_string(), 4096),
        ("claude-2".to_string(), 100_000),
        ("gemini-2.0-flash-exp".to_string(), 1_000_000),
    ])
}
fn default_vector_store() -> String {
    "file".into()
}
fn default_embeddings_key() -> String {
    "huggingface_sentence-transformers/all-mpnet-base-v2".into()
}
fn default_data_dir() -> PathBuf {
    AppConfig::config_dir().join("indexes")
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("llm_name", &self.llm_name)
            .field("default_model", &self.default_model)
            .field("default_max_history", &self.default_max_history)
            .field("model_token_limits", &self.model_token_limits)
            .field("vector_store", &self.vector_store)
            .field("embeddings_key", &self.embeddings_key)
            .field("data_dir", &self.data_dir)
            .field("retrieval", &self.retrieval)
            .field("gateway", &self.gateway)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Context chunks retrieved per turn
    #[serde(default = "default_chunks")]
    pub chunks: usize,

    /// Requested token limit before the per-model cap
    #[serde(default = "default_token_limit")]
    pub token_limit: u32,

    /// System prompt template; must contain `{summaries}` to receive context
    #[serde(default = "default_prompt_template")]
    pub prompt_template: String,
}

fn default_chunks() -> usize {
    2
}
fn default_token_limit() -> u32 {
    150
}
fn default_prompt_template() -> String {
    "You are a helpful assistant that answers questions about the user's documents. \
     Use the following pieces of context to answer. If the context does not contain \
     the answer, say that you don't know.\n\n----------------\n{summaries}"
        .into()
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            chunks: default_chunks(),
            token_limit: default_token_limit(),
            prompt_template: default_prompt_template(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    7091
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.ragturn/config.toml).
    ///
    /// Environment overrides:
    /// - `RAGTURN_API_KEY`, then `OPENAI_API_KEY` (only when no key is configured)
    /// - `RAGTURN_MODEL`
    /// - `RAGTURN_LLM`
    /// - `RAGTURN_VECTOR_STORE`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("RAGTURN_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("RAGTURN_MODEL") {
            config.default_model = model;
        }

        if let Ok(llm) = std::env::var("RAGTURN_LLM") {
            config.llm_name = llm;
        }

        if let Ok(store) = std::env::var("RAGTURN_VECTOR_STORE") {
            config.vector_store = store;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".ragturn")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retrieval.token_limit == 0 {
            return Err(ConfigError::ValidationError(
                "retrieval.token_limit must be > 0".into(),
            ));
        }

        if self.default_max_history == 0 {
            return Err(ConfigError::ValidationError(
                "default_max_history must be > 0".into(),
            ));
        }

        if let Some((model, _)) = self.model_token_limits.iter().find(|(_, v)| **v == 0) {
            return Err(ConfigError::ValidationError(format!(
                "model_token_limits.{model} must be > 0"
            )));
        }

        if self.retrieval.prompt_template.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "retrieval.prompt_template must not be empty".into(),
            ));
        }

        if !self.retrieval.prompt_template.contains(SUMMARIES_PLACEHOLDER) {
            tracing::warn!(
                "retrieval.prompt_template has no {SUMMARIES_PLACEHOLDER} placeholder; retrieved context will not reach the model"
            );
        }

        Ok(())
    }

    /// Token maximum for `model`, falling back to `default_max_history`.
    pub fn model_max_tokens(&self, model: &str) -> u32 {
        self.model_token_limits
            .get(model)
            .copied()
            .unwrap_or(self.default_max_history)
    }

    /// Check if a default credential is available.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            llm_name: default_llm_name(),
            default_model: default_model(),
            default_max_history: default_max_history(),
            model_token_limits: default_model_token_limits(),
            vector_store: default_vector_store(),
            embeddings_key: default_embeddings_key(),
            data_dir: default_data_dir(),
            retrieval: RetrievalConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

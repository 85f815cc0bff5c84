//! Turn inputs and their resolved form.

use ragturn_config::AppConfig;
use ragturn_core::history::Turn;
use serde::{Deserialize, Serialize};

/// Where a turn's documents come from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    /// Index identifier; absent means the turn runs without retrieval
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_docs: Option<String>,
}

/// A turn as a caller asks for it. Unset fields fall back to configuration.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct TurnRequest {
    pub question: String,

    #[serde(default)]
    pub source: SourceDescriptor,

    #[serde(default)]
    pub chat_history: Vec<Turn>,

    /// Prompt template containing `{summaries}`
    #[serde(default)]
    pub prompt: Option<String>,

    /// Number of context records to retrieve
    #[serde(default)]
    pub chunks: Option<usize>,

    #[serde(default)]
    pub token_limit: Option<u32>,

    #[serde(default)]
    pub model: Option<String>,

    /// Overrides the configured credential for this turn
    #[serde(default, skip_serializing)]
    pub user_api_key: Option<String>,
}

impl TurnRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Default::default()
        }
    }

    pub fn with_docs(mut self, active_docs: impl Into<String>) -> Self {
        self.source.active_docs = Some(active_docs.into());
        self
    }

    pub fn with_history(mut self, chat_history: Vec<Turn>) -> Self {
        self.chat_history = chat_history;
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_chunks(mut self, chunks: usize) -> Self {
        self.chunks = Some(chunks);
        self
    }

    pub fn with_token_limit(mut self, token_limit: u32) -> Self {
        self.token_limit = Some(token_limit);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_user_api_key(mut self, key: impl Into<String>) -> Self {
        self.user_api_key = Some(key.into());
        self
    }
}

/// Fully resolved turn parameters.
///
/// `token_limit` is advisory: it is reported here and nowhere enforced.
#[derive(Clone, PartialEq, Serialize)]
pub struct TurnParams {
    pub question: String,
    pub source: SourceDescriptor,
    pub chat_history: Vec<Turn>,
    pub prompt: String,
    pub chunks: usize,
    pub token_limit: u32,
    pub model: String,
    #[serde(skip)]
    pub user_api_key: Option<String>,
}

impl TurnParams {
    /// Apply configuration defaults to `request`.
    pub fn resolve(request: TurnRequest, config: &AppConfig) -> Self {
        let model = request
            .model
            .unwrap_or_else(|| config.default_model.clone());
        let requested = request
            .token_limit
            .unwrap_or(config.retrieval.token_limit);
        let token_limit = effective_token_limit(requested, config.model_max_tokens(&model));

        Self {
            question: request.question,
            source: request.source,
            chat_history: request.chat_history,
            prompt: request
                .prompt
                .unwrap_or_else(|| config.retrieval.prompt_template.clone()),
            chunks: request.chunks.unwrap_or(config.retrieval.chunks),
            token_limit,
            model,
            user_api_key: request.user_api_key,
        }
    }
}

/// The advisory token limit: the smaller of the requested and the model's.
pub fn effective_token_limit(requested: u32, model_max: u32) -> u32 {
    requested.min(model_max)
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for TurnRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnRequest")
            .field("question", &self.question)
            .field("source", &self.source)
            .field("chat_history", &self.chat_history.len())
            .field("prompt", &self.prompt)
            .field("chunks", &self.chunks)
            .field("token_limit", &self.token_limit)
            .field("model", &self.model)
            .field("user_api_key", &redact(&self.user_api_key))
            .finish()
    }
}

impl std::fmt::Debug for TurnParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnParams")
            .field("question", &self.question)
            .field("source", &self.source)
            .field("chat_history", &self.chat_history.len())
            .field("prompt", &self.prompt)
            .field("chunks", &self.chunks)
            .field("token_limit", &self.token_limit)
            .field("model", &self.model)
            .field("user_api_key", &redact(&self.user_api_key))
            .finish()
    }
}

//! `ragturn messages`: Print the message sequence a turn would send.

use ragturn_agent::{TurnParams, TurnRequest, build_messages};
use ragturn_config::AppConfig;
use ragturn_core::history::Turn;
use ragturn_core::message::Message;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{load_config, retriever_for};

pub async fn run(
    history: Option<PathBuf>,
    docs: Option<String>,
    chunks: Option<usize>,
    prompt: Option<String>,
    question: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;

    let mut request = TurnRequest::new(question);
    if let Some(path) = history {
        request = request.with_history(load_history(&path)?);
    }
    if let Some(docs) = docs {
        request = request.with_docs(docs);
    }
    if let Some(chunks) = chunks {
        request = request.with_chunks(chunks);
    }
    if let Some(prompt) = prompt {
        request = request.with_prompt(prompt);
    }

    let messages = assemble_messages(&config, request).await?;
    println!("{}", serde_json::to_string_pretty(&messages)?);
    Ok(())
}

/// Read a stored chat history: a JSON array of turns.
pub fn load_history(path: &Path) -> Result<Vec<Turn>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read history {}: {e}", path.display()))?;
    let history: Vec<Turn> = serde_json::from_str(&content)?;
    debug!(path = %path.display(), turns = history.len(), "History loaded");
    Ok(history)
}

pub async fn assemble_messages(
    config: &AppConfig,
    request: TurnRequest,
) -> Result<Vec<Message>, Box<dyn std::error::Error>> {
    let params = TurnParams::resolve(request, config);
    let records = retriever_for(config, &params)
        .retrieve(&params.question, params.chunks)
        .await?;

    let messages = build_messages(
        &params.prompt,
        &records,
        &params.chat_history,
        &params.question,
    );

    info!(
        sources = records.len(),
        history = params.chat_history.len(),
        messages = messages.len(),
        "Messages assembled"
    );
    Ok(messages)
}

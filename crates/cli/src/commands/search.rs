//! `ragturn search`: Retrieve context records for a question.

use ragturn_agent::{TurnParams, TurnRequest};
use ragturn_config::AppConfig;
use ragturn_core::context::ContextRecord;
use ragturn_core::error::RetrievalError;
use tracing::info;

use super::{load_config, retriever_for};

pub async fn run(
    docs: String,
    chunks: Option<usize>,
    question: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;

    let mut request = TurnRequest::new(question).with_docs(docs);
    if let Some(chunks) = chunks {
        request = request.with_chunks(chunks);
    }

    let records = search(&config, request).await?;
    print!("{}", render(&records));
    Ok(())
}

pub async fn search(
    config: &AppConfig,
    request: TurnRequest,
) -> Result<Vec<ContextRecord>, RetrievalError> {
    let params = TurnParams::resolve(request, config);
    let records = retriever_for(config, &params)
        .retrieve(&params.question, params.chunks)
        .await?;

    info!(
        docs = params.source.active_docs.as_deref().unwrap_or("-"),
        chunks = params.chunks,
        count = records.len(),
        "Search complete"
    );
    Ok(records)
}

fn render(records: &[ContextRecord]) -> String {
    if records.is_empty() {
        return "No matching documents.\n".to_string();
    }

    let mut out = String::new();
    for (i, record) in records.iter().enumerate() {
        out.push_str(&format!("[{}] {} ({})\n", i + 1, record.title, record.source));
        for line in record.text.lines() {
            out.push_str(&format!("    {line}\n"));
        }
    }
    out
}

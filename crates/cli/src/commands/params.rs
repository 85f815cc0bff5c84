//! `ragturn params`: Print the resolved turn parameters.

use ragturn_agent::{TurnParams, TurnRequest};
use ragturn_config::AppConfig;

use super::load_config;

pub fn run(
    model: Option<String>,
    token_limit: Option<u32>,
    chunks: Option<usize>,
    question: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let params = resolve(&config, model, token_limit, chunks, question);
    println!("{}", serde_json::to_string_pretty(&params)?);
    Ok(())
}

fn resolve(
    config: &AppConfig,
    model: Option<String>,
    token_limit: Option<u32>,
    chunks: Option<usize>,
    question: String,
) -> TurnParams {
    let request = TurnRequest {
        model,
        token_limit,
        chunks,
        ..TurnRequest::new(question)
    };
    TurnParams::resolve(request, config)
}

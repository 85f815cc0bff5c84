//! ragturn CLI: the main entry point.
//!
//! Commands:
//! - `search`:   Retrieve context records for a question
//! - `messages`: Print the message sequence a turn would send to the model
//! - `params`:   Print the resolved turn parameters
//! - `config`:   Print the effective configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "ragturn",
    about = "ragturn: retrieval-augmented generation turns",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Retrieve context records for a question
    Search {
        /// Index to search
        #[arg(short, long)]
        docs: String,

        /// Number of records to retrieve
        #[arg(short, long)]
        chunks: Option<usize>,

        question: String,
    },

    /// Print the messages a turn would send, without calling a model
    Messages {
        /// JSON file holding the stored chat history
        #[arg(long)]
        history: Option<PathBuf>,

        /// Index to retrieve context from
        #[arg(short, long)]
        docs: Option<String>,

        /// Number of records to retrieve
        #[arg(short, long)]
        chunks: Option<usize>,

        /// Prompt template; must contain {summaries} to receive context
        #[arg(short, long)]
        prompt: Option<String>,

        question: String,
    },

    /// Print the resolved turn parameters
    Params {
        /// Model identifier
        #[arg(short, long)]
        model: Option<String>,

        /// Requested token limit
        #[arg(short, long)]
        token_limit: Option<u32>,

        /// Number of records to retrieve
        #[arg(short, long)]
        chunks: Option<usize>,

        question: String,
    },

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Search {
            docs,
            chunks,
            question,
        } => commands::search::run(docs, chunks, question).await?,
        Commands::Messages {
            history,
            docs,
            chunks,
            prompt,
            question,
        } => commands::messages::run(history, docs, chunks, prompt, question).await?,
        Commands::Params {
            model,
            token_limit,
            chunks,
            question,
        } => commands::params::run(model, token_limit, chunks, question)?,
        Commands::Config => commands::config_cmd::show()?,
    }

    Ok(())
}

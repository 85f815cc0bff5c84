pub mod config_cmd;
pub mod messages;
pub mod params;
pub mod search;

use ragturn_agent::{ContextRetriever, TurnParams};
use ragturn_config::AppConfig;
use ragturn_vectorstore::StoreFactory;
use std::sync::Arc;

/// Load the configuration, with a CLI-friendly error.
pub fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}

/// A retriever over the file-backed indexes under `config.data_dir`.
pub fn retriever_for(config: &AppConfig, params: &TurnParams) -> ContextRetriever {
    ContextRetriever::from_config(
        Arc::new(StoreFactory::new(&config.data_dir)),
        config,
        params,
    )
}

//! HTTP gateway for ragturn.
//!
//! Exposes a turn as a server-sent event stream, plus retrieval-only and
//! health endpoints. Built on Axum.
//!
//! - `GET  /health`:     liveness and version
//! - `POST /stream`:     run a turn, one SSE frame per event
//! - `POST /api/search`: retrieval only, JSON array of context records

pub mod api;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::{Router, response::Json, routing::get, routing::post};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

use ragturn_config::AppConfig;
use ragturn_core::generation::AgentFactory;
use ragturn_core::index::IndexFactory;

/// Shared application state for the gateway.
///
/// Read-only: every request builds its own orchestrator and agent.
pub struct GatewayState {
    pub config: AppConfig,
    pub indexes: Arc<dyn IndexFactory>,
    pub agents: Arc<dyn AgentFactory>,
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
///
/// Layers applied:
/// - CORS restricted to localhost origins
/// - Request body size limit (1 MB)
/// - HTTP trace logging
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin: &HeaderValue, _| {
            is_localhost_origin(origin)
        }))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health_handler))
        .route("/stream", post(api::stream_handler))
        .route("/api/search", post(api::search_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

fn is_localhost_origin(origin: &HeaderValue) -> bool {
    let Ok(origin) = origin.to_str() else {
        return false;
    };
    ["http://localhost", "http://127.0.0.1"].iter().any(|base| {
        origin
            .strip_prefix(base)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(':'))
    })
}

/// Start the gateway HTTP server.
pub async fn start(
    config: AppConfig,
    indexes: Arc<dyn IndexFactory>,
    agents: Arc<dyn AgentFactory>,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let state = Arc::new(GatewayState {
        config,
        indexes,
        agents,
    });

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, build_router(state)).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use ragturn_core::error::GenerationError;
    use ragturn_core::generation::{AgentFactory, AgentSpec, FragmentStream, GenerationAgent};
    use ragturn_core::history::ToolCallRecord;
    use ragturn_core::message::Message;
    use ragturn_core::{DocMetadata, SearchHit};
    use ragturn_vectorstore::{InMemoryIndex, StoreFactory};
    use std::sync::Arc;

    use super::*;

    /// Streams the question back word by word.
    pub struct EchoAgent;

    #[async_trait]
    impl GenerationAgent for EchoAgent {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(
            &self,
            messages: Vec<Message>,
        ) -> Result<FragmentStream, GenerationError> {
            let question = messages
                .last()
                .and_then(|m| m.text())
                .unwrap_or_default()
                .to_string();
            let words: Vec<String> = question.split_whitespace().map(str::to_string).collect();
            Ok(Box::pin(async_stream::stream! {
                for word in words {
                    yield Ok(word);
                }
            }))
        }

        fn tool_calls(&self) -> Vec<ToolCallRecord> {
            Vec::new()
        }
    }

    pub struct EchoFactory;

    impl AgentFactory for EchoFactory {
        fn create(&self, _spec: &AgentSpec) -> Result<Arc<dyn GenerationAgent>, GenerationError> {
            Ok(Arc::new(EchoAgent))
        }
    }

    pub struct NoAgents;

    impl AgentFactory for NoAgents {
        fn create(&self, spec: &AgentSpec) -> Result<Arc<dyn GenerationAgent>, GenerationError> {
            Err(GenerationError::NotConfigured(spec.llm_name.clone()))
        }
    }

    pub fn manual_index() -> InMemoryIndex {
        InMemoryIndex::from_hits(vec![
            SearchHit::new(
                "To reset the router hold the button for ten seconds",
                DocMetadata {
                    title: Some("manual/router.md".into()),
                    ..Default::default()
                },
            ),
            SearchHit::new("The router supports guest networks", DocMetadata::default()),
        ])
    }

    pub fn state_with(agents: Arc<dyn AgentFactory>) -> SharedState {
        let mut config = AppConfig::default();
        config.vector_store = "memory".into();
        let indexes = StoreFactory::new("/unused").with_memory_index("manual", manual_index());
        Arc::new(GatewayState {
            config,
            indexes: Arc::new(indexes),
            agents,
        })
    }

    pub fn test_state() -> SharedState {
        state_with(Arc::new(EchoFactory))
    }
}

//! Turn endpoints.
//!
//! `POST /stream` writes each [`GenerationEvent`] as one SSE frame whose
//! event name is [`GenerationEvent::event_type`] and whose data is the
//! event's JSON. If the turn fails part-way, one final `error` frame
//! carrying `{"error": "..."}` is written and the stream ends.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    response::sse::{Event as SseEvent, Sse},
};
use futures::{Stream, StreamExt};
use serde::Serialize;
use std::convert::Infallible;
use tracing::{error, info};

use ragturn_agent::{ContextRetriever, GenerationEvent, TurnOrchestrator, TurnParams, TurnRequest};
use ragturn_core::context::ContextRecord;
use ragturn_core::error::Error;

use crate::SharedState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn internal_error(message: String) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse { error: message }),
    )
}

/// `POST /stream`: run a turn, receive an SSE stream of its events.
pub async fn stream_handler(
    State(state): State<SharedState>,
    Json(request): Json<TurnRequest>,
) -> Result<Sse<impl Stream<Item = Result<SseEvent, Infallible>>>, ApiError> {
    info!(
        docs = request.source.active_docs.as_deref().unwrap_or("-"),
        history = request.chat_history.len(),
        "Stream request"
    );

    let turn = TurnOrchestrator::new(
        request,
        &state.config,
        state.indexes.clone(),
        state.agents.as_ref(),
    )
    .map_err(|e| {
        error!(error = %e, "Turn setup failed");
        internal_error(format!("Turn setup failed: {e}"))
    })?;

    let frames = turn.run().map(|item| {
        let frame = match item {
            Ok(event) => event_frame(&event),
            Err(e) => {
                error!(error = %e, "Turn failed mid-stream");
                error_frame(&e.to_string())
            }
        };
        Ok(frame)
    });

    Ok(Sse::new(frames))
}

fn event_frame(event: &GenerationEvent) -> SseEvent {
    json_frame(event.event_type(), event)
}

/// A frame named `name` carrying `value` as JSON; an `error` frame if
/// `value` cannot be encoded.
fn json_frame<T: Serialize>(name: &str, value: &T) -> SseEvent {
    match serde_json::to_string(value).map_err(Error::from) {
        Ok(data) => SseEvent::default().event(name).data(data),
        Err(e) => {
            error!(event = name, error = %e, "Event encoding failed");
            error_frame(&e.to_string())
        }
    }
}

fn error_frame(message: &str) -> SseEvent {
    let data = serde_json::json!({ "error": message }).to_string();
    SseEvent::default().event("error").data(data)
}

/// `POST /api/search`: retrieval only.
pub async fn search_handler(
    State(state): State<SharedState>,
    Json(request): Json<TurnRequest>,
) -> Result<Json<Vec<ContextRecord>>, ApiError> {
    let params = TurnParams::resolve(request, &state.config);
    let retriever = ContextRetriever::from_config(state.indexes.clone(), &state.config, &params);

    let records = retriever
        .retrieve(&params.question, params.chunks)
        .await
        .map_err(|e| {
            error!(error = %e, "Search failed");
            internal_error(format!("Search failed: {e}"))
        })?;

    info!(count = records.len(), "Search complete");
    Ok(Json(records))
}

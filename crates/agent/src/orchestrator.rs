//! The turn orchestrator: drives one turn from question to event stream.
//!
//! # Flow
//!
//! ```text
//! Retrieving → EmittingSources → BuildingMessages → Generating
//!            → EmittingAnswers → EmittingToolCalls → Done
//! ```
//!
//! A failure while retrieving or generating ends the stream with an `Err`
//! item. Events already yielded stay yielded; nothing is retried.

use async_stream::try_stream;
use futures::{Stream, StreamExt};
use ragturn_config::AppConfig;
use ragturn_core::context::ContextRecord;
use ragturn_core::error::{Error, Result};
use ragturn_core::generation::{AgentFactory, AgentSpec, GenerationAgent};
use ragturn_core::history::Turn;
use ragturn_core::index::IndexFactory;
use ragturn_core::message::Message;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::history::linearize;
use crate::params::{TurnParams, TurnRequest};
use crate::prompt::assemble;
use crate::retriever::ContextRetriever;
use crate::stream_event::{GenerationEvent, GenerationStream};

/// Where a turn is in its pipeline. Logged as the `phase` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Retrieving,
    EmittingSources,
    BuildingMessages,
    Generating,
    EmittingAnswers,
    EmittingToolCalls,
    Done,
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Retrieving => "retrieving",
            Self::EmittingSources => "emitting_sources",
            Self::BuildingMessages => "building_messages",
            Self::Generating => "generating",
            Self::EmittingAnswers => "emitting_answers",
            Self::EmittingToolCalls => "emitting_tool_calls",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// One prepared turn: resolved parameters, a retriever and a fresh agent.
pub struct TurnOrchestrator {
    params: TurnParams,
    retriever: ContextRetriever,
    agent: Arc<dyn GenerationAgent>,
}

impl TurnOrchestrator {
    /// Resolve `request` against `config` and obtain this turn's agent.
    ///
    /// No retrieval happens here; the index is opened when the turn runs.
    pub fn new(
        request: TurnRequest,
        config: &AppConfig,
        indexes: Arc<dyn IndexFactory>,
        agents: &dyn AgentFactory,
    ) -> Result<Self> {
        let params = TurnParams::resolve(request, config);
        let retriever = ContextRetriever::from_config(indexes, config, &params);

        let spec = AgentSpec {
            llm_name: config.llm_name.clone(),
            model: params.model.clone(),
            api_key: config.api_key.clone(),
            user_api_key: params.user_api_key.clone(),
        };
        let agent = agents.create(&spec)?;

        info!(
            agent = agent.name(),
            model = %params.model,
            docs = retriever.index_id().unwrap_or("-"),
            chunks = params.chunks,
            token_limit = params.token_limit,
            history = params.chat_history.len(),
            "Turn prepared"
        );

        Ok(Self {
            params,
            retriever,
            agent,
        })
    }

    /// Snapshot of the resolved parameters.
    pub fn params(&self) -> TurnParams {
        self.params.clone()
    }

    /// Retrieval only: the context records this turn would use.
    pub async fn search(&self) -> Result<Vec<ContextRecord>> {
        Ok(self
            .retriever
            .retrieve(&self.params.question, self.params.chunks)
            .await?)
    }

    /// The message sequence the agent would receive, without generating.
    pub async fn messages(&self) -> Result<Vec<Message>> {
        let records = self.search().await?;
        Ok(build_messages(
            &self.params.prompt,
            &records,
            &self.params.chat_history,
            &self.params.question,
        ))
    }

    /// Run the turn. Nothing happens until the stream is first polled;
    /// dropping it abandons the turn.
    pub fn run(self) -> GenerationStream {
        let Self {
            params,
            retriever,
            agent,
        } = self;
        Box::pin(turn_events(params, retriever, agent))
    }
}

fn turn_events(
    params: TurnParams,
    retriever: ContextRetriever,
    agent: Arc<dyn GenerationAgent>,
) -> impl Stream<Item = Result<GenerationEvent>> + Send + 'static {
    try_stream! {
        debug!(phase = %TurnPhase::Retrieving, "Turn phase");
        let records = retriever
            .retrieve(&params.question, params.chunks)
            .await
            .map_err(Error::from)?;

        debug!(phase = %TurnPhase::EmittingSources, count = records.len(), "Turn phase");
        for record in &records {
            yield GenerationEvent::Source(record.clone());
        }

        debug!(phase = %TurnPhase::BuildingMessages, "Turn phase");
        let messages = build_messages(
            &params.prompt,
            &records,
            &params.chat_history,
            &params.question,
        );

        debug!(phase = %TurnPhase::Generating, messages = messages.len(), "Turn phase");
        let mut fragments = agent.generate(messages).await.map_err(Error::from)?;

        debug!(phase = %TurnPhase::EmittingAnswers, "Turn phase");
        let mut answered = 0usize;
        while let Some(fragment) = fragments.next().await {
            let fragment = fragment.map_err(Error::from)?;
            answered += 1;
            yield GenerationEvent::Answer(fragment);
        }

        let tool_calls = agent.tool_calls();
        debug!(phase = %TurnPhase::EmittingToolCalls, count = tool_calls.len(), "Turn phase");
        let issued = tool_calls.len();
        yield GenerationEvent::ToolCalls(tool_calls);

        info!(
            phase = %TurnPhase::Done,
            sources = records.len(),
            fragments = answered,
            tool_calls = issued,
            "Turn complete"
        );
    }
}

/// System prompt, then linearized history, then the question.
pub fn build_messages(
    template: &str,
    records: &[ContextRecord],
    history: &[Turn],
    question: &str,
) -> Vec<Message> {
    let mut messages = vec![Message::system(assemble(template, records))];
    messages.extend(linearize(history));
    messages.push(Message::user(question));
    messages
}

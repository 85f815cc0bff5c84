//! Shared test helpers: scripted agents and counting index factories.

use futures::StreamExt;
use ragturn_core::context::{DocMetadata, SearchHit};
use ragturn_core::error::{Error, GenerationError, RetrievalError};
use ragturn_core::generation::{AgentFactory, AgentSpec, FragmentStream, GenerationAgent};
use ragturn_core::history::ToolCallRecord;
use ragturn_core::index::{IndexFactory, VectorIndex};
use ragturn_core::message::Message;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

use crate::stream_event::{GenerationEvent, GenerationStream};

pub fn hit(content: &str) -> SearchHit {
    SearchHit::new(content, DocMetadata::default())
}

pub fn titled_hit(content: &str, title: &str, source: &str) -> SearchHit {
    SearchHit::new(
        content,
        DocMetadata {
            title: Some(title.into()),
            source: Some(source.into()),
            ..Default::default()
        },
    )
}

/// Pull every item, splitting off the terminal error if there is one.
pub async fn drain(mut stream: GenerationStream) -> (Vec<GenerationEvent>, Option<Error>) {
    let mut events = Vec::new();
    while let Some(item) = stream.next().await {
        match item {
            Ok(event) => events.push(event),
            Err(e) => {
                assert!(stream.next().await.is_none(), "stream continued after error");
                return (events, Some(e));
            }
        }
    }
    (events, None)
}

/// Returns its hits in insertion order, truncated to `k`.
struct StaticIndex {
    hits: Vec<SearchHit>,
}

#[async_trait::async_trait]
impl VectorIndex for StaticIndex {
    fn name(&self) -> &str {
        "static"
    }

    async fn search(&self, _query: &str, k: usize) -> Result<Vec<SearchHit>, RetrievalError> {
        Ok(self.hits.iter().take(k).cloned().collect())
    }
}

/// An index factory that counts how often it is asked to open an index.
pub struct CountingIndexFactory {
    hits: Vec<SearchHit>,
    fail: bool,
    opens: AtomicUsize,
}

impl CountingIndexFactory {
    pub fn new(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            fail: false,
            opens: AtomicUsize::new(0),
        }
    }

    /// Every open fails with `IndexUnavailable`.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

impl IndexFactory for CountingIndexFactory {
    fn open(
        &self,
        _store_kind: &str,
        index_id: &str,
        _embeddings_key: &str,
    ) -> Result<Arc<dyn VectorIndex>, RetrievalError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RetrievalError::IndexUnavailable(index_id.to_string()));
        }
        Ok(Arc::new(StaticIndex {
            hits: self.hits.clone(),
        }))
    }
}

/// What a [`ScriptedAgent`] does when asked to generate.
#[derive(Clone, Default)]
pub struct AgentScript {
    fragments: Vec<String>,
    tool_calls: Vec<ToolCallRecord>,
    fail_after: Option<usize>,
    reject: bool,
}

impl AgentScript {
    pub fn answering(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Tool calls recorded once all fragments have been produced.
    pub fn with_tool_calls(mut self, calls: Vec<ToolCallRecord>) -> Self {
        self.tool_calls = calls;
        self
    }

    /// Produce `n` fragments, then fail the stream.
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// `generate` itself fails.
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Default::default()
        }
    }
}

/// A generation agent that plays back an [`AgentScript`].
pub struct ScriptedAgent {
    script: AgentScript,
    received: Mutex<Vec<Message>>,
    recorded: Arc<Mutex<Vec<ToolCallRecord>>>,
}

impl ScriptedAgent {
    pub fn new(script: AgentScript) -> Self {
        Self {
            script,
            received: Mutex::new(Vec::new()),
            recorded: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The messages passed to the last `generate` call.
    pub fn received(&self) -> Vec<Message> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl GenerationAgent for ScriptedAgent {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, messages: Vec<Message>) -> Result<FragmentStream, GenerationError> {
        *self.received.lock().unwrap() = messages;
        if self.script.reject {
            return Err(GenerationError::ApiError {
                status_code: 500,
                message: "scripted rejection".into(),
            });
        }

        let AgentScript {
            fragments,
            tool_calls,
            fail_after,
            ..
        } = self.script.clone();
        let recorded = Arc::clone(&self.recorded);

        Ok(Box::pin(async_stream::stream! {
            let produced = fail_after.unwrap_or(fragments.len());
            for fragment in fragments.into_iter().take(produced) {
                yield Ok(fragment);
            }
            if fail_after.is_some() {
                yield Err(GenerationError::StreamInterrupted("scripted failure".into()));
            } else {
                recorded.lock().unwrap().extend(tool_calls);
            }
        }))
    }

    fn tool_calls(&self) -> Vec<ToolCallRecord> {
        self.recorded.lock().unwrap().clone()
    }
}

/// Hands out a fresh [`ScriptedAgent`] per turn and remembers what it built.
pub struct ScriptedAgentFactory {
    script: Option<AgentScript>,
    agents: Mutex<Vec<Arc<ScriptedAgent>>>,
    specs: Mutex<Vec<AgentSpec>>,
}

impl ScriptedAgentFactory {
    pub fn new(script: AgentScript) -> Self {
        Self {
            script: Some(script),
            agents: Mutex::new(Vec::new()),
            specs: Mutex::new(Vec::new()),
        }
    }

    /// Every `create` fails with `NotConfigured`.
    pub fn unavailable() -> Self {
        Self {
            script: None,
            agents: Mutex::new(Vec::new()),
            specs: Mutex::new(Vec::new()),
        }
    }

    pub fn created(&self) -> usize {
        self.agents.lock().unwrap().len()
    }

    pub fn last_agent(&self) -> Option<Arc<ScriptedAgent>> {
        self.agents.lock().unwrap().last().cloned()
    }

    pub fn last_spec(&self) -> Option<AgentSpec> {
        self.specs.lock().unwrap().last().cloned()
    }
}

impl AgentFactory for ScriptedAgentFactory {
    fn create(&self, spec: &AgentSpec) -> Result<Arc<dyn GenerationAgent>, GenerationError> {
        self.specs.lock().unwrap().push(spec.clone());
        let script = self
            .script
            .clone()
            .ok_or_else(|| GenerationError::NotConfigured(spec.llm_name.clone()))?;
        let agent = Arc::new(ScriptedAgent::new(script));
        self.agents.lock().unwrap().push(Arc::clone(&agent));
        Ok(agent)
    }
}

/// An agent that yields `first`, then waits on `gate` before yielding `second`.
pub struct GatedAgentFactory {
    first: String,
    second: String,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl GatedAgentFactory {
    pub fn new(first: &str, second: &str, gate: oneshot::Receiver<()>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
            gate: Mutex::new(Some(gate)),
        }
    }
}

impl AgentFactory for GatedAgentFactory {
    fn create(&self, _spec: &AgentSpec) -> Result<Arc<dyn GenerationAgent>, GenerationError> {
        Ok(Arc::new(GatedAgent {
            first: self.first.clone(),
            second: self.second.clone(),
            gate: Mutex::new(self.gate.lock().unwrap().take()),
        }))
    }
}

struct GatedAgent {
    first: String,
    second: String,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
}

#[async_trait::async_trait]
impl GenerationAgent for GatedAgent {
    fn name(&self) -> &str {
        "gated"
    }

    async fn generate(&self, _messages: Vec<Message>) -> Result<FragmentStream, GenerationError> {
        let first = self.first.clone();
        let second = self.second.clone();
        let gate = self.gate.lock().unwrap().take();

        Ok(Box::pin(async_stream::stream! {
            yield Ok(first);
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            yield Ok(second);
        }))
    }

    fn tool_calls(&self) -> Vec<ToolCallRecord> {
        Vec::new()
    }
}

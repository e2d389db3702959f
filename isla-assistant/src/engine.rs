//! The per-session query loop.
//!
//! One [`query`](ConversationEngine::query) runs retrieve → compose → first
//! completion → optional tool dispatch and second completion → history
//! update. History is only touched once an answer exists, and the whole query
//! holds the history lock so concurrent callers are serialised.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::{Local, NaiveDate};
use isla_core::{
    Completion, GenerationConfig, Llm, LlmError, LlmRequest, Message, Tool, ToolCall, ToolContext,
};
use isla_rag::{SearchResult, VectorIndex};
use serde::Serialize;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{AssistantError, Result};
use crate::history::History;
use crate::prompt::{context_message, system_message};

/// Characters of chunk text kept in a [`SourceExcerpt`].
pub const EXCERPT_CHARS: usize = 100;

/// A retrieved chunk cited with an answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceExcerpt {
    pub chunk_id: String,
    pub page: Option<usize>,
    /// Leading characters of the chunk.
    pub text: String,
    pub score: f32,
}

impl SourceExcerpt {
    fn from_result(result: &SearchResult) -> Self {
        Self {
            chunk_id: result.chunk.id.clone(),
            page: result.chunk.page(),
            text: result.chunk.text.chars().take(EXCERPT_CHARS).collect(),
            score: result.score,
        }
    }
}

/// The outcome of one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub answer: String,
    /// Retrieved chunks, best first.
    pub sources: Vec<SourceExcerpt>,
    /// Whether the model invoked a tool for this answer.
    pub tool_called: bool,
}

/// Orchestrates retrieval, the completion backend and tools for one session.
pub struct ConversationEngine {
    llm: Arc<dyn Llm>,
    index: Arc<VectorIndex>,
    tools: BTreeMap<String, Arc<dyn Tool>>,
    system_prompt: String,
    generation: GenerationConfig,
    history: Mutex<History>,
}

impl ConversationEngine {
    pub fn new(
        llm: Arc<dyn Llm>,
        index: Arc<VectorIndex>,
        system_prompt: impl Into<String>,
        generation: GenerationConfig,
        max_history_turns: usize,
    ) -> Self {
        Self {
            llm,
            index,
            tools: BTreeMap::new(),
            system_prompt: system_prompt.into(),
            generation,
            history: Mutex::new(History::new(max_history_turns)),
        }
    }

    /// Offer `tool` to the model. A tool with the same name is replaced.
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.insert(tool.name().to_string(), tool);
        self
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// Answer `question` using the `k` most relevant chunks.
    ///
    /// # Errors
    ///
    /// [`AssistantError::Retrieval`] when the index is not ready or embedding
    /// fails, [`AssistantError::GenerationFailed`] when either completion fails.
    /// History is left unchanged in both cases.
    pub async fn query(&self, question: &str, k: usize) -> Result<QueryResult> {
        self.query_on(question, k, Local::now().date_naive()).await
    }

    /// Like [`query`](Self::query) with an explicit current date, used both in
    /// the system prompt and as the anchor for tool calls.
    pub async fn query_on(&self, question: &str, k: usize, today: NaiveDate) -> Result<QueryResult> {
        let started = Instant::now();
        let mut history = self.history.lock().await;

        let results = self.index.search_with_scores(question, k).await?;
        debug!(retrieved = results.len(), k, "context retrieved");

        let mut messages = Vec::with_capacity(history.len() + 3);
        messages.push(Message::system(system_message(&self.system_prompt, today)));
        messages.extend(history.replay());
        messages.push(Message::system(context_message(&results)));
        messages.push(Message::user(question));

        let declarations = self.tools.values().map(|t| t.declaration()).collect();
        let first = LlmRequest::new(messages.clone(), self.generation).with_tools(declarations);

        let (answer, tool_called) = match self.llm.complete(first).await? {
            Completion::Text(text) => (text, false),
            Completion::ToolCalls(calls) => {
                messages.push(Message::assistant_tool_calls(calls.clone()));
                for call in &calls {
                    let output = self.dispatch(call, &ToolContext::new(today)).await;
                    messages.push(Message::tool(&call.id, output.to_string()));
                }

                // no tools on the follow-up, the model must answer in text
                let second = LlmRequest::new(messages, self.generation);
                let answer = match self.llm.complete(second).await? {
                    Completion::Text(text) => text,
                    Completion::ToolCalls(_) => {
                        return Err(AssistantError::GenerationFailed(LlmError::InvalidResponse(
                            "model requested tools on the follow-up completion".to_string(),
                        )));
                    }
                };
                (answer, true)
            }
        };

        history.push(Message::user(question));
        history.push(Message::assistant(&answer));

        let sources: Vec<SourceExcerpt> = results.iter().map(SourceExcerpt::from_result).collect();
        info!(
            sources = sources.len(),
            tool_called,
            history_turns = history.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "query completed"
        );

        Ok(QueryResult { answer, sources, tool_called })
    }

    /// Run one tool call. Failures become error values for the model.
    async fn dispatch(&self, call: &ToolCall, ctx: &ToolContext) -> Value {
        match self.tools.get(&call.name) {
            Some(tool) => {
                info!(tool = %call.name, call_id = %call.id, "dispatching tool call");
                tool.call(ctx, &call.arguments).await
            }
            None => {
                warn!(tool = %call.name, "model requested an unknown tool");
                json!({
                    "error": true,
                    "kind": "unknown-tool",
                    "message": format!("La herramienta '{}' no está disponible.", call.name),
                })
            }
        }
    }

    pub async fn clear_history(&self) {
        self.history.lock().await.clear();
        info!("conversation history cleared");
    }

    /// A snapshot of the retained turns, oldest first.
    pub async fn history(&self) -> Vec<Message> {
        self.history.lock().await.snapshot()
    }
}

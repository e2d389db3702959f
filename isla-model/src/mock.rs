//! Scripted completion backend for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use isla_core::{Completion, Llm, LlmError, LlmRequest, ToolCall};

/// An [`Llm`] that replays a fixed script of replies and records every request.
///
/// Once the script runs out every further call fails with
/// [`LlmError::InvalidResponse`].
pub struct MockLlm {
    name: String,
    script: Mutex<VecDeque<Result<Completion, LlmError>>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlm {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), script: Mutex::new(VecDeque::new()), requests: Mutex::new(Vec::new()) }
    }

    /// Queue a final text answer.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.push(Ok(Completion::Text(text.into())));
        self
    }

    /// Queue a single tool call.
    pub fn with_tool_call(
        self,
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        self.push(Ok(Completion::ToolCalls(vec![ToolCall {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }])));
        self
    }

    /// Queue a failure.
    pub fn with_error(self, error: LlmError) -> Self {
        self.push(Err(error));
        self
    }

    pub fn push(&self, reply: Result<Completion, LlmError>) {
        self.script.lock().unwrap_or_else(|e| e.into_inner()).push_back(reply);
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Replies still waiting in the script.
    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: LlmRequest) -> Result<Completion, LlmError> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).push(request);
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::InvalidResponse("mock script exhausted".to_string())))
    }
}

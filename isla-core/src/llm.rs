//! The completion backend seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::{Message, ToolCall};
use crate::tool::ToolDeclaration;

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self { temperature: 0.3, max_output_tokens: 1024, top_p: 0.9 }
    }
}

/// A single completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequest {
    pub messages: Vec<Message>,
    /// Functions the model may call. Empty means a plain text answer is required.
    pub tools: Vec<ToolDeclaration>,
    pub config: GenerationConfig,
}

impl LlmRequest {
    pub fn new(messages: Vec<Message>, config: GenerationConfig) -> Self {
        Self { messages, tools: Vec::new(), config }
    }

    pub fn with_tools(mut self, tools: Vec<ToolDeclaration>) -> Self {
        self.tools = tools;
        self
    }
}

/// What the model decided to do with a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// A final natural-language answer.
    Text(String),
    /// One or more tool invocations the caller must run before asking again.
    ToolCalls(Vec<ToolCall>),
}

impl Completion {
    /// The answer text, if this is a plain answer.
    pub fn text(&self) -> Option<&str> {
        match self {
            Completion::Text(text) => Some(text),
            Completion::ToolCalls(_) => None,
        }
    }
}

/// A chat-completion backend.
#[async_trait]
pub trait Llm: Send + Sync {
    /// The model identifier requests are sent to.
    fn name(&self) -> &str;

    /// Run one completion.
    async fn complete(&self, request: LlmRequest) -> Result<Completion>;
}

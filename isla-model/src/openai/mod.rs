//! OpenAI chat-completions provider.
//!
//! Talks to `/chat/completions` directly over `reqwest`. Tool declarations are
//! sent as `function` tools and `tool_calls` in the reply become
//! [`Completion::ToolCalls`](isla_core::Completion::ToolCalls).
//!
//! # Example
//!
//! ```rust,ignore
//! use isla_model::openai::{OpenAIClient, OpenAIConfig};
//!
//! let client = OpenAIClient::new(
//!     OpenAIConfig::new("sk-...", "gpt-4o-mini")
//!         .with_timeout(std::time::Duration::from_secs(20))
//!         .with_max_retries(2),
//! )?;
//! assert!(client.test_connection().await);
//! ```

mod client;
mod config;
mod convert;

pub use client::OpenAIClient;
pub use config::{OPENAI_API_BASE, OpenAIConfig};

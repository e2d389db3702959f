//! # isla-model
//!
//! Chat-completion backends for the Isla assistant.
//!
//! ## Overview
//!
//! - [`OpenAIClient`] - OpenAI chat completions (and OpenAI-compatible servers) with function calling
//! - [`MockLlm`] - scripted completions for tests
//!
//! Both implement [`isla_core::Llm`] and answer with a tagged
//! [`Completion`](isla_core::Completion): either final text or tool calls.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use isla_model::openai::{OpenAIClient, OpenAIConfig};
//!
//! let model = OpenAIClient::new(OpenAIConfig::new(
//!     std::env::var("OPENAI_API_KEY").unwrap(),
//!     "gpt-4o-mini",
//! ))?;
//! ```

pub mod mock;
pub mod openai;

pub use mock::MockLlm;
pub use openai::{OpenAIClient, OpenAIConfig};

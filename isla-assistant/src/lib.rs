//! # isla-assistant
//!
//! A retrieval-augmented tourist assistant for Tenerife.
//!
//! Questions are answered from a single reference guide (chunked, embedded
//! and searched with `isla-rag`) by a chat model (`isla-model`) that may call
//! the `get_weather` tool (`isla-weather`). The [`ConversationEngine`] keeps a
//! bounded history so follow-up questions work.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use isla_assistant::{AssistantConfig, ConversationEngine};
//!
//! let config = AssistantConfig::from_env()?;
//! let engine = ConversationEngine::new(llm, index, prompt, config.generation_config(), config.max_history_turns)
//!     .with_tool(weather);
//! let result = engine.query("¿Cómo puedo subir al Teide?", config.top_k).await?;
//! println!("{}", result.answer);
//! ```

pub mod config;
pub mod console;
pub mod engine;
pub mod error;
pub mod history;
pub mod logging;
pub mod prompt;

pub use config::{AssistantConfig, AssistantConfigBuilder};
pub use console::{Command, Console};
pub use engine::{ConversationEngine, QueryResult, SourceExcerpt};
pub use error::{AssistantError, Result};
pub use history::History;
pub use prompt::{DEFAULT_SYSTEM_PROMPT, EMPTY_CONTEXT_NOTICE};

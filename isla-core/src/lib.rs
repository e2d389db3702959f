//! # isla-core
//!
//! Shared vocabulary for the Isla assistant crates.
//!
//! ## Overview
//!
//! - [`Message`] / [`Role`] - role-tagged conversation turns
//! - [`ToolCall`] / [`ToolDeclaration`] - the function-calling boundary with the model
//! - [`Llm`] - a completion backend that answers with a tagged [`Completion`]
//! - [`Tool`] - a capability the model may invoke by name
//!
//! The model crate implements [`Llm`], the weather crate implements [`Tool`],
//! and the assistant crate drives both without knowing their concrete types.

pub mod error;
pub mod llm;
pub mod message;
pub mod tool;

pub use error::{LlmError, Result};
pub use llm::{Completion, GenerationConfig, Llm, LlmRequest};
pub use message::{Message, Role, ToolCall};
pub use tool::{Tool, ToolContext, ToolDeclaration};

//! Error types for the assistant.

use isla_core::LlmError;
use isla_rag::RagError;
use thiserror::Error;

/// Errors surfaced by the assistant to its caller.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// Invalid or missing configuration. Fatal at start-up.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A component could not be brought up (document, index, clients).
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// Retrieval against the guide failed, including embedding errors.
    #[error("Retrieval failed: {0}")]
    Retrieval(#[from] RagError),

    /// The completion service failed; no answer was produced.
    #[error("Generation failed: {0}")]
    GenerationFailed(#[from] LlmError),
}

/// A convenience result type for assistant operations.
pub type Result<T> = std::result::Result<T, AssistantError>;

//! Error types for the `isla-rag` crate.

use thiserror::Error;

/// Errors that can occur while loading, indexing or searching the guide.
#[derive(Debug, Error)]
pub enum RagError {
    /// The source document is missing or could not be read.
    #[error("Failed to load document '{path}': {message}")]
    LoaderError {
        /// Path of the document.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// A page index outside the loaded document was requested.
    #[error("Page index {index} out of range (document has {len} pages)")]
    PageOutOfRange { index: usize, len: usize },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The index was queried before being built or loaded.
    #[error("Vector index not initialized. Call build() or load_existing() first.")]
    NotInitialized,

    /// Reading or writing the persisted index failed.
    #[error("Index persistence error ({path}): {message}")]
    PersistenceError { path: String, message: String },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;

//! # isla-rag
//!
//! Retrieval half of the Isla assistant: load the guide, split it into
//! overlapping chunks, embed them, and answer nearest-neighbour queries.
//!
//! ## Overview
//!
//! - [`DocumentLoader`] - extracts pages from a PDF or text file
//! - [`FixedSizeChunker`] - fixed-size character chunks with exact overlap
//! - [`EmbeddingProvider`] - text → vector ([`OpenAIEmbeddingProvider`], [`MockEmbeddingProvider`])
//! - [`VectorStore`] - similarity search backend ([`InMemoryVectorStore`])
//! - [`VectorIndex`] - build / persist / load / search over all of the above
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use isla_rag::{DocumentLoader, IndexConfig, InMemoryVectorStore, OpenAIEmbeddingProvider, VectorIndex};
//!
//! let mut loader = DocumentLoader::new("data/TENERIFE.pdf")?;
//! let pages = loader.load()?.to_vec();
//!
//! let index = VectorIndex::new(
//!     IndexConfig::default(),
//!     Arc::new(OpenAIEmbeddingProvider::new(api_key)?),
//!     Arc::new(InMemoryVectorStore::new()),
//! );
//! index.build(&pages).await?;
//! let hits = index.search_with_scores("¿Cómo subir al Teide?", 3).await?;
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod index;
pub mod inmemory;
pub mod loader;
pub mod mock;
pub mod openai;
pub mod vectorstore;

pub use chunking::{Chunker, FixedSizeChunker, split_with_overlap};
pub use config::{IndexConfig, IndexConfigBuilder};
pub use document::{Chunk, Document, Page, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use index::{ChunkStats, IndexSnapshot, VectorIndex};
pub use inmemory::InMemoryVectorStore;
pub use loader::{DocumentLoader, DocumentStats};
pub use mock::MockEmbeddingProvider;
pub use openai::OpenAIEmbeddingProvider;
pub use vectorstore::VectorStore;

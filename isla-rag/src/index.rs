//! The guide's vector index.
//!
//! [`VectorIndex`] coordinates chunking, embedding and storage. It is built
//! once from the loaded pages (or rehydrated from its on-disk snapshot) and
//! then answers similarity queries for the conversation engine.
//!
//! # Example
//!
//! ```rust,ignore
//! let index = VectorIndex::new(config, embedder, Arc::new(InMemoryVectorStore::new()));
//! if index.load_existing().await.is_err() {
//!     index.build(&pages).await?;
//! }
//! let results = index.search_with_scores("playas en el norte", 5).await?;
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::chunking::{Chunker, FixedSizeChunker};
use crate::config::IndexConfig;
use crate::document::{Chunk, Document, Page, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// Name of the collection holding the guide's chunks.
const COLLECTION: &str = "guide";

/// Identifier given to the concatenated guide text.
const DOCUMENT_ID: &str = "guide";

/// Bumped whenever the snapshot layout changes.
const SNAPSHOT_VERSION: u32 = 1;

/// Size figures over the indexed chunks, in characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChunkStats {
    pub num_chunks: usize,
    pub avg_chunk_size: usize,
    pub min_chunk_size: usize,
    pub max_chunk_size: usize,
}

impl ChunkStats {
    fn from_chunks(chunks: &[Chunk]) -> Self {
        if chunks.is_empty() {
            return Self::default();
        }
        let lengths: Vec<usize> = chunks.iter().map(|c| c.text.chars().count()).collect();
        Self {
            num_chunks: lengths.len(),
            avg_chunk_size: lengths.iter().sum::<usize>() / lengths.len(),
            min_chunk_size: lengths.iter().copied().min().unwrap_or(0),
            max_chunk_size: lengths.iter().copied().max().unwrap_or(0),
        }
    }
}

/// The on-disk form of a built index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexSnapshot {
    pub version: u32,
    pub document_id: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub dimensions: usize,
    pub chunks: Vec<Chunk>,
}

/// Chunk → embed → store at build time; embed → search → filter at query time.
pub struct VectorIndex {
    config: IndexConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    chunker: Arc<dyn Chunker>,
    /// `Some` once built or loaded.
    stats: RwLock<Option<ChunkStats>>,
}

impl VectorIndex {
    /// Create an index over the given embedding provider and store.
    ///
    /// The index starts uninitialized; call [`build`](Self::build) or
    /// [`load_existing`](Self::load_existing) before searching.
    pub fn new(
        config: IndexConfig,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        let chunker = Arc::new(FixedSizeChunker::new(config.chunk_size, config.chunk_overlap));
        info!(
            chunk_size = config.chunk_size,
            chunk_overlap = config.chunk_overlap,
            embedder = embedding_provider.name(),
            "vector index created"
        );
        Self { config, embedding_provider, vector_store, chunker, stats: RwLock::new(None) }
    }

    /// Whether the index has been built or loaded.
    pub async fn is_initialized(&self) -> bool {
        self.stats.read().await.is_some()
    }

    /// Chunk statistics; all zero before the index is initialized.
    pub async fn chunk_stats(&self) -> ChunkStats {
        (*self.stats.read().await).unwrap_or_default()
    }

    /// Split the pages into chunks, embed them, write the snapshot to disk and
    /// then replace the stored contents.
    ///
    /// On failure the previously built contents keep being served.
    ///
    /// Returns the number of chunks indexed.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmbeddingError`] if the embedding service fails,
    /// and [`RagError::PersistenceError`] if the snapshot cannot be written.
    pub async fn build(&self, pages: &[Page]) -> Result<usize> {
        let document = Document::from_pages(DOCUMENT_ID, pages);
        let mut chunks = self.chunker.chunk(&document);
        info!(pages = pages.len(), chunk_count = chunks.len(), "created chunks");

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
            error!(error = %e, "embedding failed during build");
            e
        })?;
        if embeddings.len() != chunks.len() {
            return Err(RagError::EmbeddingError {
                provider: self.embedding_provider.name().to_string(),
                message: format!(
                    "expected {} embeddings, got {}",
                    chunks.len(),
                    embeddings.len()
                ),
            });
        }
        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        let snapshot = IndexSnapshot {
            version: SNAPSHOT_VERSION,
            document_id: DOCUMENT_ID.to_string(),
            chunk_size: self.config.chunk_size,
            chunk_overlap: self.config.chunk_overlap,
            dimensions: self.embedding_provider.dimensions(),
            chunks,
        };
        // the live store is only swapped once the snapshot is on disk
        self.write_snapshot(&snapshot).await?;
        self.replace_contents(&snapshot.chunks).await?;

        let count = snapshot.chunks.len();
        *self.stats.write().await = Some(ChunkStats::from_chunks(&snapshot.chunks));
        info!(chunk_count = count, path = %self.config.snapshot_path().display(), "vector index built and persisted");
        Ok(count)
    }

    /// Rehydrate the index from its snapshot without re-embedding any chunk.
    ///
    /// Returns the number of chunks loaded.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PersistenceError`] if the snapshot is missing or
    /// unreadable, and [`RagError::ConfigError`] if it was built with
    /// different chunking parameters.
    pub async fn load_existing(&self) -> Result<usize> {
        let path = self.config.snapshot_path();
        let bytes = tokio::fs::read(&path).await.map_err(|e| persistence_error(&path, e))?;
        let snapshot: IndexSnapshot =
            serde_json::from_slice(&bytes).map_err(|e| persistence_error(&path, e))?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(persistence_error(
                &path,
                format!("unsupported snapshot version {}", snapshot.version),
            ));
        }
        if snapshot.chunk_size != self.config.chunk_size
            || snapshot.chunk_overlap != self.config.chunk_overlap
        {
            warn!(path = %path.display(), "snapshot chunking parameters differ from configuration");
            return Err(RagError::ConfigError(format!(
                "index at {} was built with chunk_size={} chunk_overlap={}, configuration has {} / {}; rebuild it",
                path.display(),
                snapshot.chunk_size,
                snapshot.chunk_overlap,
                self.config.chunk_size,
                self.config.chunk_overlap
            )));
        }
        if snapshot.dimensions != self.embedding_provider.dimensions() {
            return Err(RagError::ConfigError(format!(
                "index at {} holds {}-dimensional embeddings but {} produces {}; rebuild it",
                path.display(),
                snapshot.dimensions,
                self.embedding_provider.name(),
                self.embedding_provider.dimensions()
            )));
        }

        self.replace_contents(&snapshot.chunks).await?;

        let count = snapshot.chunks.len();
        *self.stats.write().await = Some(ChunkStats::from_chunks(&snapshot.chunks));
        info!(chunk_count = count, path = %path.display(), "loaded existing vector index");
        Ok(count)
    }

    /// The `k` chunks most similar to `query`, best first.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<Chunk>> {
        let results = self.search_with_scores(query, k).await?;
        Ok(results.into_iter().map(|r| r.chunk).collect())
    }

    /// The `k` chunks most similar to `query` with their cosine similarity,
    /// best first. Results below the configured threshold are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::NotInitialized`] before build/load, and
    /// [`RagError::EmbeddingError`] if the query cannot be embedded.
    pub async fn search_with_scores(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        if !self.is_initialized().await {
            return Err(RagError::NotInitialized);
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedding_provider.embed(query).await.map_err(|e| {
            error!(error = %e, "embedding failed during query");
            e
        })?;

        let results = self.vector_store.search(COLLECTION, &query_embedding, k).await?;
        let threshold = self.config.similarity_threshold;
        let filtered: Vec<SearchResult> =
            results.into_iter().filter(|r| r.score >= threshold).collect();

        info!(
            query = %query.chars().take(50).collect::<String>(),
            result_count = filtered.len(),
            "search completed"
        );
        Ok(filtered)
    }

    async fn replace_contents(&self, chunks: &[Chunk]) -> Result<()> {
        self.vector_store.delete_collection(COLLECTION).await?;
        self.vector_store
            .create_collection(COLLECTION, self.embedding_provider.dimensions())
            .await?;
        self.vector_store.upsert(COLLECTION, chunks).await
    }

    async fn write_snapshot(&self, snapshot: &IndexSnapshot) -> Result<()> {
        let path = self.config.snapshot_path();
        tokio::fs::create_dir_all(&self.config.persist_dir)
            .await
            .map_err(|e| persistence_error(&path, e))?;
        let bytes = serde_json::to_vec(snapshot).map_err(|e| persistence_error(&path, e))?;

        // rename is atomic on the same filesystem
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await.map_err(|e| persistence_error(&tmp, e))?;
        tokio::fs::rename(&tmp, &path).await.map_err(|e| persistence_error(&path, e))
    }
}

fn persistence_error(path: &Path, err: impl std::fmt::Display) -> RagError {
    RagError::PersistenceError { path: path.display().to_string(), message: err.to_string() }
}

//! Data types for pages, documents, chunks, and search results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One page of extracted source text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page {
    /// 1-based page number.
    pub number: usize,
    /// The text content of the page.
    pub text: String,
}

/// Separator placed between pages when they are concatenated.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// The concatenated text of a set of pages.
///
/// Keeps the character offset at which every page starts so chunks can be
/// attributed back to the page they came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for the document.
    pub id: String,
    /// The concatenated text.
    pub text: String,
    /// Key-value metadata copied onto every chunk.
    pub metadata: HashMap<String, String>,
    /// `(char_offset, page_number)` for each page, in ascending offset order.
    pub page_starts: Vec<(usize, usize)>,
}

impl Document {
    /// Build a document from a plain string with no page information.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into(), metadata: HashMap::new(), page_starts: Vec::new() }
    }

    /// Concatenate pages with [`PAGE_SEPARATOR`], recording where each begins.
    pub fn from_pages(id: impl Into<String>, pages: &[Page]) -> Self {
        let mut text = String::new();
        let mut page_starts = Vec::with_capacity(pages.len());
        let mut offset = 0;

        for (i, page) in pages.iter().enumerate() {
            if i > 0 {
                text.push_str(PAGE_SEPARATOR);
                offset += PAGE_SEPARATOR.chars().count();
            }
            page_starts.push((offset, page.number));
            text.push_str(&page.text);
            offset += page.text.chars().count();
        }

        Self { id: id.into(), text, metadata: HashMap::new(), page_starts }
    }

    /// The page containing the character at `offset`.
    pub fn page_at(&self, offset: usize) -> Option<usize> {
        let idx = self.page_starts.partition_point(|(start, _)| *start <= offset);
        idx.checked_sub(1).map(|i| self.page_starts[i].1)
    }
}

/// A segment of a [`Document`] with its vector embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier for the chunk.
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// Character offset of the chunk within the parent document.
    pub offset: usize,
    /// The vector embedding for this chunk's text.
    pub embedding: Vec<f32>,
    /// Key-value metadata inherited from the parent document plus chunk-specific fields.
    pub metadata: HashMap<String, String>,
    /// The ID of the parent [`Document`].
    pub document_id: String,
}

impl Chunk {
    /// The page this chunk starts on, if known.
    pub fn page(&self) -> Option<usize> {
        self.metadata.get("page").and_then(|p| p.parse().ok())
    }
}

/// A retrieved [`Chunk`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// Cosine similarity with the query (higher is more relevant).
    pub score: f32,
}

//! Document chunking.
//!
//! This module provides the [`Chunker`] trait and [`FixedSizeChunker`], which
//! cuts text into windows of at most `chunk_size` characters where every
//! window repeats the last `chunk_overlap` characters of its predecessor.
//!
//! Sizes are counted in `char`s, not bytes, so accented text never splits
//! inside a code point.

use crate::document::{Chunk, Document};

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text and metadata but no embeddings.
/// Embeddings are attached later by the index.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has empty text.
    /// Each returned chunk has an empty embedding vector.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Split `text` into `(char_offset, chunk_text)` windows.
///
/// Guarantees, for non-empty `text` and `chunk_overlap < chunk_size`:
/// - every window has at most `chunk_size` characters;
/// - each window starts with the last `chunk_overlap` characters of the previous one;
/// - dropping that prefix from every window but the first and concatenating
///   reproduces `text` exactly.
///
/// An overlap of `chunk_size` or more is clamped to `chunk_size - 1`.
pub fn split_with_overlap(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
) -> Vec<(usize, String)> {
    if text.is_empty() || chunk_size == 0 {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let overlap = chunk_overlap.min(chunk_size - 1);
    let mut windows = Vec::new();
    let mut start = 0;

    loop {
        let end = (start + chunk_size).min(chars.len());
        windows.push((start, chars[start..end].iter().collect()));
        if end == chars.len() {
            break;
        }
        start = end - overlap;
    }

    windows
}

/// Splits text into fixed-size chunks by character count with exact overlap.
///
/// Chunk IDs are generated as `{document_id}_{chunk_index}`. Each chunk inherits
/// the parent document's metadata plus `chunk_index` and, when the document
/// carries page offsets, the `page` the chunk starts on.
///
/// # Example
///
/// ```rust,ignore
/// use isla_rag::FixedSizeChunker;
///
/// let chunker = FixedSizeChunker::new(1000, 200);
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` - maximum number of characters per chunk
    /// * `chunk_overlap` - number of characters shared by consecutive chunks
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }
}

impl Chunker for FixedSizeChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        split_with_overlap(&document.text, self.chunk_size, self.chunk_overlap)
            .into_iter()
            .enumerate()
            .map(|(chunk_index, (offset, text))| {
                let mut metadata = document.metadata.clone();
                metadata.insert("chunk_index".to_string(), chunk_index.to_string());
                if let Some(page) = document.page_at(offset) {
                    metadata.insert("page".to_string(), page.to_string());
                }

                Chunk {
                    id: format!("{}_{chunk_index}", document.id),
                    text,
                    offset,
                    embedding: Vec::new(),
                    metadata,
                    document_id: document.id.clone(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Page;

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(split_with_overlap("", 10, 2).is_empty());
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let windows = split_with_overlap("Teide", 10, 2);
        assert_eq!(windows, vec![(0, "Teide".to_string())]);
    }

    #[test]
    fn windows_share_the_overlap() {
        let windows = split_with_overlap("abcdefghij", 4, 1);
        let texts: Vec<&str> = windows.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, vec!["abcd", "defg", "ghij"]);
        assert_eq!(windows[1].0, 3);
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        let windows = split_with_overlap("añoñoñoño", 3, 1);
        assert!(windows.iter().all(|(_, t)| t.chars().count() <= 3));
        assert_eq!(windows[0].1, "año");
        assert_eq!(windows[1].1, "oño");
    }

    #[test]
    fn oversized_overlap_still_terminates() {
        let windows = split_with_overlap("abcdef", 3, 5);
        assert_eq!(windows.last().unwrap().1, "def");
    }

    #[test]
    fn chunks_carry_page_and_index() {
        let pages = vec![
            Page { number: 1, text: "Playa de las Teresitas".to_string() },
            Page { number: 2, text: "Parque Nacional del Teide".to_string() },
        ];
        let document = Document::from_pages("guide", &pages);
        let chunks = FixedSizeChunker::new(20, 5).chunk(&document);

        assert_eq!(chunks[0].id, "guide_0");
        assert_eq!(chunks[0].page(), Some(1));
        assert_eq!(chunks.last().unwrap().page(), Some(2));
        assert_eq!(chunks[1].metadata.get("chunk_index").map(String::as_str), Some("1"));
        assert!(chunks.iter().all(|c| c.embedding.is_empty()));
    }
}

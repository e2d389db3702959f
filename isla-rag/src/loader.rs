//! Page-level text extraction from the reference document.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::document::{PAGE_SEPARATOR, Page};
use crate::error::{RagError, Result};

/// Form feed, which PDF text extraction emits between pages.
const PAGE_BREAK: char = '\x0C';

/// Summary figures about a loaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub num_pages: usize,
    pub total_chars: usize,
    pub total_words: usize,
    pub avg_chars_per_page: usize,
}

/// Loads the guide and keeps its pages for the lifetime of the process.
///
/// PDFs go through `pdf-extract`; any other file is read as UTF-8 text. In
/// both cases form feeds separate pages and blank pages are dropped.
#[derive(Debug)]
pub struct DocumentLoader {
    path: PathBuf,
    pages: Vec<Page>,
}

impl DocumentLoader {
    /// Create a loader for `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::LoaderError`] if the file does not exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(RagError::LoaderError {
                path: path.display().to_string(),
                message: "file not found".to_string(),
            });
        }

        info!(path = %path.display(), "document loader initialized");
        Ok(Self { path, pages: Vec::new() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Extract the pages of the document, replacing any previously loaded pages.
    pub fn load(&mut self) -> Result<&[Page]> {
        let raw = if is_pdf(&self.path) {
            pdf_extract::extract_text(&self.path).map_err(|e| self.error(e.to_string()))?
        } else {
            std::fs::read_to_string(&self.path).map_err(|e| self.error(e.to_string()))?
        };

        self.pages = split_pages(&raw);
        info!(path = %self.path.display(), pages = self.pages.len(), "document loaded");
        Ok(&self.pages)
    }

    /// Loaded pages, loading the document first if needed.
    pub fn pages(&mut self) -> Result<&[Page]> {
        if self.pages.is_empty() {
            self.load()?;
        }
        Ok(&self.pages)
    }

    /// Character, word and page counts for the document.
    pub fn stats(&mut self) -> Result<DocumentStats> {
        let pages = self.pages()?;
        let total_chars: usize = pages.iter().map(|p| p.text.chars().count()).sum();
        let total_words: usize = pages.iter().map(|p| p.text.split_whitespace().count()).sum();
        let num_pages = pages.len();

        Ok(DocumentStats {
            num_pages,
            total_chars,
            total_words,
            avg_chars_per_page: if num_pages == 0 { 0 } else { total_chars / num_pages },
        })
    }

    /// Text of the page at 0-based `index`.
    pub fn page(&mut self, index: usize) -> Result<&str> {
        let pages = self.pages()?;
        let len = pages.len();
        pages.get(index).map(|p| p.text.as_str()).ok_or(RagError::PageOutOfRange { index, len })
    }

    /// All page texts joined the same way the index concatenates them.
    pub fn all_text(&mut self) -> Result<String> {
        let pages = self.pages()?;
        Ok(pages.iter().map(|p| p.text.as_str()).collect::<Vec<_>>().join(PAGE_SEPARATOR))
    }

    fn error(&self, message: String) -> RagError {
        RagError::LoaderError { path: self.path.display().to_string(), message }
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Split extracted text on form feeds into numbered pages.
///
/// Page numbers follow the position in the source, so a dropped blank page
/// leaves a gap rather than renumbering the rest.
fn split_pages(raw: &str) -> Vec<Page> {
    raw.split(PAGE_BREAK)
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(i, text)| Page { number: i + 1, text: text.trim().to_string() })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_pages_skips_blank_pages_but_keeps_numbers() {
        let pages = split_pages("Uno\x0C   \x0CTres\n");
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0], Page { number: 1, text: "Uno".into() });
        assert_eq!(pages[1], Page { number: 3, text: "Tres".into() });
    }

    #[test]
    fn text_without_form_feeds_is_one_page() {
        let pages = split_pages("  La Laguna  ");
        assert_eq!(pages, vec![Page { number: 1, text: "La Laguna".into() }]);
    }

    #[test]
    fn missing_file_is_an_initialization_error() {
        let err = DocumentLoader::new("/definitely/not/here.pdf").unwrap_err();
        assert!(matches!(err, RagError::LoaderError { .. }));
    }

    #[test]
    fn pdf_extension_is_case_insensitive() {
        assert!(is_pdf(Path::new("data/TENERIFE.PDF")));
        assert!(!is_pdf(Path::new("data/tenerife.txt")));
    }
}

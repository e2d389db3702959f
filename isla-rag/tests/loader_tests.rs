//! Page access and statistics over a plain-text guide on disk.

use std::io::Write;

use isla_rag::{DocumentLoader, DocumentStats, RagError};

fn guide_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    write!(file, "El Teide\x0C   \n\x0CPlayas de Benijo y Almáciga\x0C La Laguna \n").unwrap();
    file
}

#[test]
fn stats_load_the_document_on_demand() {
    let file = guide_file();
    let mut loader = DocumentLoader::new(file.path()).unwrap();

    let stats = loader.stats().unwrap();
    assert_eq!(
        stats,
        DocumentStats { num_pages: 3, total_chars: 44, total_words: 9, avg_chars_per_page: 14 }
    );
}

#[test]
fn blank_pages_are_dropped_but_keep_their_number() {
    let file = guide_file();
    let mut loader = DocumentLoader::new(file.path()).unwrap();

    let numbers: Vec<usize> = loader.load().unwrap().iter().map(|p| p.number).collect();
    assert_eq!(numbers, [1, 3, 4]);
}

#[test]
fn page_access_by_index() {
    let file = guide_file();
    let mut loader = DocumentLoader::new(file.path()).unwrap();

    assert_eq!(loader.page(0).unwrap(), "El Teide");
    assert_eq!(loader.page(2).unwrap(), "La Laguna");
    assert!(matches!(loader.page(3), Err(RagError::PageOutOfRange { index: 3, len: 3 })));
}

#[test]
fn all_text_joins_pages() {
    let file = guide_file();
    let mut loader = DocumentLoader::new(file.path()).unwrap();

    assert_eq!(
        loader.all_text().unwrap(),
        "El Teide\n\nPlayas de Benijo y Almáciga\n\nLa Laguna"
    );
}

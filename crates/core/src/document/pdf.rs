//! # PDF Documents
//!
//! Text extraction plus a small keyword index so the reader agent can query
//! a paper instead of receiving all of it at once.

use crate::error::RevisorError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Words per search chunk
const CHUNK_WORDS: usize = 180;
/// Words shared between neighbouring chunks
const CHUNK_OVERLAP: usize = 40;
/// Query terms shorter than this are ignored
const MIN_TERM_LEN: usize = 3;

/// A passage returned by [`PdfDocument::search`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    /// 1-based page number
    pub page: usize,
    pub score: usize,
    pub text: String,
}

#[derive(Debug, Clone)]
struct Chunk {
    page: usize,
    text: String,
    lowered: String,
}

/// Extracted text of one PDF
#[derive(Debug, Clone)]
pub struct PdfDocument {
    pub path: PathBuf,
    pub file_name: String,
    pub pages: Vec<String>,
    chunks: Vec<Chunk>,
}

impl PdfDocument {
    /// Extract the text of a PDF file. Blocking; wrap in `spawn_blocking` from async code.
    pub fn open(path: &Path) -> crate::error::Result<Self> {
        let text = pdf_extract::extract_text(path).map_err(|e| RevisorError::PdfExtraction {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let document = Self::from_text(path, &text);
        if document.pages.is_empty() {
            return Err(RevisorError::EmptyDocument(path.to_path_buf()));
        }
        Ok(document)
    }

    /// Build a document from already extracted text. Pages are split on form feeds.
    pub fn from_text(path: &Path, text: &str) -> Self {
        let pages: Vec<String> = text
            .split('\u{c}')
            .map(|page| page.trim().to_string())
            .filter(|page| !page.is_empty())
            .collect();
        let chunks = chunk_pages(&pages);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            path: path.to_path_buf(),
            file_name,
            pages,
            chunks,
        }
    }

    /// Total characters across all pages
    pub fn char_len(&self) -> usize {
        self.pages.iter().map(|p| p.chars().count()).sum()
    }

    /// Leading text of the document, cut on a char boundary.
    pub fn excerpt(&self, max_chars: usize) -> String {
        let full = self.pages.join("\n\n");
        match full.char_indices().nth(max_chars) {
            Some((cut, _)) => format!("{}\n... [TRUNCATED]", &full[..cut]),
            None => full,
        }
    }

    /// Rank chunks by how often the query terms occur in them.
    pub fn search(&self, query: &str, limit: usize) -> Vec<Passage> {
        let terms: Vec<String> = query
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| t.chars().count() >= MIN_TERM_LEN)
            .map(str::to_lowercase)
            .collect();
        if terms.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, usize)> = self
            .chunks
            .iter()
            .enumerate()
            .map(|(idx, chunk)| {
                let score = terms
                    .iter()
                    .map(|term| chunk.lowered.matches(term.as_str()).count())
                    .sum();
                (idx, score)
            })
            .filter(|(_, score)| *score > 0)
            .collect();

        // Highest score first, earlier chunks win ties
        scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        scored
            .into_iter()
            .take(limit)
            .map(|(idx, score)| Passage {
                page: self.chunks[idx].page,
                score,
                text: self.chunks[idx].text.clone(),
            })
            .collect()
    }
}

fn chunk_pages(pages: &[String]) -> Vec<Chunk> {
    let step = CHUNK_WORDS - CHUNK_OVERLAP;
    let mut chunks = Vec::new();

    for (idx, page) in pages.iter().enumerate() {
        let words: Vec<&str> = page.split_whitespace().collect();
        let mut start = 0;
        loop {
            let end = (start + CHUNK_WORDS).min(words.len());
            let text = words[start..end].join(" ");
            chunks.push(Chunk {
                page: idx + 1,
                lowered: text.to_lowercase(),
                text,
            });
            if end == words.len() {
                break;
            }
            start += step;
        }
    }

    chunks
}

/// Process-wide cache of opened documents, keyed by path.
///
/// The crew registers each paper before the reader runs so the `search_pdf`
/// tool can answer without extracting the file again.
pub struct DocumentStore {
    documents: Mutex<HashMap<PathBuf, Arc<PdfDocument>>>,
}

impl DocumentStore {
    pub fn global() -> &'static DocumentStore {
        static STORE: Lazy<DocumentStore> = Lazy::new(|| DocumentStore {
            documents: Mutex::new(HashMap::new()),
        });
        &STORE
    }

    pub fn insert(&self, document: PdfDocument) -> Arc<PdfDocument> {
        let document = Arc::new(document);
        if let Ok(mut documents) = self.documents.lock() {
            documents.insert(document.path.clone(), Arc::clone(&document));
        }
        document
    }

    pub fn get(&self, path: &Path) -> Option<Arc<PdfDocument>> {
        self.documents.lock().ok()?.get(path).cloned()
    }

    pub fn remove(&self, path: &Path) {
        if let Ok(mut documents) = self.documents.lock() {
            documents.remove(path);
        }
    }

    /// Return the cached document or extract it on a blocking thread.
    pub async fn open(&self, path: &Path) -> anyhow::Result<Arc<PdfDocument>> {
        if let Some(document) = self.get(path) {
            return Ok(document);
        }
        Ok(self.insert(extract(path).await?))
    }

    /// Like [`open`](Self::open), but a freshly extracted document is not
    /// added to the cache.
    pub async fn open_uncached(&self, path: &Path) -> anyhow::Result<Arc<PdfDocument>> {
        if let Some(document) = self.get(path) {
            return Ok(document);
        }
        Ok(Arc::new(extract(path).await?))
    }
}

async fn extract(path: &Path) -> anyhow::Result<PdfDocument> {
    let owned = path.to_path_buf();
    Ok(tokio::task::spawn_blocking(move || PdfDocument::open(&owned)).await??)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper() -> PdfDocument {
        let text = "Abstract. We study graph transformers for traffic forecasting.\u{c}\
                    Method. The encoder attends over sensors. Sensors are graph nodes.\u{c}\
                    \u{c}Results. MAE improves on METR-LA.";
        PdfDocument::from_text(Path::new("/papers/Smith - Traffic.pdf"), text)
    }

    #[test]
    fn test_pages_split_on_form_feed() {
        let doc = paper();
        assert_eq!(doc.file_name, "Smith - Traffic.pdf");
        assert_eq!(doc.pages.len(), 3);
        assert!(doc.pages[2].starts_with("Results."));
    }

    #[test]
    fn test_search_ranks_by_term_frequency() {
        let doc = paper();
        let hits = doc.search("sensors graph", 5);
        assert_eq!(hits[0].page, 2);
        assert!(hits[0].score >= 3);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_search_ignores_short_terms() {
        let doc = paper();
        assert!(doc.search("on of", 5).is_empty());
    }

    #[test]
    fn test_long_pages_are_chunked_with_overlap() {
        let text = (0..400).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ");
        let doc = PdfDocument::from_text(Path::new("long.pdf"), &text);
        assert_eq!(doc.chunks.len(), 3);
        assert!(doc.chunks[1].text.starts_with("w140 "));
        assert!(doc.chunks[2].text.ends_with("w399"));
    }

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        let doc = PdfDocument::from_text(Path::new("a.pdf"), "ééééé");
        assert_eq!(doc.excerpt(3), "ééé\n... [TRUNCATED]");
        assert_eq!(doc.excerpt(10), "ééééé");
        assert_eq!(doc.char_len(), 5);
    }

    #[tokio::test]
    async fn test_store_returns_registered_document() {
        let store = DocumentStore::global();
        let doc = paper();
        let path = doc.path.clone();
        store.insert(doc);

        let cached = store.open(&path).await.unwrap();
        assert_eq!(cached.pages.len(), 3);

        store.remove(&path);
        assert!(store.get(&path).is_none());
    }

    #[test]
    fn test_store_open_missing_file_fails() {
        let path = Path::new("/nonexistent/revisor/missing.pdf");
        let result = tokio_test::block_on(DocumentStore::global().open(path));
        assert!(result.is_err());
        assert!(DocumentStore::global().get(path).is_none());
    }

    #[tokio::test]
    async fn test_uncached_open_leaves_store_unchanged() {
        let store = DocumentStore::global();
        let doc = PdfDocument::from_text(Path::new("/papers/uncached.pdf"), "alpha\u{c}beta");
        let path = doc.path.clone();
        store.insert(doc);

        let cached = store.open_uncached(&path).await.unwrap();
        assert_eq!(cached.pages.len(), 2);
        assert!(store.get(&path).is_some());
        store.remove(&path);

        let missing = Path::new("/nonexistent/revisor/uncached.pdf");
        assert!(store.open_uncached(missing).await.is_err());
        assert!(store.get(missing).is_none());
    }
}

//! PDF text extraction with page tracking and a hang guard

use std::path::Path;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use crate::config::CleaningConfig;
use crate::error::{Error, Result};
use crate::types::ExtractedDocument;

use super::cleaner::clean_with;

/// Separator appended after each page that yielded text
const PAGE_SEPARATOR: &str = "\n\n";

/// Source of raw per-page text for a document
pub trait PageExtractor: Send + Sync {
    /// Raw text of every page in page order. Pages without text are empty.
    fn extract_pages(&self, data: &[u8]) -> Result<Vec<String>>;
}

/// lopdf page-by-page extraction with a pdf-extract fallback
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfPageExtractor;

impl PdfPageExtractor {
    /// Whole-document extraction when lopdf cannot decode a page.
    /// pdf-extract separates pages with form feeds.
    fn extract_with_pdf_extract(data: &[u8]) -> Result<Vec<String>> {
        let text = pdf_extract::extract_text_from_mem(data)
            .map_err(|e| Error::extraction(e.to_string()))?;
        Ok(text.split('\u{0C}').map(str::to_string).collect())
    }
}

impl PageExtractor for PdfPageExtractor {
    fn extract_pages(&self, data: &[u8]) -> Result<Vec<String>> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::extraction(format!("Failed to load PDF: {}", e)))?;

        let pages = doc.get_pages();
        let mut texts = Vec::with_capacity(pages.len());

        for page_number in pages.keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(text) => texts.push(text),
                Err(e) => {
                    tracing::warn!(
                        "lopdf could not read page {}: {}, trying pdf-extract",
                        page_number,
                        e
                    );
                    return Self::extract_with_pdf_extract(data);
                }
            }
        }

        Ok(texts)
    }
}

/// Run an extractor on a helper thread, giving up after `timeout`.
///
/// A timed-out thread keeps running detached; its result is dropped.
pub fn extract_pages_with_timeout(
    extractor: Arc<dyn PageExtractor>,
    data: Vec<u8>,
    timeout: Duration,
) -> Result<Vec<String>> {
    let (tx, rx) = mpsc::channel();

    thread::Builder::new()
        .name("pdf-extract".to_string())
        .spawn(move || {
            let _ = tx.send(extractor.extract_pages(&data));
        })
        .map_err(|e| Error::internal(format!("Failed to spawn extraction thread: {}", e)))?;

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => {
            tracing::error!("PDF extraction timeout after {:?}", timeout);
            Err(Error::extraction(format!(
                "extraction timed out after {}s",
                timeout.as_secs_f64()
            )))
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            tracing::error!("PDF extraction thread crashed");
            Err(Error::extraction("extraction thread crashed"))
        }
    }
}

/// Concatenate non-empty pages, each followed by a blank line.
/// Returns the raw text and how many pages contributed.
pub fn join_pages(pages: &[String]) -> (String, u32) {
    let mut raw = String::new();
    let mut with_text = 0u32;
    for page in pages.iter().filter(|p| !p.is_empty()) {
        raw.push_str(page);
        raw.push_str(PAGE_SEPARATOR);
        with_text += 1;
    }
    (raw, with_text)
}

/// Reads a file, extracts its pages and cleans the result
#[derive(Clone)]
pub struct DocumentExtractor {
    pages: Arc<dyn PageExtractor>,
    cleaning: CleaningConfig,
    timeout: Duration,
}

impl DocumentExtractor {
    pub fn new(pages: Arc<dyn PageExtractor>, cleaning: CleaningConfig, timeout: Duration) -> Self {
        Self {
            pages,
            cleaning,
            timeout,
        }
    }

    /// Extract and clean one file. Every failure is `Error::Extraction`.
    pub fn extract(&self, path: &Path) -> Result<ExtractedDocument> {
        let data = std::fs::read(path).map_err(|e| Error::extraction(e.to_string()))?;

        let pages = extract_pages_with_timeout(Arc::clone(&self.pages), data, self.timeout)
            .map_err(|e| match e {
                Error::Extraction(msg) => Error::Extraction(msg),
                other => Error::Extraction(other.to_string()),
            })?;

        let (raw, pages_with_text) = join_pages(&pages);
        let text = clean_with(&raw, &self.cleaning);
        let char_count = text.chars().count();

        tracing::debug!(
            "Extracted {} chars from {} ({}/{} pages with text)",
            char_count,
            path.display(),
            pages_with_text,
            pages.len()
        );

        Ok(ExtractedDocument {
            text,
            char_count,
            pages_total: pages.len() as u32,
            pages_with_text,
        })
    }
}

impl std::fmt::Debug for DocumentExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentExtractor")
            .field("cleaning", &self.cleaning)
            .field("timeout", &self.timeout)
            .finish()
    }
}

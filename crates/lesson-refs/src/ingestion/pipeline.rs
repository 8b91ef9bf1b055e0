//! Reference ingestion orchestration: validate, extract, budget

use std::path::Path;
use std::sync::Arc;

use crate::config::{CleaningConfig, IngestionConfig, RefsConfig};
use crate::error::{Error, Result};
use crate::types::{ExtractedDocument, FileOutcome, ReferenceContext, ReferenceEntry, ValidationResult};

use super::budget::{Allocation, CharBudget};
use super::cleaner::clean_with;
use super::extractor::{DocumentExtractor, PageExtractor, PdfPageExtractor};
use super::validator;

/// Turns uploaded file paths into bounded reference text
#[derive(Debug, Clone)]
pub struct ReferencePipeline {
    limits: IngestionConfig,
    cleaning: CleaningConfig,
    extractor: DocumentExtractor,
}

impl ReferencePipeline {
    /// Pipeline backed by the PDF extractor
    pub fn new(config: &RefsConfig) -> Self {
        Self::with_extractor(config, Arc::new(PdfPageExtractor))
    }

    /// Pipeline with a custom page source
    pub fn with_extractor(config: &RefsConfig, pages: Arc<dyn PageExtractor>) -> Self {
        Self {
            limits: config.ingestion.clone(),
            cleaning: config.cleaning.clone(),
            extractor: DocumentExtractor::new(
                pages,
                config.cleaning.clone(),
                config.ingestion.extract_timeout(),
            ),
        }
    }

    /// Extension and size check
    pub fn validate_file(&self, path: &Path) -> ValidationResult {
        validator::validate_file(path, &self.limits)
    }

    /// Clean raw text with this pipeline's settings
    pub fn clean_text(&self, raw: &str) -> String {
        clean_with(raw, &self.cleaning)
    }

    /// Extract cleaned text from a validated PDF
    pub fn extract_text(&self, path: &Path) -> Result<ExtractedDocument> {
        self.extractor.extract(path)
    }

    /// Process the leading `max_files` paths in order under the shared
    /// character budget. Never fails; per-file problems are recorded as
    /// outcomes.
    pub fn process_files<P: AsRef<Path>>(&self, paths: &[P]) -> ReferenceContext {
        let cap = paths.len().min(self.limits.max_files);
        let (selected, rest) = paths.split_at(cap);

        let ignored: Vec<String> = rest.iter().map(|p| path_key(p.as_ref())).collect();
        if !ignored.is_empty() {
            tracing::warn!(
                "Ignoring {} reference file(s) beyond the limit of {}: {:?}",
                ignored.len(),
                self.limits.max_files,
                ignored
            );
        }

        let (budget, entries) = selected.iter().fold(
            (CharBudget::new(self.limits.max_chars), Vec::with_capacity(cap)),
            |(mut budget, mut entries), path| {
                let path = path.as_ref();
                let outcome = match self.ingest_one(path) {
                    Ok(doc) => allocate(&mut budget, doc),
                    Err(Error::Validation(reason)) => FileOutcome::ValidationFailed { reason },
                    Err(e) => FileOutcome::ProcessingFailed {
                        reason: e.to_string(),
                    },
                };
                log_outcome(path, &outcome, &budget);
                entries.push(ReferenceEntry {
                    path: path_key(path),
                    outcome,
                });
                (budget, entries)
            },
        );

        tracing::info!(
            "Processed {} reference file(s): {}/{} chars used",
            entries.len(),
            budget.used(),
            budget.limit()
        );

        ReferenceContext {
            entries,
            total_chars: budget.used(),
            ignored,
        }
    }

    fn ingest_one(&self, path: &Path) -> Result<ExtractedDocument> {
        self.validate_file(path).into_result()?;
        self.extract_text(path)
    }
}

fn allocate(budget: &mut CharBudget, doc: ExtractedDocument) -> FileOutcome {
    match budget.allocate(&doc.text, doc.char_count) {
        Allocation::Full { chars } => FileOutcome::Stored {
            text: doc.text,
            chars,
        },
        Allocation::Truncated { text, chars } => FileOutcome::Truncated {
            text,
            chars,
            original_chars: doc.char_count,
        },
        Allocation::Exhausted => FileOutcome::SkippedBudget,
    }
}

fn log_outcome(path: &Path, outcome: &FileOutcome, budget: &CharBudget) {
    match outcome {
        FileOutcome::Stored { chars, .. } => {
            tracing::info!("Stored {} ({} chars)", path.display(), chars)
        }
        FileOutcome::Truncated {
            chars,
            original_chars,
            ..
        } => tracing::warn!(
            "Truncated {} from {} to {} chars (limit {})",
            path.display(),
            original_chars,
            chars,
            budget.limit()
        ),
        FileOutcome::ValidationFailed { reason } => {
            tracing::warn!("Rejected {}: {}", path.display(), reason)
        }
        FileOutcome::ProcessingFailed { reason } => {
            tracing::error!("Failed to process {}: {}", path.display(), reason)
        }
        FileOutcome::SkippedBudget => tracing::warn!(
            "Skipped {}: character budget of {} exhausted",
            path.display(),
            budget.limit()
        ),
    }
}

fn path_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CleanMode;
    use crate::ingestion::fixtures::pdf_with_pages;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Treats file bytes as UTF-8 text with form feeds between pages
    struct PlainTextPages;

    impl PageExtractor for PlainTextPages {
        fn extract_pages(&self, data: &[u8]) -> Result<Vec<String>> {
            let text = std::str::from_utf8(data).map_err(|e| Error::extraction(e.to_string()))?;
            Ok(text.split('\u{0C}').map(str::to_string).collect())
        }
    }

    /// Panics on any document containing the word "boom"
    struct FragileParser;

    impl PageExtractor for FragileParser {
        fn extract_pages(&self, data: &[u8]) -> Result<Vec<String>> {
            if data.windows(4).any(|w| w == b"boom") {
                panic!("malformed cross-reference stream");
            }
            PlainTextPages.extract_pages(data)
        }
    }

    fn pipeline() -> ReferencePipeline {
        ReferencePipeline::with_extractor(&RefsConfig::default(), Arc::new(PlainTextPages))
    }

    fn write(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn key(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_second_file_truncated_to_remaining_budget() {
        let dir = tempfile::tempdir().unwrap();
        let first = "a".repeat(3000);
        let second: String = "0123456789".repeat(400);
        let a = write(&dir, "a.pdf", first.as_bytes());
        let b = write(&dir, "b.pdf", second.as_bytes());

        let context = pipeline().process_files(&[&a, &b]);
        let map = context.to_map();

        assert_eq!(map[&key(&a)], first);
        assert_eq!(map[&key(&b)], second[..2000]);
        assert_eq!(context.total_chars, 5000);
        assert!(matches!(
            context.entries[1].outcome,
            FileOutcome::Truncated { chars: 2000, original_chars: 4000, .. }
        ));
    }

    #[test]
    fn test_exhausted_budget_omits_second_file() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(&dir, "a.pdf", "x".repeat(5000).as_bytes());
        let b = write(&dir, "b.pdf", b"more text");

        let context = pipeline().process_files(&[&a, &b]);
        let map = context.to_map();

        assert_eq!(map.len(), 1);
        assert!(!map.contains_key(&key(&b)));
        assert_eq!(context.total_chars, 5000);
        assert_eq!(context.skipped().count(), 1);
    }

    #[test]
    fn test_files_beyond_cap_never_referenced() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(&dir, "a.pdf", b"one");
        let b = write(&dir, "b.pdf", b"two");
        let c = write(&dir, "c.pdf", "z".repeat(5 * 1024).as_bytes());
        let d = dir.path().join("never-created.txt");

        let context = pipeline().process_files(&[&a, &b, &c, &d]);
        let map = context.to_map();

        assert_eq!(map.len(), 2);
        assert!(!map.contains_key(&key(&c)));
        assert!(!map.contains_key(&key(&d)));
        assert_eq!(context.ignored, vec![key(&c), key(&d)]);
        assert_eq!(context.prompt_context(), "one\n\ntwo");
    }

    #[test]
    fn test_non_pdf_recorded_as_validation_failure() {
        let dir = tempfile::tempdir().unwrap();
        let notes = write(&dir, "notes.txt", b"plain notes");

        let map = pipeline().process_files(&[&notes]).to_map();
        assert_eq!(
            map[&key(&notes)],
            "File validation failed: Only PDF files are supported"
        );
    }

    #[test]
    fn test_oversized_file_rejected_without_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let big = dir.path().join("big.pdf");
        let file = std::fs::File::create(&big).unwrap();
        file.set_len(10 * 1024 * 1024 + 1).unwrap();
        let small = write(&dir, "small.pdf", b"kept");

        let context = pipeline().process_files(&[&big, &small]);
        let map = context.to_map();

        assert_eq!(
            map[&key(&big)],
            "File validation failed: File size exceeds limit (10MB)"
        );
        assert_eq!(map[&key(&small)], "kept");
        assert_eq!(context.total_chars, 4);
    }

    #[test]
    fn test_extraction_failure_does_not_stop_later_files() {
        let dir = tempfile::tempdir().unwrap();
        let broken = write(&dir, "broken.pdf", &[0xff, 0xfe, 0x00, 0x80]);
        let good = write(&dir, "good.pdf", b"lesson text");

        let context = pipeline().process_files(&[&broken, &good]);
        let map = context.to_map();

        assert!(map[&key(&broken)].starts_with("Processing failed: PDF processing error: "));
        assert_eq!(map[&key(&good)], "lesson text");
        assert_eq!(context.failures().count(), 1);
        assert_eq!(context.total_chars, 11);
    }

    #[test]
    fn test_parser_panic_is_a_per_file_failure() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write(&dir, "bad.pdf", b"boom");
        let good = write(&dir, "good.pdf", b"still read");
        let pipeline =
            ReferencePipeline::with_extractor(&RefsConfig::default(), Arc::new(FragileParser));

        let context = pipeline.process_files(&[&bad, &good]);
        let map = context.to_map();

        assert_eq!(
            map[&key(&bad)],
            "Processing failed: PDF processing error: extraction thread crashed"
        );
        assert_eq!(map[&key(&good)], "still read");
        assert_eq!(context.total_chars, 10);
    }

    #[test]
    fn test_pages_joined_and_flattened() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "pages.pdf", "Page one\n\n\u{0C}\u{0C}  Page   two \n".as_bytes());

        let map = pipeline().process_files(&[&path]).to_map();
        assert_eq!(map[&key(&path)], "Page one Page two");
    }

    #[test]
    fn test_total_never_exceeds_limit() {
        let dir = tempfile::tempdir().unwrap();
        let config = RefsConfig {
            ingestion: IngestionConfig {
                max_files: 5,
                max_chars: 1000,
                ..Default::default()
            },
            ..Default::default()
        };
        let pipeline = ReferencePipeline::with_extractor(&config, Arc::new(PlainTextPages));

        let sizes = [300, 0, 450, 600, 10];
        let paths: Vec<PathBuf> = sizes
            .iter()
            .enumerate()
            .map(|(i, n)| write(&dir, &format!("f{}.pdf", i), "w".repeat(*n).as_bytes()))
            .collect();

        let context = pipeline.process_files(&paths);
        let stored: usize = context.usable_texts().map(|(_, t)| t.chars().count()).sum();

        assert_eq!(stored, 1000);
        assert_eq!(context.total_chars, 1000);
        assert_eq!(context.entries[1].outcome, FileOutcome::Stored { text: String::new(), chars: 0 });
        assert!(matches!(context.entries[3].outcome, FileOutcome::Truncated { chars: 250, .. }));
        assert_eq!(context.entries[4].outcome, FileOutcome::SkippedBudget);
    }

    #[test]
    fn test_preserve_lines_mode_keeps_breaks() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "outline.pdf", b"Unit 1\n\n  Fractions  \n");
        let config = RefsConfig {
            cleaning: CleaningConfig {
                mode: CleanMode::PreserveLines,
                normalize_typography: false,
            },
            ..Default::default()
        };
        let pipeline = ReferencePipeline::with_extractor(&config, Arc::new(PlainTextPages));

        let map = pipeline.process_files(&[&path]).to_map();
        assert_eq!(map[&key(&path)], "Unit 1\nFractions");
    }

    #[test]
    fn test_zero_page_pdf_recorded_as_empty_success() {
        let dir = tempfile::tempdir().unwrap();
        let blank = write(&dir, "scan.pdf", &pdf_with_pages(&[]));
        let pipeline = ReferencePipeline::new(&RefsConfig::default());

        let context = pipeline.process_files(&[&blank]);

        assert_eq!(context.to_map()[&key(&blank)], "");
        assert_eq!(context.total_chars, 0);
        assert_eq!(
            context.entries[0].outcome,
            FileOutcome::Stored { text: String::new(), chars: 0 }
        );
    }

    #[test]
    fn test_clean_text_uses_configured_mode() {
        assert_eq!(pipeline().clean_text("  a \n\n b  "), "a b");
    }
}

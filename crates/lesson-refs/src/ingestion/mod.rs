//! Reference ingestion pipeline: validation, extraction, cleaning and budgeting

mod budget;
mod cleaner;
mod extractor;
mod pipeline;
mod staging;
mod validator;

pub use budget::{truncate_chars, Allocation, CharBudget};
pub use cleaner::{clean_text, clean_text_preserving_lines, clean_with, normalize_typography};
pub use extractor::{
    extract_pages_with_timeout, join_pages, DocumentExtractor, PageExtractor, PdfPageExtractor,
};
pub use pipeline::ReferencePipeline;
pub use staging::{sanitize_filename, UploadStaging};
pub use validator::{validate_file, validate_reference};

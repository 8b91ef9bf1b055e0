//! Pre-extraction checks on file name and size

use std::path::Path;

use crate::config::IngestionConfig;
use crate::types::{ReferenceFile, ValidationResult};

const MB: f64 = 1024.0 * 1024.0;

/// True when the name ends in `.pdf`, any case
pub fn has_pdf_extension(path: &Path) -> bool {
    path.to_string_lossy().to_lowercase().ends_with(".pdf")
}

/// Check a described file. Pure function of name and size.
pub fn validate_reference(file: &ReferenceFile, config: &IngestionConfig) -> ValidationResult {
    if !has_pdf_extension(&file.path) {
        return ValidationResult::rejected("Only PDF files are supported");
    }

    let size_mb = file.size_bytes as f64 / MB;
    if size_mb > config.max_file_size_mb as f64 {
        return ValidationResult::rejected(format!(
            "File size exceeds limit ({}MB)",
            config.max_file_size_mb
        ));
    }

    ValidationResult::passed()
}

/// Check a file on disk
pub fn validate_file(path: &Path, config: &IngestionConfig) -> ValidationResult {
    // Extension first so non-PDFs are rejected even if missing
    if !has_pdf_extension(path) {
        return ValidationResult::rejected("Only PDF files are supported");
    }

    match ReferenceFile::from_path(path) {
        Ok(file) => validate_reference(&file, config),
        Err(e) => ValidationResult::rejected(format!("Unable to read file: {}", e)),
    }
}

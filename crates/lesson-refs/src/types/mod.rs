//! Core types for reference ingestion

pub mod reference;
pub mod response;

pub use reference::{
    ExtractedDocument, FileOutcome, ReferenceContext, ReferenceEntry, ReferenceFile,
    ValidationResult, PROCESSING_FAILED_PREFIX, VALIDATION_FAILED_PREFIX,
};
pub use response::ReferenceResponse;

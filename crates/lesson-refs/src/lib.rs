//! lesson-refs: reference-document ingestion for AI lesson-plan generation
//!
//! Validates uploaded reference PDFs, extracts and normalises their text,
//! and spreads a shared character budget across them so the prompt context
//! handed to the lesson-plan generator stays bounded.

pub mod config;
pub mod error;
pub mod ingestion;
pub mod server;
pub mod types;

pub use config::RefsConfig;
pub use error::{Error, Result};
pub use ingestion::{clean_text, ReferencePipeline};
pub use types::{
    ExtractedDocument, FileOutcome, ReferenceContext, ReferenceEntry, ReferenceFile,
    ValidationResult,
};

//! Reference file, per-file outcome and aggregated context types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Prefix of the legacy string for files rejected before extraction
pub const VALIDATION_FAILED_PREFIX: &str = "File validation failed: ";
/// Prefix of the legacy string for files whose extraction failed
pub const PROCESSING_FAILED_PREFIX: &str = "Processing failed: ";

/// An uploaded document awaiting validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceFile {
    /// Location of the saved upload
    pub path: PathBuf,
    /// File size in bytes
    pub size_bytes: u64,
}

impl ReferenceFile {
    /// Describe a file without touching the filesystem
    pub fn new(path: impl Into<PathBuf>, size_bytes: u64) -> Self {
        Self {
            path: path.into(),
            size_bytes,
        }
    }

    /// Read size from filesystem metadata
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        Ok(Self::new(path, metadata.len()))
    }
}

/// Pass/fail outcome of the pre-extraction check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub ok: bool,
    pub reason: String,
}

impl ValidationResult {
    pub fn passed() -> Self {
        Self {
            ok: true,
            reason: "File validation passed".to_string(),
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: reason.into(),
        }
    }

    /// Turn a rejection into `Error::Validation`
    pub fn into_result(self) -> Result<()> {
        if self.ok {
            Ok(())
        } else {
            Err(crate::error::Error::Validation(self.reason))
        }
    }
}

/// Cleaned text extracted from one reference file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Cleaned text
    pub text: String,
    /// Length of `text` in characters
    pub char_count: usize,
    /// Pages in the document
    pub pages_total: u32,
    /// Pages that produced any text
    pub pages_with_text: u32,
}

/// Terminal state of one selected file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Text fit the remaining budget
    Stored { text: String, chars: usize },
    /// Text was cut to the remaining budget
    Truncated {
        text: String,
        chars: usize,
        original_chars: usize,
    },
    /// Rejected by extension or size
    ValidationFailed { reason: String },
    /// Extraction failed
    ProcessingFailed { reason: String },
    /// Budget already exhausted by earlier files
    SkippedBudget,
}

impl FileOutcome {
    /// Usable reference text, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Stored { text, .. } | Self::Truncated { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Characters counted against the budget
    pub fn chars(&self) -> usize {
        match self {
            Self::Stored { chars, .. } | Self::Truncated { chars, .. } => *chars,
            _ => 0,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::ValidationFailed { .. } | Self::ProcessingFailed { .. })
    }

    /// Flatten to the single string channel of the legacy mapping.
    /// Budget-skipped files have no value.
    pub fn legacy_value(&self) -> Option<String> {
        match self {
            Self::Stored { text, .. } | Self::Truncated { text, .. } => Some(text.clone()),
            Self::ValidationFailed { reason } => {
                Some(format!("{}{}", VALIDATION_FAILED_PREFIX, reason))
            }
            Self::ProcessingFailed { reason } => {
                Some(format!("{}{}", PROCESSING_FAILED_PREFIX, reason))
            }
            Self::SkippedBudget => None,
        }
    }

    /// Short label for logs and reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Stored { .. } => "stored",
            Self::Truncated { .. } => "truncated",
            Self::ValidationFailed { .. } => "rejected",
            Self::ProcessingFailed { .. } => "failed",
            Self::SkippedBudget => "skipped",
        }
    }
}

/// Outcome for one selected path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub path: String,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Aggregated reference text for one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceContext {
    /// Selected paths in input order
    pub entries: Vec<ReferenceEntry>,
    /// Characters consumed by stored and truncated entries
    pub total_chars: usize,
    /// Paths beyond the file cap, never validated
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignored: Vec<String>,
}

impl ReferenceContext {
    /// Path to string mapping: text on success, prefixed message on failure.
    /// Budget-skipped and ignored paths have no key.
    pub fn to_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        for entry in &self.entries {
            if let Some(value) = entry.outcome.legacy_value() {
                map.insert(entry.path.clone(), value);
            }
        }
        map
    }

    /// Usable texts in input order
    pub fn usable_texts(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|e| e.outcome.text().map(|t| (e.path.as_str(), t)))
    }

    pub fn failures(&self) -> impl Iterator<Item = &ReferenceEntry> {
        self.entries.iter().filter(|e| e.outcome.is_failure())
    }

    pub fn skipped(&self) -> impl Iterator<Item = &ReferenceEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, FileOutcome::SkippedBudget))
    }

    /// Reference blob handed to prompt formatting: usable texts separated
    /// by a blank line
    pub fn prompt_context(&self) -> String {
        self.usable_texts()
            .map(|(_, text)| text)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ReferenceContext {
        ReferenceContext {
            entries: vec![
                ReferenceEntry {
                    path: "a.pdf".into(),
                    outcome: FileOutcome::Stored {
                        text: "alpha".into(),
                        chars: 5,
                    },
                },
                ReferenceEntry {
                    path: "notes.txt".into(),
                    outcome: FileOutcome::ValidationFailed {
                        reason: "Only PDF files are supported".into(),
                    },
                },
                ReferenceEntry {
                    path: "b.pdf".into(),
                    outcome: FileOutcome::SkippedBudget,
                },
                ReferenceEntry {
                    path: "c.pdf".into(),
                    outcome: FileOutcome::Truncated {
                        text: "gam".into(),
                        chars: 3,
                        original_chars: 5,
                    },
                },
            ],
            total_chars: 8,
            ignored: vec!["d.pdf".into()],
        }
    }

    #[test]
    fn test_legacy_map_omits_skipped_and_ignored() {
        let map = context().to_map();
        assert_eq!(map.len(), 3);
        assert_eq!(map["a.pdf"], "alpha");
        assert_eq!(
            map["notes.txt"],
            "File validation failed: Only PDF files are supported"
        );
        assert_eq!(map["c.pdf"], "gam");
        assert!(!map.contains_key("b.pdf"));
        assert!(!map.contains_key("d.pdf"));
    }

    #[test]
    fn test_prompt_context_joins_usable_text_only() {
        assert_eq!(context().prompt_context(), "alpha\n\ngam");
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let entry = &context().entries[2];
        let json = serde_json::to_value(entry).unwrap();
        assert_eq!(json["status"], "skipped_budget");
        assert_eq!(json["path"], "b.pdf");
    }

    #[test]
    fn test_processing_failure_legacy_value() {
        let outcome = FileOutcome::ProcessingFailed {
            reason: "PDF processing error: bad xref".into(),
        };
        assert_eq!(
            outcome.legacy_value().unwrap(),
            "Processing failed: PDF processing error: bad xref"
        );
        assert_eq!(outcome.chars(), 0);
    }

    #[test]
    fn test_labels_for_unusable_entries() {
        let labels: Vec<_> = context()
            .entries
            .iter()
            .filter(|e| e.outcome.text().is_none())
            .map(|e| e.outcome.label())
            .collect();
        assert_eq!(labels, vec!["rejected", "skipped"]);
    }

    #[test]
    fn test_rejected_validation_into_result() {
        let err = ValidationResult::rejected("Only PDF files are supported")
            .into_result()
            .unwrap_err();
        assert_eq!(err.to_string(), "Only PDF files are supported");
        assert!(ValidationResult::passed().into_result().is_ok());
    }
}

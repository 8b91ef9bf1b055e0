//! Response types for the upload endpoint

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::reference::{ReferenceContext, ReferenceEntry};

/// Result of processing one batch of uploaded reference files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceResponse {
    /// Original file name to text or error message
    pub results: HashMap<String, String>,
    /// Tagged outcome per selected file, in upload order
    pub entries: Vec<ReferenceEntry>,
    /// Characters consumed across stored files
    pub total_chars: usize,
    /// Uploads beyond the file cap
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignored: Vec<String>,
    /// Joined reference text for prompt formatting
    pub context: String,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    pub processed_at: DateTime<Utc>,
}

impl ReferenceResponse {
    pub fn from_context(context: &ReferenceContext, processing_time_ms: u64) -> Self {
        Self {
            results: context.to_map(),
            entries: context.entries.clone(),
            total_chars: context.total_chars,
            ignored: context.ignored.clone(),
            context: context.prompt_context(),
            processing_time_ms,
            processed_at: Utc::now(),
        }
    }
}

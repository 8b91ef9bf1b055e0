//! Application state for the reference server

use std::sync::Arc;

use crate::config::RefsConfig;
use crate::error::Result;
use crate::ingestion::ReferencePipeline;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RefsConfig,
    /// Ingestion pipeline shared by all requests
    pipeline: ReferencePipeline,
}

impl AppState {
    /// Create state with the PDF-backed pipeline
    pub fn new(config: RefsConfig) -> Result<Self> {
        config.validate()?;
        let pipeline = ReferencePipeline::new(&config);
        Ok(Self::with_pipeline(config, pipeline))
    }

    /// Create state around an existing pipeline
    pub fn with_pipeline(config: RefsConfig, pipeline: ReferencePipeline) -> Self {
        tracing::info!(
            "Reference pipeline ready (max {} files, {} chars, {}MB per file)",
            config.ingestion.max_files,
            config.ingestion.max_chars,
            config.ingestion.max_file_size_mb
        );
        Self {
            inner: Arc::new(AppStateInner { config, pipeline }),
        }
    }

    pub fn config(&self) -> &RefsConfig {
        &self.inner.config
    }

    pub fn pipeline(&self) -> &ReferencePipeline {
        &self.inner.pipeline
    }
}

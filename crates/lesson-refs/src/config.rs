//! Configuration for reference ingestion

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefsConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Validation and budgeting limits
    #[serde(default)]
    pub ingestion: IngestionConfig,
    /// Text cleaning behaviour
    #[serde(default)]
    pub cleaning: CleaningConfig,
    /// Upload staging
    #[serde(default)]
    pub staging: StagingConfig,
}

impl RefsConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config '{}': {}", path.display(), e))
        })?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load from a file when given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Reject limits that would make every request a no-op
    pub fn validate(&self) -> Result<()> {
        if self.ingestion.max_files == 0 {
            return Err(Error::config("ingestion.max_files must be at least 1"));
        }
        if self.ingestion.max_chars == 0 {
            return Err(Error::config("ingestion.max_chars must be at least 1"));
        }
        if self.ingestion.extract_timeout_secs == 0 {
            return Err(Error::config("ingestion.extract_timeout_secs must be at least 1"));
        }
        Ok(())
    }
}

/// Limits applied by the ingestion pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Per-file size ceiling in megabytes (default: 10)
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
    /// Aggregate character ceiling across all files (default: 5000)
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    /// Number of leading paths processed per request (default: 2)
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    /// Upper bound on a single PDF extraction in seconds (default: 60)
    #[serde(default = "default_extract_timeout")]
    pub extract_timeout_secs: u64,
}

fn default_max_file_size_mb() -> u64 { 10 }
fn default_max_chars() -> usize { 5000 }
fn default_max_files() -> usize { 2 }
fn default_extract_timeout() -> u64 { 60 }

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 10,
            max_chars: 5000,
            max_files: 2,
            extract_timeout_secs: 60,
        }
    }
}

impl IngestionConfig {
    /// Size ceiling in bytes
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    /// Extraction timeout as a Duration
    pub fn extract_timeout(&self) -> Duration {
        Duration::from_secs(self.extract_timeout_secs)
    }
}

/// How line structure survives cleaning
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanMode {
    /// Collapse everything, newlines included, to single spaces
    #[default]
    Flatten,
    /// Keep one line per non-blank source line, collapse spaces within lines
    PreserveLines,
}

/// Text cleaning configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Whitespace handling
    #[serde(default)]
    pub mode: CleanMode,
    /// Map ligatures, curly quotes and leaked glyph names to plain ASCII
    #[serde(default)]
    pub normalize_typography: bool,
}

/// Upload staging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StagingConfig {
    /// Directory under which per-request upload folders are created
    /// (default: system temp dir)
    #[serde(default)]
    pub root: Option<PathBuf>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number
    #[serde(default = "default_port")]
    pub port: u16,
    /// Enable CORS
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
    /// Maximum multipart body size in bytes (default: 25MB)
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: usize,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_enable_cors() -> bool { true }
fn default_max_upload_size() -> usize { 25 * 1024 * 1024 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: true,
            max_upload_size: default_max_upload_size(),
        }
    }
}

//! Per-request staging of uploaded reference files

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

use crate::config::StagingConfig;
use crate::error::{Error, Result};

/// Temporary directory holding one request's uploads.
/// Files are deleted when the staging is dropped.
#[derive(Debug)]
pub struct UploadStaging {
    dir: TempDir,
    saved: Vec<PathBuf>,
}

impl UploadStaging {
    pub fn new(config: &StagingConfig) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("lesson-refs-");
        let dir = match &config.root {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };
        tracing::debug!("Staging uploads in {}", dir.path().display());
        Ok(Self {
            dir,
            saved: Vec::new(),
        })
    }

    /// Write one upload and return where it landed. Only the final path
    /// component of `filename` is kept; later uploads with the same name
    /// get a numeric suffix.
    pub fn save(&mut self, filename: Option<&str>, data: &[u8]) -> Result<PathBuf> {
        let name = sanitize_filename(filename)
            .unwrap_or_else(|| format!("upload-{}.bin", Uuid::new_v4()));
        let path = self.unique_path(&name);

        std::fs::write(&path, data)
            .map_err(|e| Error::upload(format!("Failed to save '{}': {}", name, e)))?;
        tracing::debug!("Saved upload {} ({} bytes)", path.display(), data.len());

        self.saved.push(path.clone());
        Ok(path)
    }

    /// Saved paths in upload order
    pub fn paths(&self) -> &[PathBuf] {
        &self.saved
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    fn unique_path(&self, name: &str) -> PathBuf {
        let candidate = self.dir.path().join(name);
        if !candidate.exists() {
            return candidate;
        }
        let (stem, ext) = match name.rsplit_once('.') {
            Some((stem, ext)) => (stem, format!(".{}", ext)),
            None => (name, String::new()),
        };
        (1..)
            .map(|n| self.dir.path().join(format!("{}-{}{}", stem, n, ext)))
            .find(|p| !p.exists())
            .unwrap_or(candidate)
    }
}

/// Reduce an uploaded name to a safe single path component
pub fn sanitize_filename(filename: Option<&str>) -> Option<String> {
    let name = filename?.rsplit(['/', '\\']).next()?.trim();
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name.to_string())
}

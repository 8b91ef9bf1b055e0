//! Reference upload endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::path::Path;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::ingestion::UploadStaging;
use crate::server::state::AppState;
use crate::types::{ReferenceContext, ReferenceResponse};

/// POST /api/references - Upload reference files and extract bounded text
pub async fn upload_references(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ReferenceResponse>> {
    let start = Instant::now();
    let mut staging = UploadStaging::new(&state.config().staging)?;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        Error::upload(format!("Failed to read multipart field: {}", e))
    })? {
        // Plain form fields carry no filename and are not references
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            tracing::debug!(
                "Skipping non-file form field {}",
                field.name().unwrap_or("<unnamed>")
            );
            continue;
        };
        let data = field.bytes().await.map_err(|e| {
            Error::upload(format!("Failed to read file '{}': {}", filename, e))
        })?;

        tracing::info!("Received reference upload: {} ({} bytes)", filename, data.len());
        staging.save(Some(&filename), &data)?;
    }

    let pipeline = state.pipeline().clone();
    let paths = staging.paths().to_vec();
    let context = tokio::task::spawn_blocking(move || pipeline.process_files(&paths))
        .await
        .map_err(|e| Error::internal(format!("Task join error: {}", e)))?;

    // Staged paths are server-local; report by uploaded file name
    let context = relabel_by_file_name(context);
    drop(staging);

    let processing_time_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        "Reference request done: {} entries, {} chars in {}ms",
        context.entries.len(),
        context.total_chars,
        processing_time_ms
    );

    Ok(Json(ReferenceResponse::from_context(&context, processing_time_ms)))
}

fn relabel_by_file_name(mut context: ReferenceContext) -> ReferenceContext {
    for entry in &mut context.entries {
        entry.path = file_label(&entry.path);
    }
    for path in &mut context.ignored {
        *path = file_label(path);
    }
    context
}

fn file_label(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

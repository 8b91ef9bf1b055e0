//! API routes for the reference server

pub mod references;

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/references",
            post(references::upload_references).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/info", get(info))
}

/// API info endpoint
async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let limits = &state.config().ingestion;
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Reference PDF ingestion for lesson-plan generation",
        "endpoints": {
            "POST /api/references": "Upload reference PDFs (multipart) and get bounded text",
            "GET /api/info": "Service limits",
            "GET /health": "Health check"
        },
        "limits": {
            "max_files": limits.max_files,
            "max_file_size_mb": limits.max_file_size_mb,
            "max_chars": limits.max_chars,
            "extract_timeout_secs": limits.extract_timeout_secs
        }
    }))
}

pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

/// Headroom above the upload limit for multipart boundaries, part headers and
/// the job description text.
const MULTIPART_OVERHEAD_BYTES: usize = 256 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_size_bytes() + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/analyze", post(handlers::handle_analyze))
        .route("/api/job-match", post(handlers::handle_job_match))
        .route("/api/summary", post(handlers::handle_summary))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

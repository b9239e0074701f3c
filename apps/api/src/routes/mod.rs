pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::interview::handlers as interview;
use crate::resume::handlers as resume;
use crate::state::AppState;

/// Resume uploads are capped at 5 MiB, matching the client-side limit.
const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/resume/extract", post(resume::handle_extract))
        .route("/api/interview/start", post(interview::handle_start))
        .route("/api/interview/answer", post(interview::handle_answer))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

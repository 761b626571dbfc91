pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::comparison::handlers as comparison;
use crate::documents::handlers as documents;
use crate::page::handlers as sessions;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions: one per open page
        .route("/api/v1/sessions", post(sessions::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(sessions::handle_get_session).delete(sessions::handle_close_session),
        )
        .route(
            "/api/v1/sessions/:id/notices",
            get(sessions::handle_drain_notices),
        )
        // Document inputs
        .route(
            "/api/v1/sessions/:id/documents/:slot/text",
            put(documents::handle_set_text),
        )
        .route(
            "/api/v1/sessions/:id/documents/:slot/file",
            post(documents::handle_upload_file).delete(documents::handle_remove_file),
        )
        // Comparison
        .route(
            "/api/v1/sessions/:id/compare",
            post(comparison::handle_compare),
        )
        .route(
            "/api/v1/sessions/:id/result",
            get(comparison::handle_get_result),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}

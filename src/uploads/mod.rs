use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub mod handlers;
mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(handlers::upload_file))
        .route("/uploads/:id", get(handlers::get_upload))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

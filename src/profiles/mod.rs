use axum::{
    routing::{get, patch},
    Router,
};

use crate::state::AppState;

mod dto;
pub mod handlers;
mod repo;
pub mod repo_types;
mod slug;
pub mod vcard;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/profiles",
            get(handlers::list_profiles).post(handlers::create_profile),
        )
        .route("/profiles/public/:slug", get(handlers::public_profile))
        .route(
            "/profiles/:id",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route("/profiles/:id/archive", patch(handlers::toggle_archive))
        .route("/profiles/:id/vcard", get(handlers::download_vcard))
}

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

mod dto;
pub mod extractors;
pub mod handlers;
mod password;
mod repo;
pub mod repo_types;
pub mod session;

pub use extractors::AuthUser;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/session", post(handlers::exchange_session))
        .route("/auth/me", get(handlers::me))
        .route("/auth/logout", post(handlers::logout))
}

use crate::state::AppState;
use axum::{
    routing::{get, put},
    Router,
};

mod dto;
pub mod handlers;
pub mod repo;
mod repo_types;

pub use repo_types::User;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list).post(handlers::create))
        .route("/password", put(handlers::update_password))
        .route("/email/:email", get(handlers::get_by_email))
        .route("/:id", get(handlers::get_by_id).delete(handlers::delete))
}

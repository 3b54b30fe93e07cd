use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/add_maintenance/:vehicle_id",
            get(handlers::new_page).post(handlers::create),
        )
        .route("/delete_maintenance/:id", post(handlers::delete))
}

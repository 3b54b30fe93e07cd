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
        .route("/vehicles", get(handlers::list))
        .route("/add_vehicle", get(handlers::new_page).post(handlers::create))
        .route("/vehicle/:id", get(handlers::detail))
        .route("/edit_vehicle/:id", get(handlers::edit_page).post(handlers::update))
        .route("/delete_vehicle/:id", post(handlers::delete))
}

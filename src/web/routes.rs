use axum::{
    Router,
    routing::{get, post},
};

use super::handler;
use crate::handler::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::index))
        .route("/favorites", post(handler::add_favorite))
        .route("/favorites/:id/remove", post(handler::remove_favorite))
        .route("/theme", post(handler::toggle_theme))
}

use axum::{Router, http::Method, routing::get};
use std::error::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::assets::serve_embedded;
use crate::handler::{AppState, healthcheck};

pub mod app;
pub mod assets;
pub mod config;
pub mod db;
pub mod error;
pub mod favorites;
pub mod handler;
pub mod kv;
pub mod model;
pub mod render;
pub mod search;
pub mod store;
pub mod theme;
pub mod web;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(healthcheck))
        .merge(web::routes())
        .nest("/api/favorites", favorites::routes())
        .fallback(serve_embedded)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub fn unpack_error(err: &dyn Error) -> String {
    let mut parts = Vec::new();
    parts.push(err.to_string());
    let mut current = err.source();
    while let Some(source) = current {
        parts.push(source.to_string());
        current = source.source();
    }
    parts.join(": ")
}

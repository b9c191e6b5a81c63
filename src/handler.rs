use std::sync::Arc;

use axum::{Json, response::IntoResponse};
use serde::Serialize;
use tracing::info;

use crate::app::App;
use crate::db::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub app: Arc<App>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

pub async fn healthcheck() -> impl IntoResponse {
    info!("got healthcheck request");
    Json(StatusResponse {
        status: "ok".to_string(),
    })
}

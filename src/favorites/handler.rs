//! HTTP Handlers for the favorites endpoint

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::handler::AppState;
use crate::model::{BookRecord, UNKNOWN_AUTHOR};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFavorite {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub preview_link: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl CreateFavorite {
    /// Only the title is required; a blank author becomes "Unknown".
    /// Values are stored exactly as sent.
    pub fn into_record(self) -> Option<BookRecord> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        let author = self
            .author
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

        Some(BookRecord {
            title,
            author,
            preview_link: self.preview_link.filter(|s| !s.is_empty()),
            image_url: self.image_url.filter(|s| !s.is_empty()),
        })
    }
}

#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    data: T,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn success<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse { data })).into_response()
}

fn created<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(ApiResponse { data })).into_response()
}

fn error(status: StatusCode, msg: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: msg.to_string(),
        }),
    )
        .into_response()
}

pub async fn list_favorites(State(state): State<AppState>) -> Response {
    match state.db.list_favorites().await {
        Ok(favorites) => {
            tracing::info!(count = favorites.len(), "got favorites");
            success(favorites)
        }
        Err(e) => {
            tracing::error!("Failed to list favorites: {}", e);
            error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list favorites")
        }
    }
}

pub async fn create_favorite(
    State(state): State<AppState>,
    Json(payload): Json<CreateFavorite>,
) -> Response {
    let Some(record) = payload.into_record() else {
        return error(StatusCode::BAD_REQUEST, "title is required");
    };

    match state.db.create_favorite(&record).await {
        Ok(favorite) => {
            tracing::info!(id = %favorite.id, title = %favorite.record.title, "created favorite");
            created(favorite)
        }
        Err(e) => {
            tracing::error!("Failed to create favorite: {}", e);
            error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create favorite")
        }
    }
}

pub async fn delete_favorite(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Ok(id) = id.parse::<i64>() else {
        return error(StatusCode::BAD_REQUEST, "invalid favorite id");
    };

    match state.db.delete_favorite(id).await {
        Ok(true) => {
            tracing::info!(id, "deleted favorite");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => error(StatusCode::NOT_FOUND, "Favorite not found"),
        Err(e) => {
            tracing::error!("Failed to delete favorite: {}", e);
            error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete favorite")
        }
    }
}

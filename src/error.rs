use thiserror::Error;

use crate::model::FavoriteId;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid search endpoint {0}")]
    InvalidEndpoint(String),
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("search API returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to decode search response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("favorite {0} not found")]
    NotFound(FavoriteId),
    #[error("invalid favorites endpoint {0}")]
    InvalidEndpoint(String),
    #[error("store file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("favorites request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("favorites endpoint returned status {0}")]
    Status(reqwest::StatusCode),
}

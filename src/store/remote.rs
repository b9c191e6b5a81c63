use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use super::FavoritesRepository;
use crate::error::StoreError;
use crate::model::{BookRecord, FavoriteEntry, FavoriteId};

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Client for a REST favorites endpoint:
/// `GET {url}`, `POST {url}`, `DELETE {url}/{id}`.
pub struct RemoteFavorites {
    http: reqwest::Client,
    url: String,
}

impl RemoteFavorites {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, StoreError> {
        reqwest::Url::parse(url).map_err(|e| StoreError::InvalidEndpoint(format!("{}: {}", url, e)))?;

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(RemoteFavorites {
            http,
            url: url.trim_end_matches('/').to_string(),
        })
    }

    fn entry_url(&self, id: &FavoriteId) -> String {
        format!("{}/{}", self.url, urlencoding::encode(id.as_str()))
    }
}

#[async_trait]
impl FavoritesRepository for RemoteFavorites {
    async fn list(&self) -> Result<Vec<FavoriteEntry>, StoreError> {
        let response = self.http.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(StoreError::Status(response.status()));
        }
        let body: Envelope<Vec<FavoriteEntry>> = response.json().await?;
        tracing::debug!(count = body.data.len(), "favorites listed");
        Ok(body.data)
    }

    async fn add(&self, record: BookRecord) -> Result<FavoriteId, StoreError> {
        let response = self.http.post(&self.url).json(&record).send().await?;
        if !response.status().is_success() {
            return Err(StoreError::Status(response.status()));
        }
        let body: Envelope<FavoriteEntry> = response.json().await?;
        tracing::info!(id = %body.data.id, title = %body.data.record.title, "favorite added");
        Ok(body.data.id)
    }

    async fn remove(&self, id: &FavoriteId) -> Result<(), StoreError> {
        let response = self.http.delete(self.entry_url(id)).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(id.clone())),
            status if status.is_success() => {
                tracing::info!(id = %id, "favorite removed");
                Ok(())
            }
            status => Err(StoreError::Status(status)),
        }
    }
}

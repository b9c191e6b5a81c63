use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;

use super::FavoritesRepository;
use crate::error::StoreError;
use crate::kv::KeyValueStore;
use crate::model::{BookRecord, FavoriteEntry, FavoriteId};

pub const FAVORITES_KEY: &str = "favoriteBooks";

// Older stores hold bare `{title, author}` objects with no id.
#[derive(Deserialize)]
struct StoredFavorite {
    #[serde(default)]
    id: Option<FavoriteId>,
    #[serde(flatten)]
    record: BookRecord,
}

/// Favorites kept as a JSON array under one key of the local store. Entries
/// get UUIDs when added, so removing one never shifts another's identity.
pub struct LocalFavorites {
    kv: Arc<KeyValueStore>,
    lock: Mutex<()>,
}

impl LocalFavorites {
    pub fn new(kv: Arc<KeyValueStore>) -> Self {
        LocalFavorites {
            kv,
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Vec<FavoriteEntry>, StoreError> {
        let Some(raw) = self.kv.get(FAVORITES_KEY).await? else {
            return Ok(Vec::new());
        };
        let stored: Option<Vec<StoredFavorite>> = serde_json::from_str(&raw)?;

        let mut assigned = 0;
        let mut entries = Vec::new();
        for favorite in stored.unwrap_or_default() {
            let id = match favorite.id {
                Some(id) => id,
                None => {
                    assigned += 1;
                    FavoriteId::generate()
                }
            };
            entries.push(FavoriteEntry {
                id,
                record: favorite.record,
            });
        }

        if assigned > 0 {
            tracing::info!(count = assigned, "assigned ids to stored favorites");
            self.save(&entries).await?;
        }

        Ok(entries)
    }

    async fn save(&self, entries: &[FavoriteEntry]) -> Result<(), StoreError> {
        self.kv
            .set(FAVORITES_KEY, serde_json::to_string(entries)?)
            .await?;
        tracing::debug!(count = entries.len(), "favorites saved");
        Ok(())
    }
}

#[async_trait]
impl FavoritesRepository for LocalFavorites {
    async fn list(&self) -> Result<Vec<FavoriteEntry>, StoreError> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    async fn add(&self, record: BookRecord) -> Result<FavoriteId, StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        let id = FavoriteId::generate();
        tracing::info!(id = %id, title = %record.title, "favorite added");
        entries.push(FavoriteEntry {
            id: id.clone(),
            record,
        });
        self.save(&entries).await?;
        Ok(id)
    }

    async fn remove(&self, id: &FavoriteId) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        let Some(index) = entries.iter().position(|e| &e.id == id) else {
            return Err(StoreError::NotFound(id.clone()));
        };
        let removed = entries.remove(index);
        tracing::info!(id = %id, title = %removed.record.title, "favorite removed");
        self.save(&entries).await
    }
}

//! Favorites persistence.
//!
//! Two interchangeable backends sit behind [`FavoritesRepository`]:
//!
//! - [`LocalFavorites`] keeps the list in the key-value store file.
//! - [`RemoteFavorites`] talks to a REST endpoint such as this service's own
//!   `/api/favorites`.
//!
//! The backend is picked once at startup from [`FavoritesMode`]. Callers
//! treat whatever they hold in memory as a cache and re-list after every
//! mutation.

mod local;
mod remote;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

pub use local::{FAVORITES_KEY, LocalFavorites};
pub use remote::RemoteFavorites;

use crate::config::{Config, FavoritesMode};
use crate::error::StoreError;
use crate::kv::KeyValueStore;
use crate::model::{BookRecord, FavoriteEntry, FavoriteId};

#[async_trait]
pub trait FavoritesRepository: Send + Sync {
    /// Returns the full current favorites collection, oldest first.
    async fn list(&self) -> Result<Vec<FavoriteEntry>, StoreError>;
    /// Appends a record and returns the identity assigned to it.
    async fn add(&self, record: BookRecord) -> Result<FavoriteId, StoreError>;
    /// Deletes the entry with `id`. Unknown ids are `StoreError::NotFound`.
    async fn remove(&self, id: &FavoriteId) -> Result<(), StoreError>;
}

pub fn from_config(
    cfg: &Config,
    kv: Arc<KeyValueStore>,
) -> Result<Arc<dyn FavoritesRepository>, StoreError> {
    match cfg.favorites.mode {
        FavoritesMode::Local => {
            tracing::info!(path = ?kv.path(), "favorites stored locally");
            Ok(Arc::new(LocalFavorites::new(kv)))
        }
        FavoritesMode::Server => {
            let url = cfg.favorites.endpoint_url(cfg.app.get_port());
            tracing::info!(url = %url, "favorites stored on server");
            let timeout = Duration::from_secs(cfg.search.timeout_seconds);
            Ok(Arc::new(RemoteFavorites::new(&url, timeout)?))
        }
    }
}

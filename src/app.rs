use std::sync::Arc;

use tracing::{error, info};

use crate::model::{BookRecord, FavoriteEntry, FavoriteId, ThemePreference};
use crate::render::{PageView, page_view};
use crate::search::SearchClient;
use crate::store::FavoritesRepository;
use crate::theme::ThemeStore;
use crate::unpack_error;

/// Owns the search client, the favorites backend and the theme, and runs
/// every user action as fetch, then reload, then render.
///
/// Failures never propagate out of here: they are logged and the action
/// produces either nothing or an empty list.
pub struct App {
    search: SearchClient,
    favorites: Arc<dyn FavoritesRepository>,
    theme: ThemeStore,
}

impl App {
    pub fn new(search: SearchClient, favorites: Arc<dyn FavoritesRepository>, theme: ThemeStore) -> Self {
        App {
            search,
            favorites,
            theme,
        }
    }

    pub async fn startup(&self) -> Vec<FavoriteEntry> {
        if let Err(e) = self.theme.load().await {
            error!(error = %unpack_error(&e), "failed to load theme, using light");
        }
        let favorites = self.favorites().await;
        info!(count = favorites.len(), "loaded favorites");
        favorites
    }

    pub async fn search(&self, query: &str) -> Vec<BookRecord> {
        let query = query.trim();
        if query.is_empty() {
            info!("search input is empty");
            return Vec::new();
        }
        self.search.search(query).await
    }

    pub async fn favorites(&self) -> Vec<FavoriteEntry> {
        self.reload_favorites().await.unwrap_or_default()
    }

    async fn reload_favorites(&self) -> Option<Vec<FavoriteEntry>> {
        match self.favorites.list().await {
            Ok(favorites) => Some(favorites),
            Err(e) => {
                error!(error = %unpack_error(&e), "failed to load favorites");
                None
            }
        }
    }

    /// Adds `record` and returns the reloaded list, or `None` if either
    /// step failed.
    pub async fn add_favorite(&self, record: BookRecord) -> Option<Vec<FavoriteEntry>> {
        let title = record.title.clone();
        if let Err(e) = self.favorites.add(record).await {
            error!(error = %unpack_error(&e), title = %title, "failed to add favorite");
            return None;
        }
        self.reload_favorites().await
    }

    pub async fn remove_favorite(&self, id: &FavoriteId) -> Option<Vec<FavoriteEntry>> {
        if let Err(e) = self.favorites.remove(id).await {
            error!(error = %unpack_error(&e), id = %id, "failed to remove favorite");
            return None;
        }
        self.reload_favorites().await
    }

    pub async fn toggle_theme(&self) -> ThemePreference {
        match self.theme.toggle().await {
            Ok(theme) => theme,
            Err(e) => {
                error!(error = %unpack_error(&e), "failed to persist theme");
                self.theme.current().await
            }
        }
    }

    pub async fn theme(&self) -> ThemePreference {
        self.theme.current().await
    }

    /// Everything the page shows: results for `query` (if any), the
    /// favorites, and the applied theme.
    pub async fn page(&self, query: Option<&str>) -> PageView {
        let query = query.unwrap_or_default().trim();
        let (results, favorites, theme) =
            tokio::join!(self.search(query), self.favorites(), self.theme());
        page_view(theme, query, &results, &favorites)
    }
}

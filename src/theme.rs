use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::kv::KeyValueStore;
use crate::model::ThemePreference;

pub const THEME_KEY: &str = "theme";

/// The applied theme plus its persisted copy in the key-value store.
pub struct ThemeStore {
    kv: Arc<KeyValueStore>,
    applied: RwLock<ThemePreference>,
}

impl ThemeStore {
    pub fn new(kv: Arc<KeyValueStore>) -> Self {
        ThemeStore {
            kv,
            applied: RwLock::new(ThemePreference::default()),
        }
    }

    /// Reads the persisted flag and applies it.
    pub async fn load(&self) -> Result<ThemePreference, StoreError> {
        let stored = self.kv.get(THEME_KEY).await?;
        let theme = stored
            .as_deref()
            .map(ThemePreference::parse)
            .unwrap_or_default();

        *self.applied.write().await = theme;
        tracing::info!(theme = theme.as_str(), "theme applied on load");
        Ok(theme)
    }

    /// Flips the applied theme and persists the new value. The flip sticks
    /// even when persisting fails.
    pub async fn toggle(&self) -> Result<ThemePreference, StoreError> {
        let mut applied = self.applied.write().await;
        *applied = applied.toggled();
        let theme = *applied;

        tracing::info!(theme = theme.as_str(), "theme toggled");
        self.kv.set(THEME_KEY, theme.as_str().to_string()).await?;
        Ok(theme)
    }

    pub async fn current(&self) -> ThemePreference {
        *self.applied.read().await
    }
}

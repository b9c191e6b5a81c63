use crate::model::{BookRecord, FavoriteEntry, FavoriteId};
use anyhow::Result;
use libsql::{Builder, Connection, Database as LibsqlDatabase};
use std::path::Path;

const SYSTEM_MIGRATIONS: &[(&str, &str)] =
    &[("system/000_migrations_table.sql", include_str!("migrations/system/000_migrations_table.sql"))];

const MIGRATIONS: &[(&str, &str)] = &[("001_favorites.sql", include_str!("migrations/001_favorites.sql"))];

/// Backing store of the `/api/favorites` endpoint.
pub struct Database {
    _db: LibsqlDatabase,
    conn: Connection,
}

impl Database {
    async fn is_migration_applied(conn: &Connection, name: &str) -> Result<bool> {
        let query = "SELECT 1 FROM _migrations WHERE name = ?";
        match conn.query(query, libsql::params![name]).await {
            Ok(mut rows) => Ok(rows.next().await?.is_some()),
            Err(e) => {
                if e.to_string().contains("no such table") {
                    Ok(false)
                } else {
                    Err(e.into())
                }
            }
        }
    }

    async fn record_migration(conn: &Connection, name: &str) -> Result<()> {
        let query = r#"
            INSERT INTO _migrations (name, applied_at)
            VALUES (?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        "#;
        conn.execute(query, libsql::params![name]).await?;
        Ok(())
    }

    async fn run_migration(conn: &Connection, name: &str, sql: &str) -> Result<()> {
        if Self::is_migration_applied(conn, name).await? {
            tracing::debug!("migration {} already applied, skipping", name);
            return Ok(());
        }

        tracing::info!("applying migration: {}", name);
        conn.execute_batch(sql)
            .await
            .map_err(|e| anyhow::anyhow!("failed to execute migration {name}: {e}"))?;

        Self::record_migration(conn, name).await?;
        Ok(())
    }

    /// Opens (or creates) the database at `path`. `":memory:"` gives a
    /// throwaway database.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Builder::new_local(path.as_ref()).build().await?;

        let conn = db.connect()?;
        conn.query("SELECT 1", ()).await?;

        for (filename, sql) in SYSTEM_MIGRATIONS.iter().chain(MIGRATIONS) {
            Self::run_migration(&conn, filename, sql).await?;
        }

        Ok(Database { _db: db, conn })
    }

    pub async fn list_favorites(&self) -> Result<Vec<FavoriteEntry>> {
        let query = r#"
            SELECT id, title, author, preview_link, image_url
            FROM favorites
            ORDER BY id
        "#;

        let mut rows = self.conn.query(query, ()).await?;
        let mut favorites = Vec::new();

        while let Some(row) = rows.next().await? {
            favorites.push(Self::row_to_favorite(&row)?);
        }

        Ok(favorites)
    }

    pub async fn create_favorite(&self, record: &BookRecord) -> Result<FavoriteEntry> {
        let query = r#"
            INSERT INTO favorites (title, author, preview_link, image_url)
            VALUES (?, ?, ?, ?)
            RETURNING id, title, author, preview_link, image_url
        "#;

        let mut rows = self
            .conn
            .query(
                query,
                libsql::params![
                    record.title.clone(),
                    record.author.clone(),
                    record.preview_link.clone(),
                    record.image_url.clone()
                ],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Self::row_to_favorite(&row)?)
        } else {
            anyhow::bail!("Failed to create favorite")
        }
    }

    /// Returns false when no favorite had `id`.
    pub async fn delete_favorite(&self, id: i64) -> Result<bool> {
        let result = self
            .conn
            .execute("DELETE FROM favorites WHERE id = ?", libsql::params![id])
            .await?;
        Ok(result > 0)
    }

    fn row_to_favorite(row: &libsql::Row) -> Result<FavoriteEntry> {
        let id: i64 = row.get(0)?;
        Ok(FavoriteEntry {
            id: FavoriteId::from(id),
            record: BookRecord {
                title: row.get(1)?,
                author: row.get(2)?,
                preview_link: row.get(3)?,
                image_url: row.get(4)?,
            },
        })
    }
}

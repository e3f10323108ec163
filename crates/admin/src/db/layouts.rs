//! Editable page text.

use sqlx::PgPool;
use tracing::instrument;

use prosper_core::LayoutId;
use prosper_core::content::ContentBlocks;

use super::RepositoryError;
use crate::models::Layout;

const LAYOUT_COLUMNS: &str = "id, location, name, content, created_date";

pub struct LayoutRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LayoutRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every block for one page location.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn blocks_for(&self, location: &str) -> Result<ContentBlocks, RepositoryError> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT name, content FROM site.layout WHERE location = $1 ORDER BY id",
        )
        .bind(location)
        .fetch_all(self.pool)
        .await?;

        Ok(ContentBlocks::from_pairs(location, rows))
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Layout>, RepositoryError> {
        let layouts = sqlx::query_as(&format!(
            "SELECT {LAYOUT_COLUMNS} FROM site.layout ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(layouts)
    }

    /// Replace one block's text.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no layout has this id.
    #[instrument(skip(self, content))]
    pub async fn update_content(&self, id: LayoutId, content: &str) -> Result<Layout, RepositoryError> {
        let layout: Option<Layout> = sqlx::query_as(&format!(
            "UPDATE site.layout SET content = $2 WHERE id = $1 RETURNING {LAYOUT_COLUMNS}"
        ))
        .bind(id)
        .bind(content)
        .fetch_optional(self.pool)
        .await?;

        layout.ok_or(RepositoryError::NotFound)
    }

    /// Insert or overwrite the block at (`location`, `name`).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    #[instrument(skip(self, content))]
    pub async fn upsert(
        &self,
        location: &str,
        name: &str,
        content: &str,
    ) -> Result<Layout, RepositoryError> {
        let layout = sqlx::query_as(&format!(
            r"
            INSERT INTO site.layout (location, name, content)
            VALUES ($1, $2, $3)
            ON CONFLICT (location, name) DO UPDATE SET content = EXCLUDED.content
            RETURNING {LAYOUT_COLUMNS}
            "
        ))
        .bind(location)
        .bind(name)
        .bind(content)
        .fetch_one(self.pool)
        .await?;

        Ok(layout)
    }
}

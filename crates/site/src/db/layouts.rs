//! Layout text lookups.

use sqlx::PgPool;

use prosper_core::content::ContentBlocks;

use super::RepositoryError;

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
            r"
            SELECT name, content
            FROM site.layout
            WHERE location = $1
            ORDER BY id
            ",
        )
        .bind(location)
        .fetch_all(self.pool)
        .await?;

        Ok(ContentBlocks::from_pairs(location, rows))
    }
}

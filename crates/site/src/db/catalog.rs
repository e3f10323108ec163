//! Read-only catalog queries.

use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use prosper_core::catalog::{CatalogEntry, CatalogFilter, push_catalog_query};

use super::RepositoryError;

/// Repository for product and image reads.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Product/image pairs matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: &CatalogFilter) -> Result<Vec<CatalogEntry>, RepositoryError> {
        let mut builder = QueryBuilder::<Postgres>::new("");
        push_catalog_query(&mut builder, filter);

        let entries = builder
            .build_query_as::<CatalogEntry>()
            .fetch_all(self.pool)
            .await?;

        Ok(entries)
    }
}

//! Per-IP visit counting.

use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;

use super::RepositoryError;

pub struct VisitorRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> VisitorRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Count a page view from `ip` on `today`, creating the visitor on first
    /// sight.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    #[instrument(skip(self))]
    pub async fn record_visit(&self, ip: &str, today: NaiveDate) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO site.visitor (ip_address, first_visit, last_visit)
            VALUES ($1, $2, $2)
            ON CONFLICT (ip_address) DO UPDATE
            SET visit_count = site.visitor.visit_count + 1,
                last_visit = EXCLUDED.last_visit
            ",
        )
        .bind(ip)
        .bind(today)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}

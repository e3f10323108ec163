//! Visitor analytics and marketing-source counts.

use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;

use prosper_core::analytics::{MarketingSource, MonthlyCount, fill_month_gaps, merge_sources};

use super::RepositoryError;
use crate::models::Visitor;

pub struct VisitorRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> VisitorRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Flag `ip` as an admin's address so it drops out of the dashboard counts.
    /// A new row is dated `today`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the upsert fails.
    #[instrument(skip(self))]
    pub async fn mark_admin(&self, ip: &str, today: NaiveDate) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO site.visitor (ip_address, is_admin, first_visit, last_visit)
            VALUES ($1, TRUE, $2, $2)
            ON CONFLICT (ip_address) DO UPDATE SET is_admin = TRUE
            ",
        )
        .bind(ip)
        .bind(today)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Unique visitors per month of first visit, oldest first, with empty
    /// months filled in.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn visitors_per_month(
        &self,
        exclude_admins: bool,
    ) -> Result<Vec<MonthlyCount>, RepositoryError> {
        let rows: Vec<(NaiveDate, i64)> = sqlx::query_as(
            r"
            SELECT date_trunc('month', first_visit)::date AS month, COUNT(*)
            FROM site.visitor
            WHERE NOT ($1 AND is_admin)
            GROUP BY month
            ORDER BY month
            ",
        )
        .bind(exclude_admins)
        .fetch_all(self.pool)
        .await?;

        let months: Vec<MonthlyCount> = rows
            .into_iter()
            .map(|(month, count)| MonthlyCount::new(month, count))
            .collect();

        Ok(fill_month_gaps(&months))
    }

    /// How customers heard about the business, across requests and questions.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn marketing_sources(&self) -> Result<Vec<MarketingSource>, RepositoryError> {
        let rows: Vec<(Option<String>, i64)> = sqlx::query_as(
            r"
            SELECT NULLIF(TRIM(how_hear), '') AS source, COUNT(*)
            FROM (
                SELECT how_hear FROM site.request
                UNION ALL
                SELECT how_hear FROM site.question
            ) answers
            GROUP BY source
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(merge_sources(
            rows.iter().map(|(source, count)| (source.as_deref(), *count)),
        ))
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Visitor>, RepositoryError> {
        let visitors = sqlx::query_as(
            r"
            SELECT id, ip_address, visit_count, is_admin, first_visit, last_visit
            FROM site.visitor
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(visitors)
    }
}

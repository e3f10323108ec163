//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use prosper_core::catalog::{CatalogEntry, CatalogFilter};
use prosper_core::content::ContentBlocks;

use crate::config::SiteConfig;
use crate::db::{CatalogRepository, LayoutRepository, RepositoryError};

/// How long catalog and layout reads are served from memory.
///
/// Admin edits go straight to the database, so this is the longest a change
/// can take to appear on the public pages.
const CACHE_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Catalog(CatalogKey),
    Layout(String),
}

/// `CatalogFilter` minus the product name, which is not cached.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
enum CatalogKey {
    All,
    FeaturedProducts,
    FeaturedImages,
}

#[derive(Debug, Clone)]
enum CacheValue {
    Catalog(Arc<Vec<CatalogEntry>>),
    Layout(Arc<ContentBlocks>),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    pool: PgPool,
    cache: Cache<CacheKey, CacheValue>,
}

impl AppState {
    #[must_use]
    pub fn new(config: SiteConfig, pool: PgPool) -> Self {
        let cache = Cache::builder()
            .max_capacity(64)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                cache,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Catalog rows for `filter`, cached except for single-product lookups.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the database read fails.
    pub async fn catalog(
        &self,
        filter: &CatalogFilter,
    ) -> Result<Arc<Vec<CatalogEntry>>, RepositoryError> {
        let key = match filter {
            CatalogFilter::All => CatalogKey::All,
            CatalogFilter::FeaturedProducts => CatalogKey::FeaturedProducts,
            CatalogFilter::FeaturedImages => CatalogKey::FeaturedImages,
            CatalogFilter::ProductName(_) => {
                let entries = CatalogRepository::new(self.pool()).list(filter).await?;
                return Ok(Arc::new(entries));
            }
        };
        let key = CacheKey::Catalog(key);

        if let Some(CacheValue::Catalog(entries)) = self.inner.cache.get(&key).await {
            return Ok(entries);
        }

        let entries = Arc::new(CatalogRepository::new(self.pool()).list(filter).await?);
        self.inner
            .cache
            .insert(key, CacheValue::Catalog(Arc::clone(&entries)))
            .await;
        Ok(entries)
    }

    /// Layout blocks for a page location.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the database read fails.
    pub async fn blocks(&self, location: &str) -> Result<Arc<ContentBlocks>, RepositoryError> {
        let key = CacheKey::Layout(location.to_owned());

        if let Some(CacheValue::Layout(blocks)) = self.inner.cache.get(&key).await {
            return Ok(blocks);
        }

        let blocks = Arc::new(LayoutRepository::new(self.pool()).blocks_for(location).await?);
        self.inner
            .cache
            .insert(key, CacheValue::Layout(Arc::clone(&blocks)))
            .await;
        Ok(blocks)
    }
}

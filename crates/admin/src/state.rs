//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::storage::ImageStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    images: ImageStore,
}

impl AppState {
    #[must_use]
    pub fn new(config: AdminConfig, pool: PgPool, images: ImageStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                images,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn images(&self) -> &ImageStore {
        &self.inner.images
    }
}

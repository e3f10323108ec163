//! Image directory sync with the S3 bucket.
//!
//! # Environment Variables
//!
//! - `IMAGE_DIR` - local image directory
//! - `AWS_PROJECT_BUCKET`, `AWS_PROJECT_BUCKET_IMAGE_DIR` - bucket and key prefix
//! - `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_REGION` - credentials

use prosper_admin::config::ImageConfig;
use prosper_admin::storage::{ImageStore, StorageError};

fn store() -> Result<ImageStore, StorageError> {
    dotenvy::dotenv().ok();

    let store = ImageStore::from_config(&ImageConfig::from_env())?;
    if !store.has_remote() {
        return Err(StorageError::NoBucket);
    }
    Ok(store)
}

/// Push every local image to the bucket.
///
/// # Errors
///
/// Returns `StorageError` if no bucket is configured or a transfer fails.
pub async fn upload() -> Result<(), StorageError> {
    let store = store()?;
    tracing::info!(dir = %store.dir().display(), "Uploading images...");
    let count = store.upload_all().await?;
    tracing::info!("Uploaded {count} images");
    Ok(())
}

/// Pull every image under the bucket prefix into the local directory.
///
/// # Errors
///
/// Returns `StorageError` if no bucket is configured or a transfer fails.
pub async fn download() -> Result<(), StorageError> {
    let store = store()?;
    tracing::info!(dir = %store.dir().display(), "Downloading images...");
    let count = store.download_all().await?;
    tracing::info!("Downloaded {count} images");
    Ok(())
}

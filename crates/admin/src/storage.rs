//! Product image files.
//!
//! The local directory is the copy the public site serves at
//! `/static/images`. When a bucket is configured every write and delete is
//! mirrored to it, and the CLI can push or pull the whole directory.

use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::ImageConfig;

/// URL prefix the site serves the image directory under.
pub const PUBLIC_PREFIX: &str = "/static/images/";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("image file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("object store error: {0}")]
    Remote(#[from] object_store::Error),

    /// The location does not point into the image directory.
    #[error("not an image location: {0}")]
    InvalidLocation(String),

    #[error("no image bucket configured")]
    NoBucket,
}

/// The bucket side of the store.
#[derive(Clone)]
struct Remote {
    store: Arc<dyn ObjectStore>,
    /// Key prefix, empty or ending in `/`
    prefix: String,
}

impl Remote {
    fn key(&self, name: &str) -> Path {
        Path::from(format!("{}{name}", self.prefix))
    }
}

/// Local image directory plus optional bucket mirror.
#[derive(Clone)]
pub struct ImageStore {
    dir: PathBuf,
    remote: Option<Remote>,
}

impl std::fmt::Debug for ImageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageStore")
            .field("dir", &self.dir)
            .field("remote_prefix", &self.remote.as_ref().map(|r| &r.prefix))
            .finish()
    }
}

impl ImageStore {
    /// Local-only store.
    #[must_use]
    pub fn local(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            remote: None,
        }
    }

    /// Mirror writes to `store` under `prefix`.
    #[must_use]
    pub fn with_remote(mut self, store: Arc<dyn ObjectStore>, prefix: impl Into<String>) -> Self {
        self.remote = Some(Remote {
            store,
            prefix: prefix.into(),
        });
        self
    }

    /// Build from configuration; AWS credentials and region come from the
    /// standard `AWS_*` variables.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Remote` if the S3 client cannot be built.
    pub fn from_config(config: &ImageConfig) -> Result<Self, StorageError> {
        let store = Self::local(&config.dir);
        let Some(bucket) = &config.bucket else {
            return Ok(store);
        };

        let s3 = AmazonS3Builder::from_env()
            .with_bucket_name(&bucket.name)
            .build()?;
        info!(bucket = %bucket.name, prefix = %bucket.prefix, "Image bucket configured");
        Ok(store.with_remote(Arc::new(s3), bucket.prefix.clone()))
    }

    #[must_use]
    pub fn dir(&self) -> &FsPath {
        &self.dir
    }

    #[must_use]
    pub const fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Store an uploaded file under a fresh name and return its public
    /// location. Never replaces an existing file, so the caller owns the
    /// returned location.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the local write or the mirror upload fails.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn save(&self, original_name: &str, bytes: Vec<u8>) -> Result<String, StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let mut attempts = 0;
        let name = loop {
            let name = stored_name(original_name, Utc::now(), &upload_tag());
            match create_new(&self.dir.join(&name), &bytes).await {
                Ok(()) => break name,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && attempts < 3 => {
                    attempts += 1;
                    warn!(name, "Stored name taken, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        };

        self.mirror(&name, bytes).await?;
        Ok(format!("{PUBLIC_PREFIX}{name}"))
    }

    /// Store a file under exactly `name`, as the seed loader does.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the local write or the mirror upload fails.
    pub async fn save_as(&self, name: &str, bytes: Vec<u8>) -> Result<String, StorageError> {
        let name = sanitize_filename(name);
        self.write(&name, bytes).await?;
        Ok(format!("{PUBLIC_PREFIX}{name}"))
    }

    async fn write(&self, name: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(name), &bytes).await?;
        self.mirror(name, bytes).await
    }

    async fn mirror(&self, name: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
        if let Some(remote) = &self.remote {
            remote
                .store
                .put(&remote.key(name), PutPayload::from(bytes))
                .await?;
        }
        debug!(name, "Image stored");
        Ok(())
    }

    /// Remove an image by its public location. Files already gone are fine.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidLocation` for locations outside the
    /// image directory, or the underlying I/O or bucket error.
    #[instrument(skip(self))]
    pub async fn delete(&self, location: &str) -> Result<(), StorageError> {
        let name = file_name(location)?;

        match tokio::fs::remove_file(self.dir.join(name)).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(location, "Image file already missing");
            }
            Err(e) => return Err(e.into()),
        }

        if let Some(remote) = &self.remote {
            match remote.store.delete(&remote.key(name)).await {
                Ok(()) | Err(object_store::Error::NotFound { .. }) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Push every local file to the bucket. Returns how many were sent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NoBucket` without a bucket, or the first failure.
    #[instrument(skip(self))]
    pub async fn upload_all(&self) -> Result<usize, StorageError> {
        let remote = self.remote.as_ref().ok_or(StorageError::NoBucket)?;

        let mut sent = 0;
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                warn!(path = ?entry.path(), "Skipping non-UTF-8 file name");
                continue;
            };
            if name.starts_with('.') {
                continue;
            }

            let bytes = tokio::fs::read(entry.path()).await?;
            remote
                .store
                .put(&remote.key(&name), PutPayload::from(bytes))
                .await?;
            debug!(name, "Uploaded image");
            sent += 1;
        }

        info!(count = sent, "Uploaded images");
        Ok(sent)
    }

    /// Pull every object under the prefix into the local directory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NoBucket` without a bucket, or the first failure.
    #[instrument(skip(self))]
    pub async fn download_all(&self) -> Result<usize, StorageError> {
        let remote = self.remote.as_ref().ok_or(StorageError::NoBucket)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let prefix = Path::from(remote.prefix.as_str());
        let objects: Vec<_> = remote.store.list(Some(&prefix)).try_collect().await?;

        let mut fetched = 0;
        for meta in objects {
            // "Folder" placeholder keys have no file name
            let Some(name) = meta.location.filename().filter(|n| !n.is_empty()) else {
                continue;
            };
            let name = name.to_owned();

            let bytes = remote.store.get(&meta.location).await?.bytes().await?;
            tokio::fs::write(self.dir.join(&name), &bytes).await?;
            debug!(name, "Downloaded image");
            fetched += 1;
        }

        info!(count = fetched, "Downloaded images");
        Ok(fetched)
    }
}

/// `{YYYYMMDDHHMMSS}_{tag}_{sanitised name}`
#[must_use]
pub fn stored_name(original_name: &str, now: DateTime<Utc>, tag: &str) -> String {
    format!(
        "{}_{tag}_{}",
        now.format("%Y%m%d%H%M%S"),
        sanitize_filename(original_name)
    )
}

/// Eight random hex digits.
fn upload_tag() -> String {
    Uuid::new_v4().simple().to_string().chars().take(8).collect()
}

/// Write `bytes` to `path`, failing with `AlreadyExists` rather than
/// replacing a file.
async fn create_new(path: &FsPath, bytes: &[u8]) -> std::io::Result<()> {
    use tokio::io::AsyncWriteExt;

    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(bytes).await?;
    file.flush().await
}

/// Reduce an uploaded file name to `[A-Za-z0-9._-]`, dropping any directory
/// part. Whitespace becomes `_`.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .trim()
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();
    let cleaned = cleaned.trim_start_matches(['.', '_']);

    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned.to_string()
    }
}

/// File name inside the image directory for a public location.
fn file_name(location: &str) -> Result<&str, StorageError> {
    location
        .strip_prefix(PUBLIC_PREFIX)
        .filter(|name| !name.is_empty() && !name.contains(['/', '\\']) && *name != "..")
        .ok_or_else(|| StorageError::InvalidLocation(location.to_owned()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use object_store::memory::InMemory;

    fn mirrored(dir: &FsPath) -> (ImageStore, Arc<InMemory>) {
        let bucket = Arc::new(InMemory::new());
        let store = ImageStore::local(dir).with_remote(bucket.clone(), "images/");
        (store, bucket)
    }

    #[test]
    fn test_stored_name_is_timestamped() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            stored_name("Cabinet Front.JPG", now, "0a1b2c3d"),
            "20240309140507_0a1b2c3d_Cabinet_Front.JPG"
        );
    }

    #[test]
    fn test_upload_tags_differ() {
        let tag = upload_tag();
        assert_eq!(tag.len(), 8);
        assert!(tag.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(tag, upload_tag());
    }

    #[tokio::test]
    async fn test_same_name_uploads_keep_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let (store, bucket) = mirrored(dir.path());

        let first = store.save("image.jpg", b"product A".to_vec()).await.unwrap();
        let second = store.save("image.jpg", b"product B".to_vec()).await.unwrap();
        assert_ne!(first, second);

        for (location, bytes) in [(&first, b"product A"), (&second, b"product B")] {
            let name = location.strip_prefix(PUBLIC_PREFIX).unwrap();
            assert_eq!(std::fs::read(dir.path().join(name)).unwrap(), bytes);
            let remote = bucket
                .get(&Path::from(format!("images/{name}")))
                .await
                .unwrap()
                .bytes()
                .await
                .unwrap();
            assert_eq!(remote.as_ref(), bytes);
        }
    }

    #[tokio::test]
    async fn test_create_new_refuses_to_replace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taken.jpeg");
        std::fs::write(&path, b"original").unwrap();

        let err = create_new(&path, b"intruder").await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::AlreadyExists);
        assert_eq!(std::fs::read(&path).unwrap(), b"original");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\photos\\bench.png"), "bench.png");
        assert_eq!(sanitize_filename(".hidden"), "hidden");
        assert_eq!(sanitize_filename("wälnut board.jpeg"), "wlnut_board.jpeg");
        assert_eq!(sanitize_filename("???"), "image");
    }

    #[test]
    fn test_file_name_rejects_foreign_locations() {
        assert_eq!(file_name("/static/images/a.jpeg").unwrap(), "a.jpeg");
        assert!(file_name("/static/css/main.css").is_err());
        assert!(file_name("/static/images/../secrets").is_err());
        assert!(file_name("/static/images/").is_err());
    }

    #[tokio::test]
    async fn test_save_writes_locally_and_mirrors() {
        let dir = tempfile::tempdir().unwrap();
        let (store, bucket) = mirrored(dir.path());

        let location = store.save("bench.jpeg", b"jpeg".to_vec()).await.unwrap();
        let name = location.strip_prefix(PUBLIC_PREFIX).unwrap();
        assert!(name.ends_with("_bench.jpeg"));
        assert_eq!(std::fs::read(dir.path().join(name)).unwrap(), b"jpeg");

        let remote = bucket
            .get(&Path::from(format!("images/{name}")))
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap();
        assert_eq!(remote.as_ref(), b"jpeg");
    }

    #[tokio::test]
    async fn test_delete_tolerates_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let (store, bucket) = mirrored(dir.path());

        let location = store.save_as("cabinet00.jpeg", b"x".to_vec()).await.unwrap();
        store.delete(&location).await.unwrap();
        assert!(!dir.path().join("cabinet00.jpeg").exists());
        assert!(bucket.get(&Path::from("images/cabinet00.jpeg")).await.is_err());

        store.delete(&location).await.unwrap();
    }

    #[tokio::test]
    async fn test_upload_then_download_round_trip() {
        let source = tempfile::tempdir().unwrap();
        std::fs::write(source.path().join("decor00.jpeg"), b"decor").unwrap();
        std::fs::write(source.path().join(".gitkeep"), b"").unwrap();
        let (store, bucket) = mirrored(source.path());
        assert_eq!(store.upload_all().await.unwrap(), 1);

        let target = tempfile::tempdir().unwrap();
        let puller = ImageStore::local(target.path()).with_remote(bucket, "images/");
        assert_eq!(puller.download_all().await.unwrap(), 1);
        assert_eq!(
            std::fs::read(target.path().join("decor00.jpeg")).unwrap(),
            b"decor"
        );
    }

    #[tokio::test]
    async fn test_bulk_sync_needs_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::local(dir.path());
        assert!(matches!(
            store.upload_all().await,
            Err(StorageError::NoBucket)
        ));
    }
}

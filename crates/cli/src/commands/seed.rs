//! Load the default page text and catalog.
//!
//! Layouts are upserted by (location, name). Products exist only through
//! their photos: each file in the image directory is matched to the first
//! product whose `matches` pattern appears in its name, copied into the
//! image store and attached to that product.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use prosper_admin::config::ImageConfig;
use prosper_admin::db::{CatalogRepository, LayoutRepository, RepositoryError};
use prosper_admin::storage::{ImageStore, StorageError};

use super::{CommandError, connect};

pub const DEFAULT_SEED_FILE: &str = "crates/cli/seed/site_content.yaml";

/// A catalog holding more than this many products or images is left alone.
const EXISTING_DATA_THRESHOLD: i64 = 3;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid seed file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedFile {
    pub layouts: Vec<LayoutSeed>,
    pub products: Vec<ProductSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayoutSeed {
    pub location: String,
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductSeed {
    pub name: String,
    /// Substring that assigns a photo to this product
    pub matches: String,
    /// File name of the photo shown first
    pub featured_image: String,
    #[serde(default)]
    pub featured_product: bool,
    #[serde(default)]
    pub description: String,
}

impl SeedFile {
    /// # Errors
    ///
    /// Returns `serde_yaml::Error` for malformed YAML.
    pub fn parse(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// First product, in file order, whose pattern occurs in `file_name`.
    #[must_use]
    pub fn product_for(&self, file_name: &str) -> Option<&ProductSeed> {
        self.products
            .iter()
            .find(|product| file_name.contains(product.matches.as_str()))
    }
}

const fn has_data(products: i64, images: i64) -> bool {
    products > EXISTING_DATA_THRESHOLD || images > EXISTING_DATA_THRESHOLD
}

/// Load layouts, then products from the photos in `images`.
///
/// # Errors
///
/// Returns `SeedError` if the file cannot be read or parsed, or any write fails.
pub async fn content(file: &Path, images: Option<&Path>, force: bool) -> Result<(), SeedError> {
    info!(path = %file.display(), "Loading seed file");
    let seed = SeedFile::parse(&tokio::fs::read_to_string(file).await?)?;
    info!(
        layouts = seed.layouts.len(),
        products = seed.products.len(),
        "Parsed seed file"
    );

    let pool = connect("ADMIN_DATABASE_URL").await?;
    let catalog = CatalogRepository::new(&pool);

    let (products, images_stored) = (catalog.count_products().await?, catalog.count_images().await?);
    if !force && has_data(products, images_stored) {
        warn!(products, images = images_stored, "Catalog already has data, skipping (use --force)");
        return Ok(());
    }

    let layouts = LayoutRepository::new(&pool);
    for layout in &seed.layouts {
        layouts
            .upsert(&layout.location, &layout.name, layout.content.trim())
            .await?;
    }
    info!(count = seed.layouts.len(), "Layouts loaded");

    let Some(dir) = images else {
        warn!("No --images directory given, products were not loaded");
        return Ok(());
    };

    dotenvy::dotenv().ok();
    let store = ImageStore::from_config(&ImageConfig::from_env())?;

    let mut attached = 0;
    for name in image_files(dir).await? {
        let Some(product) = seed.product_for(&name) else {
            warn!(file = %name, "No product matches image, skipping");
            continue;
        };

        let bytes = tokio::fs::read(dir.join(&name)).await?;
        let location = store.save_as(&name, bytes).await?;
        catalog
            .upsert_product_image(
                &product.name,
                product.description.trim(),
                &location,
                name == product.featured_image,
                product.featured_product,
            )
            .await?;
        info!(file = %name, product = %product.name, "Image attached");
        attached += 1;
    }

    info!(images = attached, "Seeding complete!");
    Ok(())
}

/// Regular, non-hidden file names in `dir`, sorted.
async fn image_files(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) if !name.starts_with('.') => names.push(name),
            Ok(_) => {}
            Err(name) => warn!(?name, "Skipping non-UTF-8 file name"),
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const DEFAULT_SEED: &str = include_str!("../../seed/site_content.yaml");

    fn matched(seed: &SeedFile, file_name: &str) -> Option<String> {
        seed.product_for(file_name).map(|p| p.name.clone())
    }

    #[test]
    fn test_default_seed_parses() {
        let seed = SeedFile::parse(DEFAULT_SEED).unwrap();
        assert_eq!(seed.layouts.len(), 11);
        assert_eq!(seed.products.len(), 7);

        let featured: Vec<_> = seed
            .products
            .iter()
            .filter(|p| p.featured_product)
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(
            featured,
            ["Cornhole Football Board", "Custom Cabinet", "Customized Holiday Decor Board"]
        );
    }

    #[test]
    fn test_specific_patterns_win() {
        let seed = SeedFile::parse(DEFAULT_SEED).unwrap();

        assert_eq!(
            matched(&seed, "cornhole_football02.jpeg").as_deref(),
            Some("Cornhole Football Board")
        );
        assert_eq!(matched(&seed, "cornhole01.jpeg").as_deref(), Some("Cornhole Board"));
        assert_eq!(
            matched(&seed, "decor_holiday03.jpeg").as_deref(),
            Some("Customized Holiday Decor Board")
        );
        assert_eq!(
            matched(&seed, "decor_name00.jpeg").as_deref(),
            Some("Customized Name Decor Board")
        );
        assert_eq!(
            matched(&seed, "decor_board01.jpeg").as_deref(),
            Some("Customized Decor Board")
        );
        assert_eq!(matched(&seed, "logo.png"), None);
    }

    #[test]
    fn test_aliased_descriptions_are_shared() {
        let seed = SeedFile::parse(DEFAULT_SEED).unwrap();
        let decor: Vec<_> = seed
            .products
            .iter()
            .filter(|p| p.matches.starts_with("decor"))
            .map(|p| p.description.as_str())
            .collect();
        assert_eq!(decor.len(), 3);
        assert!(decor.iter().all(|d| *d == decor[0] && d.contains("ISD spirit")));
    }

    #[test]
    fn test_has_data_threshold() {
        assert!(!has_data(0, 0));
        assert!(!has_data(3, 3));
        assert!(has_data(4, 0));
        assert!(has_data(0, 4));
    }

    #[tokio::test]
    async fn test_image_files_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cabinet01.jpeg"), b"b").unwrap();
        std::fs::write(dir.path().join("cabinet00.jpeg"), b"a").unwrap();
        std::fs::write(dir.path().join(".DS_Store"), b"").unwrap();
        std::fs::create_dir(dir.path().join("thumbs")).unwrap();

        let names = image_files(dir.path()).await.unwrap();
        assert_eq!(names, ["cabinet00.jpeg", "cabinet01.jpeg"]);
    }
}

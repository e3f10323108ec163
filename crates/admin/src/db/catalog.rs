//! Catalog reads and writes for the dashboard.
//!
//! Featured images follow two rules the partial unique index on
//! `site.image` backs up: a product has at most one featured image, and a
//! product that has images always has one featured. Adding the first image
//! features it; deleting the featured image promotes the oldest survivor.

use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

use prosper_core::{ImageId, ProductId};

use super::{RepositoryError, conflict_or};
use crate::models::{Image, Product};

const PRODUCT_COLUMNS: &str = "id, name, description, is_featured_product, created_date";
const IMAGE_COLUMNS: &str = "id, location, product_id, is_featured_img, created_date";

/// Repository for products and their images.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Every product, by name, including products with no images yet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM site.product ORDER BY name"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM site.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Images of one product, featured first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_images(&self, product_id: ProductId) -> Result<Vec<Image>, RepositoryError> {
        let images = sqlx::query_as(&format!(
            r"
            SELECT {IMAGE_COLUMNS} FROM site.image
            WHERE product_id = $1
            ORDER BY is_featured_img DESC, id
            "
        ))
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(images)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all_images(&self) -> Result<Vec<Image>, RepositoryError> {
        let images = sqlx::query_as(&format!(
            "SELECT {IMAGE_COLUMNS} FROM site.image ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(images)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_products(&self) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM site.product")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_images(&self) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM site.image")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Create a product together with its featured image.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name or location is taken.
    #[instrument(skip(self, description))]
    pub async fn create_product_with_image(
        &self,
        name: &str,
        description: &str,
        is_featured: bool,
        location: &str,
    ) -> Result<(Product, Image), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let product: Product = sqlx::query_as(&format!(
            r"
            INSERT INTO site.product (name, description, is_featured_product)
            VALUES ($1, $2, $3)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(name)
        .bind(description)
        .bind(is_featured)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_or(e, || format!("a product named {name} already exists")))?;

        let image = insert_image(&mut tx, product.id, location, true).await?;

        tx.commit().await?;
        Ok((product, image))
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Conflict` if the new name is taken.
    #[instrument(skip(self, description))]
    pub async fn update_product(
        &self,
        id: ProductId,
        name: &str,
        description: &str,
        is_featured: bool,
    ) -> Result<Product, RepositoryError> {
        let product: Option<Product> = sqlx::query_as(&format!(
            r"
            UPDATE site.product
            SET name = $2, description = $3, is_featured_product = $4
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(is_featured)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| conflict_or(e, || format!("a product named {name} already exists")))?;

        product.ok_or(RepositoryError::NotFound)
    }

    /// Delete a product and its images.
    ///
    /// Returns the deleted images so their files can be removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<Vec<Image>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let images: Vec<Image> = sqlx::query_as(&format!(
            "DELETE FROM site.image WHERE product_id = $1 RETURNING {IMAGE_COLUMNS}"
        ))
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let deleted = sqlx::query("DELETE FROM site.product WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;
        debug!(images = images.len(), "Product deleted");
        Ok(images)
    }

    // =========================================================================
    // Images
    // =========================================================================

    /// Attach an image; the product's first image becomes its featured one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the location is already used.
    #[instrument(skip(self))]
    pub async fn add_image(
        &self,
        product_id: ProductId,
        location: &str,
    ) -> Result<Image, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let image = insert_image(&mut tx, product_id, location, false).await?;
        tx.commit().await?;
        Ok(image)
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_image(&self, id: ImageId) -> Result<Option<Image>, RepositoryError> {
        let image = sqlx::query_as(&format!(
            "SELECT {IMAGE_COLUMNS} FROM site.image WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(image)
    }

    /// Delete an image, promoting the oldest remaining image when the
    /// featured one goes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the image does not exist.
    #[instrument(skip(self))]
    pub async fn delete_image(&self, id: ImageId) -> Result<Image, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let image: Image = sqlx::query_as(&format!(
            "DELETE FROM site.image WHERE id = $1 RETURNING {IMAGE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        if image.is_featured_img {
            promote_oldest(&mut tx, image.product_id).await?;
        }

        tx.commit().await?;
        Ok(image)
    }

    /// Make `id` its product's only featured image.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the image does not exist.
    #[instrument(skip(self))]
    pub async fn make_featured_image(&self, id: ImageId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let (product_id,): (ProductId,) =
            sqlx::query_as("SELECT product_id FROM site.image WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(RepositoryError::NotFound)?;

        set_featured(&mut tx, product_id, id).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Get-or-create the product by name, then attach the image.
    ///
    /// An existing product keeps its description unless `description` is
    /// non-empty. Re-seeding the same location moves the image rather than
    /// failing; a product that loses its featured image that way gets its
    /// oldest remaining image featured.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    #[instrument(skip(self, description))]
    pub async fn upsert_product_image(
        &self,
        name: &str,
        description: &str,
        location: &str,
        featured_img: bool,
        featured_product: bool,
    ) -> Result<Image, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let (product_id,): (ProductId,) = sqlx::query_as(
            r"
            INSERT INTO site.product (name, description, is_featured_product)
            VALUES ($1, $2, $3)
            ON CONFLICT (name) DO UPDATE
            SET description = CASE WHEN EXCLUDED.description = ''
                                   THEN site.product.description
                                   ELSE EXCLUDED.description END,
                is_featured_product = site.product.is_featured_product
                                      OR EXCLUDED.is_featured_product
            RETURNING id
            ",
        )
        .bind(name)
        .bind(description)
        .bind(featured_product)
        .fetch_one(&mut *tx)
        .await?;

        let replaced: Option<(ProductId, bool)> = sqlx::query_as(
            "DELETE FROM site.image WHERE location = $1 RETURNING product_id, is_featured_img",
        )
        .bind(location)
        .fetch_optional(&mut *tx)
        .await?;
        if let Some((previous_owner, true)) = replaced {
            promote_oldest(&mut tx, previous_owner).await?;
        }

        let image = insert_image(&mut tx, product_id, location, featured_img).await?;

        tx.commit().await?;
        Ok(image)
    }
}

/// Feature the oldest image of a product that just lost its featured one.
async fn promote_oldest(
    tx: &mut Transaction<'_, Postgres>,
    product_id: ProductId,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        UPDATE site.image SET is_featured_img = TRUE
        WHERE id = (
            SELECT id FROM site.image
            WHERE product_id = $1
            ORDER BY created_date, id
            LIMIT 1
        )
        ",
    )
    .bind(product_id)
    .execute(&mut **tx)
    .await?;

    debug!(%product_id, "Promoted oldest image to featured");
    Ok(())
}

/// Insert an image, featuring it when asked or when the product has none.
async fn insert_image(
    tx: &mut Transaction<'_, Postgres>,
    product_id: ProductId,
    location: &str,
    featured: bool,
) -> Result<Image, RepositoryError> {
    let (has_featured,): (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM site.image WHERE product_id = $1 AND is_featured_img)",
    )
    .bind(product_id)
    .fetch_one(&mut **tx)
    .await?;

    let image: Image = sqlx::query_as(&format!(
        r"
        INSERT INTO site.image (location, product_id, is_featured_img)
        VALUES ($1, $2, FALSE)
        RETURNING {IMAGE_COLUMNS}
        "
    ))
    .bind(location)
    .bind(product_id)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| conflict_or(e, || format!("image {location} already exists")))?;

    if featured || !has_featured {
        set_featured(tx, product_id, image.id).await?;
        return Ok(Image {
            is_featured_img: true,
            ..image
        });
    }

    Ok(image)
}

/// Clear the product's featured flag, then set it on `image_id`.
async fn set_featured(
    tx: &mut Transaction<'_, Postgres>,
    product_id: ProductId,
    image_id: ImageId,
) -> Result<(), RepositoryError> {
    sqlx::query(
        "UPDATE site.image SET is_featured_img = FALSE WHERE product_id = $1 AND is_featured_img",
    )
    .bind(product_id)
    .execute(&mut **tx)
    .await?;

    sqlx::query("UPDATE site.image SET is_featured_img = TRUE WHERE id = $1")
        .bind(image_id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

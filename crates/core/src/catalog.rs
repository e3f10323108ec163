//! Catalog rows and the filter the public site fetches them with.
//!
//! A [`CatalogEntry`] is one product joined with one of its images. Pages ask
//! for a [`CatalogFilter`]; the SQL for every filter is assembled here so the
//! public site and the dashboard always agree on what "featured" means.

use serde::{Deserialize, Serialize};

use crate::{ImageId, ProductId};

/// Which product/image pairs to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogFilter {
    /// Every product with every image.
    #[default]
    All,
    /// Featured products, featured image only (home page).
    FeaturedProducts,
    /// The featured image of every product (designs page).
    FeaturedImages,
    /// All images of one product, looked up by its exact name.
    ProductName(String),
}

/// A product joined with one of its images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct CatalogEntry {
    pub product_id: ProductId,
    pub product_name: String,
    pub description: String,
    pub is_featured_product: bool,
    pub image_id: ImageId,
    pub location: String,
    pub is_featured_img: bool,
}

/// One image attached to a [`CatalogProduct`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogImage {
    pub id: ImageId,
    pub location: String,
    pub is_featured_img: bool,
}

/// A product with its images, regrouped from joined rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub is_featured_product: bool,
    pub images: Vec<CatalogImage>,
}

impl CatalogProduct {
    /// The featured image, or the first image if none is flagged.
    #[must_use]
    pub fn featured_image(&self) -> Option<&CatalogImage> {
        self.images
            .iter()
            .find(|image| image.is_featured_img)
            .or_else(|| self.images.first())
    }
}

/// Fold joined rows back into products, keeping row order.
///
/// Rows for the same product must be adjacent, which holds for any query
/// ordered by product name.
#[must_use]
pub fn group_products(entries: Vec<CatalogEntry>) -> Vec<CatalogProduct> {
    let mut products: Vec<CatalogProduct> = Vec::new();
    for entry in entries {
        let image = CatalogImage {
            id: entry.image_id,
            location: entry.location,
            is_featured_img: entry.is_featured_img,
        };
        match products.last_mut() {
            Some(product) if product.id == entry.product_id => product.images.push(image),
            _ => products.push(CatalogProduct {
                id: entry.product_id,
                name: entry.product_name,
                description: entry.description,
                is_featured_product: entry.is_featured_product,
                images: vec![image],
            }),
        }
    }
    products
}

/// Split `items` into rows of at most `size` for grid layouts.
///
/// A `size` of zero is treated as one.
#[must_use]
pub fn chunk<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    items.chunks(size.max(1)).map(<[T]>::to_vec).collect()
}

#[cfg(feature = "postgres")]
const CATALOG_SELECT: &str = r"SELECT p.id AS product_id, p.name AS product_name,
       p.description, p.is_featured_product,
       i.id AS image_id, i.location, i.is_featured_img
FROM site.product p
JOIN site.image i ON i.product_id = p.id";

/// Append the catalog query for `filter` to `builder`.
///
/// Results are ordered by product name, then featured image first, then
/// image id.
#[cfg(feature = "postgres")]
pub fn push_catalog_query(
    builder: &mut sqlx::QueryBuilder<'_, sqlx::Postgres>,
    filter: &CatalogFilter,
) {
    builder.push(CATALOG_SELECT);
    match filter {
        CatalogFilter::All => {}
        CatalogFilter::FeaturedProducts => {
            builder.push(" WHERE p.is_featured_product AND i.is_featured_img");
        }
        CatalogFilter::FeaturedImages => {
            builder.push(" WHERE i.is_featured_img");
        }
        CatalogFilter::ProductName(name) => {
            builder.push(" WHERE p.name = ");
            builder.push_bind(name.clone());
        }
    }
    builder.push(" ORDER BY p.name, i.is_featured_img DESC, i.id");
}

//! Product and image rows as the dashboard edits them.

use chrono::NaiveDate;
use serde::Serialize;

use prosper_core::{ImageId, ProductId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub is_featured_product: bool,
    pub created_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Image {
    pub id: ImageId,
    /// Public path, e.g. `/static/images/20240101120000_cabinet.jpeg`
    pub location: String,
    pub product_id: ProductId,
    pub is_featured_img: bool,
    pub created_date: NaiveDate,
}

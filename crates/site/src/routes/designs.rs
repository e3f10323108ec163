//! Designs gallery and single-product pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use prosper_core::catalog::{CatalogFilter, chunk, group_products};
use prosper_core::content::{locations, names};

use super::views::{ContactCard, ProductCard};
use crate::content::render_markdown;
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Cards per gallery row.
const ROW_SIZE: usize = 3;

#[derive(Template, WebTemplate)]
#[template(path = "designs.html")]
pub struct DesignsTemplate {
    pub title: &'static str,
    pub header: String,
    pub button: String,
    pub rows: Vec<Vec<ProductCard>>,
    pub contact: ContactCard,
}

#[derive(Template, WebTemplate)]
#[template(path = "design.html")]
pub struct DesignTemplate {
    pub title: String,
    pub name: String,
    /// Rendered markdown.
    pub description_html: String,
    /// Image locations, featured first.
    pub images: Vec<String>,
}

/// Gallery of every product's featured image.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<DesignsTemplate> {
    let entries = state.catalog(&CatalogFilter::FeaturedImages).await?;
    let page = state.blocks(locations::DESIGNS_PAGE).await?;
    let card = state.blocks(locations::CONTACT_CARD).await?;

    let cards: Vec<ProductCard> = entries.iter().map(ProductCard::from).collect();

    Ok(DesignsTemplate {
        title: "Designs",
        header: page.get(names::HEADER).to_owned(),
        button: page.get(names::BUTTONS).to_owned(),
        rows: chunk(&cards, ROW_SIZE),
        contact: ContactCard::from_blocks(&card),
    })
}

/// One product with all of its images.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<DesignTemplate> {
    let entries = state
        .catalog(&CatalogFilter::ProductName(name.clone()))
        .await?;

    let product = group_products(entries.as_ref().clone())
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(format!("a design named \"{name}\"")))?;

    Ok(DesignTemplate {
        title: product.name.clone(),
        description_html: render_markdown(&product.description),
        images: product.images.into_iter().map(|i| i.location).collect(),
        name: product.name,
    })
}

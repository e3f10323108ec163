//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use prosper_core::catalog::CatalogFilter;
use prosper_core::content::{locations, names};

use super::views::{ContactCard, ProductCard};
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub title: &'static str,
    pub tagline: String,
    pub featured_header: String,
    pub featured_button: String,
    pub designs_header: String,
    pub designs_button: String,
    pub featured: Vec<ProductCard>,
    pub contact: ContactCard,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<IndexTemplate> {
    let featured = state.catalog(&CatalogFilter::FeaturedProducts).await?;
    let page = state.blocks(locations::INDEX_PAGE).await?;
    let card = state.blocks(locations::CONTACT_CARD).await?;

    Ok(IndexTemplate {
        title: "Home",
        tagline: page.get(names::COVER_TAG_LINE).to_owned(),
        featured_header: page.get(names::FEATURED_HEADER).to_owned(),
        featured_button: page.get(names::FEATURED_BUTTONS).to_owned(),
        designs_header: page.get(names::DESIGNS_ALERT_HEADER).to_owned(),
        designs_button: page.get(names::DESIGNS_ALERT_BUTTON).to_owned(),
        featured: featured.iter().map(ProductCard::from).collect(),
        contact: ContactCard::from_blocks(&card),
    })
}

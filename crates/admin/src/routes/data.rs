//! Raw dump of every table, for checking what the site has stored.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, extract::State, routing::get};

use crate::db::{
    AdminUserRepository, CatalogRepository, InboxRepository, LayoutRepository, VisitorRepository,
};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::models::{AdminUser, Contact, Image, Layout, Product, Question, Request, Visitor};
use crate::state::AppState;

use super::views::AdminUserView;

#[derive(Template, WebTemplate)]
#[template(path = "data.html")]
pub struct DataTemplate {
    pub admin_user: AdminUserView,
    pub current_path: &'static str,
    pub admins: Vec<AdminUser>,
    pub products: Vec<Product>,
    pub images: Vec<Image>,
    pub layouts: Vec<Layout>,
    pub requests: Vec<Request>,
    pub questions: Vec<Question>,
    pub contacts: Vec<Contact>,
    pub visitors: Vec<Visitor>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/data", get(index))
}

/// GET /data
async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<DataTemplate> {
    let pool = state.pool();
    let catalog = CatalogRepository::new(pool);
    let inbox = InboxRepository::new(pool);

    Ok(DataTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/data",
        admins: AdminUserRepository::new(pool).list_all().await?,
        products: catalog.list_products().await?,
        images: catalog.list_all_images().await?,
        layouts: LayoutRepository::new(pool).list_all().await?,
        requests: inbox.list().await?,
        questions: inbox.list().await?,
        contacts: inbox.list().await?,
        visitors: VisitorRepository::new(pool).list_all().await?,
    })
}

//! Site management: editable page text and visitor totals.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, State},
    response::Redirect,
    routing::{get, post},
};
use chrono::Utc;
use tracing::{info, instrument};

use prosper_core::LayoutId;
use prosper_core::analytics::{VisitorSummary, visit_date};

use crate::db::{LayoutRepository, VisitorRepository};
use crate::error::Result;
use crate::filters;
use crate::forms::LayoutForm;
use crate::middleware::RequireAdminAuth;
use crate::models::Layout;
use crate::state::AppState;

use super::views::AdminUserView;

const SITE_PATH: &str = "/site";

/// Every block shown on one page location.
#[derive(Debug, Clone)]
pub struct LocationView {
    pub location: String,
    pub layouts: Vec<Layout>,
}

#[derive(Template, WebTemplate)]
#[template(path = "site.html")]
pub struct SiteTemplate {
    pub admin_user: AdminUserView,
    pub current_path: &'static str,
    pub locations: Vec<LocationView>,
    pub total_visitors: i64,
    pub visitors_this_month: i64,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(SITE_PATH, get(index))
        .route("/site/layouts/{id}", post(update_layout))
}

/// GET /site
async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<SiteTemplate> {
    let layouts = LayoutRepository::new(state.pool()).list_all().await?;
    let months = VisitorRepository::new(state.pool())
        .visitors_per_month(true)
        .await?;
    let today = visit_date(Utc::now());
    let summary = VisitorSummary::from_months(&months, today);

    Ok(SiteTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: SITE_PATH,
        locations: group_by_location(layouts),
        total_visitors: summary.total,
        visitors_this_month: summary.this_month,
    })
}

/// POST /site/layouts/{id}
#[instrument(skip_all, fields(layout_id = id, admin = %admin.username))]
async fn update_layout(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<LayoutForm>,
) -> Result<Redirect> {
    let layout = LayoutRepository::new(state.pool())
        .update_content(LayoutId::new(id), form.content.trim())
        .await?;

    info!(location = %layout.location, name = %layout.name, "Layout updated");
    Ok(Redirect::to(SITE_PATH))
}

/// Group layouts by location, locations sorted, blocks kept in id order.
fn group_by_location(layouts: Vec<Layout>) -> Vec<LocationView> {
    let mut locations: Vec<LocationView> = Vec::new();
    for layout in layouts {
        match locations.iter_mut().find(|l| l.location == layout.location) {
            Some(group) => group.layouts.push(layout),
            None => locations.push(LocationView {
                location: layout.location.clone(),
                layouts: vec![layout],
            }),
        }
    }
    locations.sort_by(|a, b| a.location.cmp(&b.location));
    locations
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn layout(id: i32, location: &str, name: &str) -> Layout {
        Layout {
            id: LayoutId::new(id),
            location: location.to_string(),
            name: name.to_string(),
            content: String::new(),
            created_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn test_group_by_location() {
        let grouped = group_by_location(vec![
            layout(1, "Index Page", "Cover Tag Line"),
            layout(2, "Contact Card", "Name"),
            layout(3, "Index Page", "Featured Header"),
        ]);

        let locations: Vec<&str> = grouped.iter().map(|g| g.location.as_str()).collect();
        assert_eq!(locations, ["Contact Card", "Index Page"]);
        let names: Vec<&str> = grouped[1].layouts.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Cover Tag Line", "Featured Header"]);
    }
}

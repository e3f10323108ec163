//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, extract::State, routing::get};
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::instrument;

use prosper_core::analytics::{VisitorSummary, visit_date};

use crate::db::{CatalogRepository, InboxRepository, VisitorRepository};
use crate::error::Result;
use crate::filters;
use crate::greeting::greeting_at;
use crate::middleware::RequireAdminAuth;
use crate::models::{Question, Request};
use crate::state::AppState;

use super::views::{AdminUserView, BarView, month_bars, source_bars};

/// Headline numbers.
#[derive(Debug, Clone, Default)]
pub struct DashboardMetrics {
    pub total_visitors: i64,
    pub average_per_month: Decimal,
    pub products: i64,
    pub completed_requests: i64,
    pub unread_requests: i64,
    pub unread_questions: i64,
}

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_user: AdminUserView,
    pub current_path: &'static str,
    pub greeting: &'static str,
    pub metrics: DashboardMetrics,
    pub visitor_chart: Vec<BarView>,
    pub marketing_chart: Vec<BarView>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

/// GET /
#[instrument(skip_all, fields(admin = %admin.username))]
async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<DashboardTemplate> {
    let pool = state.pool();
    let now = Utc::now();
    let today = visit_date(now);

    let visitors = VisitorRepository::new(pool);
    let months = visitors.visitors_per_month(true).await?;
    let summary = VisitorSummary::from_months(&months, today);
    let sources = visitors.marketing_sources().await?;

    let inbox = InboxRepository::new(pool);
    let metrics = DashboardMetrics {
        total_visitors: summary.total,
        average_per_month: summary.average_per_month,
        products: CatalogRepository::new(pool).count_products().await?,
        completed_requests: inbox.count_completed_requests().await?,
        unread_requests: inbox.count_unread::<Request>().await?,
        unread_questions: inbox.count_unread::<Question>().await?,
    };

    Ok(DashboardTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/",
        greeting: greeting_at(now, state.config().timezone),
        metrics,
        visitor_chart: month_bars(&summary.recent),
        marketing_chart: source_bars(&sources),
    })
}

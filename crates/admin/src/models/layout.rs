use chrono::NaiveDate;
use serde::Serialize;

use prosper_core::LayoutId;

/// One editable block of page text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Layout {
    pub id: LayoutId,
    pub location: String,
    pub name: String,
    pub content: String,
    pub created_date: NaiveDate,
}

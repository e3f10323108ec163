use chrono::NaiveDate;
use serde::Serialize;

use prosper_core::VisitorId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Visitor {
    pub id: VisitorId,
    pub ip_address: String,
    pub visit_count: i32,
    pub is_admin: bool,
    pub first_visit: NaiveDate,
    pub last_visit: NaiveDate,
}

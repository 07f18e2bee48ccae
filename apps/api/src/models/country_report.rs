use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Country-level weekly rollup submitted by a country manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CountryReport {
    pub id: i64,
    pub user_id: Uuid,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub city: String,
    pub hired_people: Option<i32>,
    pub orders: Option<i32>,
    pub trengo_messages: Option<i32>,
    pub crm_tickets: Option<i32>,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Counters stay `None` when the manager did not report them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCountryReport {
    pub user_id: Uuid,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub city: String,
    pub hired_people: Option<i32>,
    pub orders: Option<i32>,
    pub trengo_messages: Option<i32>,
    pub crm_tickets: Option<i32>,
    pub comments: Option<String>,
}

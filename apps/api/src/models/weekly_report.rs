use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A stored weekly report. Numeric columns are nullable in storage, so every
/// metric is optional on read even though validated inserts always fill them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct WeeklyReport {
    pub id: i64,
    pub user_id: Option<Uuid>,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,

    pub interviews: Option<i32>,
    pub ads_posted: Option<i32>,
    pub registrations: Option<i32>,
    pub full_days: Option<i32>,
    pub hiring_issues: Option<String>,
    pub stress_level: Option<i32>,
    pub overtime: Option<bool>,

    pub messages: Option<i32>,
    pub tickets_resolved: Option<i32>,
    pub orders: Option<i32>,
    pub ops_cleaner_issues: Option<String>,
    pub ops_client_issues: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// A validated weekly report with defaults applied, ready to insert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewWeeklyReport {
    pub user_id: Option<Uuid>,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,

    pub interviews: i32,
    pub ads_posted: i32,
    pub registrations: i32,
    pub full_days: i32,
    pub hiring_issues: Option<String>,
    pub stress_level: i32,
    pub overtime: bool,

    pub messages: i32,
    pub tickets_resolved: i32,
    pub orders: i32,
    pub ops_cleaner_issues: Option<String>,
    pub ops_client_issues: Option<String>,
}

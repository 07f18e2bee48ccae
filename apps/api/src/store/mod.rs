pub mod postgres;
pub mod supabase;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::country_report::{CountryReport, NewCountryReport};
use crate::models::profile::{NewProfile, Profile};
use crate::models::weekly_report::{NewWeeklyReport, WeeklyReport};
use crate::reports::week::WeekRange;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A non-2xx answer from the hosted backend, passed through as-is.
    #[error("Upstream error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Unexpected upstream response: {0}")]
    Decode(String),
}

/// Filter shared by every list operation. Results are always newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportQuery {
    /// Keep rows whose `week_start` falls inside this ISO week.
    pub week: Option<WeekRange>,
    /// `None` reads every matching row.
    pub limit: Option<i64>,
}

impl ReportQuery {
    pub fn all_in(week: Option<WeekRange>) -> Self {
        Self { week, limit: None }
    }
}

/// Persistence seam for reports and profiles. Append-only: there is no
/// update or delete.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn insert_weekly_report(
        &self,
        report: &NewWeeklyReport,
    ) -> Result<WeeklyReport, StoreError>;

    async fn list_weekly_reports(
        &self,
        query: &ReportQuery,
    ) -> Result<Vec<WeeklyReport>, StoreError>;

    async fn insert_country_report(
        &self,
        report: &NewCountryReport,
    ) -> Result<CountryReport, StoreError>;

    async fn list_country_reports(
        &self,
        query: &ReportQuery,
    ) -> Result<Vec<CountryReport>, StoreError>;

    async fn insert_profile(&self, profile: &NewProfile) -> Result<Profile, StoreError>;

    async fn list_profiles(&self, limit: Option<i64>) -> Result<Vec<Profile>, StoreError>;
}

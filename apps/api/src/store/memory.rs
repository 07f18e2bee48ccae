use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::models::country_report::{CountryReport, NewCountryReport};
use crate::models::profile::{NewProfile, Profile};
use crate::models::weekly_report::{NewWeeklyReport, WeeklyReport};
use crate::store::{ReportQuery, ReportStore, StoreError};

/// In-process store used by handler tests. `failing` makes every call
/// answer like an upstream that rejects the request.
#[derive(Default)]
pub struct InMemoryStore {
    weekly: Mutex<Vec<WeeklyReport>>,
    country: Mutex<Vec<CountryReport>>,
    profiles: Mutex<Vec<Profile>>,
    failure: Option<(u16, String)>,
}

impl InMemoryStore {
    pub fn failing(status: u16, message: &str) -> Self {
        Self {
            failure: Some((status, message.to_string())),
            ..Default::default()
        }
    }

    /// Seeds a row as the store would hold it, bypassing validation.
    pub async fn push_weekly(&self, report: WeeklyReport) {
        self.weekly.lock().await.push(report);
    }

    fn check(&self) -> Result<(), StoreError> {
        match &self.failure {
            Some((status, message)) => Err(StoreError::Upstream {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn select<T: Clone>(
    rows: &[T],
    query: &ReportQuery,
    id: impl Fn(&T) -> i64,
    week_start: impl Fn(&T) -> chrono::NaiveDate,
) -> Vec<T> {
    let mut matched: Vec<T> = rows
        .iter()
        .filter(|r| query.week.map_or(true, |w| w.contains(week_start(r))))
        .cloned()
        .collect();
    matched.sort_by_key(|r| std::cmp::Reverse(id(r)));
    if let Some(limit) = query.limit {
        matched.truncate(limit.max(0) as usize);
    }
    matched
}

#[async_trait]
impl ReportStore for InMemoryStore {
    async fn insert_weekly_report(
        &self,
        report: &NewWeeklyReport,
    ) -> Result<WeeklyReport, StoreError> {
        self.check()?;
        let mut rows = self.weekly.lock().await;
        let id = rows.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let created = WeeklyReport {
            id,
            user_id: report.user_id,
            week_start: report.week_start,
            week_end: report.week_end,
            interviews: Some(report.interviews),
            ads_posted: Some(report.ads_posted),
            registrations: Some(report.registrations),
            full_days: Some(report.full_days),
            hiring_issues: report.hiring_issues.clone(),
            stress_level: Some(report.stress_level),
            overtime: Some(report.overtime),
            messages: Some(report.messages),
            tickets_resolved: Some(report.tickets_resolved),
            orders: Some(report.orders),
            ops_cleaner_issues: report.ops_cleaner_issues.clone(),
            ops_client_issues: report.ops_client_issues.clone(),
            created_at: Utc::now(),
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn list_weekly_reports(
        &self,
        query: &ReportQuery,
    ) -> Result<Vec<WeeklyReport>, StoreError> {
        self.check()?;
        let rows = self.weekly.lock().await;
        Ok(select(&rows, query, |r| r.id, |r| r.week_start))
    }

    async fn insert_country_report(
        &self,
        report: &NewCountryReport,
    ) -> Result<CountryReport, StoreError> {
        self.check()?;
        let mut rows = self.country.lock().await;
        let id = rows.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let created = CountryReport {
            id,
            user_id: report.user_id,
            week_start: report.week_start,
            week_end: report.week_end,
            city: report.city.clone(),
            hired_people: report.hired_people,
            orders: report.orders,
            trengo_messages: report.trengo_messages,
            crm_tickets: report.crm_tickets,
            comments: report.comments.clone(),
            created_at: Utc::now(),
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn list_country_reports(
        &self,
        query: &ReportQuery,
    ) -> Result<Vec<CountryReport>, StoreError> {
        self.check()?;
        let rows = self.country.lock().await;
        Ok(select(&rows, query, |r| r.id, |r| r.week_start))
    }

    async fn insert_profile(&self, profile: &NewProfile) -> Result<Profile, StoreError> {
        self.check()?;
        let mut rows = self.profiles.lock().await;
        if rows.iter().any(|p| p.email == profile.email) {
            return Err(StoreError::Upstream {
                status: 409,
                message: format!("duplicate email {}", profile.email),
            });
        }
        let created = Profile {
            user_id: profile.user_id,
            full_name: profile.full_name.clone(),
            email: profile.email.clone(),
            city: profile.city.clone(),
            role: Some(profile.role),
            salary: profile.salary,
            schedule: profile.schedule.clone(),
            created_at: Utc::now(),
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn list_profiles(&self, limit: Option<i64>) -> Result<Vec<Profile>, StoreError> {
        self.check()?;
        let rows = self.profiles.lock().await;
        let mut listed: Vec<Profile> = rows.iter().rev().cloned().collect();
        if let Some(limit) = limit {
            listed.truncate(limit.max(0) as usize);
        }
        Ok(listed)
    }
}

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::config::SupabaseConfig;
use crate::models::country_report::{CountryReport, NewCountryReport};
use crate::models::profile::{NewProfile, Profile};
use crate::models::weekly_report::{NewWeeklyReport, WeeklyReport};
use crate::store::{ReportQuery, ReportStore, StoreError};

const WEEKLY_REPORTS: &str = "weekly_reports";
const COUNTRY_REPORTS: &str = "country_reports";
const PROFILES: &str = "profiles";

/// Rows requested per round trip. PostgREST may cap a response below this
/// (`db-max-rows`), so paging only stops on an empty page or a met limit.
const PAGE_SIZE: i64 = 1000;

/// Proxies every operation to the Supabase PostgREST API.
///
/// Requests authenticate with the configured key; the service-role key is
/// used when present so server-side writes bypass row-level security.
/// There are no retries: a failed call surfaces directly to the caller.
#[derive(Clone)]
pub struct SupabaseReportStore {
    client: Client,
    rest_url: String,
    api_key: String,
}

impl SupabaseReportStore {
    pub fn new(config: &SupabaseConfig) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            rest_url: rest_url(&config.url),
            api_key: config.api_key.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{table}", self.rest_url)
    }

    async fn insert<T, R>(&self, table: &str, row: &T) -> Result<R, StoreError>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;

        let rows: Vec<R> = read_json(response).await?;
        debug!("Inserted row into {table}");
        rows.into_iter().next().ok_or_else(|| {
            StoreError::Decode(format!("insert into {table} returned no representation"))
        })
    }

    async fn select<R: DeserializeOwned>(
        &self,
        table: &str,
        params: &[(&'static str, String)],
    ) -> Result<Vec<R>, StoreError> {
        let response = self
            .client
            .get(self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(params)
            .send()
            .await?;

        let rows: Vec<R> = read_json(response).await?;
        debug!("Fetched {} rows from {table}", rows.len());
        Ok(rows)
    }

    /// Reads pages until `limit` rows are collected or a page comes back
    /// empty. `cursor` yields the parameter that skips past the rows so far.
    async fn select_pages<R, F>(
        &self,
        table: &str,
        params: &[(&'static str, String)],
        limit: Option<i64>,
        cursor: F,
    ) -> Result<Vec<R>, StoreError>
    where
        R: DeserializeOwned,
        F: Fn(&[R]) -> Option<(&'static str, String)>,
    {
        let mut rows: Vec<R> = Vec::new();
        loop {
            let wanted = match limit {
                Some(limit) => (limit - rows.len() as i64).min(PAGE_SIZE),
                None => PAGE_SIZE,
            };
            if wanted <= 0 {
                break;
            }

            let mut page_params = params.to_vec();
            page_params.push(("limit", wanted.to_string()));
            page_params.extend(cursor(&rows));

            let page: Vec<R> = self.select(table, &page_params).await?;
            if page.is_empty() {
                break;
            }
            rows.extend(page);
        }
        Ok(rows)
    }
}

#[async_trait]
impl ReportStore for SupabaseReportStore {
    async fn insert_weekly_report(
        &self,
        report: &NewWeeklyReport,
    ) -> Result<WeeklyReport, StoreError> {
        self.insert(WEEKLY_REPORTS, report).await
    }

    async fn list_weekly_reports(
        &self,
        query: &ReportQuery,
    ) -> Result<Vec<WeeklyReport>, StoreError> {
        self.select_pages(WEEKLY_REPORTS, &list_params(query), query.limit, |rows: &[WeeklyReport]| {
            rows.last().map(|last| ("id", format!("lt.{}", last.id)))
        })
        .await
    }

    async fn insert_country_report(
        &self,
        report: &NewCountryReport,
    ) -> Result<CountryReport, StoreError> {
        self.insert(COUNTRY_REPORTS, report).await
    }

    async fn list_country_reports(
        &self,
        query: &ReportQuery,
    ) -> Result<Vec<CountryReport>, StoreError> {
        self.select_pages(COUNTRY_REPORTS, &list_params(query), query.limit, |rows: &[CountryReport]| {
            rows.last().map(|last| ("id", format!("lt.{}", last.id)))
        })
        .await
    }

    async fn insert_profile(&self, profile: &NewProfile) -> Result<Profile, StoreError> {
        self.insert(PROFILES, profile).await
    }

    async fn list_profiles(&self, limit: Option<i64>) -> Result<Vec<Profile>, StoreError> {
        // Profiles have no serial key, so they page by offset under a total order.
        let params = [
            ("select", "*".to_string()),
            ("order", "created_at.desc,user_id.desc".to_string()),
        ];
        self.select_pages(PROFILES, &params, limit, |rows: &[Profile]| {
            (!rows.is_empty()).then(|| ("offset", rows.len().to_string()))
        })
        .await
    }
}

/// `https://xyz.supabase.co/` -> `https://xyz.supabase.co/rest/v1`
fn rest_url(base: &str) -> String {
    format!("{}/rest/v1", base.trim_end_matches('/'))
}

/// PostgREST filters for a report listing. Paging adds `limit` and the cursor.
fn list_params(query: &ReportQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("select", "*".to_string()),
        ("order", "id.desc".to_string()),
    ];
    if let Some(week) = query.week {
        params.push(("week_start", format!("gte.{}", week.start)));
        params.push(("week_start", format!("lte.{}", week.end)));
    }
    params
}

async fn read_json<R: DeserializeOwned>(response: Response) -> Result<R, StoreError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!("Supabase returned {}: {}", status, body);
        let message = if body.trim().is_empty() {
            status.canonical_reason().unwrap_or("upstream error").to_string()
        } else {
            body
        };
        return Err(StoreError::Upstream {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))
}

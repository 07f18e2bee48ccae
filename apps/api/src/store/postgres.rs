use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::models::country_report::{CountryReport, NewCountryReport};
use crate::models::profile::{NewProfile, Profile};
use crate::models::weekly_report::{NewWeeklyReport, WeeklyReport};
use crate::store::{ReportQuery, ReportStore, StoreError};

/// Reads and writes the report tables directly through a pooled connection.
#[derive(Clone)]
pub struct PgReportStore {
    pool: PgPool,
}

impl PgReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn insert_weekly_report(
        &self,
        report: &NewWeeklyReport,
    ) -> Result<WeeklyReport, StoreError> {
        let created: WeeklyReport = sqlx::query_as(
            r#"
            INSERT INTO weekly_reports
                (user_id, week_start, week_end,
                 interviews, ads_posted, registrations, full_days, hiring_issues,
                 stress_level, overtime,
                 messages, tickets_resolved, orders, ops_cleaner_issues, ops_client_issues)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(report.user_id)
        .bind(report.week_start)
        .bind(report.week_end)
        .bind(report.interviews)
        .bind(report.ads_posted)
        .bind(report.registrations)
        .bind(report.full_days)
        .bind(&report.hiring_issues)
        .bind(report.stress_level)
        .bind(report.overtime)
        .bind(report.messages)
        .bind(report.tickets_resolved)
        .bind(report.orders)
        .bind(&report.ops_cleaner_issues)
        .bind(&report.ops_client_issues)
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Inserted weekly report {} for week {}..{}",
            created.id, created.week_start, created.week_end
        );
        Ok(created)
    }

    async fn list_weekly_reports(
        &self,
        query: &ReportQuery,
    ) -> Result<Vec<WeeklyReport>, StoreError> {
        // LIMIT NULL is no limit in PostgreSQL.
        let rows: Vec<WeeklyReport> = sqlx::query_as(
            r#"
            SELECT * FROM weekly_reports
            WHERE ($1::date IS NULL OR week_start >= $1)
              AND ($2::date IS NULL OR week_start <= $2)
            ORDER BY id DESC
            LIMIT $3
            "#,
        )
        .bind(query.week.map(|w| w.start))
        .bind(query.week.map(|w| w.end))
        .bind(query.limit)
        .fetch_all(&self.pool)
        .await?;

        debug!("Fetched {} weekly reports", rows.len());
        Ok(rows)
    }

    async fn insert_country_report(
        &self,
        report: &NewCountryReport,
    ) -> Result<CountryReport, StoreError> {
        let created: CountryReport = sqlx::query_as(
            r#"
            INSERT INTO country_reports
                (user_id, week_start, week_end, city,
                 hired_people, orders, trengo_messages, crm_tickets, comments)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(report.user_id)
        .bind(report.week_start)
        .bind(report.week_end)
        .bind(&report.city)
        .bind(report.hired_people)
        .bind(report.orders)
        .bind(report.trengo_messages)
        .bind(report.crm_tickets)
        .bind(&report.comments)
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Inserted country report {} for {} ({})",
            created.id, created.city, created.week_start
        );
        Ok(created)
    }

    async fn list_country_reports(
        &self,
        query: &ReportQuery,
    ) -> Result<Vec<CountryReport>, StoreError> {
        let rows: Vec<CountryReport> = sqlx::query_as(
            r#"
            SELECT * FROM country_reports
            WHERE ($1::date IS NULL OR week_start >= $1)
              AND ($2::date IS NULL OR week_start <= $2)
            ORDER BY id DESC
            LIMIT $3
            "#,
        )
        .bind(query.week.map(|w| w.start))
        .bind(query.week.map(|w| w.end))
        .bind(query.limit)
        .fetch_all(&self.pool)
        .await?;

        debug!("Fetched {} country reports", rows.len());
        Ok(rows)
    }

    async fn insert_profile(&self, profile: &NewProfile) -> Result<Profile, StoreError> {
        let created: Profile = sqlx::query_as(
            r#"
            INSERT INTO profiles (user_id, full_name, email, city, role, salary, schedule)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING user_id, full_name, email, city, role, salary, schedule, created_at
            "#,
        )
        .bind(profile.user_id)
        .bind(&profile.full_name)
        .bind(&profile.email)
        .bind(&profile.city)
        .bind(profile.role.as_str())
        .bind(profile.salary)
        .bind(&profile.schedule)
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted profile {} ({})", created.user_id, profile.role);
        Ok(created)
    }

    async fn list_profiles(&self, limit: Option<i64>) -> Result<Vec<Profile>, StoreError> {
        let rows: Vec<Profile> = sqlx::query_as(
            r#"
            SELECT user_id, full_name, email, city, role, salary, schedule, created_at
            FROM profiles
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!("Fetched {} profiles", rows.len());
        Ok(rows)
    }
}

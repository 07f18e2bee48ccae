use std::fmt;
use std::ops::RangeInclusive;

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::models::country_report::NewCountryReport;
use crate::models::profile::{NewProfile, Role};
use crate::models::weekly_report::NewWeeklyReport;
use crate::reports::week::WeekRange;
use crate::store::ReportQuery;

pub const STRESS_LEVEL_RANGE: RangeInclusive<i32> = 0..=10;
pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const MAX_LIST_LIMIT: i64 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every field that failed validation, in the order it was checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        Self {
            fields: vec![FieldError {
                field: field.to_string(),
                message: message.into(),
            }],
        }
    }

    #[cfg(test)]
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// Raw body of `POST /weekly_reports`.
#[derive(Debug, Default, Deserialize)]
pub struct WeeklyReportInput {
    pub user_id: Option<Uuid>,
    pub week_start: Option<NaiveDate>,
    pub week_end: Option<NaiveDate>,

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
}

/// Raw body of `POST /country_reports`.
#[derive(Debug, Default, Deserialize)]
pub struct CountryReportInput {
    pub user_id: Option<Uuid>,
    pub week_start: Option<NaiveDate>,
    pub week_end: Option<NaiveDate>,
    pub city: Option<String>,
    pub hired_people: Option<i32>,
    pub orders: Option<i32>,
    pub trengo_messages: Option<i32>,
    pub crm_tickets: Option<i32>,
    pub comments: Option<String>,
}

/// Raw body of `POST /profiles`. `role` stays a string so an unknown value
/// is reported against the field instead of failing JSON decoding.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileInput {
    pub user_id: Option<Uuid>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub role: Option<String>,
    pub salary: Option<f64>,
    pub schedule: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub week_iso: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WeekParams {
    pub week_iso: Option<String>,
}

#[derive(Debug, Default)]
struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    fn required<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.push(field, "field is required");
        }
        value
    }

    fn required_text(&mut self, field: &str, value: Option<String>) -> Option<String> {
        self.required(field, optional_text(value))
    }

    fn counter(&mut self, field: &str, value: Option<i32>) -> Option<i32> {
        if let Some(v) = value {
            if v < 0 {
                self.push(field, format!("must be >= 0, got {v}"));
            }
        }
        value
    }

    fn period(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        if let (Some(start), Some(end)) = (start, end) {
            if end < start {
                self.push(
                    "week_end",
                    format!("must not be before week_start ({start}), got {end}"),
                );
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_error(self) -> ValidationError {
        ValidationError { fields: self.0 }
    }
}

/// Decodes a JSON body into an input struct whose fields are all optional.
///
/// On a type mismatch each top-level key is decoded on its own, so every
/// wrong-typed field is reported by name. Non-object bodies fail as `body`.
pub fn decode_input<T: DeserializeOwned>(body: Value) -> Result<T, ValidationError> {
    let err = match serde_json::from_value::<T>(body.clone()) {
        Ok(input) => return Ok(input),
        Err(err) => err,
    };

    let fields: Vec<FieldError> = match &body {
        Value::Object(map) => map
            .iter()
            .filter_map(|(key, value)| {
                let single = Value::Object(Map::from_iter([(key.clone(), value.clone())]));
                serde_json::from_value::<T>(single)
                    .err()
                    .map(|e| FieldError {
                        field: key.clone(),
                        message: e.to_string(),
                    })
            })
            .collect(),
        _ => Vec::new(),
    };

    if fields.is_empty() {
        Err(ValidationError::single("body", err.to_string()))
    } else {
        Err(ValidationError { fields })
    }
}

/// Trims free text and collapses blank strings to `None`.
fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Validates a weekly report body. Absent metrics default to 0, overtime to false.
pub fn validate_weekly_report(
    input: WeeklyReportInput,
) -> Result<NewWeeklyReport, ValidationError> {
    let mut errors = FieldErrors::default();

    let week_start = errors.required("week_start", input.week_start);
    let week_end = errors.required("week_end", input.week_end);
    errors.period(week_start, week_end);

    let interviews = errors.counter("interviews", input.interviews);
    let ads_posted = errors.counter("ads_posted", input.ads_posted);
    let registrations = errors.counter("registrations", input.registrations);
    let full_days = errors.counter("full_days", input.full_days);
    let messages = errors.counter("messages", input.messages);
    let tickets_resolved = errors.counter("tickets_resolved", input.tickets_resolved);
    let orders = errors.counter("orders", input.orders);

    let stress_level = input.stress_level.unwrap_or(0);
    if !STRESS_LEVEL_RANGE.contains(&stress_level) {
        errors.push(
            "stress_level",
            format!(
                "must be between {} and {}, got {stress_level}",
                STRESS_LEVEL_RANGE.start(),
                STRESS_LEVEL_RANGE.end()
            ),
        );
    }

    match (week_start, week_end) {
        (Some(week_start), Some(week_end)) if errors.is_empty() => Ok(NewWeeklyReport {
            user_id: input.user_id,
            week_start,
            week_end,
            interviews: interviews.unwrap_or(0),
            ads_posted: ads_posted.unwrap_or(0),
            registrations: registrations.unwrap_or(0),
            full_days: full_days.unwrap_or(0),
            hiring_issues: optional_text(input.hiring_issues),
            stress_level,
            overtime: input.overtime.unwrap_or(false),
            messages: messages.unwrap_or(0),
            tickets_resolved: tickets_resolved.unwrap_or(0),
            orders: orders.unwrap_or(0),
            ops_cleaner_issues: optional_text(input.ops_cleaner_issues),
            ops_client_issues: optional_text(input.ops_client_issues),
        }),
        _ => Err(errors.into_error()),
    }
}

/// Validates a country rollup body. Absent counters stay null.
pub fn validate_country_report(
    input: CountryReportInput,
) -> Result<NewCountryReport, ValidationError> {
    let mut errors = FieldErrors::default();

    let user_id = errors.required("user_id", input.user_id);
    let week_start = errors.required("week_start", input.week_start);
    let week_end = errors.required("week_end", input.week_end);
    errors.period(week_start, week_end);
    let city = errors.required_text("city", input.city);

    let hired_people = errors.counter("hired_people", input.hired_people);
    let orders = errors.counter("orders", input.orders);
    let trengo_messages = errors.counter("trengo_messages", input.trengo_messages);
    let crm_tickets = errors.counter("crm_tickets", input.crm_tickets);

    match (user_id, week_start, week_end, city) {
        (Some(user_id), Some(week_start), Some(week_end), Some(city)) if errors.is_empty() => {
            Ok(NewCountryReport {
                user_id,
                week_start,
                week_end,
                city,
                hired_people,
                orders,
                trengo_messages,
                crm_tickets,
                comments: optional_text(input.comments),
            })
        }
        _ => Err(errors.into_error()),
    }
}

pub fn validate_profile(input: ProfileInput) -> Result<NewProfile, ValidationError> {
    let mut errors = FieldErrors::default();

    let user_id = errors.required("user_id", input.user_id);
    let full_name = errors.required_text("full_name", input.full_name);

    let email = errors
        .required_text("email", input.email)
        .map(|e| e.to_lowercase());
    if let Some(email) = &email {
        if !is_plausible_email(email) {
            errors.push("email", format!("'{email}' is not a valid email address"));
        }
    }

    let city = errors.required_text("city", input.city);

    let role = match errors.required_text("role", input.role) {
        Some(raw) => match raw.parse::<Role>() {
            Ok(role) => Some(role),
            Err(e) => {
                errors.push("role", e.to_string());
                None
            }
        },
        None => None,
    };

    if let Some(salary) = input.salary {
        if !salary.is_finite() || salary < 0.0 {
            errors.push("salary", format!("must be a non-negative amount, got {salary}"));
        }
    }

    match (user_id, full_name, email, city, role) {
        (Some(user_id), Some(full_name), Some(email), Some(city), Some(role))
            if errors.is_empty() =>
        {
            Ok(NewProfile {
                user_id,
                full_name,
                email,
                city,
                role,
                salary: input.salary,
                schedule: optional_text(input.schedule),
            })
        }
        _ => Err(errors.into_error()),
    }
}

pub fn parse_week_param(week_iso: Option<&str>) -> Result<Option<WeekRange>, ValidationError> {
    match week_iso.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => raw
            .parse::<WeekRange>()
            .map(Some)
            .map_err(|e| ValidationError::single("week_iso", e.to_string())),
        None => Ok(None),
    }
}

/// `limit` defaults to 50, must be positive, and is clamped to 500.
pub fn validate_limit(limit: Option<i64>) -> Result<i64, ValidationError> {
    let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
    if limit < 1 {
        return Err(ValidationError::single(
            "limit",
            format!("must be >= 1, got {limit}"),
        ));
    }
    Ok(limit.min(MAX_LIST_LIMIT))
}

/// Resolves list query parameters, reporting a bad limit and a bad week together.
pub fn validate_list_params(params: ListParams) -> Result<ReportQuery, ValidationError> {
    match (
        validate_limit(params.limit),
        parse_week_param(params.week_iso.as_deref()),
    ) {
        (Ok(limit), Ok(week)) => Ok(ReportQuery {
            week,
            limit: Some(limit),
        }),
        (limit, week) => {
            let fields = [limit.err(), week.err()]
                .into_iter()
                .flatten()
                .flat_map(|e| e.fields)
                .collect();
            Err(ValidationError { fields })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekly_input() -> WeeklyReportInput {
        WeeklyReportInput {
            week_start: Some(date(2024, 1, 1)),
            week_end: Some(date(2024, 1, 7)),
            ..Default::default()
        }
    }

    #[test]
    fn test_weekly_report_applies_defaults() {
        let report = validate_weekly_report(weekly_input()).unwrap();
        assert_eq!(report.interviews, 0);
        assert_eq!(report.orders, 0);
        assert_eq!(report.stress_level, 0);
        assert!(!report.overtime);
        assert_eq!(report.user_id, None);
        assert_eq!(report.hiring_issues, None);
    }

    #[test]
    fn test_weekly_report_accepts_full_stress_range() {
        for level in STRESS_LEVEL_RANGE {
            let input = WeeklyReportInput {
                stress_level: Some(level),
                ..weekly_input()
            };
            assert_eq!(validate_weekly_report(input).unwrap().stress_level, level);
        }
    }

    #[test]
    fn test_weekly_report_rejects_stress_outside_range() {
        for level in [-1, 11, 100] {
            let input = WeeklyReportInput {
                stress_level: Some(level),
                ..weekly_input()
            };
            let err = validate_weekly_report(input).unwrap_err();
            assert_eq!(err.fields.len(), 1);
            assert!(err.has_field("stress_level"));
        }
    }

    #[test]
    fn test_weekly_report_enumerates_every_offending_field() {
        let input = WeeklyReportInput {
            interviews: Some(-2),
            stress_level: Some(12),
            ..Default::default()
        };
        let err = validate_weekly_report(input).unwrap_err();
        let fields: Vec<&str> = err.fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["week_start", "week_end", "interviews", "stress_level"]
        );
    }

    #[test]
    fn test_weekly_report_rejects_inverted_period() {
        let input = WeeklyReportInput {
            week_start: Some(date(2024, 1, 7)),
            week_end: Some(date(2024, 1, 1)),
            ..Default::default()
        };
        let err = validate_weekly_report(input).unwrap_err();
        assert!(err.has_field("week_end"));
    }

    #[test]
    fn test_weekly_report_trims_blank_text_to_none() {
        let input = WeeklyReportInput {
            hiring_issues: Some("   ".to_string()),
            ops_client_issues: Some("  late payments ".to_string()),
            ..weekly_input()
        };
        let report = validate_weekly_report(input).unwrap();
        assert_eq!(report.hiring_issues, None);
        assert_eq!(report.ops_client_issues.as_deref(), Some("late payments"));
    }

    #[test]
    fn test_weekly_report_decodes_from_json_with_dates() {
        let input: WeeklyReportInput = serde_json::from_value(serde_json::json!({
            "week_start": "2024-01-01",
            "week_end": "2024-01-07",
            "interviews": 5,
            "stress_level": 7,
            "unknown_field": "ignored"
        }))
        .unwrap();
        let report = validate_weekly_report(input).unwrap();
        assert_eq!(report.week_start, date(2024, 1, 1));
        assert_eq!(report.interviews, 5);
        assert_eq!(report.stress_level, 7);
    }

    #[test]
    fn test_decode_input_names_every_wrong_typed_field() {
        let err = decode_input::<WeeklyReportInput>(serde_json::json!({
            "week_start": "2024-01-01",
            "week_end": "next sunday",
            "stress_level": "high",
            "interviews": 3
        }))
        .unwrap_err();
        let mut fields: Vec<&str> = err.fields.iter().map(|f| f.field.as_str()).collect();
        fields.sort_unstable();
        assert_eq!(fields, vec!["stress_level", "week_end"]);
    }

    #[test]
    fn test_decode_input_rejects_non_object_as_body() {
        let err = decode_input::<WeeklyReportInput>(serde_json::json!([1, 2, 3])).unwrap_err();
        assert_eq!(err.fields.len(), 1);
        assert!(err.has_field("body"));
    }

    #[test]
    fn test_decode_input_accepts_valid_object() {
        let input: CountryReportInput = decode_input(serde_json::json!({
            "city": "Warsaw",
            "orders": 4
        }))
        .unwrap();
        assert_eq!(input.city.as_deref(), Some("Warsaw"));
        assert_eq!(input.orders, Some(4));
    }

    #[test]
    fn test_country_report_keeps_absent_counters_null() {
        let input = CountryReportInput {
            user_id: Some(Uuid::new_v4()),
            week_start: Some(date(2024, 1, 1)),
            week_end: Some(date(2024, 1, 7)),
            city: Some("Warsaw".to_string()),
            orders: Some(12),
            ..Default::default()
        };
        let report = validate_country_report(input).unwrap();
        assert_eq!(report.orders, Some(12));
        assert_eq!(report.hired_people, None);
        assert_eq!(report.crm_tickets, None);
    }

    #[test]
    fn test_country_report_requires_user_and_city() {
        let input = CountryReportInput {
            week_start: Some(date(2024, 1, 1)),
            week_end: Some(date(2024, 1, 7)),
            city: Some(" ".to_string()),
            crm_tickets: Some(-1),
            ..Default::default()
        };
        let err = validate_country_report(input).unwrap_err();
        assert!(err.has_field("user_id"));
        assert!(err.has_field("city"));
        assert!(err.has_field("crm_tickets"));
    }

    #[test]
    fn test_profile_validation() {
        let input = ProfileInput {
            user_id: Some(Uuid::new_v4()),
            full_name: Some("Anna Nowak".to_string()),
            email: Some("Anna@Example.com".to_string()),
            city: Some("Gdansk".to_string()),
            role: Some("country_manager".to_string()),
            salary: Some(5200.0),
            schedule: None,
        };
        let profile = validate_profile(input).unwrap();
        assert_eq!(profile.role, Role::CountryManager);
        assert_eq!(profile.email, "anna@example.com");
    }

    #[test]
    fn test_profile_rejects_bad_role_email_and_salary() {
        let input = ProfileInput {
            user_id: Some(Uuid::new_v4()),
            full_name: Some("Anna Nowak".to_string()),
            email: Some("not-an-email".to_string()),
            city: Some("Gdansk".to_string()),
            role: Some("admin".to_string()),
            salary: Some(-1.0),
            schedule: None,
        };
        let err = validate_profile(input).unwrap_err();
        assert!(err.has_field("email"));
        assert!(err.has_field("role"));
        assert!(err.has_field("salary"));
    }

    #[test]
    fn test_list_params_default_and_clamp() {
        let query = validate_list_params(ListParams::default()).unwrap();
        assert_eq!(query.limit, Some(DEFAULT_LIST_LIMIT));
        assert_eq!(query.week, None);

        let query = validate_list_params(ListParams {
            limit: Some(10_000),
            week_iso: Some("2024-W01".to_string()),
        })
        .unwrap();
        assert_eq!(query.limit, Some(MAX_LIST_LIMIT));
        assert_eq!(query.week.unwrap().start, date(2024, 1, 1));
    }

    #[test]
    fn test_list_params_reject_zero_limit_and_bad_week() {
        let err = validate_list_params(ListParams {
            limit: Some(0),
            week_iso: Some("last-week".to_string()),
        })
        .unwrap_err();
        assert!(err.has_field("limit"));
        assert!(err.has_field("week_iso"));
    }

    #[test]
    fn test_limit_bounds() {
        assert_eq!(validate_limit(None).unwrap(), DEFAULT_LIST_LIMIT);
        assert_eq!(validate_limit(Some(1)).unwrap(), 1);
        assert_eq!(validate_limit(Some(501)).unwrap(), MAX_LIST_LIMIT);
        assert!(validate_limit(Some(-5)).unwrap_err().has_field("limit"));
    }

    #[test]
    fn test_blank_week_param_means_no_filter() {
        assert_eq!(parse_week_param(Some("  ")).unwrap(), None);
        assert_eq!(parse_week_param(None).unwrap(), None);
    }
}

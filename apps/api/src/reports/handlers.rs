use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::errors::AppError;
use crate::models::country_report::CountryReport;
use crate::models::profile::Profile;
use crate::models::weekly_report::WeeklyReport;
use crate::reports::export::{encode_csv, export_filename};
use crate::reports::summary::{summarize, ReportSummary};
use crate::reports::validation::{
    decode_input, parse_week_param, validate_country_report, validate_limit, validate_list_params,
    validate_profile, validate_weekly_report, CountryReportInput, LimitParams, ListParams,
    ProfileInput, WeekParams, WeeklyReportInput,
};
use crate::state::AppState;
use crate::store::ReportQuery;

/// POST /weekly_reports
pub async fn handle_create_weekly_report(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<WeeklyReport>), AppError> {
    let Json(body) = payload?;
    let report = validate_weekly_report(decode_input::<WeeklyReportInput>(body)?)?;
    let created = state.store.insert_weekly_report(&report).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /weekly_reports?limit=N&week_iso=YYYY-Www
pub async fn handle_list_weekly_reports(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<WeeklyReport>>, AppError> {
    let Query(params) = params?;
    let query = validate_list_params(params)?;
    let reports = state.store.list_weekly_reports(&query).await?;
    Ok(Json(reports))
}

/// POST /country_reports
pub async fn handle_create_country_report(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<CountryReport>), AppError> {
    let Json(body) = payload?;
    let report = validate_country_report(decode_input::<CountryReportInput>(body)?)?;
    let created = state.store.insert_country_report(&report).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /country_reports?limit=N&week_iso=YYYY-Www
pub async fn handle_list_country_reports(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<CountryReport>>, AppError> {
    let Query(params) = params?;
    let query = validate_list_params(params)?;
    let reports = state.store.list_country_reports(&query).await?;
    Ok(Json(reports))
}

/// POST /profiles
pub async fn handle_create_profile(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Profile>), AppError> {
    let Json(body) = payload?;
    let profile = validate_profile(decode_input::<ProfileInput>(body)?)?;
    let created = state.store.insert_profile(&profile).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /profiles?limit=N
pub async fn handle_list_profiles(
    State(state): State<AppState>,
    params: Result<Query<LimitParams>, QueryRejection>,
) -> Result<Json<Vec<Profile>>, AppError> {
    let Query(params) = params?;
    let limit = validate_limit(params.limit)?;
    let profiles = state.store.list_profiles(Some(limit)).await?;
    Ok(Json(profiles))
}

/// GET /summary?week_iso=YYYY-Www
pub async fn handle_summary(
    State(state): State<AppState>,
    params: Result<Query<WeekParams>, QueryRejection>,
) -> Result<Json<ReportSummary>, AppError> {
    let Query(params) = params?;
    let week = parse_week_param(params.week_iso.as_deref())?;
    let reports = state
        .store
        .list_weekly_reports(&ReportQuery::all_in(week))
        .await?;
    Ok(Json(summarize(&reports)))
}

/// GET /export?week_iso=YYYY-Www
/// Returns the weekly reports as a CSV attachment.
pub async fn handle_export(
    State(state): State<AppState>,
    params: Result<Query<WeekParams>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(params) = params?;
    let week = parse_week_param(params.week_iso.as_deref())?;
    let reports = state
        .store
        .list_weekly_reports(&ReportQuery::all_in(week))
        .await?;

    let body = encode_csv(&reports)?;
    let filename = export_filename(week.map(|w| w.to_string()).as_deref());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response())
}

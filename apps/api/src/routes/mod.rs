pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::reports::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::health_handler))
        .route("/health", get(health::health_handler))
        .route(
            "/weekly_reports",
            post(handlers::handle_create_weekly_report).get(handlers::handle_list_weekly_reports),
        )
        .route(
            "/country_reports",
            post(handlers::handle_create_country_report)
                .get(handlers::handle_list_country_reports),
        )
        .route(
            "/profiles",
            post(handlers::handle_create_profile).get(handlers::handle_list_profiles),
        )
        .route("/summary", get(handlers::handle_summary))
        .route("/export", get(handlers::handle_export))
        .with_state(state)
}

mod config;
mod db;
mod errors;
mod models;
mod reports;
mod routes;
mod state;
mod store;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, StoreConfig};
use crate::db::{create_pool, run_migrations};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::postgres::PgReportStore;
use crate::store::supabase::SupabaseReportStore;
use crate::store::ReportStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing store settings)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting reports API v{}", env!("CARGO_PKG_VERSION"));

    let store = build_store(&config).await?;
    let state = AppState { store };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors(&config.cors_origins)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Connects the configured backend. PostgreSQL gets its schema migrated first.
async fn build_store(config: &Config) -> Result<Arc<dyn ReportStore>> {
    match &config.store {
        StoreConfig::Postgres { database_url } => {
            let pool = create_pool(database_url).await?;
            run_migrations(&pool).await?;
            Ok(Arc::new(PgReportStore::new(pool)))
        }
        StoreConfig::Supabase(supabase) => {
            let store = SupabaseReportStore::new(supabase)?;
            info!(
                "Proxying to Supabase at {} ({} key, {}s timeout)",
                supabase.url,
                if supabase.uses_service_role {
                    "service-role"
                } else {
                    "anon"
                },
                supabase.timeout.as_secs()
            );
            Ok(Arc::new(store))
        }
    }
}

/// `*` allows any origin; otherwise only the listed origins may call the API.
fn build_cors(origins: &[String]) -> Result<CorsLayer> {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins = origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin '{o}'"))
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

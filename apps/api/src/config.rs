use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_SUPABASE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";

/// Connection settings for the Supabase PostgREST API.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub api_key: String,
    /// True when `api_key` is the service-role key rather than the anon key.
    pub uses_service_role: bool,
    pub timeout: Duration,
}

/// Which backend holds the reports.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    Postgres { database_url: String },
    Supabase(SupabaseConfig),
}

/// Application configuration loaded from environment variables.
/// Startup fails if no store can be configured.
#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreConfig,
    pub port: u16,
    pub rust_log: String,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // Blank values count as unset.
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let store = if let Some(database_url) = var("DATABASE_URL") {
            StoreConfig::Postgres { database_url }
        } else if let Some(url) = var("SUPABASE_URL") {
            let (api_key, uses_service_role) = match (
                var("SUPABASE_SERVICE_ROLE_KEY"),
                var("SUPABASE_ANON_KEY"),
            ) {
                (Some(key), _) => (key, true),
                (None, Some(key)) => (key, false),
                (None, None) => bail!(
                    "SUPABASE_URL is set but neither SUPABASE_SERVICE_ROLE_KEY nor SUPABASE_ANON_KEY is"
                ),
            };
            let timeout_secs = match var("SUPABASE_TIMEOUT_SECS") {
                Some(raw) => raw
                    .parse::<u64>()
                    .context("SUPABASE_TIMEOUT_SECS must be a whole number of seconds")?,
                None => DEFAULT_SUPABASE_TIMEOUT_SECS,
            };
            StoreConfig::Supabase(SupabaseConfig {
                url,
                api_key,
                uses_service_role,
                timeout: Duration::from_secs(timeout_secs),
            })
        } else {
            bail!("Either DATABASE_URL or SUPABASE_URL must be set");
        };

        let port = match var("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            None => DEFAULT_PORT,
        };

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Config {
            store,
            port,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            cors_origins,
        })
    }
}

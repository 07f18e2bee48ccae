use std::sync::Arc;

use crate::store::ReportStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL or Supabase, chosen once at startup from the config.
    pub store: Arc<dyn ReportStore>,
}

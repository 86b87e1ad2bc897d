//! fuzzydx-engine library interface
//!
//! Fuzzy inference over the rule store, the external classifier boundary,
//! consensus fusion, and the HTTP API exposing them.

pub mod api;
pub mod classifier;
pub mod config;
pub mod diagnosis;
pub mod error;
pub mod fusion;
pub mod fuzzy;
pub mod input;
pub mod store;
pub mod types;

pub use crate::diagnosis::{diagnose, CombinedResult};
pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use classifier::ClassifierService;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Rule store connection pool
    pub db: SqlitePool,
    /// Long-lived classifier, shared by every request
    pub classifier: Arc<ClassifierService>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, classifier: Arc<ClassifierService>) -> Self {
        Self {
            db,
            classifier,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::rule_routes())
        .merge(api::diagnosis_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

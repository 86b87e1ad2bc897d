//! Rule store endpoints: form definition and reference catalogue seeding

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use fuzzydx_common::db;
use serde::Serialize;
use tracing::info;

use crate::input::{symptom_fields, SymptomField};
use crate::{ApiResult, AppState};

/// GET /api/symptoms
///
/// Ordered form fields with their declared ranges.
pub async fn list_symptom_fields(State(state): State<AppState>) -> ApiResult<Json<Vec<SymptomField>>> {
    let symptoms = db::list_symptoms(&state.db).await?;
    Ok(Json(symptom_fields(&symptoms)))
}

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub seeded: bool,
}

/// POST /api/init-db
///
/// Seeds the reference catalogue into an empty rule store; no-op otherwise.
pub async fn init_db(State(state): State<AppState>) -> ApiResult<Json<SeedResponse>> {
    let seeded = db::seed_default_catalog(&state.db).await?;
    if seeded {
        info!("Rule store seeded via API");
    }
    Ok(Json(SeedResponse { seeded }))
}

pub fn rule_routes() -> Router<AppState> {
    Router::new()
        .route("/api/symptoms", get(list_symptom_fields))
        .route("/api/init-db", post(init_db))
}

//! Diagnosis endpoint
//!
//! Each request snapshots the rule store, builds a fresh fuzzy engine from
//! it, and runs both predictors off the async runtime.

use std::collections::HashMap;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::fuzzy::FuzzyEngine;
use crate::input::{symptom_fields, validate_submission, SymptomValueMap, SymptomVector};
use crate::store::RuleSnapshot;
use crate::{diagnose, ApiError, ApiResult, AppState, CombinedResult};

/// POST /api/diagnose request body
#[derive(Debug, Deserialize)]
pub struct DiagnoseRequest {
    /// Symptom name → reading; `null` means not supplied
    #[serde(default)]
    pub values: HashMap<String, Option<f64>>,
}

/// POST /api/diagnose response body
#[derive(Debug, Serialize)]
pub struct DiagnoseResponse {
    pub diagnosis_id: Uuid,
    pub symptom_values: SymptomValueMap,
    pub results: CombinedResult,
}

/// POST /api/diagnose
pub async fn diagnose_symptoms(
    State(state): State<AppState>,
    Json(request): Json<DiagnoseRequest>,
) -> ApiResult<Json<DiagnoseResponse>> {
    let snapshot = RuleSnapshot::load(&state.db).await?;
    let fields = symptom_fields(snapshot.symptoms());
    let values = validate_submission(&fields, &request.values)?;

    let engine = FuzzyEngine::from_store(&snapshot)?;
    let ordered = SymptomVector::from_values(&values).ok();
    debug!(
        "Diagnosing {} supplied symptom(s) against {} rule(s)",
        values.len(),
        engine.rule_count()
    );

    let classifier = state.classifier.clone();
    let inputs = values.clone();
    let results = tokio::task::spawn_blocking(move || {
        diagnose(&engine, &classifier, &inputs, ordered.as_ref())
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Diagnosis task failed: {}", e)))?;

    let diagnosis_id = Uuid::new_v4();
    info!(
        "Diagnosis {} complete: {}",
        diagnosis_id, results.consensus.disease_name
    );

    Ok(Json(DiagnoseResponse {
        diagnosis_id,
        symptom_values: values,
        results,
    }))
}

pub fn diagnosis_routes() -> Router<AppState> {
    Router::new().route("/api/diagnose", post(diagnose_symptoms))
}

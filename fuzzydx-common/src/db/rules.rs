//! Read queries over the rule store
//!
//! Rows come back in insertion (`id`) order; rule order is the authoring
//! order the normalizer uses to break ties.

use super::models::{Disease, DiseaseRule, SeverityBand, Symptom};
use crate::Result;
use sqlx::SqlitePool;
use tracing::warn;

pub async fn list_symptoms(pool: &SqlitePool) -> Result<Vec<Symptom>> {
    let rows = sqlx::query_as::<_, (i64, String, f64, f64, String)>(
        "SELECT id, name, min_value, max_value, unit FROM symptoms ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name, min_value, max_value, unit)| Symptom {
            id,
            name,
            min_value,
            max_value,
            unit,
        })
        .collect())
}

pub async fn list_diseases(pool: &SqlitePool) -> Result<Vec<Disease>> {
    let rows = sqlx::query_as::<_, (i64, String, String)>(
        "SELECT id, name, description FROM diseases ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name, description)| Disease {
            id,
            name,
            description,
        })
        .collect())
}

/// Rules with an unparseable severity are skipped with a warning
pub async fn list_rules(pool: &SqlitePool) -> Result<Vec<DiseaseRule>> {
    let rows = sqlx::query_as::<_, (i64, i64, i64, String, f64)>(
        "SELECT id, disease_id, symptom_id, severity, weight FROM disease_rules ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    let mut rules = Vec::with_capacity(rows.len());
    for (id, disease_id, symptom_id, severity, weight) in rows {
        match severity.parse::<SeverityBand>() {
            Ok(severity) => rules.push(DiseaseRule {
                id,
                disease_id,
                symptom_id,
                severity,
                weight,
            }),
            Err(e) => warn!("Skipping disease rule {}: {}", id, e),
        }
    }

    Ok(rules)
}

pub async fn count_symptoms(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM symptoms")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

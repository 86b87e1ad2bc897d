//! Reference catalogue: five symptoms, eight diseases and their rules
//!
//! Used to bootstrap an empty rule store and as in-memory fixture data.

use super::models::{Disease, DiseaseRule, SeverityBand, Symptom};
use super::rules::count_symptoms;
use crate::Result;
use sqlx::SqlitePool;
use tracing::{debug, info};

use SeverityBand::{High, Low, Medium};

/// (name, min, max, unit)
const SYMPTOMS: &[(&str, f64, f64, &str)] = &[
    ("Fever", 95.0, 105.0, "°F"),
    ("Headache", 0.0, 10.0, "scale"),
    ("Cough", 0.0, 10.0, "scale"),
    ("Fatigue", 0.0, 10.0, "scale"),
    ("Body Pain", 0.0, 10.0, "scale"),
];

const DISEASES: &[(&str, &str)] = &[
    ("Common Cold", "Viral infection of the upper respiratory tract"),
    ("Malaria", "Mosquito-borne infectious disease causing fever and chills"),
    ("Cough", "Condition characterized by persistent coughing"),
    ("Asthma", "Chronic respiratory condition causing wheezing"),
    ("Normal Fever", "Mild fever without specific cause"),
    ("Body Ache", "Generalized body pain condition"),
    ("Runny Nose", "Symptom of nasal congestion"),
    ("Dengue", "Mosquito-borne tropical disease causing high fever"),
];

/// (disease, symptom, band, weight) in authoring order
const RULES: &[(&str, &str, SeverityBand, f64)] = &[
    ("Common Cold", "Fever", Medium, 0.7),
    ("Common Cold", "Headache", Medium, 0.6),
    ("Common Cold", "Cough", Medium, 0.8),
    ("Common Cold", "Fatigue", Medium, 0.7),
    ("Malaria", "Fever", High, 0.9),
    ("Malaria", "Headache", Medium, 0.6),
    ("Malaria", "Fatigue", High, 0.8),
    ("Malaria", "Body Pain", Medium, 0.5),
    ("Cough", "Cough", High, 0.9),
    ("Cough", "Fatigue", Medium, 0.6),
    ("Cough", "Headache", Medium, 0.5),
    ("Asthma", "Cough", Medium, 0.7),
    ("Asthma", "Fatigue", Medium, 0.6),
    ("Asthma", "Headache", Low, 0.4),
    ("Normal Fever", "Fever", Medium, 0.9),
    ("Normal Fever", "Headache", Medium, 0.6),
    ("Body Ache", "Body Pain", High, 0.7),
    ("Body Ache", "Fatigue", Medium, 0.6),
    ("Body Ache", "Headache", Medium, 0.5),
    ("Runny Nose", "Fever", Low, 0.7),
    ("Runny Nose", "Headache", Low, 0.6),
    ("Dengue", "Fever", High, 0.9),
    ("Dengue", "Headache", High, 0.8),
    ("Dengue", "Fatigue", High, 0.8),
    ("Dengue", "Body Pain", Medium, 0.7),
];

/// In-memory copy of the rule store contents
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub symptoms: Vec<Symptom>,
    pub diseases: Vec<Disease>,
    pub rules: Vec<DiseaseRule>,
}

/// The reference catalogue with ids assigned from 1 in declaration order
pub fn default_catalog() -> Catalog {
    let symptoms: Vec<Symptom> = SYMPTOMS
        .iter()
        .zip(1..)
        .map(|(&(name, min_value, max_value, unit), id)| Symptom {
            id,
            name: name.to_string(),
            min_value,
            max_value,
            unit: unit.to_string(),
        })
        .collect();

    let diseases: Vec<Disease> = DISEASES
        .iter()
        .zip(1..)
        .map(|(&(name, description), id)| Disease {
            id,
            name: name.to_string(),
            description: description.to_string(),
        })
        .collect();

    let id_of = |names: &[&str], name: &str| {
        names
            .iter()
            .position(|n| *n == name)
            .map(|i| i as i64 + 1)
            .unwrap_or_default()
    };
    let symptom_names: Vec<&str> = SYMPTOMS.iter().map(|s| s.0).collect();
    let disease_names: Vec<&str> = DISEASES.iter().map(|d| d.0).collect();

    let rules = RULES
        .iter()
        .zip(1..)
        .map(|(&(disease, symptom, severity, weight), id)| DiseaseRule {
            id,
            disease_id: id_of(&disease_names, disease),
            symptom_id: id_of(&symptom_names, symptom),
            severity,
            weight,
        })
        .collect();

    Catalog {
        symptoms,
        diseases,
        rules,
    }
}

/// Insert the reference catalogue when the store has no symptoms yet
///
/// Returns `true` when data was written. Runs in a single transaction;
/// `INSERT OR IGNORE` lets a concurrent seed that lost the race commit nothing.
pub async fn seed_default_catalog(pool: &SqlitePool) -> Result<bool> {
    if count_symptoms(pool).await? > 0 {
        debug!("Rule store already populated, skipping seed");
        return Ok(false);
    }

    let catalog = default_catalog();
    let mut tx = pool.begin().await?;

    let mut inserted = 0;
    for symptom in &catalog.symptoms {
        inserted += sqlx::query(
            "INSERT OR IGNORE INTO symptoms (id, name, min_value, max_value, unit) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(symptom.id)
        .bind(&symptom.name)
        .bind(symptom.min_value)
        .bind(symptom.max_value)
        .bind(&symptom.unit)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    if inserted == 0 {
        tx.rollback().await?;
        debug!("Rule store seeded concurrently, skipping");
        return Ok(false);
    }

    for disease in &catalog.diseases {
        sqlx::query("INSERT OR IGNORE INTO diseases (id, name, description) VALUES (?, ?, ?)")
            .bind(disease.id)
            .bind(&disease.name)
            .bind(&disease.description)
            .execute(&mut *tx)
            .await?;
    }

    for rule in &catalog.rules {
        sqlx::query(
            "INSERT OR IGNORE INTO disease_rules (id, disease_id, symptom_id, severity, weight) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(rule.id)
        .bind(rule.disease_id)
        .bind(rule.symptom_id)
        .bind(rule.severity.as_str())
        .bind(rule.weight)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    info!(
        "Seeded rule store: {} symptoms, {} diseases, {} rules",
        catalog.symptoms.len(),
        catalog.diseases.len(),
        catalog.rules.len()
    );

    Ok(true)
}

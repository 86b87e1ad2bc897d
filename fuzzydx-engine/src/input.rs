//! Symptom input handling
//!
//! - `SymptomField`: explicit, ordered form definition resolved once per request
//! - `validate_submission`: form-level validation into a `SymptomValueMap`
//! - `SymptomVector`: the classifier's fixed positional input

use fuzzydx_common::db::Symptom;
use fuzzydx_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Symptom name → reading for one diagnosis request
pub type SymptomValueMap = HashMap<String, f64>;

/// Classifier input order
pub const CLASSIFIER_INPUT_ORDER: [&str; 5] = ["Fever", "Headache", "Cough", "Fatigue", "Body Pain"];

/// One input field of the diagnosis form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomField {
    pub id: i64,
    pub name: String,
    pub min_value: f64,
    pub max_value: f64,
    pub unit: String,
}

impl From<&Symptom> for SymptomField {
    fn from(symptom: &Symptom) -> Self {
        Self {
            id: symptom.id,
            name: symptom.name.clone(),
            min_value: symptom.min_value,
            max_value: symptom.max_value,
            unit: symptom.unit.clone(),
        }
    }
}

/// Form fields in rule store order
pub fn symptom_fields(symptoms: &[Symptom]) -> Vec<SymptomField> {
    symptoms.iter().map(SymptomField::from).collect()
}

/// Validate a raw submission against the form fields
///
/// `None` values mean "not supplied" and are dropped, as are names that match
/// no field. Non-finite values and values outside a field's declared range
/// are rejected with `Error::InvalidInput`.
pub fn validate_submission(
    fields: &[SymptomField],
    submitted: &HashMap<String, Option<f64>>,
) -> Result<SymptomValueMap> {
    let mut values = SymptomValueMap::new();

    for (name, value) in submitted {
        let Some(field) = fields.iter().find(|f| &f.name == name) else {
            debug!("Ignoring unknown symptom field: {}", name);
            continue;
        };

        let Some(value) = *value else {
            continue;
        };

        if !value.is_finite() {
            return Err(Error::InvalidInput(format!(
                "{} must be a finite number",
                field.name
            )));
        }
        if value < field.min_value || value > field.max_value {
            return Err(Error::InvalidInput(format!(
                "{} must be between {} and {} {} (got {})",
                field.name, field.min_value, field.max_value, field.unit, value
            )));
        }

        values.insert(field.name.clone(), value);
    }

    Ok(values)
}

/// `[fever °F, headache, cough, fatigue, body pain]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymptomVector(pub [f64; 5]);

impl SymptomVector {
    /// Build the vector from named readings; every position must be supplied
    pub fn from_values(values: &SymptomValueMap) -> Result<Self> {
        let mut vector = [0.0; 5];
        for (slot, name) in vector.iter_mut().zip(CLASSIFIER_INPUT_ORDER) {
            *slot = *values.get(name).ok_or_else(|| {
                Error::InvalidInput(format!("Classifier input requires a value for {}", name))
            })?;
        }
        Ok(Self(vector))
    }

    pub fn values(&self) -> &[f64; 5] {
        &self.0
    }
}

//! Prediction value types shared by both predictors and the fuser

use serde::{Deserialize, Serialize};

/// Label reported when no prediction is available
pub const ERROR_LABEL: &str = "Error";

/// A disease label with its confidence and human-readable description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub disease_name: String,
    /// Percentage, 0.0-100.0
    pub confidence: f64,
    pub description: String,
}

impl PredictionResult {
    pub fn new(
        disease_name: impl Into<String>,
        confidence: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            disease_name: disease_name.into(),
            confidence,
            description: description.into(),
        }
    }

    /// `{Error, 0, description}` marker
    pub fn error_marker(description: impl Into<String>) -> Self {
        Self::new(ERROR_LABEL, 0.0, description)
    }

    pub fn is_error_marker(&self) -> bool {
        self.disease_name == ERROR_LABEL
    }

    /// Confidence as a 0.0-1.0 fraction
    pub fn confidence_fraction(&self) -> f64 {
        self.confidence / 100.0
    }
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Placeholder description for diseases without one
pub fn placeholder_description(disease_name: &str) -> String {
    format!("Description for {}", disease_name)
}

//! Rule store models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Qualitative severity band a rule is authored against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityBand {
    Low,
    Medium,
    High,
}

impl SeverityBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityBand::Low => "low",
            SeverityBand::Medium => "medium",
            SeverityBand::High => "high",
        }
    }
}

impl fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeverityBand {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(SeverityBand::Low),
            "medium" => Ok(SeverityBand::Medium),
            "high" => Ok(SeverityBand::High),
            other => Err(crate::Error::InvalidInput(format!(
                "Unknown severity band: {}",
                other
            ))),
        }
    }
}

/// Measurable symptom with its declared numeric range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symptom {
    pub id: i64,
    pub name: String,
    pub min_value: f64,
    pub max_value: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disease {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// Expert-authored link between a disease and a symptom severity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseRule {
    pub id: i64,
    pub disease_id: i64,
    pub symptom_id: i64,
    pub severity: SeverityBand,
    pub weight: f64,
}

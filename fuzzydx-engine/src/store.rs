//! Rule store read interface and per-request snapshots
//!
//! The engine only ever sees a `RuleStore`; it never writes. A fresh
//! `RuleSnapshot` is loaded for every diagnosis so rule edits take effect on
//! the next request.

use fuzzydx_common::db::{self, Catalog, Disease, DiseaseRule, Symptom};
use fuzzydx_common::Result;
use sqlx::SqlitePool;
use tracing::debug;

/// Read-only view over symptoms, diseases and disease rules
pub trait RuleStore: Send + Sync {
    fn list_symptoms(&self) -> Result<Vec<Symptom>>;
    fn list_diseases(&self) -> Result<Vec<Disease>>;
    /// Rules in authoring order
    fn list_rules(&self) -> Result<Vec<DiseaseRule>>;
}

/// Immutable in-memory copy of the rule store
#[derive(Debug, Clone, Default)]
pub struct RuleSnapshot {
    catalog: Catalog,
}

impl RuleSnapshot {
    pub fn new(symptoms: Vec<Symptom>, diseases: Vec<Disease>, rules: Vec<DiseaseRule>) -> Self {
        Self {
            catalog: Catalog {
                symptoms,
                diseases,
                rules,
            },
        }
    }

    /// Read the current contents of the SQLite rule store
    pub async fn load(pool: &SqlitePool) -> Result<Self> {
        let symptoms = db::list_symptoms(pool).await?;
        let diseases = db::list_diseases(pool).await?;
        let rules = db::list_rules(pool).await?;

        debug!(
            "Loaded rule snapshot: {} symptoms, {} diseases, {} rules",
            symptoms.len(),
            diseases.len(),
            rules.len()
        );

        Ok(Self::new(symptoms, diseases, rules))
    }

    pub fn symptoms(&self) -> &[Symptom] {
        &self.catalog.symptoms
    }
}

impl From<Catalog> for RuleSnapshot {
    fn from(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

impl RuleStore for RuleSnapshot {
    fn list_symptoms(&self) -> Result<Vec<Symptom>> {
        Ok(self.catalog.symptoms.clone())
    }

    fn list_diseases(&self) -> Result<Vec<Disease>> {
        Ok(self.catalog.diseases.clone())
    }

    fn list_rules(&self) -> Result<Vec<DiseaseRule>> {
        Ok(self.catalog.rules.clone())
    }
}

// Fuzzy Inference Engine
//
// Fuzzifier → Rule Aggregator → Confidence Normalizer over a rule store
// snapshot injected at construction.

pub mod aggregator;
pub mod membership;
pub mod normalizer;

use crate::input::SymptomValueMap;
use crate::store::RuleStore;
use crate::types::PredictionResult;
use aggregator::ResolvedRule;
use fuzzydx_common::Result;
use membership::SymptomRange;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Rule-based predictor built from one rule store snapshot
#[derive(Debug, Clone, Default)]
pub struct FuzzyEngine {
    ranges: HashMap<String, SymptomRange>,
    rules: Vec<ResolvedRule>,
    descriptions: HashMap<String, String>,
}

impl FuzzyEngine {
    /// Build the engine from a rule store
    ///
    /// Malformed static data is skipped with a warning rather than failing:
    /// symptoms without a valid range, rules with a weight outside [0, 1],
    /// and rules referencing unknown symptoms or diseases.
    pub fn from_store(store: &dyn RuleStore) -> Result<Self> {
        let symptoms = store.list_symptoms()?;
        let diseases = store.list_diseases()?;
        let rules = store.list_rules()?;

        let mut symptom_names: HashMap<i64, String> = HashMap::new();
        let mut ranges = HashMap::new();
        for symptom in &symptoms {
            match SymptomRange::of(symptom) {
                Some(range) => {
                    symptom_names.insert(symptom.id, symptom.name.clone());
                    ranges.insert(symptom.name.clone(), range);
                }
                None => warn!(
                    "Ignoring symptom '{}': invalid range [{}, {}]",
                    symptom.name, symptom.min_value, symptom.max_value
                ),
            }
        }

        let disease_names: HashMap<i64, &str> =
            diseases.iter().map(|d| (d.id, d.name.as_str())).collect();
        let descriptions = diseases
            .iter()
            .map(|d| (d.name.clone(), d.description.clone()))
            .collect();

        let mut resolved = Vec::with_capacity(rules.len());
        for rule in &rules {
            if !(rule.weight.is_finite() && (0.0..=1.0).contains(&rule.weight)) {
                warn!("Ignoring rule {}: weight {} outside [0, 1]", rule.id, rule.weight);
                continue;
            }
            let (Some(symptom), Some(disease)) = (
                symptom_names.get(&rule.symptom_id),
                disease_names.get(&rule.disease_id),
            ) else {
                warn!(
                    "Ignoring rule {}: unresolved reference (disease {}, symptom {})",
                    rule.id, rule.disease_id, rule.symptom_id
                );
                continue;
            };
            resolved.push(ResolvedRule {
                disease: disease.to_string(),
                symptom: symptom.clone(),
                band: rule.severity,
                weight: rule.weight,
            });
        }

        debug!(
            "Fuzzy engine ready: {} symptoms, {} rules",
            ranges.len(),
            resolved.len()
        );

        Ok(Self {
            ranges,
            rules: resolved,
            descriptions,
        })
    }

    /// All candidate diseases, best first
    pub fn rank(&self, values: &SymptomValueMap) -> Vec<PredictionResult> {
        let board = aggregator::aggregate(&self.rules, &self.ranges, values);
        normalizer::rank(&board, &self.descriptions)
    }

    /// Top-ranked disease, or `None` when no rule matches a supplied symptom
    pub fn predict_disease(&self, values: &SymptomValueMap) -> Option<PredictionResult> {
        let ranked = self.rank(values);

        for candidate in ranked.iter().take(3) {
            debug!(
                "Fuzzy candidate: {} ({:.2}%)",
                candidate.disease_name, candidate.confidence
            );
        }

        ranked.into_iter().next()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

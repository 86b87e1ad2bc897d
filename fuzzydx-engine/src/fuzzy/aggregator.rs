// Rule Aggregator - Weighted Membership Sums
//
// score[disease] = Σ membership(symptom, band) · weight over rules whose
// symptom was supplied. Duplicate (disease, symptom) rules each contribute.

use super::membership::{fuzzify, SymptomRange};
use crate::input::SymptomValueMap;
use fuzzydx_common::db::SeverityBand;
use std::collections::HashMap;
use tracing::debug;

/// A rule with its references resolved to names
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRule {
    pub disease: String,
    pub symptom: String,
    pub band: SeverityBand,
    pub weight: f64,
}

/// Accumulated evidence for one disease
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiseaseScore {
    /// Σ membership · weight over matched rules
    pub raw: f64,
    /// Σ weight over all of the disease's rules
    pub max_attainable: f64,
    /// Rules whose symptom was supplied
    pub matched_rules: usize,
}

/// Scores for every disease with at least one supplied symptom, in
/// rule-authoring order of first appearance
#[derive(Debug, Clone, Default)]
pub struct ScoreBoard {
    entries: Vec<(String, DiseaseScore)>,
}

impl ScoreBoard {
    pub fn iter(&self) -> impl Iterator<Item = &(String, DiseaseScore)> {
        self.entries.iter()
    }

    pub fn get(&self, disease: &str) -> Option<&DiseaseScore> {
        self.entries
            .iter()
            .find(|(name, _)| name == disease)
            .map(|(_, score)| score)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Aggregate rule contributions for the supplied symptom values
///
/// Rules naming a symptom without a known range are ignored, as are input
/// symptoms no rule references.
pub fn aggregate(
    rules: &[ResolvedRule],
    ranges: &HashMap<String, SymptomRange>,
    values: &SymptomValueMap,
) -> ScoreBoard {
    let mut order: Vec<&str> = Vec::new();
    let mut scores: HashMap<&str, DiseaseScore> = HashMap::new();

    for rule in rules {
        let score = scores.entry(rule.disease.as_str()).or_insert_with(|| {
            order.push(rule.disease.as_str());
            DiseaseScore::default()
        });
        score.max_attainable += rule.weight;

        let Some(&value) = values.get(&rule.symptom) else {
            continue;
        };
        if value.is_nan() {
            continue;
        }
        let Some(range) = ranges.get(&rule.symptom) else {
            continue;
        };

        let degree = fuzzify(value, range).degree(rule.band);
        score.raw += degree * rule.weight;
        score.matched_rules += 1;
    }

    let entries: Vec<(String, DiseaseScore)> = order
        .into_iter()
        .filter_map(|disease| {
            let score = scores.remove(disease)?;
            (score.matched_rules > 0).then(|| (disease.to_string(), score))
        })
        .collect();

    debug!(
        "Aggregated {} rules over {} supplied symptoms: {} candidate diseases",
        rules.len(),
        values.len(),
        entries.len()
    );

    ScoreBoard { entries }
}

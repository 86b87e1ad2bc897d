// Confidence Normalizer - Ratio to Maximum Attainable Score
//
// confidence = round(clamp(raw / max_attainable, 0, 1) · 100, 2)
// Ranked best first; ties keep rule-authoring order.

use super::aggregator::{DiseaseScore, ScoreBoard};
use crate::types::{placeholder_description, round2, PredictionResult};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Fraction of the maximum attainable score, clamped to [0, 1]
pub fn normalized_ratio(score: &DiseaseScore) -> f64 {
    if score.max_attainable <= 0.0 || !score.max_attainable.is_finite() {
        return 0.0;
    }
    let ratio = score.raw / score.max_attainable;
    if ratio.is_nan() {
        return 0.0;
    }
    ratio.clamp(0.0, 1.0)
}

/// Rank diseases by normalized confidence
///
/// `descriptions` maps disease name to its record's description; missing or
/// empty descriptions get a generated placeholder.
pub fn rank(board: &ScoreBoard, descriptions: &HashMap<String, String>) -> Vec<PredictionResult> {
    let mut ratios: Vec<(&str, f64)> = board
        .iter()
        .map(|(name, score)| (name.as_str(), normalized_ratio(score)))
        .collect();

    // Stable: equal ratios keep board (authoring) order
    ratios.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    ratios
        .into_iter()
        .map(|(name, ratio)| {
            let description = descriptions
                .get(name)
                .filter(|d| !d.trim().is_empty())
                .cloned()
                .unwrap_or_else(|| placeholder_description(name));
            PredictionResult::new(name, round2(ratio * 100.0), description)
        })
        .collect()
}

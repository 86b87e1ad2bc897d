// Consensus Fuser - Confidence Blending with Fuzzy-Preferred Tie-Break
//
// Branches, in priority order:
// 1. fuzzy + classifier → blended confidence, label of the higher individual
//    confidence (ties → fuzzy)
// 2. fuzzy only → fuzzy unchanged
// 3. classifier only → classifier unchanged
// 4. neither → {Error, 0, "No valid prediction"}

use crate::classifier::ClassifierOutcome;
use crate::types::{round2, PredictionResult};
use tracing::debug;

pub const FUZZY_WEIGHT: f64 = 0.5;
pub const CLASSIFIER_WEIGHT: f64 = 0.5;

pub const NO_VALID_PREDICTION: &str = "No valid prediction";
pub const NO_DESCRIPTION: &str = "No description available";

/// Fuse the two predictor outputs into the reported diagnosis
pub fn fuse(fuzzy: Option<&PredictionResult>, classifier: &ClassifierOutcome) -> PredictionResult {
    match (fuzzy, classifier.prediction()) {
        (Some(fuzzy), Some(classifier)) => blend(fuzzy, classifier),
        (Some(fuzzy), None) => {
            debug!("Consensus: fuzzy result only");
            fuzzy.clone()
        }
        (None, Some(classifier)) => {
            debug!("Consensus: classifier result only");
            classifier.clone()
        }
        (None, None) => {
            debug!("Consensus: no valid prediction");
            PredictionResult::error_marker(NO_VALID_PREDICTION)
        }
    }
}

fn blend(fuzzy: &PredictionResult, classifier: &PredictionResult) -> PredictionResult {
    let fuzzy_conf = fuzzy.confidence_fraction();
    let classifier_conf = classifier.confidence_fraction();

    let blended = (FUZZY_WEIGHT * fuzzy_conf + CLASSIFIER_WEIGHT * classifier_conf) * 100.0;

    let label = if fuzzy_conf >= classifier_conf {
        &fuzzy.disease_name
    } else {
        &classifier.disease_name
    };

    let description = [fuzzy, classifier]
        .into_iter()
        .find(|source| &source.disease_name == label)
        .map(|source| source.description.clone())
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());

    debug!(
        "Consensus: fuzzy {} ({:.2}%) vs classifier {} ({:.2}%) → {} ({:.2}%)",
        fuzzy.disease_name,
        fuzzy.confidence,
        classifier.disease_name,
        classifier.confidence,
        label,
        blended
    );

    PredictionResult::new(label.clone(), round2(blended), description)
}

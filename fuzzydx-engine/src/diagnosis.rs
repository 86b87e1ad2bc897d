//! Diagnosis entry point: both predictors plus consensus
//!
//! Nothing here returns an error: a missing fuzzy match, a failing
//! classifier and the lack of any usable prediction are all in-band values.

use crate::classifier::{ClassifierOutcome, ClassifierService};
use crate::fusion;
use crate::fuzzy::FuzzyEngine;
use crate::input::{SymptomValueMap, SymptomVector};
use crate::types::PredictionResult;
use serde::Serialize;
use tracing::info;

/// Everything the presentation layer needs for one diagnosis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedResult {
    /// `None` when no rule matched a supplied symptom
    pub fuzzy: Option<PredictionResult>,
    pub classifier: ClassifierOutcome,
    pub consensus: PredictionResult,
}

/// Run the fuzzy engine and the classifier, then fuse their results
///
/// `ordered` is the classifier's positional input; pass `None` when the
/// submission lacks one of the five values, which the classifier boundary
/// reports as a failure without affecting the fuzzy result.
pub fn diagnose(
    engine: &FuzzyEngine,
    classifier: &ClassifierService,
    values: &SymptomValueMap,
    ordered: Option<&SymptomVector>,
) -> CombinedResult {
    let fuzzy = engine.predict_disease(values);
    let classifier = classifier.predict(ordered);
    let consensus = fusion::fuse(fuzzy.as_ref(), &classifier);

    info!(
        "Diagnosis: fuzzy={:?}, classifier={}, consensus={} ({:.2}%)",
        fuzzy.as_ref().map(|f| f.disease_name.as_str()),
        classifier
            .prediction()
            .map(|p| p.disease_name.as_str())
            .unwrap_or("failed"),
        consensus.disease_name,
        consensus.confidence
    );

    CombinedResult {
        fuzzy,
        classifier,
        consensus,
    }
}

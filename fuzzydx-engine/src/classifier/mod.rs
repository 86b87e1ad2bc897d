//! External disease classifier and its failure-containment boundary
//!
//! `ClassifierService` is created once at startup, shared by reference with
//! every request, and shut down on exit. Whatever goes wrong inside the
//! classifier (error, panic, malformed output, missing input, service not
//! ready) comes back as `ClassifierOutcome::Failed`, never as an error or
//! unwinding panic.

pub mod dense;

use crate::input::SymptomVector;
use crate::types::PredictionResult;
use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use dense::DenseClassifier;

/// Classifier failure kinds
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Model file not found at {0}")]
    ModelNotFound(PathBuf),

    #[error("Model file could not be read: {0}")]
    ModelIo(#[from] std::io::Error),

    #[error("Model file is not valid JSON: {0}")]
    ModelFormat(#[from] serde_json::Error),

    #[error("Model shape mismatch: {0}")]
    ModelShape(String),

    #[error("Invalid classifier input: {0}")]
    InvalidInput(String),

    #[error("Classifier produced non-finite output")]
    NonFiniteOutput,
}

/// A pretrained classifier mapping the symptom vector to a disease label
pub trait DiseaseClassifier: Send + Sync {
    /// Classifier identifier for logs
    fn source_id(&self) -> &'static str;

    /// Predict the most likely disease; confidence is a 0-100 percentage
    fn predict(&self, input: &SymptomVector) -> Result<PredictionResult, ClassifierError>;
}

/// Classifier result after the containment boundary
///
/// Serializes as a `PredictionResult`; failures as the `{Error, 0, reason}` marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "PredictionResult")]
pub enum ClassifierOutcome {
    Predicted { prediction: PredictionResult },
    Failed { reason: String },
}

impl ClassifierOutcome {
    pub fn prediction(&self) -> Option<&PredictionResult> {
        match self {
            ClassifierOutcome::Predicted { prediction } => Some(prediction),
            ClassifierOutcome::Failed { .. } => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ClassifierOutcome::Failed { .. })
    }

    /// `{Error, 0, reason}` for failures, the prediction otherwise
    pub fn as_result(&self) -> PredictionResult {
        match self {
            ClassifierOutcome::Predicted { prediction } => prediction.clone(),
            ClassifierOutcome::Failed { reason } => PredictionResult::error_marker(reason.clone()),
        }
    }

    fn failed(reason: impl std::fmt::Display) -> Self {
        ClassifierOutcome::Failed {
            reason: format!("Classifier prediction failed: {}", reason),
        }
    }
}

impl From<ClassifierOutcome> for PredictionResult {
    fn from(outcome: ClassifierOutcome) -> Self {
        match outcome {
            ClassifierOutcome::Predicted { prediction } => prediction,
            ClassifierOutcome::Failed { reason } => PredictionResult::error_marker(reason),
        }
    }
}

enum ServiceState {
    Ready(Arc<dyn DiseaseClassifier>),
    Unavailable(String),
    Stopped,
}

/// Long-lived owner of the classifier
pub struct ClassifierService {
    state: RwLock<ServiceState>,
}

impl ClassifierService {
    /// Load the dense classifier from `model_path`
    ///
    /// A missing or broken model does not fail startup: the service comes up
    /// unavailable and every prediction reports the load error.
    pub fn initialize(model_path: &Path) -> Self {
        match DenseClassifier::load(model_path) {
            Ok(classifier) => {
                info!(
                    "Classifier loaded from {} ({} labels)",
                    model_path.display(),
                    classifier.label_count()
                );
                Self::with_classifier(Arc::new(classifier))
            }
            Err(e) => {
                warn!("Classifier unavailable: {}", e);
                Self::unavailable(e.to_string())
            }
        }
    }

    pub fn with_classifier(classifier: Arc<dyn DiseaseClassifier>) -> Self {
        Self {
            state: RwLock::new(ServiceState::Ready(classifier)),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(ServiceState::Unavailable(reason.into())),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state
            .read()
            .map(|state| matches!(*state, ServiceState::Ready(_)))
            .unwrap_or(false)
    }

    /// Predict through the containment boundary
    ///
    /// `input` is `None` when the submission did not supply all five
    /// classifier inputs.
    pub fn predict(&self, input: Option<&SymptomVector>) -> ClassifierOutcome {
        let classifier = match self.state.read() {
            Ok(state) => match &*state {
                ServiceState::Ready(classifier) => Arc::clone(classifier),
                ServiceState::Unavailable(reason) => return ClassifierOutcome::failed(reason),
                ServiceState::Stopped => {
                    return ClassifierOutcome::failed("classifier service has been shut down")
                }
            },
            Err(_) => return ClassifierOutcome::failed("classifier service state is poisoned"),
        };

        let Some(input) = input else {
            return ClassifierOutcome::failed(
                "all five symptom values (Fever, Headache, Cough, Fatigue, Body Pain) are required",
            );
        };

        let outcome = catch_unwind(AssertUnwindSafe(|| classifier.predict(input)));

        match outcome {
            Ok(Ok(prediction)) => match check_prediction(&prediction) {
                Ok(()) => {
                    debug!(
                        "{} predicted {} ({:.2}%)",
                        classifier.source_id(),
                        prediction.disease_name,
                        prediction.confidence
                    );
                    ClassifierOutcome::Predicted { prediction }
                }
                Err(reason) => {
                    warn!("{} returned malformed output: {}", classifier.source_id(), reason);
                    ClassifierOutcome::failed(reason)
                }
            },
            Ok(Err(e)) => {
                warn!("{} failed: {}", classifier.source_id(), e);
                ClassifierOutcome::failed(e)
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                warn!("{} panicked: {}", classifier.source_id(), message);
                ClassifierOutcome::failed(message)
            }
        }
    }

    /// Release the classifier; later predictions report the service as shut down
    pub fn shutdown(&self) {
        match self.state.write() {
            Ok(mut state) => {
                *state = ServiceState::Stopped;
                info!("Classifier service shut down");
            }
            Err(_) => warn!("Classifier service state poisoned during shutdown"),
        }
    }
}

fn check_prediction(prediction: &PredictionResult) -> Result<(), String> {
    if prediction.disease_name.trim().is_empty() {
        return Err("empty disease label".to_string());
    }
    if prediction.is_error_marker() {
        return Err(format!("classifier reported an error: {}", prediction.description));
    }
    if !prediction.confidence.is_finite() || !(0.0..=100.0).contains(&prediction.confidence) {
        return Err(format!(
            "confidence {} outside [0, 100]",
            prediction.confidence
        ));
    }
    Ok(())
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "classifier panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClassifier(PredictionResult);

    impl DiseaseClassifier for FixedClassifier {
        fn source_id(&self) -> &'static str {
            "Fixed"
        }

        fn predict(&self, _input: &SymptomVector) -> Result<PredictionResult, ClassifierError> {
            Ok(self.0.clone())
        }
    }

    struct FailingClassifier;

    impl DiseaseClassifier for FailingClassifier {
        fn source_id(&self) -> &'static str {
            "Failing"
        }

        fn predict(&self, _input: &SymptomVector) -> Result<PredictionResult, ClassifierError> {
            Err(ClassifierError::NonFiniteOutput)
        }
    }

    struct PanickingClassifier;

    impl DiseaseClassifier for PanickingClassifier {
        fn source_id(&self) -> &'static str {
            "Panicking"
        }

        fn predict(&self, _input: &SymptomVector) -> Result<PredictionResult, ClassifierError> {
            panic!("tensor shape mismatch")
        }
    }

    fn input() -> SymptomVector {
        SymptomVector([101.0, 6.0, 7.0, 6.0, 2.0])
    }

    #[test]
    fn test_prediction_passes_through() {
        let expected = PredictionResult::new("Flu", 82.5, "Influenza");
        let service = ClassifierService::with_classifier(Arc::new(FixedClassifier(expected.clone())));

        let outcome = service.predict(Some(&input()));
        assert_eq!(outcome.prediction(), Some(&expected));
        assert!(!outcome.is_error());
        assert!(service.is_ready());
    }

    #[test]
    fn test_error_is_contained() {
        let service = ClassifierService::with_classifier(Arc::new(FailingClassifier));

        let outcome = service.predict(Some(&input()));
        assert!(outcome.is_error());

        let marker = outcome.as_result();
        assert!(marker.is_error_marker());
        assert_eq!(marker.confidence, 0.0);
        assert!(marker.description.starts_with("Classifier prediction failed:"));
    }

    #[test]
    fn test_panic_is_contained() {
        let service = ClassifierService::with_classifier(Arc::new(PanickingClassifier));

        let outcome = service.predict(Some(&input()));
        match outcome {
            ClassifierOutcome::Failed { reason } => assert!(reason.contains("tensor shape mismatch")),
            other => panic!("expected failure, got {:?}", other),
        }

        // Service still usable afterwards
        assert!(service.predict(Some(&input())).is_error());
        assert!(service.is_ready());
    }

    #[test]
    fn test_malformed_output_rejected() {
        for bad in [
            PredictionResult::new("", 50.0, ""),
            PredictionResult::new("Flu", f64::NAN, ""),
            PredictionResult::new("Flu", 140.0, ""),
            PredictionResult::new("Flu", -1.0, ""),
            PredictionResult::new("Error", 0.0, "oops"),
        ] {
            let service = ClassifierService::with_classifier(Arc::new(FixedClassifier(bad)));
            assert!(service.predict(Some(&input())).is_error());
        }
    }

    #[test]
    fn test_missing_input_is_failure() {
        let expected = PredictionResult::new("Flu", 82.5, "Influenza");
        let service = ClassifierService::with_classifier(Arc::new(FixedClassifier(expected)));

        match service.predict(None) {
            ClassifierOutcome::Failed { reason } => assert!(reason.contains("Body Pain")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_unavailable_service_reports_reason() {
        let service = ClassifierService::unavailable("Model file not found at /nowhere");
        assert!(!service.is_ready());

        match service.predict(Some(&input())) {
            ClassifierOutcome::Failed { reason } => assert!(reason.contains("/nowhere")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_initialize_with_missing_model_is_unavailable() {
        let service = ClassifierService::initialize(Path::new("/definitely/not/here/model.json"));
        assert!(!service.is_ready());
        assert!(service.predict(Some(&input())).is_error());
    }

    #[test]
    fn test_shutdown_stops_predictions() {
        let expected = PredictionResult::new("Flu", 82.5, "Influenza");
        let service = ClassifierService::with_classifier(Arc::new(FixedClassifier(expected)));

        service.shutdown();
        assert!(!service.is_ready());
        match service.predict(Some(&input())) {
            ClassifierOutcome::Failed { reason } => assert!(reason.contains("shut down")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_failure_serializes_as_error_marker() {
        let service = ClassifierService::with_classifier(Arc::new(FailingClassifier));
        let outcome = service.predict(None);

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["disease_name"], "Error");
        assert_eq!(json["confidence"], 0.0);
        assert!(json["description"]
            .as_str()
            .unwrap()
            .starts_with("Classifier prediction failed:"));
        assert!(json.get("status").is_none());
    }

    #[test]
    fn test_prediction_serializes_as_result() {
        let outcome = ClassifierOutcome::Predicted {
            prediction: PredictionResult::new("Flu", 82.5, "Influenza"),
        };

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["disease_name"], "Flu");
        assert_eq!(json["confidence"], 82.5);
        assert_eq!(json["description"], "Influenza");
    }

    #[test]
    fn test_error_label_is_not_a_prediction() {
        let service = ClassifierService::with_classifier(Arc::new(FixedClassifier(
            PredictionResult::new("Error", 0.0, "oops"),
        )));

        let outcome = service.predict(Some(&input()));
        assert!(outcome.is_error());
        assert_eq!(crate::fusion::fuse(None, &outcome).description, "No valid prediction");
    }
}

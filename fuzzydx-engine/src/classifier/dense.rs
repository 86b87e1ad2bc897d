// Dense Classifier - Pretrained Softmax Layer
//
// Model file (JSON): labels, input_offset, input_scale, weights (one row of 5
// per label), bias. Input is min-max scaled with (v - offset) / scale before
// the dense layer; argmax over the softmax picks the label.

use super::{ClassifierError, DiseaseClassifier};
use crate::input::SymptomVector;
use crate::types::{placeholder_description, round2, PredictionResult};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Model shipped with the binary; installed into the root folder on first run
pub const BUNDLED_MODEL: &str = include_str!("../../models/disease_classifier.json");

/// Scaling used when the model file omits it: fever 95-105 °F, scales 0-10
const DEFAULT_INPUT_OFFSET: [f64; 5] = [95.0, 0.0, 0.0, 0.0, 0.0];
const DEFAULT_INPUT_SCALE: [f64; 5] = [10.0, 10.0, 10.0, 10.0, 10.0];

const DESCRIPTIONS: &[(&str, &str)] = &[
    ("Common Cold", "Viral infection of the upper respiratory tract"),
    ("Flu", "Influenza viral infection affecting the respiratory system"),
    ("Malaria", "Mosquito-borne infectious disease causing fever and chills"),
    ("Dengue", "Mosquito-borne tropical disease causing high fever"),
];

#[derive(Debug, Clone, Deserialize)]
struct ModelFile {
    labels: Vec<String>,
    #[serde(default = "default_offset")]
    input_offset: [f64; 5],
    #[serde(default = "default_scale")]
    input_scale: [f64; 5],
    weights: Vec<[f64; 5]>,
    bias: Vec<f64>,
}

fn default_offset() -> [f64; 5] {
    DEFAULT_INPUT_OFFSET
}

fn default_scale() -> [f64; 5] {
    DEFAULT_INPUT_SCALE
}

/// Single dense layer with softmax output
#[derive(Debug, Clone)]
pub struct DenseClassifier {
    model: ModelFile,
}

impl DenseClassifier {
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        if !path.exists() {
            return Err(ClassifierError::ModelNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let classifier = Self::from_json(&content)?;
        debug!("Dense classifier parsed from {}", path.display());
        Ok(classifier)
    }

    pub fn bundled() -> Result<Self, ClassifierError> {
        Self::from_json(BUNDLED_MODEL)
    }

    /// Write the bundled model to `path` unless a file already exists there
    ///
    /// Returns `true` when the file was written.
    pub fn install_bundled(path: &Path) -> Result<bool, ClassifierError> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, BUNDLED_MODEL)?;
        info!("Installed bundled classifier model at {}", path.display());
        Ok(true)
    }

    pub fn from_json(json: &str) -> Result<Self, ClassifierError> {
        let model: ModelFile = serde_json::from_str(json)?;
        Self::validate(&model)?;
        Ok(Self { model })
    }

    fn validate(model: &ModelFile) -> Result<(), ClassifierError> {
        let labels = model.labels.len();
        if labels == 0 {
            return Err(ClassifierError::ModelShape("no labels".to_string()));
        }
        if model.weights.len() != labels || model.bias.len() != labels {
            return Err(ClassifierError::ModelShape(format!(
                "{} labels, {} weight rows, {} biases",
                labels,
                model.weights.len(),
                model.bias.len()
            )));
        }
        if model.input_scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
            return Err(ClassifierError::ModelShape(
                "input_scale entries must be finite and non-zero".to_string(),
            ));
        }
        let mut parameters = model
            .weights
            .iter()
            .flatten()
            .chain(&model.bias)
            .chain(&model.input_offset);
        if parameters.any(|v| !v.is_finite()) {
            return Err(ClassifierError::ModelShape("non-finite parameter".to_string()));
        }
        Ok(())
    }

    pub fn label_count(&self) -> usize {
        self.model.labels.len()
    }

    fn preprocess(&self, input: &SymptomVector) -> Result<[f64; 5], ClassifierError> {
        let mut scaled = [0.0; 5];
        for (i, value) in input.values().iter().enumerate() {
            if !value.is_finite() {
                return Err(ClassifierError::InvalidInput(format!(
                    "position {} is not a finite number",
                    i
                )));
            }
            scaled[i] = (value - self.model.input_offset[i]) / self.model.input_scale[i];
        }
        Ok(scaled)
    }

    /// Softmax probabilities per label
    fn probabilities(&self, x: &[f64; 5]) -> Result<Vec<f64>, ClassifierError> {
        let logits: Vec<f64> = self
            .model
            .weights
            .iter()
            .zip(&self.model.bias)
            .map(|(row, bias)| row.iter().zip(x).map(|(w, v)| w * v).sum::<f64>() + bias)
            .collect();

        let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
        let total: f64 = exps.iter().sum();

        if !total.is_finite() || total <= 0.0 {
            return Err(ClassifierError::NonFiniteOutput);
        }
        Ok(exps.into_iter().map(|e| e / total).collect())
    }
}

/// Built-in description for a label, or the generated placeholder
pub fn describe(label: &str) -> String {
    DESCRIPTIONS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, description)| description.to_string())
        .unwrap_or_else(|| placeholder_description(label))
}

impl DiseaseClassifier for DenseClassifier {
    fn source_id(&self) -> &'static str {
        "DenseClassifier"
    }

    fn predict(&self, input: &SymptomVector) -> Result<PredictionResult, ClassifierError> {
        let x = self.preprocess(input)?;
        let probabilities = self.probabilities(&x)?;

        // First maximum wins
        let (index, probability) = probabilities
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, p)| {
                if *p > best.1 {
                    (i, *p)
                } else {
                    best
                }
            });

        if !probability.is_finite() {
            return Err(ClassifierError::NonFiniteOutput);
        }

        let label = &self.model.labels[index];
        Ok(PredictionResult::new(
            label.clone(),
            round2(probability * 100.0),
            describe(label),
        ))
    }
}

//! Linear models over standardized feature vectors.
//!
//! Model files are JSON. Every component is validated at load time: vector
//! lengths must equal [`FEATURE_LEN`], all numbers must be finite and every
//! standardizer scale must be positive.

use crate::catalog::SoilType;
use crate::features::{FeatureVector, FEATURE_LEN};
use crate::util::math::softmax_argmax;
use crate::util::{SoilSightError, SoilSightResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

fn invalid(reason: impl Into<String>) -> SoilSightError {
    SoilSightError::InvalidModel {
        reason: reason.into(),
    }
}

fn to_features(values: &[f64], what: &str) -> SoilSightResult<[f64; FEATURE_LEN]> {
    let arr: [f64; FEATURE_LEN] = values.try_into().map_err(|_| {
        invalid(format!(
            "{what} has {} values, expected {FEATURE_LEN}",
            values.len()
        ))
    })?;
    if arr.iter().any(|v| !v.is_finite()) {
        return Err(invalid(format!("{what} contains non-finite values")));
    }
    Ok(arr)
}

pub(crate) fn read_model_file<P: AsRef<Path>>(path: P) -> SoilSightResult<String> {
    std::fs::read_to_string(path).map_err(|err| invalid(err.to_string()))
}

/// Per-feature standardizer record: `z = (x - mean) / scale`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StandardizerRecord {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Softmax classifier record; one weight row and bias per label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierRecord {
    pub labels: Vec<String>,
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

/// Linear regressor record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegressorRecord {
    pub weights: Vec<f64>,
    pub bias: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Standardizer {
    mean: [f64; FEATURE_LEN],
    scale: [f64; FEATURE_LEN],
}

impl Standardizer {
    pub(crate) fn from_record(record: &StandardizerRecord) -> SoilSightResult<Self> {
        let mean = to_features(&record.mean, "scaler mean")?;
        let scale = to_features(&record.scale, "scaler scale")?;
        if scale.iter().any(|&s| s <= 0.0) {
            return Err(invalid("scaler scale values must be positive"));
        }
        Ok(Self { mean, scale })
    }

    pub(crate) fn transform(&self, features: &FeatureVector) -> [f64; FEATURE_LEN] {
        let x = features.as_array();
        std::array::from_fn(|i| (x[i] - self.mean[i]) / self.scale[i])
    }
}

fn dot(w: &[f64; FEATURE_LEN], z: &[f64; FEATURE_LEN]) -> f64 {
    w.iter().zip(z.iter()).map(|(a, b)| a * b).sum()
}

/// Multinomial logistic classifier with typed labels.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SoftmaxClassifier<L> {
    labels: Vec<L>,
    weights: Vec<[f64; FEATURE_LEN]>,
    bias: Vec<f64>,
}

impl<L> SoftmaxClassifier<L> {
    pub(crate) fn from_record<F>(record: &ClassifierRecord, mut parse: F) -> SoilSightResult<Self>
    where
        F: FnMut(&str) -> SoilSightResult<L>,
    {
        let n = record.labels.len();
        if n == 0 {
            return Err(invalid("classifier has no labels"));
        }
        if record.weights.len() != n || record.bias.len() != n {
            return Err(invalid(format!(
                "classifier has {n} labels but {} weight rows and {} biases",
                record.weights.len(),
                record.bias.len()
            )));
        }
        if record.bias.iter().any(|b| !b.is_finite()) {
            return Err(invalid("classifier bias contains non-finite values"));
        }
        let weights = record
            .weights
            .iter()
            .map(|row| to_features(row, "classifier weight row"))
            .collect::<SoilSightResult<Vec<_>>>()?;
        let labels = record
            .labels
            .iter()
            .map(|label| parse(label.as_str()))
            .collect::<SoilSightResult<Vec<_>>>()?;
        Ok(Self {
            labels,
            weights,
            bias: record.bias.clone(),
        })
    }

    pub(crate) fn labels(&self) -> &[L] {
        &self.labels
    }

    /// Returns the winning label and its probability.
    pub(crate) fn classify(&self, z: &[f64; FEATURE_LEN]) -> SoilSightResult<(&L, f64)> {
        let logits: Vec<f64> = self
            .weights
            .iter()
            .zip(&self.bias)
            .map(|(w, b)| dot(w, z) + b)
            .collect();
        let (idx, prob) = softmax_argmax(&logits).ok_or(SoilSightError::FeatureExtraction {
            reason: "classifier logits are not finite",
        })?;
        Ok((&self.labels[idx], prob))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LinearRegressor {
    weights: [f64; FEATURE_LEN],
    bias: f64,
}

impl LinearRegressor {
    pub(crate) fn from_record(record: &RegressorRecord) -> SoilSightResult<Self> {
        if !record.bias.is_finite() {
            return Err(invalid("regressor bias is not finite"));
        }
        Ok(Self {
            weights: to_features(&record.weights, "regressor weights")?,
            bias: record.bias,
        })
    }

    pub(crate) fn predict(&self, z: &[f64; FEATURE_LEN]) -> f64 {
        dot(&self.weights, z) + self.bias
    }
}

/// Serialized form of a [`LinearSoilModel`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SoilModelRecord {
    pub scaler: StandardizerRecord,
    pub soil_classifier: ClassifierRecord,
    pub ph_regressor: RegressorRecord,
}

/// Trained soil model: standardizer, soil-type classifier and pH regressor.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearSoilModel {
    scaler: Standardizer,
    classifier: SoftmaxClassifier<SoilType>,
    ph: LinearRegressor,
}

/// Soil-model output before moisture is attached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SoilModelOutput {
    pub(crate) soil_type: SoilType,
    pub(crate) confidence: f64,
    pub(crate) ph: f64,
}

impl LinearSoilModel {
    /// Validates a model record. Classifier labels must be known soil types.
    pub fn from_record(record: &SoilModelRecord) -> SoilSightResult<Self> {
        Ok(Self {
            scaler: Standardizer::from_record(&record.scaler)?,
            classifier: SoftmaxClassifier::from_record(&record.soil_classifier, |label| {
                label.parse::<SoilType>()
            })?,
            ph: LinearRegressor::from_record(&record.ph_regressor)?,
        })
    }

    /// Parses and validates a JSON model document.
    pub fn from_json_str(text: &str) -> SoilSightResult<Self> {
        let record: SoilModelRecord =
            serde_json::from_str(text).map_err(|err| invalid(err.to_string()))?;
        Self::from_record(&record)
    }

    /// Reads and validates a JSON model file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> SoilSightResult<Self> {
        Self::from_json_str(&read_model_file(path)?)
    }

    /// Soil types the classifier can emit, in label order.
    pub fn soil_types(&self) -> &[SoilType] {
        self.classifier.labels()
    }

    pub(crate) fn infer(&self, features: &FeatureVector) -> SoilSightResult<SoilModelOutput> {
        let z = self.scaler.transform(features);
        let (&soil_type, confidence) = self.classifier.classify(&z)?;
        let ph = self.ph.predict(&z);
        if !ph.is_finite() {
            return Err(SoilSightError::FeatureExtraction {
                reason: "predicted pH is not finite",
            });
        }
        let (lo, hi) = crate::catalog::PH_RANGE;
        Ok(SoilModelOutput {
            soil_type,
            confidence,
            ph: ph.clamp(lo, hi),
        })
    }
}

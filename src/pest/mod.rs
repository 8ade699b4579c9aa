//! Pest reference data and detection on edge-density feature vectors.

use crate::features::{DerivedStrategy, FeatureVector};
use crate::predict::linear::{
    read_model_file, ClassifierRecord, SoftmaxClassifier, Standardizer, StandardizerRecord,
};
use crate::trace::{trace_event, trace_span};
use crate::util::{SoilSightError, SoilSightResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How much damage a pest typically causes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Pest entry with advice text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PestProfile {
    pub id: String,
    pub severity: Severity,
    pub treatment_advice: String,
    pub prevention_tips: String,
}

const BUILTIN: [(&str, Severity, &str, &str); 4] = [
    (
        "aphids",
        Severity::Medium,
        "Use neem oil spray or insecticidal soap. Remove affected leaves.",
        "Keep plants healthy, use companion planting, avoid over-fertilization.",
    ),
    (
        "whitefly",
        Severity::High,
        "Use yellow sticky traps and insecticidal soap. Apply systemic insecticides.",
        "Use reflective mulch, maintain proper spacing, avoid overwatering.",
    ),
    (
        "thrips",
        Severity::Medium,
        "Use spinosad or neem oil. Remove affected plant parts.",
        "Keep area clean, use beneficial insects, avoid overcrowding.",
    ),
    (
        "mites",
        Severity::High,
        "Use miticides or sulfur-based products. Increase humidity.",
        "Maintain proper humidity, use predatory mites, avoid dusty conditions.",
    ),
];

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PestCatalogFile {
    pests: Vec<PestProfile>,
}

/// Ordered set of pest profiles with unique ids.
#[derive(Clone, Debug, PartialEq)]
pub struct PestCatalog {
    profiles: Vec<PestProfile>,
}

impl PestCatalog {
    /// Builds a catalog, rejecting empty or duplicate ids.
    pub fn new(profiles: Vec<PestProfile>) -> SoilSightResult<Self> {
        for (i, profile) in profiles.iter().enumerate() {
            if profile.id.trim().is_empty() {
                return Err(SoilSightError::CatalogFormat {
                    reason: "empty pest id".to_string(),
                });
            }
            if profiles[..i]
                .iter()
                .any(|other| other.id.eq_ignore_ascii_case(&profile.id))
            {
                return Err(SoilSightError::DuplicateEntry {
                    id: profile.id.clone(),
                });
            }
        }
        Ok(Self { profiles })
    }

    /// Parses a document of the form `{"pests": [...]}`.
    pub fn from_json_str(text: &str) -> SoilSightResult<Self> {
        let file: PestCatalogFile =
            serde_json::from_str(text).map_err(|err| SoilSightError::CatalogFormat {
                reason: err.to_string(),
            })?;
        Self::new(file.pests)
    }

    /// The four built-in pests: aphids, whitefly, thrips and mites.
    pub fn builtin() -> Self {
        let profiles = BUILTIN
            .iter()
            .map(|&(id, severity, treatment, prevention)| PestProfile {
                id: id.to_string(),
                severity,
                treatment_advice: treatment.to_string(),
                prevention_tips: prevention.to_string(),
            })
            .collect();
        Self { profiles }
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn profiles(&self) -> &[PestProfile] {
        &self.profiles
    }

    /// Looks a pest up by id, ignoring ASCII case.
    pub fn get(&self, id: &str) -> Option<&PestProfile> {
        self.profiles
            .iter()
            .find(|profile| profile.id.eq_ignore_ascii_case(id))
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.profiles
            .iter()
            .position(|profile| profile.id.eq_ignore_ascii_case(id.trim()))
    }
}

/// Serialized form of a [`LinearPestModel`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PestModelRecord {
    pub scaler: StandardizerRecord,
    pub pest_classifier: ClassifierRecord,
}

/// Trained pest classifier. Labels resolve to profiles in its catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearPestModel {
    scaler: Standardizer,
    classifier: SoftmaxClassifier<usize>,
    catalog: PestCatalog,
}

impl LinearPestModel {
    /// Validates a record against `catalog`; unknown labels are rejected.
    pub fn from_record(record: &PestModelRecord, catalog: PestCatalog) -> SoilSightResult<Self> {
        let scaler = Standardizer::from_record(&record.scaler)?;
        let classifier = SoftmaxClassifier::from_record(&record.pest_classifier, |label| {
            catalog
                .index_of(label)
                .ok_or_else(|| SoilSightError::InvalidModel {
                    reason: format!("pest label '{label}' is not in the pest catalog"),
                })
        })?;
        Ok(Self {
            scaler,
            classifier,
            catalog,
        })
    }

    pub fn from_json_str(text: &str, catalog: PestCatalog) -> SoilSightResult<Self> {
        let record: PestModelRecord =
            serde_json::from_str(text).map_err(|err| SoilSightError::InvalidModel {
                reason: err.to_string(),
            })?;
        Self::from_record(&record, catalog)
    }

    pub fn from_path<P: AsRef<Path>>(path: P, catalog: PestCatalog) -> SoilSightResult<Self> {
        Self::from_json_str(&read_model_file(path)?, catalog)
    }

    pub fn catalog(&self) -> &PestCatalog {
        &self.catalog
    }

    fn classify(&self, features: &FeatureVector) -> SoilSightResult<PestDetection> {
        let z = self.scaler.transform(features);
        let (&idx, confidence) = self.classifier.classify(&z)?;
        let pest = self.catalog.profiles[idx].clone();
        Ok(PestDetection { pest, confidence })
    }
}

/// A detected pest and the classifier's confidence in it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PestDetection {
    pub pest: PestProfile,
    /// Winning class probability in `(0, 1]`.
    pub confidence: f64,
}

impl PestDetection {
    /// Confidence as a percentage rounded to one decimal place.
    pub fn confidence_pct(&self) -> f64 {
        (self.confidence * 1000.0).round() / 10.0
    }
}

/// Pest detector chosen at construction time.
#[derive(Clone, Debug, PartialEq)]
pub enum PestDetector {
    /// Never reports a pest; no model backs it.
    RuleBased,
    TrainedModel(LinearPestModel),
}

impl PestDetector {
    /// Classifies an edge-density vector.
    ///
    /// Returns `Ok(None)` when the detector has nothing to report and
    /// `StrategyMismatch` for moisture vectors.
    pub fn detect(&self, features: &FeatureVector) -> SoilSightResult<Option<PestDetection>> {
        let _span = trace_span!("detect_pest").entered();
        let density = features.require(DerivedStrategy::EdgeDensity)?;
        let detection = match self {
            PestDetector::RuleBased => None,
            PestDetector::TrainedModel(model) => Some(model.classify(features)?),
        };
        trace_event!(
            "pest_detected",
            edge_density = density,
            pest = detection.as_ref().map_or("none", |d| d.pest.id.as_str())
        );
        Ok(detection)
    }
}

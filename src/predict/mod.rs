//! Soil property prediction from feature vectors.
//!
//! The predictor is picked explicitly when it is built. There is no random
//! fallback: the rule-based variant reports configured values and the trained
//! variant runs a linear model loaded from JSON.

pub mod linear;

pub use linear::{
    ClassifierRecord, LinearSoilModel, RegressorRecord, SoilModelRecord, StandardizerRecord,
};

use crate::catalog::{SoilType, PH_RANGE};
use crate::features::{DerivedStrategy, FeatureVector};
use crate::score::SoilConditions;
use crate::trace::{trace_event, trace_span};
use crate::util::{SoilSightError, SoilSightResult};
use serde::Serialize;

/// Which predictor produced a [`SoilAnalysis`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictorKind {
    RuleBased,
    TrainedModel,
}

impl PredictorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PredictorKind::RuleBased => "rule_based",
            PredictorKind::TrainedModel => "trained_model",
        }
    }
}

/// Fixed soil properties reported by the rule-based predictor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RuleBasedSoil {
    /// Reported pH, `0..=14`.
    pub ph: f64,
    /// Reported soil type; `None` means unknown and scores as a mismatch.
    pub soil_type: Option<SoilType>,
}

impl Default for RuleBasedSoil {
    fn default() -> Self {
        Self {
            ph: 7.0,
            soil_type: None,
        }
    }
}

impl RuleBasedSoil {
    fn validate(&self) -> SoilSightResult<()> {
        if !self.ph.is_finite() || self.ph < PH_RANGE.0 || self.ph > PH_RANGE.1 {
            return Err(SoilSightError::InvalidParameter {
                name: "ph",
                reason: "must be finite and within 0..=14",
            });
        }
        Ok(())
    }
}

/// Predicted soil properties.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SoilAnalysis {
    pub soil_type: Option<SoilType>,
    pub ph: f64,
    /// Moisture percentage, taken from the feature vector.
    pub moisture: f64,
    /// Winning class probability; `None` for the rule-based predictor.
    pub confidence: Option<f64>,
    pub source: PredictorKind,
}

impl SoilAnalysis {
    /// Conditions to score crops against.
    pub fn conditions(&self) -> SoilConditions {
        SoilConditions {
            ph: self.ph,
            moisture: self.moisture,
            soil_type: self.soil_type,
        }
    }
}

/// Soil predictor chosen at construction time.
#[derive(Clone, Debug, PartialEq)]
pub enum SoilPredictor {
    RuleBased(RuleBasedSoil),
    TrainedModel(LinearSoilModel),
}

impl SoilPredictor {
    pub fn kind(&self) -> PredictorKind {
        match self {
            SoilPredictor::RuleBased(_) => PredictorKind::RuleBased,
            SoilPredictor::TrainedModel(_) => PredictorKind::TrainedModel,
        }
    }

    /// Predicts soil properties for a moisture-strategy vector.
    ///
    /// Fails with `StrategyMismatch` for edge-density vectors.
    pub fn predict(&self, features: &FeatureVector) -> SoilSightResult<SoilAnalysis> {
        let _span = trace_span!("predict_soil", predictor = self.kind().as_str()).entered();
        let moisture = features.require(DerivedStrategy::Moisture)?;

        let analysis = match self {
            SoilPredictor::RuleBased(rules) => {
                rules.validate()?;
                SoilAnalysis {
                    soil_type: rules.soil_type,
                    ph: rules.ph,
                    moisture,
                    confidence: None,
                    source: PredictorKind::RuleBased,
                }
            }
            SoilPredictor::TrainedModel(model) => {
                let out = model.infer(features)?;
                SoilAnalysis {
                    soil_type: Some(out.soil_type),
                    ph: out.ph,
                    moisture,
                    confidence: Some(out.confidence),
                    source: PredictorKind::TrainedModel,
                }
            }
        };

        trace_event!(
            "soil_predicted",
            ph = analysis.ph,
            moisture = analysis.moisture,
            soil = analysis.soil_type.map_or("unknown", SoilType::label)
        );
        Ok(analysis)
    }
}

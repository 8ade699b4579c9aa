//! Weighted crop suitability scoring.
//!
//! A score is the sum of three sub-scores, capped at 1.0:
//!
//! - pH fit, weight 0.3, losing 0.1 per pH unit outside the admissible range;
//! - moisture fit, weight 0.3, losing 0.01 per percentage point outside;
//! - soil-type fit, 0.4 on a match and a flat 0.2 otherwise.
//!
//! Distances are measured to the nearer range bound. The decay constants are
//! fixed heuristics and are kept exactly so scores stay comparable with
//! previously stored results. Summation order is pH, moisture, soil type.

use crate::catalog::{CropProfile, SoilType};
use serde::Serialize;

/// Credit for a pH inside the admissible range.
pub const PH_WEIGHT: f64 = 0.3;
/// Credit lost per pH unit outside the range.
pub const PH_DECAY: f64 = 0.1;
/// Credit for moisture inside the admissible range.
pub const MOISTURE_WEIGHT: f64 = 0.3;
/// Credit lost per moisture percentage point outside the range.
pub const MOISTURE_DECAY: f64 = 0.01;
/// Credit for an admissible soil type.
pub const SOIL_MATCH_CREDIT: f64 = 0.4;
/// Credit for an inadmissible or unrecognized soil type.
pub const SOIL_MISMATCH_CREDIT: f64 = 0.2;

/// Observed soil conditions a crop is scored against.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SoilConditions {
    /// Soil pH.
    pub ph: f64,
    /// Moisture in percent.
    pub moisture: f64,
    /// Observed soil type; `None` when the label was not recognized.
    pub soil_type: Option<SoilType>,
}

impl SoilConditions {
    /// Builds conditions from an external soil-type label.
    ///
    /// Unrecognized labels are kept as `None`, which scores as a mismatch.
    pub fn from_label(ph: f64, moisture: f64, soil_label: &str) -> Self {
        Self {
            ph,
            moisture,
            soil_type: SoilType::from_label(soil_label),
        }
    }
}

/// Coarse suitability bucket derived from a score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Poor,
    Moderate,
    Good,
    Excellent,
}

impl Tier {
    /// Maps a score onto its tier: `>= 0.9` excellent, `>= 0.7` good,
    /// `>= 0.5` moderate, otherwise poor.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.9 {
            Tier::Excellent
        } else if score >= 0.7 {
            Tier::Good
        } else if score >= 0.5 {
            Tier::Moderate
        } else {
            Tier::Poor
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Excellent => "excellent",
            Tier::Good => "good",
            Tier::Moderate => "moderate",
            Tier::Poor => "poor",
        }
    }
}

/// Per-criterion contributions to a suitability score.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub ph: f64,
    pub moisture: f64,
    pub soil_type: f64,
    /// `min(ph + moisture + soil_type, 1.0)`.
    pub total: f64,
}

fn range_credit(value: f64, min: f64, max: f64, weight: f64, decay: f64) -> f64 {
    if min <= value && value <= max {
        return weight;
    }
    let distance = (value - min).abs().min((value - max).abs());
    // f64::max discards NaN, so a NaN reading earns no credit.
    (weight - distance * decay).max(0.0)
}

/// Scores `profile` against `conditions` and keeps the per-criterion parts.
pub fn score_breakdown(conditions: &SoilConditions, profile: &CropProfile) -> ScoreBreakdown {
    let (min_ph, max_ph) = profile.ph_range();
    let (min_moisture, max_moisture) = profile.moisture_range();

    let ph = range_credit(conditions.ph, min_ph, max_ph, PH_WEIGHT, PH_DECAY);
    let moisture = range_credit(
        conditions.moisture,
        min_moisture,
        max_moisture,
        MOISTURE_WEIGHT,
        MOISTURE_DECAY,
    );
    let soil_type = match conditions.soil_type {
        Some(soil) if profile.accepts(soil) => SOIL_MATCH_CREDIT,
        _ => SOIL_MISMATCH_CREDIT,
    };

    let total = ph + moisture + soil_type;
    ScoreBreakdown {
        ph,
        moisture,
        soil_type,
        total: total.min(1.0),
    }
}

/// Suitability of `profile` for `conditions`, in `[0, 1]`.
pub fn score(conditions: &SoilConditions, profile: &CropProfile) -> f64 {
    score_breakdown(conditions, profile).total
}

//! Thresholded, ordered crop recommendations.

use crate::catalog::{CropCatalog, CropMetadata, SoilType};
use crate::features::{DerivedStrategy, FeatureVector};
use crate::score::{score_breakdown, ScoreBreakdown, SoilConditions, Tier};
use crate::trace::{trace_debug, trace_event, trace_span};
use crate::util::{SoilSightError, SoilSightResult};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::cmp::Ordering;

/// Ranking parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RankConfig {
    /// Entries must score strictly above this value.
    pub threshold: f64,
    /// Maximum number of entries returned.
    pub top_k: usize,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            threshold: 0.6,
            top_k: 5,
        }
    }
}

/// One crop's score against a set of soil conditions.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredCrop {
    crop_id: String,
    breakdown: ScoreBreakdown,
    catalog_index: usize,
    observed_soil: Option<SoilType>,
    metadata: CropMetadata,
}

impl ScoredCrop {
    /// Crop identifier.
    pub fn crop_id(&self) -> &str {
        &self.crop_id
    }

    /// Suitability score in `[0, 1]`.
    pub fn score(&self) -> f64 {
        self.breakdown.total
    }

    /// Per-criterion contributions.
    pub fn breakdown(&self) -> &ScoreBreakdown {
        &self.breakdown
    }

    /// Tier derived from the score.
    pub fn tier(&self) -> Tier {
        Tier::from_score(self.score())
    }

    /// Score as a percentage rounded to one decimal place.
    pub fn confidence_pct(&self) -> f64 {
        (self.score() * 1000.0).round() / 10.0
    }

    /// Position of the crop in the catalog it was ranked from.
    pub fn catalog_index(&self) -> usize {
        self.catalog_index
    }

    /// Soil type the crop was scored against.
    pub fn observed_soil(&self) -> Option<SoilType> {
        self.observed_soil
    }

    /// Pass-through catalog metadata.
    pub fn metadata(&self) -> &CropMetadata {
        &self.metadata
    }
}

impl Serialize for ScoredCrop {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ScoredCrop", 7)?;
        s.serialize_field("crop_id", &self.crop_id)?;
        s.serialize_field("score", &self.score())?;
        s.serialize_field("confidence_pct", &self.confidence_pct())?;
        s.serialize_field("tier", &self.tier())?;
        s.serialize_field("breakdown", &self.breakdown)?;
        s.serialize_field("observed_soil", &self.observed_soil)?;
        s.serialize_field("metadata", &self.metadata)?;
        s.end()
    }
}

fn crop_cmp_desc(a: &ScoredCrop, b: &ScoredCrop) -> Ordering {
    b.score()
        .total_cmp(&a.score())
        .then_with(|| a.catalog_index.cmp(&b.catalog_index))
}

/// Scores every catalog entry and returns the best ones.
///
/// Entries scoring strictly above `cfg.threshold` are kept, ordered by
/// descending score with ties in catalog order, and truncated to `cfg.top_k`.
/// An empty catalog or no qualifying entry yields an empty list.
pub fn rank(
    conditions: &SoilConditions,
    catalog: &CropCatalog,
    cfg: &RankConfig,
) -> Vec<ScoredCrop> {
    let _span = trace_span!("rank", crops = catalog.len(), top_k = cfg.top_k).entered();

    let mut kept = Vec::new();
    for (catalog_index, profile) in catalog.iter().enumerate() {
        let breakdown = score_breakdown(conditions, profile);
        trace_debug!("crop_scored", crop = profile.id(), score = breakdown.total);
        if breakdown.total > cfg.threshold {
            kept.push(ScoredCrop {
                crop_id: profile.id().to_string(),
                breakdown,
                catalog_index,
                observed_soil: conditions.soil_type,
                metadata: profile.metadata().clone(),
            });
        }
    }

    kept.sort_by(crop_cmp_desc);
    kept.truncate(cfg.top_k);

    trace_event!("ranked", kept = kept.len());
    kept
}

/// Ranks crops for a moisture-strategy feature vector.
///
/// Moisture comes from the vector's derived slot; pH and the soil-type label
/// come from the caller since the vector carries neither. Fails with
/// `StrategyMismatch` for edge-density vectors.
pub fn recommend(
    features: &FeatureVector,
    soil_type_label: &str,
    ph: f64,
    catalog: &CropCatalog,
    cfg: &RankConfig,
) -> SoilSightResult<Vec<ScoredCrop>> {
    let moisture = features.require(DerivedStrategy::Moisture)?;
    let conditions = SoilConditions::from_label(ph, moisture, soil_type_label);
    Ok(rank(&conditions, catalog, cfg))
}

impl RankConfig {
    pub(crate) fn validate(&self) -> SoilSightResult<()> {
        if !self.threshold.is_finite() {
            return Err(SoilSightError::InvalidParameter {
                name: "threshold",
                reason: "must be finite",
            });
        }
        Ok(())
    }
}
